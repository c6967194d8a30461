//! Run detection over 7-bit byte buffers.

/// Longest run a single descriptor can express (3 bits).
pub const MAX_RUN: u8 = 7;

/// Highest value a data byte may take. Everything above is framing.
pub const MAX_DATA_BYTE: u8 = 0x7F;

/// Marks "no more valid data" inside staging windows. Never a data byte.
pub const SENTINEL: u8 = 0xFF;

/// A run starting at some position of a buffer.
///
/// The count is always `0..=MAX_RUN`; a count of zero only appears inside
/// tokens, where it means "no run on this side".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Run {
    /// `n` copies of the same byte, stored once.
    Matched(u8),
    /// `n` bytes each differing from the previous one, stored verbatim.
    Literal(u8),
}

impl Run {
    /// Number of decompressed bytes this run stands for.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        match self {
            Self::Matched(n) | Self::Literal(n) => n as usize,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }

    #[inline]
    #[must_use]
    pub const fn is_literal(self) -> bool {
        matches!(self, Self::Literal(_))
    }

    /// Number of bytes the run occupies in a compressed stream.
    #[inline]
    #[must_use]
    pub const fn stream_len(self) -> usize {
        match self {
            Self::Matched(0) => 0,
            Self::Matched(_) => 1,
            Self::Literal(n) => n as usize,
        }
    }

    /// A single literal byte costs the same as a matched run of one, and
    /// the matched form is what the compactor emits after a token.
    #[inline]
    #[must_use]
    pub const fn normalized(self) -> Self {
        match self {
            Self::Literal(1) => Self::Matched(1),
            other => other,
        }
    }
}

/// Classifies the run starting at `data[i]`, looking no further than `limit`.
///
/// Returns `None` when `i` is at or past the limit or sits on a [`SENTINEL`].
/// A matched run is at least two bytes long. A literal run stops before the
/// first byte that starts a matched pair, so the pair can be matched next.
#[must_use]
pub fn classify(data: &[u8], i: usize, limit: usize) -> Option<Run> {
    let limit = limit.min(data.len());
    if i >= limit || data[i] == SENTINEL {
        return None;
    }

    let first = data[i];
    let max = MAX_RUN as usize;

    if i + 1 < limit && data[i + 1] == first {
        let mut n = 2;
        while n < max && i + n < limit && data[i + n] == first {
            n += 1;
        }
        return Some(Run::Matched(n as u8));
    }

    let mut n = 1;
    while n < max {
        let k = i + n;
        if k >= limit || data[k] == SENTINEL {
            break;
        }
        if k + 1 < limit && data[k + 1] == data[k] {
            break;
        }
        n += 1;
    }
    Some(Run::Literal(n as u8))
}
