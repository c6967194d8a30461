use crate::run::{MAX_RUN, Run, classify};
use crate::token::Token;

/// Largest number of bytes a single segment can occupy in the stream.
pub(crate) const MAX_SEGMENT_LEN: usize = 2 * MAX_RUN as usize + 1;

/// Bytes that must be visible past the read position for planning to see
/// the same runs it would see on the whole buffer.
pub(crate) const PLAN_LOOKAHEAD: usize = MAX_SEGMENT_LEN + 1;

/// One token together with the data bytes that surround it.
///
/// Layout in the stream is `[literal bytes] token [after bytes]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment {
    /// A matched run with nothing before it.
    Matched(u8),
    /// A literal run followed by any run.
    Pair { literal: u8, after: Run },
    /// A literal run that ends the input.
    Terminator { literal: u8 },
}

impl Segment {
    pub(crate) const fn token(self) -> Token {
        match self {
            Self::Matched(n) => Token::new(Run::Literal(0), Run::Matched(n)),
            Self::Pair { literal, after } => Token::new(Run::Literal(literal), after),
            Self::Terminator { literal } => Token::new(Run::Literal(literal), Run::Literal(0)),
        }
    }

    /// Literal bytes stored ahead of the token.
    pub(crate) const fn literal_len(self) -> usize {
        match self {
            Self::Matched(_) => 0,
            Self::Pair { literal, .. } | Self::Terminator { literal } => literal as usize,
        }
    }

    pub(crate) const fn after(self) -> Run {
        self.token().after
    }

    /// Source bytes this segment covers.
    pub(crate) const fn consumed_len(self) -> usize {
        self.literal_len() + self.after().len()
    }

    /// Stream bytes this segment occupies.
    pub(crate) const fn encoded_len(self) -> usize {
        self.literal_len() + 1 + self.after().stream_len()
    }
}

/// Plans the segment starting at `data[i]`.
///
/// The classifier runs twice: once for the run before the token and once
/// for the run after it. A matched first run takes the token alone, since
/// only a literal count fits in the high nibble.
pub(crate) fn plan_segment(data: &[u8], i: usize, limit: usize) -> Option<Segment> {
    let before = classify(data, i, limit)?;
    let literal = match before {
        Run::Matched(n) => return Some(Segment::Matched(n)),
        Run::Literal(n) => n,
    };

    let segment = match classify(data, i + literal as usize, limit) {
        None => Segment::Terminator { literal },
        // A full literal on both sides would pack to the sentinel. Give the
        // last byte to the next segment; the decoder joins them back.
        Some(Run::Literal(MAX_RUN)) if literal == MAX_RUN => Segment::Pair {
            literal,
            after: Run::Literal(MAX_RUN - 1),
        },
        Some(after) => Segment::Pair {
            literal,
            after: after.normalized(),
        },
    };
    Some(segment)
}
