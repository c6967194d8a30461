//! Packing of two run descriptors into one framing byte.
//!
//! A descriptor is a nibble: bit 3 flags a literal run, bits 0-2 hold the
//! count. The `before` descriptor lives in the high nibble and the `after`
//! descriptor in the low nibble.

use crate::run::{MAX_DATA_BYTE, Run};

/// Nibble bit marking a literal (non-matching) run.
pub const LITERAL_FLAG: u8 = 0x8;

/// Nibble bits holding the run count.
pub const COUNT_MASK: u8 = 0x7;

const NIBBLE_MASK: u8 = 0xF;

impl Run {
    #[inline]
    #[must_use]
    pub const fn to_nibble(self) -> u8 {
        match self {
            Self::Matched(n) => n & COUNT_MASK,
            Self::Literal(n) => LITERAL_FLAG | (n & COUNT_MASK),
        }
    }

    #[inline]
    #[must_use]
    pub const fn from_nibble(nibble: u8) -> Self {
        let count = nibble & COUNT_MASK;
        if nibble & LITERAL_FLAG != 0 {
            Self::Literal(count)
        } else {
            Self::Matched(count)
        }
    }
}

/// A framing byte describing the run before it and the run after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub before: Run,
    pub after: Run,
}

impl Token {
    #[inline]
    #[must_use]
    pub const fn new(before: Run, after: Run) -> Self {
        Self { before, after }
    }

    #[inline]
    #[must_use]
    pub const fn pack(self) -> u8 {
        (self.before.to_nibble() << 4) | self.after.to_nibble()
    }

    #[inline]
    #[must_use]
    pub const fn unpack(byte: u8) -> Self {
        Self {
            before: Run::from_nibble(byte >> 4),
            after: Run::from_nibble(byte & NIBBLE_MASK),
        }
    }
}

/// Any byte above the data range is a token.
#[inline]
#[must_use]
pub const fn is_token(byte: u8) -> bool {
    byte > MAX_DATA_BYTE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run::SENTINEL;

    #[test]
    fn packs_before_high_after_low() {
        assert_eq!(Token::new(Run::Literal(2), Run::Matched(3)).pack(), 0xA3);
        assert_eq!(Token::new(Run::Literal(0), Run::Matched(5)).pack(), 0x85);
        assert_eq!(Token::new(Run::Literal(7), Run::Literal(0)).pack(), 0xF8);
    }

    #[test]
    fn unpack_inverts_pack() {
        let token = Token::unpack(0xFD);
        assert_eq!(token.before, Run::Literal(7));
        assert_eq!(token.after, Run::Literal(5));
        assert_eq!(token.pack(), 0xFD);
    }

    #[test]
    fn literal_before_always_frames() {
        for before in 0..=7 {
            for after in 0..=0xF {
                let byte = Token::new(Run::Literal(before), Run::from_nibble(after)).pack();
                assert!(is_token(byte));
            }
        }
        assert!(!is_token(MAX_DATA_BYTE));
        assert!(is_token(SENTINEL));
    }
}
