//! # In-place nibble-token RLE
//!
//! `nibble-rle` compresses buffers of 7-bit bytes (`0x00..=0x7F`) in place.
//! Runs of repeated bytes collapse to a single byte, and every run is framed
//! by a token byte whose high bit is set, so the stream needs no length
//! prefix: any byte above `0x7F` is a token.
//!
//! A token packs two nibbles. The high nibble counts the literal bytes that
//! precede it, the low nibble describes the run that follows it (bit 3 set
//! for a literal run, bits 0-2 for the length).
//!
//! The compressor never needs a second buffer sized to its input. It stages
//! reads and writes through two 64-byte windows and refuses to write over
//! input it has not read yet.
//!
//! ## Example
//!
//! ```rust
//! use nibble_rle::{compress, decompress};
//!
//! let original: [u8; 24] = [
//!     0x03, 0x74, 0x04, 0x04, 0x04, 0x35, 0x35, 0x64,
//!     0x64, 0x64, 0x64, 0x00, 0x00, 0x00, 0x00, 0x00,
//!     0x56, 0x45, 0x56, 0x56, 0x56, 0x09, 0x09, 0x09,
//! ];
//!
//! let mut buffer = original;
//! let len = compress(&mut buffer).expect("7-bit input");
//! assert_eq!(len, 16);
//! assert_eq!(&buffer[..4], &[0x03, 0x74, 0xA3, 0x04]);
//!
//! let mut restored = [0u8; 24];
//! let n = decompress(&buffer[..len], &mut restored).expect("valid stream");
//! assert_eq!(&restored[..n], &original);
//! ```

#![no_std]
#![forbid(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod compress;
pub mod decompress;
pub mod error;
pub mod estimate;
pub mod run;
mod segment;
pub mod token;

pub use compress::{STAGING_WINDOW, compress};
pub use decompress::decompress;
pub use error::{CompressionError, DecompressionError};
pub use estimate::{Estimate, estimate};
pub use run::{MAX_DATA_BYTE, MAX_RUN, Run, SENTINEL, classify};
pub use token::{Token, is_token};

#[cfg(test)]
mod tests {
    use std::vec::Vec;

    use super::{compress, decompress};

    fn round_trip(original: &[u8]) -> usize {
        let mut buffer = original.to_vec();
        let len = compress(&mut buffer).unwrap();

        let mut restored = std::vec![0u8; original.len()];
        let n = decompress(&buffer[..len], &mut restored).unwrap();
        assert_eq!(&restored[..n], original);
        len
    }

    #[test]
    fn test_round_trip() {
        let mut original = Vec::new();
        for value in 0..40u8 {
            original.extend(core::iter::repeat_n(value, (value % 9) as usize + 1));
        }
        let len = round_trip(&original);
        assert!(len < original.len());
    }

    #[test]
    fn test_compress_rle() {
        let original = std::vec![b'A'; 100];
        let len = round_trip(&original);

        // 14 tokens for 7-byte runs, one for the leftover pair.
        assert_eq!(len, 30);
    }

    #[test]
    fn test_incompressible() {
        let original: Vec<u8> = (0..100).map(|i| (i * 7 % 128) as u8).collect();
        let mut buffer = original.clone();
        assert_eq!(compress(&mut buffer), Ok(original.len()));
        assert_eq!(buffer, original);
        round_trip(&original);
    }
}
