use crate::error::DecompressionError;
use crate::run::{Run, SENTINEL};
use crate::token::{Token, is_token};

type Result<T> = core::result::Result<T, DecompressionError>;

/// Bounded writer over the caller's output buffer.
struct Output<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl Output<'_> {
    fn reserve(&self, n: usize) -> Result<usize> {
        let end = self.len + n;
        if end > self.buf.len() {
            return Err(DecompressionError::OutputTooSmall {
                capacity: self.buf.len(),
            });
        }
        Ok(end)
    }

    fn extend(&mut self, bytes: &[u8]) -> Result<()> {
        let end = self.reserve(bytes.len())?;
        self.buf[self.len..end].copy_from_slice(bytes);
        self.len = end;
        Ok(())
    }

    fn fill(&mut self, value: u8, n: usize) -> Result<()> {
        let end = self.reserve(n)?;
        self.buf[self.len..end].fill(value);
        self.len = end;
        Ok(())
    }
}

/// Decompresses `compressed` into `output` and returns the number of bytes
/// written.
///
/// A buffer without any token is an uncompressed passthrough and is copied
/// as is. Decoding stops at the end of `compressed` or at a sentinel byte
/// where a token is expected, so sentinel padding after a stream is ignored.
///
/// # Errors
/// * [`DecompressionError::OutputTooSmall`] if `output` cannot hold the
///   result. Nothing is written past its end.
/// * [`DecompressionError::UnexpectedEof`] if a run or token is cut off.
/// * [`DecompressionError::LiteralMismatch`] if the data bytes in front of a
///   token disagree with its `before` count.
pub fn decompress(compressed: &[u8], output: &mut [u8]) -> Result<usize> {
    let mut out = Output {
        buf: output,
        len: 0,
    };

    if !compressed.iter().copied().any(is_token) {
        out.extend(compressed)?;
        return Ok(out.len);
    }

    let end = compressed.len();
    let mut pos = 0;

    while pos < end {
        // Data bytes in front of the next token belong to its `before` run.
        // When the previous token ended on a literal they continue it.
        let Some(skip) = compressed[pos..].iter().position(|&b| is_token(b)) else {
            return Err(DecompressionError::UnexpectedEof);
        };
        let at = pos + skip;

        if compressed[at] == SENTINEL {
            if skip != 0 {
                return Err(DecompressionError::UnexpectedEof);
            }
            break;
        }

        let token = Token::unpack(compressed[at]);
        if token.before.len() != skip {
            return Err(DecompressionError::LiteralMismatch { offset: at });
        }
        out.extend(&compressed[pos..at])?;
        pos = at + 1;

        match token.after {
            Run::Matched(n) => {
                let &value = compressed
                    .get(pos)
                    .ok_or(DecompressionError::UnexpectedEof)?;
                out.fill(value, n as usize)?;
                pos += 1;
            }
            Run::Literal(n) => {
                let run_end = pos + n as usize;
                let run = compressed
                    .get(pos..run_end)
                    .ok_or(DecompressionError::UnexpectedEof)?;
                if let Some(stray) = run.iter().position(|&b| is_token(b)) {
                    return Err(DecompressionError::LiteralMismatch { offset: pos + stray });
                }
                out.extend(run)?;
                pos = run_end;
            }
        }
    }

    Ok(out.len)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STREAM: [u8; 16] = [
        0x03, 0x74, 0xA3, 0x04, 0x82, 0x35, 0x84, 0x64, 0x85, 0x00, 0x56, 0x45, 0xA3, 0x56, 0x83,
        0x09,
    ];

    const ORIGINAL: [u8; 24] = [
        0x03, 0x74, 0x04, 0x04, 0x04, 0x35, 0x35, 0x64, 0x64, 0x64, 0x64, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x56, 0x45, 0x56, 0x56, 0x56, 0x09, 0x09, 0x09,
    ];

    #[test]
    fn decodes_the_regression_stream() {
        let mut out = [0u8; 32];
        let n = decompress(&STREAM, &mut out).unwrap();
        assert_eq!(&out[..n], &ORIGINAL);
    }

    #[test]
    fn stops_at_sentinel_padding() {
        let mut padded = [SENTINEL; 24];
        padded[..STREAM.len()].copy_from_slice(&STREAM);
        let mut out = [0u8; 24];
        assert_eq!(decompress(&padded, &mut out), Ok(24));
        assert_eq!(out, ORIGINAL);
    }

    #[test]
    fn passthrough_copies_plain_data() {
        let plain = [1u8, 2, 3, 4, 5];
        let mut out = [0u8; 5];
        assert_eq!(decompress(&plain, &mut out), Ok(5));
        assert_eq!(out, plain);
    }

    #[test]
    fn never_writes_past_capacity() {
        let mut out = [0u8; 10];
        assert_eq!(
            decompress(&STREAM, &mut out),
            Err(DecompressionError::OutputTooSmall { capacity: 10 })
        );
        // 03 74 04 04 04 35 35 fit, the run of 64s does not.
        assert_eq!(&out[..7], &ORIGINAL[..7]);
        assert_eq!(&out[7..], &[0, 0, 0]);
    }

    #[test]
    fn rejects_truncated_runs() {
        let mut out = [0u8; 32];
        assert_eq!(
            decompress(&[0x85], &mut out),
            Err(DecompressionError::UnexpectedEof)
        );
        assert_eq!(
            decompress(&[0x8B, 1, 2], &mut out),
            Err(DecompressionError::UnexpectedEof)
        );
        assert_eq!(
            decompress(&[0x84, 9, 1, 2], &mut out),
            Err(DecompressionError::UnexpectedEof)
        );
    }

    #[test]
    fn rejects_miscounted_literals() {
        let mut out = [0u8; 32];
        assert_eq!(
            decompress(&[1, 2, 3, 0xA8], &mut out),
            Err(DecompressionError::LiteralMismatch { offset: 3 })
        );
        assert_eq!(
            decompress(&[0x8A, 1, 0x85, 2], &mut out),
            Err(DecompressionError::LiteralMismatch { offset: 2 })
        );
    }

    #[test]
    fn literal_continues_across_tokens() {
        // Fourteen distinct bytes: (L7, L6) then a terminator for the last one.
        let stream: [u8; 16] = [0, 1, 2, 3, 4, 5, 6, 0xFE, 7, 8, 9, 10, 11, 12, 13, 0x98];
        let mut out = [0u8; 14];
        assert_eq!(decompress(&stream, &mut out), Ok(14));
        let expected: [u8; 14] = core::array::from_fn(|i| i as u8);
        assert_eq!(out, expected);
    }
}
