use crate::error::CompressionError;
use crate::estimate::estimate;
use crate::run::{MAX_DATA_BYTE, Run, SENTINEL};
use crate::segment::{MAX_SEGMENT_LEN, PLAN_LOOKAHEAD, Segment, plan_segment};

type Result<T> = core::result::Result<T, CompressionError>;

/// Size of each of the two staging windows used during compaction.
pub const STAGING_WINDOW: usize = 64;

/// Double-buffered in-place writer.
///
/// Source bytes are copied into `read_window` before they are planned, and
/// encoded bytes collect in `write_window` until they are flushed back to
/// the source. A flush may only cover source bytes that have already been
/// staged for reading.
struct Compactor<'a> {
    buf: &'a mut [u8],

    read_window: [u8; STAGING_WINDOW],
    /// Source offset of `read_window[0]`.
    read_base: usize,
    /// Next unconsumed index in `read_window`.
    cursor: usize,
    /// Valid bytes in `read_window`. The rest holds the sentinel.
    filled: usize,

    write_window: [u8; STAGING_WINDOW],
    write_len: usize,
    /// Source offset the next flush starts at.
    write_offset: usize,
}

impl<'a> Compactor<'a> {
    fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            read_window: [SENTINEL; STAGING_WINDOW],
            read_base: 0,
            cursor: 0,
            filled: 0,
            write_window: [0; STAGING_WINDOW],
            write_len: 0,
            write_offset: 0,
        }
    }

    /// End of the source region that has been copied into the read window.
    const fn read_end(&self) -> usize {
        self.read_base + self.filled
    }

    /// Moves unconsumed bytes to the front of the read window and tops it up
    /// from the source. Bytes already staged are never re-read, since a flush
    /// may have overwritten them.
    fn refill(&mut self) {
        let remaining = self.filled - self.cursor;
        self.read_window.copy_within(self.cursor..self.filled, 0);
        self.read_base += self.cursor;
        self.cursor = 0;

        let start = self.read_base + remaining;
        let take = (STAGING_WINDOW - remaining).min(self.buf.len() - start);
        self.read_window[remaining..remaining + take]
            .copy_from_slice(&self.buf[start..start + take]);
        self.filled = remaining + take;
        self.read_window[self.filled..].fill(SENTINEL);
    }

    fn needs_refill(&self) -> bool {
        self.filled - self.cursor < PLAN_LOOKAHEAD && self.read_end() < self.buf.len()
    }

    /// Writes the staged output back into the source buffer.
    fn flush(&mut self) -> Result<()> {
        if self.write_len == 0 {
            return Ok(());
        }

        let write_end = self.write_offset + self.write_len;
        if write_end > self.read_end() && self.read_end() < self.buf.len() {
            self.refill();
        }
        if write_end > self.read_end() {
            return Err(CompressionError::StagingOverflow {
                write_end,
                read_end: self.read_end(),
            });
        }

        tracing::trace!(
            offset = self.write_offset,
            len = self.write_len,
            read_end = self.read_end(),
            "flushing staged output"
        );
        self.buf[self.write_offset..write_end].copy_from_slice(&self.write_window[..self.write_len]);
        self.write_offset = write_end;
        self.write_len = 0;
        Ok(())
    }

    fn push(&mut self, bytes: &[u8]) {
        self.write_window[self.write_len..self.write_len + bytes.len()].copy_from_slice(bytes);
        self.write_len += bytes.len();
    }

    /// Copies one planned segment from the read window into the write window.
    fn emit(&mut self, segment: Segment) {
        let start = self.cursor;
        let literal_end = start + segment.literal_len();

        let mut staged = [0u8; MAX_SEGMENT_LEN];
        let mut len = literal_end - start;
        staged[..len].copy_from_slice(&self.read_window[start..literal_end]);

        staged[len] = segment.token().pack();
        len += 1;

        match segment.after() {
            Run::Matched(0) | Run::Literal(0) => {}
            Run::Matched(_) => {
                staged[len] = self.read_window[literal_end];
                len += 1;
            }
            Run::Literal(n) => {
                let n = n as usize;
                staged[len..len + n]
                    .copy_from_slice(&self.read_window[literal_end..literal_end + n]);
                len += n;
            }
        }

        self.push(&staged[..len]);
    }

    fn run(mut self) -> Result<usize> {
        loop {
            if self.needs_refill() {
                self.refill();
            }
            let Some(segment) = plan_segment(&self.read_window, self.cursor, self.filled) else {
                break;
            };
            if self.write_len + MAX_SEGMENT_LEN > STAGING_WINDOW {
                self.flush()?;
            }
            self.emit(segment);
            self.cursor += segment.consumed_len();
        }

        self.flush()?;
        Ok(self.write_offset)
    }
}

/// Compresses `buffer` in place and returns the compressed length.
///
/// `buffer[..len]` holds the stream afterwards; bytes past it are left in an
/// unspecified state. When compression would not save at least two bytes,
/// or would need more read-ahead than the staging window holds, the buffer
/// is left untouched and its full length is returned.
///
/// # Errors
/// * [`CompressionError::ReservedByte`] if any byte is above `0x7F`. The
///   buffer is not modified.
/// * [`CompressionError::StagingOverflow`] if the write cursor would pass
///   unread input. The buffer is only valid up to the last flush.
pub fn compress(buffer: &mut [u8]) -> Result<usize> {
    let size = buffer.len();

    if let Some(offset) = buffer.iter().position(|&b| b > MAX_DATA_BYTE) {
        return Err(CompressionError::ReservedByte {
            offset,
            value: buffer[offset],
        });
    }

    let est = estimate(buffer);
    if !est.is_compressible(size) {
        tracing::debug!(
            size,
            predicted = est.compressed_len,
            "input is incompressible; leaving it unchanged"
        );
        return Ok(size);
    }
    if est.peak_overrun > STAGING_WINDOW {
        tracing::debug!(
            size,
            peak_overrun = est.peak_overrun,
            "output would outrun the staging window; leaving input unchanged"
        );
        return Ok(size);
    }

    let len = Compactor::new(buffer).run()?;
    debug_assert_eq!(len, est.compressed_len);
    tracing::debug!(size, compressed = len, "compressed in place");
    Ok(len)
}
