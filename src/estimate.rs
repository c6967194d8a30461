use crate::segment::plan_segment;

/// Predicted outcome of compressing a buffer, computed without mutating it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Estimate {
    /// Length of the compressed stream.
    pub compressed_len: usize,
    /// Largest amount by which written output runs ahead of consumed input.
    /// In-place compaction has to absorb this in its staging window.
    pub peak_overrun: usize,
}

impl Estimate {
    /// Compression must save at least two bytes to be worth doing.
    #[inline]
    #[must_use]
    pub const fn is_compressible(&self, size: usize) -> bool {
        self.compressed_len + 1 < size
    }
}

/// Walks `data` with the same segment planner the compactor uses and sums
/// the encoded sizes.
///
/// The walk is bounded to `2 * data.len()` steps. If it stops before the
/// whole buffer is covered the estimate reports no savings.
#[must_use]
pub fn estimate(data: &[u8]) -> Estimate {
    let size = data.len();
    let max_steps = size.saturating_mul(2);

    let mut consumed = 0;
    let mut written = 0;
    let mut peak_overrun = 0;
    let mut steps = 0;

    while steps < max_steps {
        let Some(segment) = plan_segment(data, consumed, size) else {
            break;
        };
        consumed += segment.consumed_len();
        written += segment.encoded_len();
        peak_overrun = peak_overrun.max(written.saturating_sub(consumed));
        steps += 1;
    }

    if consumed < size {
        return Estimate {
            compressed_len: size,
            peak_overrun,
        };
    }

    Estimate {
        compressed_len: written,
        peak_overrun,
    }
}
