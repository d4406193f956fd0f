//! Piecewise aggregate approximation: block-averaging downsampler.

use crate::error::PaaError;
use crate::series::{Sequence, SequenceView};

/// A reduced-length, block-averaged copy of a sequence, together with the
/// number of original samples folded into each reduced sample.
///
/// Block boundaries are computed as `round(len / target * (k + 1)) - 1` for
/// each emitted point `k`, so every original sample is covered exactly once
/// and block sizes differ by at most one. The block-size table drives the
/// window projection back to the finer resolution.
#[derive(Debug, Clone)]
pub struct Paa {
    sequence: Sequence,
    block_sizes: Vec<usize>,
    original_len: usize,
}

impl Paa {
    /// Downsample `source` to `target` samples by block averaging.
    ///
    /// Each emitted sample is the arithmetic mean of its block's timestamps
    /// and of each dimension across the block. Pure transform — `source` is
    /// unchanged.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`PaaError::InvalidTarget`] | `target == 0` or `target > source.len()` |
    pub fn shrink(source: SequenceView<'_>, target: usize) -> Result<Self, PaaError> {
        let len = source.len();
        if target == 0 || target > len {
            return Err(PaaError::InvalidTarget { len, target });
        }

        let dims = source.dims();
        let block_span = len as f64 / target as f64;

        let mut times = Vec::with_capacity(target);
        let mut values = Vec::with_capacity(target * dims);
        let mut block_sizes = Vec::with_capacity(target);

        let mut read_from = 0;
        while read_from < len {
            // Inclusive end of the block for the point about to be emitted.
            let read_to = (block_span * (times.len() + 1) as f64).round() as usize - 1;
            let block = read_to - read_from + 1;

            let mut time_sum = 0.0;
            let mut value_sums = vec![0.0; dims];
            for point in read_from..=read_to {
                time_sum += source.time(point);
                for (dim, sum) in value_sums.iter_mut().enumerate() {
                    *sum += source.point(point)[dim];
                }
            }

            times.push(time_sum / block as f64);
            values.extend(value_sums.iter().map(|&sum| sum / block as f64));
            block_sizes.push(block);

            read_from = read_to + 1;
        }

        // Averages of finite values over a validated view are finite.
        let sequence =
            Sequence::new(times, values, dims).expect("block averages should be finite");
        Ok(Self {
            sequence,
            block_sizes,
            original_len: len,
        })
    }

    /// Return the reduced sequence.
    #[must_use]
    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    /// Borrow the reduced sequence as a view.
    #[must_use]
    pub fn as_view(&self) -> SequenceView<'_> {
        self.sequence.as_view()
    }

    /// Return the reduced length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Return true if the reduced sequence is empty (never, for a
    /// successfully constructed [`Paa`]).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Return the length of the source sequence.
    #[must_use]
    pub fn original_len(&self) -> usize {
        self.original_len
    }

    /// Return the number of original samples folded into reduced sample `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[must_use]
    pub fn block_size(&self, index: usize) -> usize {
        self.block_sizes[index]
    }

    /// Return the full block-size table.
    #[must_use]
    pub fn block_sizes(&self) -> &[usize] {
        &self.block_sizes
    }
}
