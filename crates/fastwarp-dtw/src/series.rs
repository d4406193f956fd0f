//! Sequence types with validation guarantees.
//!
//! A sequence is an ordered list of (timestamp, sample vector) pairs with
//! uniform per-sample dimensionality. Samples are stored as one flat
//! row-major buffer so that a sample is always a contiguous slice.

use crate::error::SequenceError;

/// Owned, validated sequence. Guaranteed non-empty, uniformly dimensioned,
/// and all-finite (timestamps included).
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    times: Vec<f64>,
    values: Vec<f64>,
    dims: usize,
}

impl Sequence {
    /// Create a new sequence from timestamps and a flat row-major value buffer.
    ///
    /// `values[i * dims .. (i + 1) * dims]` is the sample vector at index `i`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SequenceError::EmptySequence`] | `times` is empty |
    /// | [`SequenceError::ZeroDimensional`] | `dims == 0` |
    /// | [`SequenceError::LengthMismatch`] | `values.len() != times.len() * dims` |
    /// | [`SequenceError::NonFiniteTime`] | Any timestamp is NaN or infinite |
    /// | [`SequenceError::NonFiniteValue`] | Any sample value is NaN or infinite |
    pub fn new(times: Vec<f64>, values: Vec<f64>, dims: usize) -> Result<Self, SequenceError> {
        if times.is_empty() {
            return Err(SequenceError::EmptySequence);
        }
        if dims == 0 {
            return Err(SequenceError::ZeroDimensional);
        }
        if values.len() != times.len() * dims {
            return Err(SequenceError::LengthMismatch {
                times: times.len(),
                values: values.len(),
                dims,
            });
        }
        if let Some(index) = times.iter().position(|t| !t.is_finite()) {
            return Err(SequenceError::NonFiniteTime { index });
        }
        if let Some(flat) = values.iter().position(|v| !v.is_finite()) {
            return Err(SequenceError::NonFiniteValue {
                index: flat / dims,
                dim: flat % dims,
            });
        }
        Ok(Self { times, values, dims })
    }

    /// Create a one-dimensional sequence with synthetic `0, 1, 2, …` timestamps.
    ///
    /// # Errors
    ///
    /// Same validation as [`Sequence::new`].
    pub fn univariate(values: Vec<f64>) -> Result<Self, SequenceError> {
        let times: Vec<f64> = (0..values.len()).map(|i| i as f64).collect();
        Self::new(times, values, 1)
    }

    /// Borrow this sequence as a zero-copy view.
    #[must_use]
    pub fn as_view(&self) -> SequenceView<'_> {
        SequenceView {
            times: &self.times,
            values: &self.values,
            dims: self.dims,
        }
    }

    /// Return the number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Return true if the sequence has no samples.
    ///
    /// A [`Sequence`] constructed via [`Sequence::new`] is always non-empty,
    /// so this always returns `false` for valid instances. Provided to satisfy
    /// the `len_without_is_empty` convention.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Return the per-sample dimensionality.
    #[must_use]
    pub fn dims(&self) -> usize {
        self.dims
    }

    /// Return the timestamp at sample `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[must_use]
    pub fn time(&self, index: usize) -> f64 {
        self.times[index]
    }

    /// Return the sample vector at `index` as a slice of length `dims()`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[must_use]
    pub fn point(&self, index: usize) -> &[f64] {
        &self.values[index * self.dims..(index + 1) * self.dims]
    }
}

/// Borrowed, validated view into a sequence. Zero-copy reference.
#[derive(Debug, Clone, Copy)]
pub struct SequenceView<'a> {
    times: &'a [f64],
    values: &'a [f64],
    dims: usize,
}

impl<'a> SequenceView<'a> {
    /// Return the number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Return true if the view has no samples (never, for views obtained from
    /// a validated [`Sequence`]).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Return the per-sample dimensionality.
    #[must_use]
    pub fn dims(&self) -> usize {
        self.dims
    }

    /// Return the timestamp at sample `index`.
    #[must_use]
    pub fn time(&self, index: usize) -> f64 {
        self.times[index]
    }

    /// Return the sample vector at `index` as a slice of length `dims()`.
    #[must_use]
    pub fn point(&self, index: usize) -> &'a [f64] {
        &self.values[index * self.dims..(index + 1) * self.dims]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty() {
        let result = Sequence::new(vec![], vec![], 1);
        assert!(matches!(result, Err(SequenceError::EmptySequence)));
    }

    #[test]
    fn rejects_zero_dims() {
        let result = Sequence::new(vec![0.0], vec![], 0);
        assert!(matches!(result, Err(SequenceError::ZeroDimensional)));
    }

    #[test]
    fn rejects_length_mismatch() {
        let result = Sequence::new(vec![0.0, 1.0], vec![1.0, 2.0, 3.0], 2);
        assert!(matches!(
            result,
            Err(SequenceError::LengthMismatch {
                times: 2,
                values: 3,
                dims: 2
            })
        ));
    }

    #[test]
    fn rejects_nan_timestamp() {
        let result = Sequence::new(vec![0.0, f64::NAN], vec![1.0, 2.0], 1);
        assert!(matches!(result, Err(SequenceError::NonFiniteTime { index: 1 })));
    }

    #[test]
    fn rejects_nan_value_with_position() {
        let result = Sequence::new(vec![0.0, 1.0], vec![1.0, 2.0, f64::NAN, 4.0], 2);
        assert!(matches!(
            result,
            Err(SequenceError::NonFiniteValue { index: 1, dim: 0 })
        ));
    }

    #[test]
    fn rejects_infinity() {
        let result = Sequence::univariate(vec![1.0, f64::INFINITY]);
        assert!(matches!(
            result,
            Err(SequenceError::NonFiniteValue { index: 1, dim: 0 })
        ));
    }

    #[test]
    fn accepts_multivariate() {
        let seq = Sequence::new(vec![0.0, 0.5], vec![1.0, 2.0, 3.0, 4.0], 2).unwrap();
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.dims(), 2);
        assert_eq!(seq.point(0), &[1.0, 2.0]);
        assert_eq!(seq.point(1), &[3.0, 4.0]);
        assert_eq!(seq.time(1), 0.5);
    }

    #[test]
    fn univariate_synthetic_timestamps() {
        let seq = Sequence::univariate(vec![5.0, 6.0, 7.0]).unwrap();
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.dims(), 1);
        assert_eq!(seq.time(0), 0.0);
        assert_eq!(seq.time(2), 2.0);
        assert_eq!(seq.point(2), &[7.0]);
    }

    #[test]
    fn view_matches_owner() {
        let seq = Sequence::new(vec![0.0, 1.0, 2.0], vec![9.0, 8.0, 7.0], 1).unwrap();
        let view = seq.as_view();
        assert_eq!(view.len(), 3);
        assert_eq!(view.dims(), 1);
        assert_eq!(view.point(1), &[8.0]);
        assert_eq!(view.time(2), 2.0);
    }
}
