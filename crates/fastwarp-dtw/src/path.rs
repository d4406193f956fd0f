//! Warp path types: the alignment's output artifact.

use std::fmt;

use crate::distance::{DistanceFn, WarpCost};
use crate::error::DtwError;
use crate::series::SequenceView;

/// A single step in a warp path, aligning index `i` in the first sequence
/// with index `j` in the second sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarpStep {
    /// Index into the first sequence (matrix column).
    pub i: usize,
    /// Index into the second sequence (matrix row).
    pub j: usize,
}

/// An ordered sequence of warp steps from `(0, 0)` to `(n-1, m-1)`,
/// non-decreasing in both indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarpPath(Vec<WarpStep>);

impl WarpPath {
    /// Create a new warp path from a vector of steps.
    pub(crate) fn new(steps: Vec<WarpStep>) -> Self {
        Self(steps)
    }

    /// Return the warp steps as a slice.
    #[must_use]
    pub fn steps(&self) -> &[WarpStep] {
        &self.0
    }

    /// Return the number of steps in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the path contains no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Re-price this path against a pair of sequences: the sum of the distance
    /// at every step.
    ///
    /// Useful for evaluating an approximate path against a different metric,
    /// or an old path against revised data.
    ///
    /// # Errors
    ///
    /// Propagates [`DistanceError`](crate::DistanceError) from the distance
    /// function (mismatched vector lengths).
    pub fn evaluate(
        &self,
        a: SequenceView<'_>,
        b: SequenceView<'_>,
        dist: &impl DistanceFn,
    ) -> Result<WarpCost, DtwError> {
        let mut total = 0.0;
        for step in &self.0 {
            total += dist.distance(a.point(step.i), b.point(step.j))?;
        }
        Ok(WarpCost::new(total))
    }
}

impl<'a> IntoIterator for &'a WarpPath {
    type Item = &'a WarpStep;
    type IntoIter = std::slice::Iter<'a, WarpStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for WarpPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (x, step) in self.0.iter().enumerate() {
            if x > 0 {
                write!(f, ",")?;
            }
            write!(f, "({},{})", step.i, step.j)?;
        }
        write!(f, "]")
    }
}

/// The result of one alignment pass: total cost plus the warp path.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    cost: WarpCost,
    path: WarpPath,
}

impl Alignment {
    pub(crate) fn new(cost: WarpCost, path: WarpPath) -> Self {
        Self { cost, path }
    }

    /// Return the total alignment cost.
    #[must_use]
    pub fn cost(&self) -> WarpCost {
        self.cost
    }

    /// Return the warp path.
    #[must_use]
    pub fn path(&self) -> &WarpPath {
        &self.path
    }

    /// Consume and return the warp path.
    #[must_use]
    pub fn into_path(self) -> WarpPath {
        self.path
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(cost={}, path={})", self.cost, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::Euclidean;
    use crate::series::Sequence;

    #[test]
    fn display_formats_pairs() {
        let path = WarpPath::new(vec![WarpStep { i: 0, j: 0 }, WarpStep { i: 1, j: 1 }]);
        assert_eq!(format!("{path}"), "[(0,0),(1,1)]");
    }

    #[test]
    fn evaluate_sums_step_distances() {
        let a = Sequence::univariate(vec![0.0, 1.0]).unwrap();
        let b = Sequence::univariate(vec![2.0, 4.0]).unwrap();
        let path = WarpPath::new(vec![WarpStep { i: 0, j: 0 }, WarpStep { i: 1, j: 1 }]);
        // |0-2| + |1-4| = 5
        let cost = path.evaluate(a.as_view(), b.as_view(), &Euclidean).unwrap();
        assert!((cost.value() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn evaluate_empty_path_is_zero() {
        let a = Sequence::univariate(vec![1.0]).unwrap();
        let b = Sequence::univariate(vec![2.0]).unwrap();
        let path = WarpPath::new(vec![]);
        let cost = path.evaluate(a.as_view(), b.as_view(), &Euclidean).unwrap();
        assert_eq!(cost.value(), 0.0);
    }
}
