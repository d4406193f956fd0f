//! Pairwise alignment costs over a collection of sequences.

use crate::distance::WarpCost;

/// Alignment costs for every unique pair of a sequence collection, stored in
/// condensed form.
///
/// The condensed buffer holds `n * (n - 1) / 2` raw costs, one per unordered
/// pair `{i, j}` with `i > j`, laid out row by row of the strict lower
/// triangle. Lookups are symmetric and the diagonal is zero by definition.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    n: usize,
    condensed: Vec<f64>,
}

impl DistanceMatrix {
    /// Build a matrix from a condensed lower-triangle cost buffer.
    ///
    /// `condensed[pair_index(i, j)]` is the cost between sequences `i` and
    /// `j`; the buffer length must be `n * (n - 1) / 2`.
    pub(crate) fn from_condensed(n: usize, condensed: Vec<f64>) -> Self {
        debug_assert_eq!(condensed.len(), n.saturating_sub(1) * n / 2);
        Self { n, condensed }
    }

    fn pair_index(i: usize, j: usize) -> usize {
        debug_assert!(i > j);
        i * (i - 1) / 2 + j
    }

    /// Return the number of sequences the matrix covers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.n
    }

    /// Return true if the matrix covers no sequences.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Return the number of unique pairs stored.
    #[must_use]
    pub fn n_pairs(&self) -> usize {
        self.condensed.len()
    }

    /// Return the alignment cost between sequences `i` and `j`.
    ///
    /// Symmetric in its arguments; `get(i, i)` is zero.
    ///
    /// # Panics
    ///
    /// Panics if either index is `>= len()`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> WarpCost {
        assert!(
            i < self.n && j < self.n,
            "pair ({i}, {j}) out of bounds for {} sequences",
            self.n
        );
        let raw = match i.cmp(&j) {
            std::cmp::Ordering::Equal => 0.0,
            std::cmp::Ordering::Greater => self.condensed[Self::pair_index(i, j)],
            std::cmp::Ordering::Less => self.condensed[Self::pair_index(j, i)],
        };
        WarpCost::new(raw)
    }

    /// Iterate the strict lower triangle as `(i, j, cost)` with `i > j`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, WarpCost)> + '_ {
        (1..self.n)
            .flat_map(move |i| (0..i).map(move |j| (i, j)))
            .zip(&self.condensed)
            .map(|((i, j), &raw)| (i, j, WarpCost::new(raw)))
    }

    /// Return the costs from sequence `i` to every sequence, diagonal
    /// included, as a dense row of length `len()`.
    #[must_use]
    pub fn row(&self, i: usize) -> Vec<WarpCost> {
        (0..self.n).map(|j| self.get(i, j)).collect()
    }
}
