//! DTW alignment: exact and windowed dynamic programming, plus the
//! multi-resolution FastDTW driver.
//!
//! Both fill routines share one recurrence
//! `cost(i, j) = dist(i, j) + min(cost(i-1, j), cost(i-1, j-1), cost(i, j-1))`
//! and one backtrace; they differ only in which cells are visited and in how
//! out-of-window neighbors read as infinity.

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::distance::{DistanceFn, WarpCost};
use crate::error::{DistanceError, DtwError};
use crate::matrix::{CostMatrix, WindowMatrix};
use crate::paa::Paa;
use crate::pairwise::DistanceMatrix;
use crate::path::{Alignment, WarpPath, WarpStep};
use crate::project::expanded_window;
use crate::series::{Sequence, SequenceView};
use crate::window::SearchWindow;

/// Align two sequences with the exact, full-resolution dynamic program.
///
/// Allocates the dense `n x m` cost table. Quadratic time and space — use
/// [`FastDtw`] for long sequences.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DtwError::Distance`] | The sequences (or a compared pair of vectors) differ in dimensionality |
#[instrument(skip(a, b, dist), fields(len_a = a.len(), len_b = b.len()))]
pub fn align_exact(
    a: SequenceView<'_>,
    b: SequenceView<'_>,
    dist: &impl DistanceFn,
) -> Result<Alignment, DtwError> {
    check_dims(a, b)?;
    exact_fill(a, b, dist)
}

/// Align two sequences with the dynamic program restricted to a search
/// window.
///
/// Visits only the window's cells, in its fill order; neighbors outside the
/// window contribute infinity. The cost matrix is memory-resident when it
/// fits and disk-backed otherwise; its scratch resources are released before
/// returning, on success and failure alike.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DtwError::Distance`] | Dimensionality mismatch |
/// | [`DtwError::Matrix`] | Cost-matrix invariant break or scratch-file I/O failure |
#[instrument(skip(a, b, window, dist), fields(len_a = a.len(), len_b = b.len(), cells = window.len()))]
pub fn align_windowed(
    a: SequenceView<'_>,
    b: SequenceView<'_>,
    window: &SearchWindow,
    dist: &impl DistanceFn,
) -> Result<Alignment, DtwError> {
    check_dims(a, b)?;
    debug_assert_eq!(window.n_cols(), a.len(), "window width must match the first sequence");
    debug_assert_eq!(window.n_rows(), b.len(), "window height must match the second sequence");
    let mut matrix = WindowMatrix::new(window)?;
    // An early `?` drops the matrix, which removes any scratch file; the
    // explicit release on the success path surfaces close errors.
    let alignment = windowed_fill(a, b, window, &mut matrix, dist)?;
    matrix.release()?;
    Ok(alignment)
}

/// Multi-resolution approximate DTW.
///
/// Recursively halves both sequences until they are near the search radius in
/// length, solves that case exactly, then refines back up: at each resolution
/// the previous level's path is projected into a [`SearchWindow`], dilated by
/// the radius, and re-optimized with the windowed dynamic program.
///
/// Larger radii explore more of the cost matrix (better approximations,
/// slower); `radius + 2 >= len` degenerates to the exact solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FastDtw {
    radius: usize,
}

impl FastDtw {
    /// Create a driver with the given search radius.
    #[must_use]
    pub fn new(radius: usize) -> Self {
        Self { radius }
    }

    /// Return the search radius.
    #[must_use]
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Compute the approximate alignment cost and warp path.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::Distance`] | The sequences differ in dimensionality |
    /// | [`DtwError::Matrix`] | Cost-matrix invariant break or scratch-file I/O failure |
    #[instrument(skip(self, a, b, dist), fields(len_a = a.len(), len_b = b.len(), radius = self.radius))]
    pub fn align(
        &self,
        a: SequenceView<'_>,
        b: SequenceView<'_>,
        dist: &impl DistanceFn,
    ) -> Result<Alignment, DtwError> {
        check_dims(a, b)?;
        self.align_recursive(a, b, dist)
    }

    /// Compute only the warp path.
    ///
    /// # Errors
    ///
    /// Same as [`FastDtw::align`].
    pub fn path(
        &self,
        a: SequenceView<'_>,
        b: SequenceView<'_>,
        dist: &impl DistanceFn,
    ) -> Result<WarpPath, DtwError> {
        self.align(a, b, dist).map(Alignment::into_path)
    }

    /// Compute only the alignment cost.
    ///
    /// # Errors
    ///
    /// Same as [`FastDtw::align`].
    pub fn cost(
        &self,
        a: SequenceView<'_>,
        b: SequenceView<'_>,
        dist: &impl DistanceFn,
    ) -> Result<WarpCost, DtwError> {
        self.align(a, b, dist).map(|alignment| alignment.cost())
    }

    /// Compute pairwise alignment costs for a collection of sequences.
    ///
    /// Returns a symmetric [`DistanceMatrix`] over all unique pairs.
    /// Computation is parallelized across pairs using rayon; every pair runs
    /// its own full multi-resolution pass with its own cost matrices.
    ///
    /// # Errors
    ///
    /// Returns the first error from any pair.
    #[instrument(skip(self, series, dist), fields(n = series.len(), radius = self.radius))]
    pub fn pairwise(
        &self,
        series: &[Sequence],
        dist: &(impl DistanceFn + Sync),
    ) -> Result<DistanceMatrix, DtwError> {
        let views: Vec<SequenceView<'_>> = series.iter().map(Sequence::as_view).collect();

        // Strict lower triangle, condensed order.
        let pairs: Vec<(usize, usize)> = (1..series.len())
            .flat_map(|i| (0..i).map(move |j| (i, j)))
            .collect();

        let costs: Vec<f64> = pairs
            .into_par_iter()
            .map(|(i, j)| {
                self.align(views[i], views[j], dist)
                    .map(|alignment| alignment.cost().value())
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DistanceMatrix::from_condensed(series.len(), costs))
    }

    fn align_recursive(
        &self,
        a: SequenceView<'_>,
        b: SequenceView<'_>,
        dist: &impl DistanceFn,
    ) -> Result<Alignment, DtwError> {
        let min_size = self.radius + 2;
        if a.len() <= min_size || b.len() <= min_size {
            return exact_fill(a, b, dist);
        }

        // Fixed resolution factor of 2, truncating.
        let shrunk_a = Paa::shrink(a, a.len() / 2)?;
        let shrunk_b = Paa::shrink(b, b.len() / 2)?;

        let coarse = self.align_recursive(shrunk_a.as_view(), shrunk_b.as_view(), dist)?;
        let window = expanded_window(
            a.len(),
            b.len(),
            &shrunk_a,
            &shrunk_b,
            coarse.path(),
            self.radius,
        );
        debug!(
            len_a = a.len(),
            len_b = b.len(),
            cells = window.len(),
            "refining at doubled resolution"
        );

        let mut matrix = WindowMatrix::new(&window)?;
        let alignment = windowed_fill(a, b, &window, &mut matrix, dist)?;
        matrix.release()?;
        Ok(alignment)
    }
}

fn check_dims(a: SequenceView<'_>, b: SequenceView<'_>) -> Result<(), DtwError> {
    if a.dims() != b.dims() {
        return Err(DistanceError::DimensionMismatch {
            left: a.dims(),
            right: b.dims(),
        }
        .into());
    }
    Ok(())
}

/// Dense dynamic program over the full `n x m` table.
///
/// Boundary row and column are cumulative sums; interior cells follow the
/// shared recurrence.
fn exact_fill(
    a: SequenceView<'_>,
    b: SequenceView<'_>,
    dist: &impl DistanceFn,
) -> Result<Alignment, DtwError> {
    let n = a.len();
    let m = b.len();

    // Flat column-major table: cell (i, j) at index i * m + j.
    let mut cost = vec![0.0; n * m];
    cost[0] = dist.distance(a.point(0), b.point(0))?;
    for j in 1..m {
        cost[j] = cost[j - 1] + dist.distance(a.point(0), b.point(j))?;
    }
    for i in 1..n {
        cost[i * m] = cost[(i - 1) * m] + dist.distance(a.point(i), b.point(0))?;
        for j in 1..m {
            let best_prev = cost[(i - 1) * m + j]
                .min(cost[(i - 1) * m + j - 1])
                .min(cost[i * m + j - 1]);
            cost[i * m + j] = best_prev + dist.distance(a.point(i), b.point(j))?;
        }
    }

    let total = cost[n * m - 1];
    let steps = backtrace(n - 1, m - 1, |i, j| Ok(cost[i * m + j]))?;
    Ok(Alignment::new(WarpCost::new(total), WarpPath::new(steps)))
}

/// Windowed dynamic program: identical recurrence, restricted to the window's
/// cells in fill order. Missing neighbors read infinity through the matrix's
/// out-of-window sentinel.
fn windowed_fill(
    a: SequenceView<'_>,
    b: SequenceView<'_>,
    window: &SearchWindow,
    matrix: &mut WindowMatrix<'_>,
    dist: &impl DistanceFn,
) -> Result<Alignment, DtwError> {
    let max_i = a.len() - 1;
    let max_j = b.len() - 1;

    for (i, j) in window.iter() {
        let d = dist.distance(a.point(i), b.point(j))?;
        let value = if i == 0 && j == 0 {
            d
        } else if i == 0 {
            d + matrix.get(i, j - 1)?
        } else if j == 0 {
            d + matrix.get(i - 1, j)?
        } else {
            let best_prev = matrix
                .get(i - 1, j)?
                .min(matrix.get(i - 1, j - 1)?)
                .min(matrix.get(i, j - 1)?);
            d + best_prev
        };
        matrix.put(i, j, value)?;
    }

    let total = matrix.get(max_i, max_j)?;
    let matrix = &*matrix;
    let steps = backtrace(max_i, max_j, |i, j| {
        matrix.get(i, j).map_err(DtwError::from)
    })?;
    Ok(Alignment::new(WarpCost::new(total), WarpPath::new(steps)))
}

/// Walk the filled table from `(max_i, max_j)` back to `(0, 0)`, at each step
/// taking the cheapest of the diagonal, left, and down predecessors.
///
/// Tie-break priority, in order: the diagonal when its cost is less than or
/// equal to both others; else left or down when strictly cheapest; else —
/// left and down tied below the diagonal — move toward the `i == j` axis
/// (decrement the row when `i <= j`, else the column). This makes paths
/// reproducible bit-for-bit.
fn backtrace(
    max_i: usize,
    max_j: usize,
    lookup: impl Fn(usize, usize) -> Result<f64, DtwError>,
) -> Result<Vec<WarpStep>, DtwError> {
    let mut steps = Vec::with_capacity(max_i + max_j + 1);
    let mut i = max_i;
    let mut j = max_j;
    steps.push(WarpStep { i, j });

    while i > 0 || j > 0 {
        let diag = if i > 0 && j > 0 {
            lookup(i - 1, j - 1)?
        } else {
            f64::INFINITY
        };
        let left = if i > 0 { lookup(i - 1, j)? } else { f64::INFINITY };
        let down = if j > 0 { lookup(i, j - 1)? } else { f64::INFINITY };

        if diag <= left && diag <= down {
            i -= 1;
            j -= 1;
        } else if left < diag && left < down {
            i -= 1;
        } else if down < diag && down < left {
            j -= 1;
        } else if i <= j {
            j -= 1;
        } else {
            i -= 1;
        }
        steps.push(WarpStep { i, j });
    }

    steps.reverse();
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::Euclidean;

    fn seq(values: Vec<f64>) -> Sequence {
        Sequence::univariate(values).unwrap()
    }

    #[test]
    fn identical_sequences_cost_zero() {
        let s = seq(vec![1.0, 2.0, 3.0]);
        let alignment = align_exact(s.as_view(), s.as_view(), &Euclidean).unwrap();
        assert_eq!(alignment.cost().value(), 0.0);
        for step in alignment.path() {
            assert_eq!(step.i, step.j);
        }
    }

    #[test]
    fn hand_computed_2x2() {
        // a=[0,1], b=[1,0], dist = |x-y|
        // D(0,0) = 1, D(0,1) = 1, D(1,0) = 1
        // D(1,1) = 1 + min(1, 1, 1) = 2
        let a = seq(vec![0.0, 1.0]);
        let b = seq(vec![1.0, 0.0]);
        let alignment = align_exact(a.as_view(), b.as_view(), &Euclidean).unwrap();
        assert!((alignment.cost().value() - 2.0).abs() < 1e-12);
        // The tie at (1,1) resolves to the diagonal.
        assert_eq!(
            alignment.path().steps(),
            &[WarpStep { i: 0, j: 0 }, WarpStep { i: 1, j: 1 }]
        );
    }

    #[test]
    fn single_sample_pair() {
        let a = seq(vec![5.0]);
        let b = seq(vec![3.0]);
        let alignment = align_exact(a.as_view(), b.as_view(), &Euclidean).unwrap();
        assert_eq!(alignment.path().steps(), &[WarpStep { i: 0, j: 0 }]);
        assert!((alignment.cost().value() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn path_endpoints_and_continuity() {
        let a = seq(vec![1.0, 5.0, 2.0, 8.0, 3.0]);
        let b = seq(vec![2.0, 4.0, 7.0]);
        let alignment = align_exact(a.as_view(), b.as_view(), &Euclidean).unwrap();
        let steps = alignment.path().steps();
        assert_eq!(steps.first().unwrap(), &WarpStep { i: 0, j: 0 });
        assert_eq!(steps.last().unwrap(), &WarpStep { i: 4, j: 2 });
        for pair in steps.windows(2) {
            let di = pair[1].i - pair[0].i;
            let dj = pair[1].j - pair[0].j;
            assert!(di <= 1 && dj <= 1, "step too large: {pair:?}");
            assert!(di + dj >= 1, "no progress in {pair:?}");
        }
    }

    #[test]
    fn mismatched_dimensionality_rejected() {
        let a = Sequence::new(vec![0.0, 1.0], vec![1.0, 2.0, 3.0, 4.0], 2).unwrap();
        let b = seq(vec![1.0, 2.0]);
        let result = align_exact(a.as_view(), b.as_view(), &Euclidean);
        assert!(matches!(
            result,
            Err(DtwError::Distance(DistanceError::DimensionMismatch {
                left: 2,
                right: 1
            }))
        ));
        let result = FastDtw::new(1).align(a.as_view(), b.as_view(), &Euclidean);
        assert!(matches!(result, Err(DtwError::Distance(_))));
    }

    #[test]
    fn full_window_matches_exact() {
        let pairs = [
            (vec![1.0, 2.0, 3.0, 4.0], vec![1.0, 3.0, 4.0]),
            (vec![0.0, 5.0, 0.0, 5.0, 0.0], vec![5.0, 0.0, 5.0]),
            (vec![2.0, 2.0, 2.0], vec![2.0, 2.0, 2.0]),
            (vec![1.0, 2.0], vec![9.0]),
        ];
        for (va, vb) in pairs {
            let a = seq(va);
            let b = seq(vb);
            let window = SearchWindow::full(a.len(), b.len());
            let exact = align_exact(a.as_view(), b.as_view(), &Euclidean).unwrap();
            let windowed =
                align_windowed(a.as_view(), b.as_view(), &window, &Euclidean).unwrap();
            assert_eq!(exact.cost().value(), windowed.cost().value());
            assert_eq!(exact.path(), windowed.path());
        }
    }

    #[test]
    fn large_radius_degenerates_to_exact() {
        // radius + 2 >= len forces the exact branch of the driver.
        let a = seq(vec![1.0, 3.0, 2.0, 5.0, 4.0]);
        let b = seq(vec![2.0, 4.0, 1.0, 3.0, 5.0]);
        let exact = align_exact(a.as_view(), b.as_view(), &Euclidean).unwrap();
        let fast = FastDtw::new(3).align(a.as_view(), b.as_view(), &Euclidean).unwrap();
        assert_eq!(exact.cost().value(), fast.cost().value());
        assert_eq!(exact.path(), fast.path());
    }

    #[test]
    fn fastdtw_cost_bounded_below_by_exact() {
        // The windowed search space is a subset of the full matrix, so the
        // approximate cost can never beat the exact optimum.
        let a = seq((0..40).map(|i| (i as f64 * 0.3).sin()).collect());
        let b = seq((0..37).map(|i| (i as f64 * 0.3 + 0.4).sin()).collect());
        let exact = align_exact(a.as_view(), b.as_view(), &Euclidean).unwrap();
        for radius in [0, 1, 2, 5] {
            let fast = FastDtw::new(radius)
                .align(a.as_view(), b.as_view(), &Euclidean)
                .unwrap();
            assert!(
                fast.cost().value() >= exact.cost().value() - 1e-9,
                "radius {radius}: approximate {} beat exact {}",
                fast.cost(),
                exact.cost()
            );
        }
    }

    #[test]
    fn fastdtw_path_is_valid_after_recursion() {
        let a = seq((0..50).map(|i| (i as f64 * 0.2).cos() * 3.0).collect());
        let b = seq((0..45).map(|i| (i as f64 * 0.25).cos() * 3.0).collect());
        let alignment = FastDtw::new(1).align(a.as_view(), b.as_view(), &Euclidean).unwrap();
        let steps = alignment.path().steps();
        assert_eq!(steps.first().unwrap(), &WarpStep { i: 0, j: 0 });
        assert_eq!(steps.last().unwrap(), &WarpStep { i: 49, j: 44 });
        for pair in steps.windows(2) {
            assert!(pair[1].i - pair[0].i <= 1);
            assert!(pair[1].j - pair[0].j <= 1);
            assert!((pair[1].i - pair[0].i) + (pair[1].j - pair[0].j) >= 1);
        }
        assert!(alignment.cost().value() >= 0.0);
    }

    #[test]
    fn accessors_agree_with_align() {
        let a = seq(vec![1.0, 4.0, 2.0, 6.0, 3.0, 5.0, 1.0, 2.0]);
        let b = seq(vec![2.0, 3.0, 1.0, 5.0, 4.0, 6.0, 2.0]);
        let fast = FastDtw::new(1);
        let alignment = fast.align(a.as_view(), b.as_view(), &Euclidean).unwrap();
        let path = fast.path(a.as_view(), b.as_view(), &Euclidean).unwrap();
        let cost = fast.cost(a.as_view(), b.as_view(), &Euclidean).unwrap();
        assert_eq!(alignment.path(), &path);
        assert_eq!(alignment.cost().value(), cost.value());
    }

    #[test]
    fn pairwise_matches_individual() {
        let a = seq(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = seq(vec![6.0, 5.0, 4.0, 3.0, 2.0, 1.0]);
        let c = seq(vec![1.0, 3.0, 2.0, 4.0, 3.0, 5.0]);
        let fast = FastDtw::new(1);

        let matrix = fast.pairwise(&[a.clone(), b.clone(), c.clone()], &Euclidean).unwrap();
        assert_eq!(matrix.len(), 3);

        let d_ab = fast.cost(b.as_view(), a.as_view(), &Euclidean).unwrap();
        let d_ac = fast.cost(c.as_view(), a.as_view(), &Euclidean).unwrap();
        let d_bc = fast.cost(c.as_view(), b.as_view(), &Euclidean).unwrap();

        assert_eq!(matrix.get(1, 0).value(), d_ab.value());
        assert_eq!(matrix.get(2, 0).value(), d_ac.value());
        assert_eq!(matrix.get(2, 1).value(), d_bc.value());
    }

    #[test]
    fn pairwise_single_sequence() {
        let a = seq(vec![1.0, 2.0]);
        let matrix = FastDtw::new(0).pairwise(&[a], &Euclidean).unwrap();
        assert_eq!(matrix.len(), 1);
        assert_eq!(matrix.get(0, 0).value(), 0.0);
    }
}
