//! Windowed cost-matrix storage: memory backend and the selecting wrapper.
//!
//! Cells outside the search window are never materialized; reading one yields
//! `f64::INFINITY`, the out-of-window sentinel the DP recurrence relies on.

use std::collections::TryReserveError;

use tracing::warn;

use crate::error::MatrixError;
use crate::swap::SwapFileMatrix;
use crate::window::SearchWindow;

/// Storage contract shared by the cost-matrix backends.
///
/// Write-once-per-cell in the window's fill order; read-many during backtrace.
pub(crate) trait CostMatrix {
    /// Write the cost of a permitted cell.
    ///
    /// # Errors
    ///
    /// [`MatrixError::OutsideWindow`] when `(col, row)` is not permitted —
    /// an invariant break in the caller, not a recoverable condition.
    fn put(&mut self, col: usize, row: usize, value: f64) -> Result<(), MatrixError>;

    /// Read a cell's cost. Out-of-window cells read `Ok(f64::INFINITY)`.
    fn get(&self, col: usize, row: usize) -> Result<f64, MatrixError>;

    /// Return the number of materialized cells.
    fn len(&self) -> usize;
}

/// Memory-resident backend: one flat array sized to the window's cell count,
/// with a per-column base offset. O(window) memory, O(1) access.
#[derive(Debug)]
pub(crate) struct MemoryMatrix<'w> {
    window: &'w SearchWindow,
    cells: Vec<f64>,
    col_offsets: Vec<usize>,
}

impl<'w> MemoryMatrix<'w> {
    /// Allocate a matrix for `window`.
    ///
    /// Allocation goes through [`Vec::try_reserve_exact`] so that memory
    /// exhaustion surfaces as an `Err` the selector can fall back on, instead
    /// of aborting the process.
    pub(crate) fn new(window: &'w SearchWindow) -> Result<Self, TryReserveError> {
        let total = window.len();
        let mut cells = Vec::new();
        cells.try_reserve_exact(total)?;
        cells.resize(total, 0.0);

        let mut col_offsets = Vec::with_capacity(window.n_cols());
        let mut offset = 0;
        for col in 0..window.n_cols() {
            col_offsets.push(offset);
            if let Some((lo, hi)) = window.bounds(col) {
                offset += hi - lo + 1;
            }
        }

        Ok(Self {
            window,
            cells,
            col_offsets,
        })
    }

    fn index(&self, col: usize, row: usize) -> Option<usize> {
        let (lo, hi) = self.window.bounds(col)?;
        (row >= lo && row <= hi).then(|| self.col_offsets[col] + row - lo)
    }
}

impl CostMatrix for MemoryMatrix<'_> {
    fn put(&mut self, col: usize, row: usize, value: f64) -> Result<(), MatrixError> {
        match self.index(col, row) {
            Some(idx) => {
                self.cells[idx] = value;
                Ok(())
            }
            None => Err(MatrixError::OutsideWindow { col, row }),
        }
    }

    fn get(&self, col: usize, row: usize) -> Result<f64, MatrixError> {
        Ok(match self.index(col, row) {
            Some(idx) => self.cells[idx],
            None => f64::INFINITY,
        })
    }

    fn len(&self) -> usize {
        self.cells.len()
    }
}

/// The backend selector: memory-resident when the allocation succeeds,
/// disk-backed otherwise. Same `get`/`put`/`len` contract either way.
#[derive(Debug)]
pub(crate) enum WindowMatrix<'w> {
    Memory(MemoryMatrix<'w>),
    Swap(SwapFileMatrix<'w>),
}

impl<'w> WindowMatrix<'w> {
    /// Create a cost matrix for `window`, preferring the memory backend.
    ///
    /// # Errors
    ///
    /// [`MatrixError::Swap`] when the memory allocation fails *and* the
    /// scratch file cannot be created.
    pub(crate) fn new(window: &'w SearchWindow) -> Result<Self, MatrixError> {
        match MemoryMatrix::new(window) {
            Ok(matrix) => Ok(Self::Memory(matrix)),
            Err(_) => {
                warn!(
                    cells = window.len(),
                    "cost matrix does not fit in memory, using a swap file"
                );
                Ok(Self::Swap(SwapFileMatrix::new(window)?))
            }
        }
    }

    /// Release the matrix. A no-op for the memory backend; closes and deletes
    /// the scratch file for the disk backend.
    ///
    /// Consuming `self` makes use-after-release unrepresentable. Dropping a
    /// matrix without calling this still deletes the scratch file, but any
    /// close error is lost — call `release` on the success path.
    ///
    /// # Errors
    ///
    /// [`MatrixError::Swap`] when closing or deleting the scratch file fails.
    pub(crate) fn release(self) -> Result<(), MatrixError> {
        match self {
            Self::Memory(_) => Ok(()),
            Self::Swap(matrix) => matrix.release(),
        }
    }
}

impl CostMatrix for WindowMatrix<'_> {
    fn put(&mut self, col: usize, row: usize, value: f64) -> Result<(), MatrixError> {
        match self {
            Self::Memory(m) => m.put(col, row, value),
            Self::Swap(m) => m.put(col, row, value),
        }
    }

    fn get(&self, col: usize, row: usize) -> Result<f64, MatrixError> {
        match self {
            Self::Memory(m) => m.get(col, row),
            Self::Swap(m) => m.get(col, row),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Memory(m) => m.len(),
            Self::Swap(m) => m.len(),
        }
    }
}
