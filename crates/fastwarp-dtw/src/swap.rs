//! Disk-backed cost matrix: two resident columns plus an append-only
//! scratch file of big-endian doubles.

use std::io::{Seek, SeekFrom, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::MatrixError;
use crate::matrix::CostMatrix;
use crate::window::SearchWindow;

/// Fallback backend used when the window's cells do not fit in memory.
///
/// Only the current column being filled and the immediately preceding one are
/// memory-resident. Advancing the column cursor flushes the retiring column
/// to the scratch file as consecutive big-endian 8-byte doubles, one column
/// per contiguous extent, with a per-column offset table for later reads.
///
/// The scratch file lives for exactly as long as this matrix: it is deleted
/// by [`release`](SwapFileMatrix::release) or, failing that, when the matrix
/// is dropped. It is never part of any durable format.
#[derive(Debug)]
pub(crate) struct SwapFileMatrix<'w> {
    window: &'w SearchWindow,
    last_col: Vec<f64>,
    curr_col: Vec<f64>,
    curr_index: usize,
    min_last_row: usize,
    min_curr_row: usize,
    file: NamedTempFile,
    col_offsets: Vec<u64>,
}

impl<'w> SwapFileMatrix<'w> {
    /// Create a disk-backed matrix for `window`.
    ///
    /// Columns 0 and 1 start resident (column 0 alone for a single-column
    /// window), so the windowed fill can write both from the outset.
    ///
    /// # Errors
    ///
    /// [`MatrixError::Swap`] when the scratch file cannot be created.
    pub(crate) fn new(window: &'w SearchWindow) -> Result<Self, MatrixError> {
        let file = NamedTempFile::new()?;
        debug!(path = %file.path().display(), cells = window.len(), "swap file created");

        // Single-column windows keep that one column current with nothing
        // behind it.
        let (curr_index, last_col, min_last_row) = if window.n_cols() > 1 {
            (1, vec![0.0; Self::height(window, 0)], Self::min_row(window, 0))
        } else {
            (0, Vec::new(), 0)
        };

        Ok(Self {
            window,
            last_col,
            curr_col: vec![0.0; Self::height(window, curr_index)],
            curr_index,
            min_last_row,
            min_curr_row: Self::min_row(window, curr_index),
            file,
            col_offsets: vec![0; window.n_cols()],
        })
    }

    fn height(window: &SearchWindow, col: usize) -> usize {
        window.bounds(col).map_or(0, |(lo, hi)| hi - lo + 1)
    }

    fn min_row(window: &SearchWindow, col: usize) -> usize {
        window.bounds(col).map_or(0, |(lo, _)| lo)
    }

    /// Flush the retiring column to the scratch file and make `col` current.
    fn advance_to(&mut self, col: usize, row: usize, value: f64) -> Result<(), MatrixError> {
        let mut encoded = Vec::with_capacity(self.last_col.len() * 8);
        for &cell in &self.last_col {
            encoded
                .write_f64::<BigEndian>(cell)
                .expect("writing to a Vec cannot fail");
        }

        let file = self.file.as_file_mut();
        let offset = file.seek(SeekFrom::End(0))?;
        file.write_all(&encoded)?;
        self.col_offsets[self.curr_index - 1] = offset;

        self.last_col = std::mem::replace(
            &mut self.curr_col,
            vec![0.0; Self::height(self.window, col)],
        );
        self.min_last_row = self.min_curr_row;
        self.min_curr_row = Self::min_row(self.window, col);
        self.curr_index = col;
        self.curr_col[row - self.min_curr_row] = value;
        Ok(())
    }

    /// Close and delete the scratch file.
    ///
    /// # Errors
    ///
    /// [`MatrixError::Swap`] when closing or deleting fails.
    pub(crate) fn release(self) -> Result<(), MatrixError> {
        self.file.close()?;
        Ok(())
    }
}

impl CostMatrix for SwapFileMatrix<'_> {
    fn put(&mut self, col: usize, row: usize, value: f64) -> Result<(), MatrixError> {
        if !self.window.contains(col, row) {
            return Err(MatrixError::OutsideWindow { col, row });
        }
        if col == self.curr_index {
            self.curr_col[row - self.min_curr_row] = value;
            Ok(())
        } else if self.curr_index > 0 && col == self.curr_index - 1 {
            // Rewrite into the just-retired column, still resident.
            self.last_col[row - self.min_last_row] = value;
            Ok(())
        } else if col == self.curr_index + 1 {
            self.advance_to(col, row, value)
        } else {
            Err(MatrixError::ColumnOutOfSequence {
                col,
                current: self.curr_index,
            })
        }
    }

    fn get(&self, col: usize, row: usize) -> Result<f64, MatrixError> {
        let Some((lo, hi)) = self.window.bounds(col) else {
            return Ok(f64::INFINITY);
        };
        if row < lo || row > hi {
            return Ok(f64::INFINITY);
        }
        if col == self.curr_index {
            Ok(self.curr_col[row - self.min_curr_row])
        } else if self.curr_index > 0 && col == self.curr_index - 1 {
            Ok(self.last_col[row - self.min_last_row])
        } else if col > self.curr_index {
            Err(MatrixError::NotYetComputed { col, row })
        } else {
            // Flushed column: one seek, one 8-byte read.
            let mut file = self.file.as_file();
            file.seek(SeekFrom::Start(self.col_offsets[col] + 8 * (row - lo) as u64))?;
            Ok(file.read_f64::<BigEndian>()?)
        }
    }

    fn len(&self) -> usize {
        self.window.len()
    }
}
