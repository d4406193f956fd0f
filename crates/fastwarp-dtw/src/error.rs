//! Error types for sequence validation, downsampling, and alignment.

/// Errors from sequence construction and validation.
#[derive(Debug, thiserror::Error)]
pub enum SequenceError {
    /// Returned when a sequence is constructed with zero samples.
    #[error("sequence must contain at least one sample")]
    EmptySequence,

    /// Returned when a sequence is constructed with zero dimensions per sample.
    #[error("sample vectors must have at least one dimension")]
    ZeroDimensional,

    /// Returned when the flat value buffer does not match `times.len() * dims`.
    #[error("value buffer length {values} does not match {times} timestamps x {dims} dimensions")]
    LengthMismatch {
        /// Number of timestamps provided.
        times: usize,
        /// Length of the flat value buffer.
        values: usize,
        /// Declared per-sample dimensionality.
        dims: usize,
    },

    /// Returned when a timestamp is NaN or infinite.
    #[error("non-finite timestamp at sample {index}")]
    NonFiniteTime {
        /// Sample index of the first non-finite timestamp found.
        index: usize,
    },

    /// Returned when a sample value is NaN or infinite.
    #[error("non-finite value at sample {index}, dimension {dim}")]
    NonFiniteValue {
        /// Sample index of the first non-finite value found.
        index: usize,
        /// Dimension within the sample.
        dim: usize,
    },
}

/// Errors from distance computation between two sample vectors.
#[derive(Debug, thiserror::Error)]
pub enum DistanceError {
    /// Returned when the two vectors have different lengths.
    #[error("cannot compute distance between vectors of length {left} and {right}")]
    DimensionMismatch {
        /// Length of the first vector.
        left: usize,
        /// Length of the second vector.
        right: usize,
    },
}

/// Errors from piecewise aggregate downsampling.
#[derive(Debug, thiserror::Error)]
pub enum PaaError {
    /// Returned when the target length is zero or exceeds the source length.
    #[error("invalid downsample target {target} for sequence of length {len}")]
    InvalidTarget {
        /// Source sequence length.
        len: usize,
        /// Requested reduced length.
        target: usize,
    },
}

/// Errors from the windowed cost-matrix backends.
///
/// `OutsideWindow` and `ColumnOutOfSequence` indicate a broken fill-order
/// invariant in the caller, not a recoverable condition.
#[derive(Debug, thiserror::Error)]
pub enum MatrixError {
    /// Returned when a cost is written to a cell outside the search window.
    #[error("cost written to cell (col={col}, row={row}) outside the search window")]
    OutsideWindow {
        /// Column of the offending write.
        col: usize,
        /// Row of the offending write.
        row: usize,
    },

    /// Returned when the disk backend receives a write that is neither to a
    /// resident column nor an advance to the next one.
    #[error("column {col} written out of sequence (current column is {current})")]
    ColumnOutOfSequence {
        /// Column of the offending write.
        col: usize,
        /// The backend's current column cursor.
        current: usize,
    },

    /// Returned when a windowed cell is read before its column has been filled.
    #[error("cell (col={col}, row={row}) is inside the search window but not yet computed")]
    NotYetComputed {
        /// Column of the read.
        col: usize,
        /// Row of the read.
        row: usize,
    },

    /// Wraps an I/O failure on the disk backend's scratch file.
    #[error("cost-matrix scratch file I/O failed")]
    Swap {
        /// Underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

/// Errors from DTW alignment.
#[derive(Debug, thiserror::Error)]
pub enum DtwError {
    /// Wraps a distance-function failure (mismatched vector dimensionality).
    #[error("distance computation failed: {0}")]
    Distance(#[from] DistanceError),

    /// Wraps a cost-matrix failure during a windowed pass.
    #[error("cost matrix failed: {0}")]
    Matrix(#[from] MatrixError),

    /// Wraps a downsampling failure inside the recursive driver.
    #[error("downsampling failed: {0}")]
    Paa(#[from] PaaError),
}
