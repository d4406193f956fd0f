//! Multi-resolution dynamic time warping alignment.
//!
//! Pure math library — zero I/O beyond the cost matrix's own scratch file.
//! Provides exact and search-window-constrained DTW, the FastDTW recursive
//! multi-resolution driver, block-averaging downsampling, and pairwise
//! alignment cost matrices.

mod distance;
mod dtw;
mod error;
mod matrix;
mod paa;
mod pairwise;
mod path;
mod project;
mod series;
mod swap;
mod window;

pub use distance::{DistanceFn, Euclidean, WarpCost};
pub use dtw::{FastDtw, align_exact, align_windowed};
pub use error::{DistanceError, DtwError, MatrixError, PaaError, SequenceError};
pub use paa::Paa;
pub use pairwise::DistanceMatrix;
pub use path::{Alignment, WarpPath, WarpStep};
pub use series::{Sequence, SequenceView};
pub use window::SearchWindow;
