//! File I/O for fastwarp: CSV sequence input and JSON alignment artifacts.
//!
//! Thin glue around the engine — reading one sequence per CSV file and
//! writing alignment results as JSON. No alignment logic lives here.

mod domain;
mod error;
mod reader;
mod writer;

pub use domain::{ExperimentName, LoadedSequence};
pub use error::IoError;
pub use reader::SequenceReader;
pub use writer::AlignmentWriter;
