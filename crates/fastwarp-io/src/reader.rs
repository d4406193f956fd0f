//! CSV sequence reader with full input validation.

use std::path::{Path, PathBuf};

use fastwarp_dtw::Sequence;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::LoadedSequence;

/// Reads one sequence from a CSV file.
///
/// Expected CSV format:
/// - Header row required: `time,<dim0>,<dim1>,...` — first column is the
///   timestamp, remaining columns are sample dimensions
/// - One row per sample, all rows must have the same number of columns
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::NoValueColumns`] | Header has no columns after the time column |
/// | [`IoError::EmptySequence`] | Zero data rows after header |
/// | [`IoError::InconsistentRowLength`] | Row has different column count than header |
/// | [`IoError::NonFiniteValue`] | Cell is NaN, Inf, or unparseable float |
pub struct SequenceReader {
    path: PathBuf,
}

impl SequenceReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and validate the CSV file, returning a [`LoadedSequence`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<LoadedSequence, IoError> {
        // 1. Open file (FileNotFound on failure)
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // 2. Build CSV reader with headers.
        // flexible(true) allows rows with varying column counts so that our own
        // InconsistentRowLength check fires instead of a low-level CsvParse error.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        // 3. Read header: time column plus one label per dimension
        let header = rdr.headers().map_err(|e| IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        })?;
        let expected_cols = header.len();
        if expected_cols < 2 {
            return Err(IoError::NoValueColumns {
                path: self.path.clone(),
            });
        }
        let dims = expected_cols - 1;
        let dim_labels: Vec<String> = header.iter().skip(1).map(str::to_string).collect();
        debug!(dims, "read CSV header");

        // 4. Iterate rows with validation
        let mut times = Vec::new();
        let mut values = Vec::new();

        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| IoError::CsvParse {
                path: self.path.clone(),
                offset: e.position().map_or(0, |p| p.byte()),
                source: e,
            })?;

            // Check column count consistency
            if record.len() != expected_cols {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected: expected_cols,
                    got: record.len(),
                });
            }

            // Parse the timestamp and each dimension
            for col_index in 0..expected_cols {
                let raw = record.get(col_index).unwrap_or("");
                let value: f64 = raw.parse().map_err(|_| IoError::NonFiniteValue {
                    path: self.path.clone(),
                    row_index,
                    col_index,
                    raw: raw.to_string(),
                })?;
                if !value.is_finite() {
                    return Err(IoError::NonFiniteValue {
                        path: self.path.clone(),
                        row_index,
                        col_index,
                        raw: raw.to_string(),
                    });
                }
                if col_index == 0 {
                    times.push(value);
                } else {
                    values.push(value);
                }
            }
        }

        // 5. Check for an empty sequence
        if times.is_empty() {
            return Err(IoError::EmptySequence {
                path: self.path.clone(),
            });
        }

        // 6. Build the Sequence (re-validates; should not fail after the
        // per-cell checks above, but surface it faithfully if it does)
        let sequence =
            Sequence::new(times, values, dims).map_err(|e| IoError::InvalidSequence {
                path: self.path.clone(),
                source: e,
            })?;

        let name = self
            .path
            .file_stem()
            .map_or_else(|| "sequence".to_string(), |s| s.to_string_lossy().into_owned());

        info!(
            name,
            n_samples = sequence.len(),
            dims = sequence.dims(),
            "sequence loaded"
        );

        Ok(LoadedSequence {
            name,
            dim_labels,
            sequence,
        })
    }
}
