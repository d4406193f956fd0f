//! Domain types for fastwarp-io.

use fastwarp_dtw::Sequence;

use crate::IoError;

/// An experiment name, validated for safe use in output file names.
///
/// Restricted to `[a-zA-Z0-9_-]+` so the name can be embedded in artifact
/// file names on any platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentName(String);

impl ExperimentName {
    /// Validate and wrap an experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidExperimentName`] for an empty name or one
    /// containing characters outside `[a-zA-Z0-9_-]`.
    pub fn new(name: String) -> Result<Self, IoError> {
        let ok_char = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-';
        if name.is_empty() || !name.chars().all(ok_char) {
            return Err(IoError::InvalidExperimentName { name });
        }
        Ok(Self(name))
    }

    /// Return the experiment name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExperimentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A sequence loaded from a CSV file, with its provenance.
///
/// Produced by [`SequenceReader`](crate::SequenceReader). The name is the
/// source file's stem; dimension labels come from the CSV header.
#[derive(Debug)]
pub struct LoadedSequence {
    /// Name derived from the source file (file stem).
    pub name: String,
    /// Value column labels from the CSV header, one per dimension.
    pub dim_labels: Vec<String>,
    /// The validated sequence.
    pub sequence: Sequence,
}
