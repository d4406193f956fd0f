//! JSON artifact writer for alignment and pairwise outputs.

use std::fs;
use std::path::{Path, PathBuf};

use fastwarp_dtw::{Alignment, DistanceMatrix};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::ExperimentName;

/// Writes alignment results to JSON files.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{experiment}_alignment.json` and
/// `{experiment}_pairwise.json`.
pub struct AlignmentWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl AlignmentWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    /// Write an alignment result to `{experiment}_alignment.json`.
    ///
    /// The path is serialized as `[i, j]` index pairs in path order.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all)]
    pub fn write_alignment(
        &self,
        left: &str,
        right: &str,
        radius: usize,
        alignment: &Alignment,
    ) -> Result<(), IoError> {
        let path = self
            .output_dir
            .join(format!("{}_alignment.json", self.experiment.as_str()));

        let steps: Vec<[usize; 2]> = alignment
            .path()
            .steps()
            .iter()
            .map(|step| [step.i, step.j])
            .collect();

        let artifact = AlignmentArtifact {
            experiment: self.experiment.as_str(),
            left,
            right,
            radius,
            cost: alignment.cost().value(),
            path_len: steps.len(),
            path: steps,
        };

        let json = serde_json::to_string_pretty(&artifact).expect("serialization cannot fail");
        fs::write(&path, &json).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), "alignment written");
        Ok(())
    }

    /// Write a pairwise cost matrix to `{experiment}_pairwise.json`.
    ///
    /// `names[i]` labels row and column `i` of the full symmetric matrix.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all)]
    pub fn write_pairwise(
        &self,
        names: &[String],
        radius: usize,
        matrix: &DistanceMatrix,
    ) -> Result<(), IoError> {
        let path = self
            .output_dir
            .join(format!("{}_pairwise.json", self.experiment.as_str()));

        let costs: Vec<Vec<f64>> = (0..matrix.len())
            .map(|i| matrix.row(i).iter().map(|c| c.value()).collect())
            .collect();

        let artifact = PairwiseArtifact {
            experiment: self.experiment.as_str(),
            n_sequences: matrix.len(),
            radius,
            names,
            costs,
        };

        let json = serde_json::to_string_pretty(&artifact).expect("serialization cannot fail");
        fs::write(&path, &json).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), "pairwise costs written");
        Ok(())
    }
}

// --- Shadow structs for JSON serialization ---

#[derive(Serialize)]
struct AlignmentArtifact<'a> {
    experiment: &'a str,
    left: &'a str,
    right: &'a str,
    radius: usize,
    cost: f64,
    path_len: usize,
    path: Vec<[usize; 2]>,
}

#[derive(Serialize)]
struct PairwiseArtifact<'a> {
    experiment: &'a str,
    n_sequences: usize,
    radius: usize,
    names: &'a [String],
    costs: Vec<Vec<f64>>,
}
