use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use fastwarp_dtw::{Euclidean, FastDtw, align_exact};
use fastwarp_io::{AlignmentWriter, ExperimentName, SequenceReader};

#[derive(Parser)]
#[command(name = "fastwarp")]
#[command(about = "Multi-resolution dynamic time warping alignment for long sequences")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

#[derive(Subcommand)]
enum Command {
    /// Align two sequences and write the warp path as a JSON artifact
    Align {
        /// Path to the first sequence CSV file
        #[arg(long)]
        left: PathBuf,

        /// Path to the second sequence CSV file
        #[arg(long)]
        right: PathBuf,

        /// Search radius for the multi-resolution approximation
        #[arg(long, default_value_t = 1)]
        radius: usize,

        /// Solve the full dynamic program instead of the approximation
        #[arg(long, default_value_t = false)]
        exact: bool,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        experiment: String,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Compute pairwise alignment costs across a set of sequences
    Pairwise {
        /// Paths to sequence CSV files (repeat for each sequence)
        #[arg(long = "data", required = true)]
        data: Vec<PathBuf>,

        /// Search radius for the multi-resolution approximation
        #[arg(long, default_value_t = 1)]
        radius: usize,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        experiment: String,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct AlignOutput {
    experiment: String,
    left: String,
    right: String,
    left_len: usize,
    right_len: usize,
    radius: usize,
    exact: bool,
    cost: f64,
    path_len: usize,
}

#[derive(Serialize)]
struct PairwiseOutput {
    experiment: String,
    n_sequences: usize,
    radius: usize,
    n_pairs: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Configure Rayon thread pool
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Align {
            left,
            right,
            radius,
            exact,
            experiment,
            output_dir,
        } => {
            let experiment_name = ExperimentName::new(experiment.clone())?;

            let left_seq = SequenceReader::new(&left)
                .read()
                .context("failed to read left sequence")?;
            let right_seq = SequenceReader::new(&right)
                .read()
                .context("failed to read right sequence")?;

            let alignment = if exact {
                align_exact(
                    left_seq.sequence.as_view(),
                    right_seq.sequence.as_view(),
                    &Euclidean,
                )
            } else {
                FastDtw::new(radius).align(
                    left_seq.sequence.as_view(),
                    right_seq.sequence.as_view(),
                    &Euclidean,
                )
            }
            .context("alignment failed")?;
            info!(cost = %alignment.cost(), path_len = alignment.path().len(), "aligned");

            let writer = AlignmentWriter::new(&output_dir, experiment_name)?;
            writer.write_alignment(&left_seq.name, &right_seq.name, radius, &alignment)?;

            let output = AlignOutput {
                experiment,
                left: left_seq.name,
                right: right_seq.name,
                left_len: left_seq.sequence.len(),
                right_len: right_seq.sequence.len(),
                radius,
                exact,
                cost: alignment.cost().value(),
                path_len: alignment.path().len(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Pairwise {
            data,
            radius,
            experiment,
            output_dir,
        } => {
            let experiment_name = ExperimentName::new(experiment.clone())?;

            let mut names = Vec::with_capacity(data.len());
            let mut sequences = Vec::with_capacity(data.len());
            for path in &data {
                let loaded = SequenceReader::new(path)
                    .read()
                    .with_context(|| format!("failed to read {}", path.display()))?;
                names.push(loaded.name);
                sequences.push(loaded.sequence);
            }
            info!(n = sequences.len(), "sequences loaded");

            let matrix = FastDtw::new(radius)
                .pairwise(&sequences, &Euclidean)
                .context("pairwise alignment failed")?;

            let writer = AlignmentWriter::new(&output_dir, experiment_name)?;
            writer.write_pairwise(&names, radius, &matrix)?;

            let n = sequences.len();
            let output = PairwiseOutput {
                experiment,
                n_sequences: n,
                radius,
                n_pairs: n.saturating_sub(1) * n / 2,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
