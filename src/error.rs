//! Pipeline error taxonomy.
//!
//! One variant per pipeline stage. The binary prints the Display string of
//! whichever variant aborts the run and exits with status 1; no stage
//! retries or produces partial output.

use std::path::PathBuf;

use thiserror::Error;

use crate::artifact::ArtifactError;
use crate::bucket::BucketError;
use crate::classify::ClassifyError;
use crate::transform::TransformError;

/// Fatal pipeline failure, tagged with the stage that raised it.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// One of the three model artifacts failed to load.
    #[error("failed to load model artifact {}: {}", .path.display(), .source)]
    ArtifactLoad {
        path: PathBuf,
        #[source]
        source: ArtifactError,
    },

    /// The input CSV could not be opened or parsed.
    #[error("failed to read input CSV {}: {}", .path.display(), .source)]
    InputRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Imputation or scaling failed.
    #[error("failed to preprocess input data: {0}")]
    Preprocess(#[from] TransformError),

    /// The classifier rejected the preprocessed table.
    #[error("prediction failed: {0}")]
    Prediction(#[from] ClassifyError),

    /// Risk tier assignment failed (degenerate probability distribution).
    #[error("risk level assignment failed: {0}")]
    Bucketing(#[from] BucketError),

    /// The output CSV could not be written.
    #[error("failed to write predictions to {}: {}", .path.display(), .source)]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
