//! Six-step batch inference pipeline.
//!
//! Load artifacts → read input → impute + scale → predict → assign tiers →
//! write output. Control flows strictly forward; any failure aborts the run
//! before the output file is created.

use std::path::Path;

use ndarray::Array1;

use crate::artifact;
use crate::bucket::{self, RiskTier};
use crate::classify::{Classifier, POSITIVE_CLASS_COLUMN};
use crate::error::PipelineError;
use crate::table::Table;
use crate::transform::{Imputer, Scaler};

/// Fixed relative path of the imputer artifact.
pub const IMPUTER_PATH: &str = "models/flood_imputer.bin";

/// Fixed relative path of the scaler artifact.
pub const SCALER_PATH: &str = "models/flood_scaler.bin";

/// Fixed relative path of the classifier artifact.
pub const MODEL_PATH: &str = "models/flood_risk_model.bin";

/// Default output path when `--output` is not given.
pub const DEFAULT_OUTPUT: &str = "predictions.csv";

/// The three pre-trained artifacts, loaded all-or-nothing.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub imputer: Imputer,
    pub scaler: Scaler,
    pub classifier: Classifier,
}

impl Artifacts {
    /// Load all three artifacts from the fixed paths relative to the
    /// current directory.
    pub fn load_default() -> Result<Self, PipelineError> {
        Self::load_from(Path::new("."))
    }

    /// Load all three artifacts from the fixed paths relative to `base`.
    ///
    /// Fails on the first artifact that is missing or undecodable; no
    /// partial success.
    pub fn load_from(base: &Path) -> Result<Self, PipelineError> {
        let imputer_path = base.join(IMPUTER_PATH);
        let imputer = artifact::load_imputer(&imputer_path)
            .map_err(|source| PipelineError::ArtifactLoad { path: imputer_path, source })?;

        let scaler_path = base.join(SCALER_PATH);
        let scaler = artifact::load_scaler(&scaler_path)
            .map_err(|source| PipelineError::ArtifactLoad { path: scaler_path, source })?;

        let model_path = base.join(MODEL_PATH);
        let classifier = artifact::load_classifier(&model_path)
            .map_err(|source| PipelineError::ArtifactLoad { path: model_path, source })?;

        Ok(Self {
            imputer,
            scaler,
            classifier,
        })
    }

    /// Run preprocessing, prediction, and tier assignment over a table.
    ///
    /// The imputer runs before the scaler; the scaler assumes imputed input,
    /// so the order is load-bearing. The whole table is predicted in one
    /// call.
    pub fn predict(&self, table: &Table) -> Result<Predictions, PipelineError> {
        let mut matrix = table.to_matrix()?;
        self.imputer.transform(&mut matrix)?;
        self.scaler.transform(&mut matrix)?;

        let proba = self.classifier.predict_proba(matrix.view())?;
        let probabilities: Array1<f32> = proba.column(POSITIVE_CLASS_COLUMN).to_owned();
        let labels = self.classifier.predict(matrix.view())?.to_vec();

        let tiers = bucket::assign_tiers(
            probabilities
                .as_slice()
                .expect("probability vector is contiguous"),
        )?;

        Ok(Predictions {
            labels,
            probabilities: probabilities.to_vec(),
            tiers,
        })
    }
}

/// Per-row prediction vectors, all in input row order.
#[derive(Debug, Clone)]
pub struct Predictions {
    /// Binary flood labels (0/1).
    pub labels: Vec<u8>,
    /// Positive-class probabilities in `[0, 1]`.
    pub probabilities: Vec<f32>,
    /// Batch-relative risk tiers.
    pub tiers: Vec<RiskTier>,
}

impl Predictions {
    /// Number of predicted rows.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True if no rows were predicted.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Read the input CSV into a table.
pub fn read_input(path: &Path) -> Result<Table, PipelineError> {
    Table::read_csv(path).map_err(|source| PipelineError::InputRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Append the three prediction columns to the input table and write it out.
///
/// Output columns are the input columns followed by `flooded`,
/// `flood_probability`, `risk_level`, in that order, with no index column.
pub fn write_output(
    mut table: Table,
    predictions: &Predictions,
    path: &Path,
) -> Result<(), PipelineError> {
    table.push_column(
        "flooded",
        predictions.labels.iter().map(|l| l.to_string()).collect(),
    );
    table.push_column(
        "flood_probability",
        predictions
            .probabilities
            .iter()
            .map(|p| p.to_string())
            .collect(),
    );
    table.push_column(
        "risk_level",
        predictions.tiers.iter().map(|t| t.to_string()).collect(),
    );

    table.write_csv(path).map_err(|source| PipelineError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })
}
