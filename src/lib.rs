//! floodcast: batch flood-risk inference over pre-trained artifacts.
//!
//! Applies a pre-trained flood-risk pipeline to a batch of feature rows:
//! load three serialized artifacts (imputer, scaler, binary classifier),
//! read a feature CSV, impute then scale, predict a flood label and a flood
//! probability per row, partition probabilities into three equal-population
//! risk tiers, and write the input table with the three derived columns
//! appended.
//!
//! # Key Types
//!
//! - [`pipeline::Artifacts`] - the three loaded artifacts with `predict`
//! - [`table::Table`] - CSV-backed tabular dataset
//! - [`bucket::RiskTier`] - batch-relative risk tier (low/medium/high)
//! - [`error::PipelineError`] - per-stage failure taxonomy
//!
//! The `flood_predict` binary wires these together; see the [`pipeline`]
//! module for the step-by-step contract.

pub mod artifact;
pub mod bucket;
pub mod classify;
pub mod error;
pub mod pipeline;
pub mod table;
pub mod transform;

// High-level types most callers want.
pub use bucket::RiskTier;
pub use classify::{Classifier, DECISION_THRESHOLD, POSITIVE_CLASS_COLUMN};
pub use error::PipelineError;
pub use pipeline::{Artifacts, Predictions};
pub use table::Table;
pub use transform::{Imputer, Scaler};
