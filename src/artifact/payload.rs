//! Payload structures for the artifact storage format.
//!
//! These structs are designed for serialization with Postcard. They mirror
//! the runtime types but hold plain vectors for compact binary storage.

use serde::{Deserialize, Serialize};

/// Version-tagged payload enum for forward compatibility.
///
/// New format versions add new variants rather than modifying existing ones;
/// older readers detect unsupported versions by the enum discriminant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Payload {
    /// Version 1 payload format.
    V1(PayloadV1),
}

/// Version 1 payload structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadV1 {
    /// Artifact metadata.
    pub metadata: ArtifactMetadata,
    /// Artifact-specific parameters.
    pub artifact: ArtifactData,
}

/// Metadata common to all artifact kinds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Number of input features the artifact was fitted on.
    pub n_features: u32,
    /// Feature names (optional).
    pub feature_names: Option<Vec<String>>,
    /// Additional key-value attributes.
    pub attributes: Vec<(String, String)>,
}

/// Artifact-specific payload variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ArtifactData {
    /// Missing-value imputer parameters.
    Imputer(ImputerPayload),
    /// Feature scaler parameters.
    Scaler(ScalerPayload),
    /// Binary classifier parameters.
    Classifier(ClassifierPayload),
}

/// Per-column fill values for the imputer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImputerPayload {
    /// Fill value for each column, in column order.
    pub fill_values: Vec<f32>,
}

/// Per-column standardization parameters for the scaler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerPayload {
    /// Center subtracted from each column.
    pub centers: Vec<f32>,
    /// Divisor applied to each column after centering.
    pub scales: Vec<f32>,
}

/// Logistic linear classifier parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierPayload {
    /// One weight per input feature.
    pub weights: Vec<f32>,
    /// Bias term.
    pub bias: f32,
}
