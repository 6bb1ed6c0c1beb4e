//! Binary flood classifier.
//!
//! A logistic linear model: per-row decision margin `w·x + b` mapped through
//! the logistic function to a positive-class probability. The probability
//! output has exactly two columns, `[P(class 0), P(class 1)]`.

use ndarray::{Array1, Array2, ArrayView2};

/// Column index of the positive ("flooded") class in the two-class
/// probability output.
///
/// The classifier is binary with classes ordered `[not flooded, flooded]`;
/// this index is a fixed contract of the model format, not discovered from
/// the artifact at runtime.
pub const POSITIVE_CLASS_COLUMN: usize = 1;

/// Decision threshold: rows with positive-class probability at or above this
/// value are labeled `1`.
pub const DECISION_THRESHOLD: f32 = 0.5;

/// Errors raised by the prediction stage.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClassifyError {
    /// The input column count does not match what the model was fitted on.
    #[error("input has {actual} features but the model was fitted on {expected}")]
    FeatureCountMismatch { expected: usize, actual: usize },

    /// A row's decision margin is NaN, so no probability can be assigned.
    /// Happens when an infinite feature meets a zero weight.
    #[error("row {row} produced a non-finite probability (margin {margin})")]
    NonFiniteProbability { row: usize, margin: f32 },
}

/// Pre-trained binary classifier (logistic linear model).
#[derive(Debug, Clone, PartialEq)]
pub struct Classifier {
    weights: Array1<f32>,
    bias: f32,
}

impl Classifier {
    /// Create a classifier from fitted weights and bias.
    pub fn new(weights: Array1<f32>, bias: f32) -> Self {
        Self { weights, bias }
    }

    /// Number of input features.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    /// Fitted weight for a feature.
    #[inline]
    pub fn weight(&self, feature: usize) -> f32 {
        self.weights[feature]
    }

    /// Fitted bias term.
    #[inline]
    pub fn bias(&self) -> f32 {
        self.bias
    }

    /// Per-row decision margins `w·x + b`.
    pub fn decision_function(
        &self,
        features: ArrayView2<'_, f32>,
    ) -> Result<Array1<f32>, ClassifyError> {
        if features.ncols() != self.n_features() {
            return Err(ClassifyError::FeatureCountMismatch {
                expected: self.n_features(),
                actual: features.ncols(),
            });
        }
        Ok(features.dot(&self.weights) + self.bias)
    }

    /// Two-class probability output, shape `[n_rows, 2]`.
    ///
    /// Column [`POSITIVE_CLASS_COLUMN`] holds the flood probability; the two
    /// columns of each row sum to 1. Infinite margins saturate to 0 or 1;
    /// a NaN margin (infinite feature against a zero weight) is an error, so
    /// every returned probability is finite and in `[0, 1]`.
    pub fn predict_proba(
        &self,
        features: ArrayView2<'_, f32>,
    ) -> Result<Array2<f32>, ClassifyError> {
        let margins = self.decision_function(features)?;
        let mut proba = Array2::zeros((margins.len(), 2));
        for (i, &margin) in margins.iter().enumerate() {
            let p = sigmoid(margin);
            if !p.is_finite() {
                return Err(ClassifyError::NonFiniteProbability { row: i, margin });
            }
            proba[[i, 0]] = 1.0 - p;
            proba[[i, POSITIVE_CLASS_COLUMN]] = p;
        }
        Ok(proba)
    }

    /// Per-row binary labels: `1` iff the positive-class probability is at
    /// or above [`DECISION_THRESHOLD`].
    pub fn predict(&self, features: ArrayView2<'_, f32>) -> Result<Array1<u8>, ClassifyError> {
        let proba = self.predict_proba(features)?;
        Ok(proba
            .column(POSITIVE_CLASS_COLUMN)
            .mapv(|p| u8::from(p >= DECISION_THRESHOLD)))
    }
}

/// Logistic function. Saturates to 0 or 1 at extreme margins.
#[inline]
fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
