//! Preprocessing transforms: missing-value imputation and feature scaling.
//!
//! Both transforms carry parameters learned at training time and apply them
//! in place to a numeric feature matrix. The pipeline applies the imputer
//! first, then the scaler; the scaler assumes already-imputed input.

use ndarray::{Array1, Array2};

/// Errors raised by the preprocessing stage.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransformError {
    /// A cell in the input table is neither numeric nor a missing-value marker.
    #[error("row {row}, column {column:?}: cannot interpret {value:?} as a number")]
    NonNumericCell {
        row: usize,
        column: String,
        value: String,
    },

    /// The input column count does not match what the transform was fitted on.
    #[error("input has {actual} columns but the transform was fitted on {expected}")]
    FeatureCountMismatch { expected: usize, actual: usize },

    /// A scaler parameter would divide by zero (or flip sign).
    #[error("scale for feature {feature} must be > 0, got {value}")]
    NonPositiveScale { feature: usize, value: f32 },
}

/// Missing-value imputer with per-column fill values.
///
/// Replaces NaN cells with the fill value learned for that column; finite
/// cells pass through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Imputer {
    fill_values: Array1<f32>,
}

impl Imputer {
    /// Create an imputer from per-column fill values.
    pub fn new(fill_values: Array1<f32>) -> Self {
        Self { fill_values }
    }

    /// Number of columns this imputer was fitted on.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.fill_values.len()
    }

    /// Fill value for a column.
    #[inline]
    pub fn fill_value(&self, feature: usize) -> f32 {
        self.fill_values[feature]
    }

    /// Replace NaN cells in `matrix` with the fitted fill values, in place.
    pub fn transform(&self, matrix: &mut Array2<f32>) -> Result<(), TransformError> {
        if matrix.ncols() != self.n_features() {
            return Err(TransformError::FeatureCountMismatch {
                expected: self.n_features(),
                actual: matrix.ncols(),
            });
        }

        for (j, mut column) in matrix.columns_mut().into_iter().enumerate() {
            let fill = self.fill_values[j];
            for value in column.iter_mut() {
                if value.is_nan() {
                    *value = fill;
                }
            }
        }
        Ok(())
    }
}

/// Feature scaler with per-column center and scale parameters.
///
/// Standardizes each column: `x' = (x - center) / scale`. Assumes input with
/// no missing values (run the [`Imputer`] first).
#[derive(Debug, Clone, PartialEq)]
pub struct Scaler {
    centers: Array1<f32>,
    scales: Array1<f32>,
}

impl Scaler {
    /// Create a scaler from per-column centers and scales.
    ///
    /// # Panics
    ///
    /// Panics if `centers` and `scales` differ in length.
    pub fn new(centers: Array1<f32>, scales: Array1<f32>) -> Self {
        assert_eq!(
            centers.len(),
            scales.len(),
            "centers ({}) and scales ({}) must have equal length",
            centers.len(),
            scales.len()
        );
        Self { centers, scales }
    }

    /// Number of columns this scaler was fitted on.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.centers.len()
    }

    /// Center for a column.
    #[inline]
    pub fn center(&self, feature: usize) -> f32 {
        self.centers[feature]
    }

    /// Scale for a column.
    #[inline]
    pub fn scale(&self, feature: usize) -> f32 {
        self.scales[feature]
    }

    /// Standardize `matrix` in place with the fitted parameters.
    pub fn transform(&self, matrix: &mut Array2<f32>) -> Result<(), TransformError> {
        if matrix.ncols() != self.n_features() {
            return Err(TransformError::FeatureCountMismatch {
                expected: self.n_features(),
                actual: matrix.ncols(),
            });
        }
        if let Some(j) = self.scales.iter().position(|&s| s <= 0.0) {
            return Err(TransformError::NonPositiveScale {
                feature: j,
                value: self.scales[j],
            });
        }

        for (j, mut column) in matrix.columns_mut().into_iter().enumerate() {
            let center = self.centers[j];
            let scale = self.scales[j];
            for value in column.iter_mut() {
                *value = (*value - center) / scale;
            }
        }
        Ok(())
    }
}
