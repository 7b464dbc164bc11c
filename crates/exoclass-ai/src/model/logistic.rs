//! Logistic regression over the aligned feature columns.
//!
//! Unlike the forest, this model has no notion of a missing value: any
//! absent input is a prediction error rather than an imputed zero.

use arrow::record_batch::RecordBatch;
use serde::Deserialize;

use super::Predictor;
use crate::error::{ModelLoadError, PredictionError};

#[derive(Debug, Deserialize)]
pub(crate) struct LogisticSpec {
    coefficients: Vec<f64>,
    intercept: f64,
}

#[derive(Debug)]
pub struct LogisticRegression {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LogisticRegression {
    pub(crate) fn build(spec: LogisticSpec, n_features: usize) -> Result<Self, ModelLoadError> {
        if spec.coefficients.len() != n_features {
            return Err(ModelLoadError::InvalidModel(format!(
                "logistic regression has {} coefficients for {n_features} features",
                spec.coefficients.len()
            )));
        }
        if !spec.intercept.is_finite() || spec.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ModelLoadError::InvalidModel(
                "logistic regression weights must be finite".into(),
            ));
        }
        Ok(Self {
            coefficients: spec.coefficients,
            intercept: spec.intercept,
        })
    }
}

impl Predictor for LogisticRegression {
    fn predict_proba(&self, batch: &RecordBatch) -> Result<Vec<f64>, PredictionError> {
        let rows = super::rows(batch, self.coefficients.len())?;
        let schema = batch.schema();

        rows.iter()
            .enumerate()
            .map(|(r, row)| -> Result<f64, PredictionError> {
                let mut z = self.intercept;
                for (j, (value, coef)) in row.iter().zip(&self.coefficients).enumerate() {
                    let x = value.ok_or_else(|| PredictionError::MissingValue {
                        feature: schema.field(j).name().to_string(),
                        row: r,
                    })?;
                    z += coef * x;
                }
                Ok(sigmoid(z))
            })
            .collect()
    }

    fn model_type(&self) -> &'static str {
        "Logistic Regression"
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}
