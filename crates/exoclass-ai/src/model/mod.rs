//! Predictors that turn an aligned feature matrix into positive-class
//! probabilities.
//!
//! Serialized models are tagged by `"type"` and validated against the
//! bundle's feature count before they become a [`Predictor`].

mod forest;
mod logistic;

use std::fmt;

use arrow::array::{Array, Float64Array};
use arrow::record_batch::RecordBatch;
use serde_json::Value;

use crate::error::{ModelLoadError, PredictionError};

pub use forest::RandomForest;
pub use logistic::LogisticRegression;

/// A trained binary classifier with a probability capability.
///
/// Columns of the input batch are positional: column `j` is the bundle's
/// `j`-th feature.
pub trait Predictor: fmt::Debug + Send + Sync {
    /// Positive-class probability for every row of `batch`.
    fn predict_proba(&self, batch: &RecordBatch) -> Result<Vec<f64>, PredictionError>;

    /// Human-readable model family, reported in model metadata.
    fn model_type(&self) -> &'static str;

    /// Number of ensemble members, if the model is an ensemble.
    fn n_estimators(&self) -> Option<usize> {
        None
    }
}

/// Build a predictor from its serialized form.
///
/// `n_features` is the length of the bundle's feature list; the model must
/// not reference columns beyond it.
pub fn from_value(value: Value, n_features: usize) -> Result<Box<dyn Predictor>, ModelLoadError> {
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ModelLoadError::MissingPredictor)?
        .to_string();

    match kind.as_str() {
        "random_forest" => {
            let spec: forest::ForestSpec = serde_json::from_value(value)?;
            Ok(Box::new(RandomForest::build(spec, n_features)?))
        }
        "logistic_regression" => {
            let spec: logistic::LogisticSpec = serde_json::from_value(value)?;
            Ok(Box::new(LogisticRegression::build(spec, n_features)?))
        }
        _ => Err(ModelLoadError::UnsupportedModel(kind)),
    }
}

/// Convert a columnar feature batch to row-major values, checking the
/// column count and types.
pub(crate) fn rows(
    batch: &RecordBatch,
    expected_columns: usize,
) -> Result<Vec<Vec<Option<f64>>>, PredictionError> {
    if batch.num_columns() != expected_columns {
        return Err(PredictionError::Shape {
            expected: expected_columns,
            actual: batch.num_columns(),
        });
    }

    let mut rows = vec![Vec::with_capacity(expected_columns); batch.num_rows()];
    for (j, col) in batch.columns().iter().enumerate() {
        let values = col
            .as_any()
            .downcast_ref::<Float64Array>()
            .ok_or_else(|| PredictionError::ColumnType {
                column: batch.schema().field(j).name().to_string(),
            })?;
        for (row, value) in rows.iter_mut().zip(values.iter()) {
            row.push(value.filter(|v| v.is_finite()));
        }
    }
    Ok(rows)
}
