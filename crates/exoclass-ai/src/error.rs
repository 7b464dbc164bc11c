use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("model file not found in any expected location: {}", display_paths(.searched))]
    NotFound { searched: Vec<PathBuf> },

    #[error("failed to read model file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse model bundle: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("model bundle has no probability-capable predictor")]
    MissingPredictor,

    #[error("unsupported model type: {0}")]
    UnsupportedModel(String),

    #[error("threshold must be a finite value in [0, 1], got {0}")]
    InvalidThreshold(f64),

    #[error("invalid feature list: {0}")]
    InvalidFeatures(String),

    #[error("invalid model: {0}")]
    InvalidModel(String),
}

#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("missing value for feature '{feature}' in row {row}")]
    MissingValue { feature: String, row: usize },

    #[error("column '{column}' is not Float64")]
    ColumnType { column: String },

    #[error("expected {expected} feature columns, got {actual}")]
    Shape { expected: usize, actual: usize },

    #[error("predictor returned {actual} probabilities for {expected} rows")]
    RowCount { expected: usize, actual: usize },

    #[error("predictor returned invalid probability {value} for row {row}")]
    InvalidProbability { row: usize, value: f64 },

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("model not loaded")]
    ModelUnavailable,

    #[error("prediction failed: {0}")]
    Prediction(#[from] PredictionError),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
