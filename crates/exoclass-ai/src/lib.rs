//! Model adapter and classification service.
//!
//! Loads an externally trained model bundle, aligns validated feature
//! records to the predictor's expected column order, and turns raw
//! probabilities into thresholded, confidence-banded classifications.

pub mod align;
pub mod bundle;
pub mod classifier;
mod error;
pub mod handle;
pub mod model;

pub use align::FeatureSource;
pub use bundle::{
    DEFAULT_MODEL_PATHS, ModelBundle, ModelInfo, default_search_paths, load, load_first,
};
pub use classifier::{classify, classify_batch, predict};
pub use error::{ClassifyError, ModelLoadError, PredictionError};
pub use handle::ModelHandle;
pub use model::Predictor;
