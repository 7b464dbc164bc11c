//! Model bundle loading.
//!
//! A bundle is the trained predictor plus its decision threshold and the
//! ordered feature names it expects. Two on-disk shapes are accepted and
//! normalized immediately into one [`ModelBundle`]:
//!
//! - wrapped: `{"model": {...}, "threshold": 0.42, "features": [...], "version": "..."}`,
//!   every key but `model` optional;
//! - bare: the model object itself, recognized by its `"type"` key.
//!
//! The path is resolved from an ordered candidate list; the first existing
//! file wins.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use exoclass_core::canonical_features;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::ModelLoadError;
use crate::model::{self, Predictor};

/// Search list used when no explicit model path is configured.
pub const DEFAULT_MODEL_PATHS: &[&str] = &[
    "models/best_koi_reduced_rf.json",
    "../exo_classification/models/best_koi_reduced_rf.json",
    "exo_classification/models/best_koi_reduced_rf.json",
    "test_classification/models/best_koi_reduced_rf.json",
];

pub const DEFAULT_THRESHOLD: f64 = 0.5;
pub const DEFAULT_VERSION: &str = "1.0.0";

pub fn default_search_paths() -> Vec<PathBuf> {
    DEFAULT_MODEL_PATHS.iter().map(PathBuf::from).collect()
}

/// Metadata describing a loaded bundle. Computed once at load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub version: String,
    pub threshold: f64,
    pub features: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_estimators: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub loaded_at: DateTime<Utc>,
}

/// An immutable, validated model bundle.
#[derive(Debug)]
pub struct ModelBundle {
    predictor: Box<dyn Predictor>,
    info: ModelInfo,
}

impl ModelBundle {
    /// Assemble a bundle, validating the threshold and feature list.
    pub fn new(
        predictor: Box<dyn Predictor>,
        threshold: f64,
        features: Vec<String>,
        version: Option<String>,
        source: Option<&Path>,
    ) -> Result<Self, ModelLoadError> {
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(ModelLoadError::InvalidThreshold(threshold));
        }
        validate_features(&features)?;

        let info = ModelInfo {
            model_type: predictor.model_type().to_string(),
            version: version.unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            threshold,
            features,
            n_estimators: predictor.n_estimators(),
            source: source.map(|p| p.display().to_string()),
            loaded_at: Utc::now(),
        };
        Ok(Self { predictor, info })
    }

    pub fn predictor(&self) -> &dyn Predictor {
        self.predictor.as_ref()
    }

    pub fn threshold(&self) -> f64 {
        self.info.threshold
    }

    pub fn features(&self) -> &[String] {
        &self.info.features
    }

    pub fn info(&self) -> &ModelInfo {
        &self.info
    }
}

fn validate_features(features: &[String]) -> Result<(), ModelLoadError> {
    if features.is_empty() {
        return Err(ModelLoadError::InvalidFeatures(
            "feature list is empty".into(),
        ));
    }
    let mut seen = HashSet::with_capacity(features.len());
    for name in features {
        if !seen.insert(name.as_str()) {
            return Err(ModelLoadError::InvalidFeatures(format!(
                "duplicate feature '{name}'"
            )));
        }
    }
    Ok(())
}

/// The two accepted serialized shapes.
#[derive(Debug)]
enum BundleShape {
    Wrapped(WrappedBundle),
    Bare(Value),
}

#[derive(Debug, Deserialize)]
struct WrappedBundle {
    model: Option<Value>,
    threshold: Option<f64>,
    features: Option<Vec<String>>,
    version: Option<String>,
}

impl BundleShape {
    fn from_value(value: Value) -> Result<Self, ModelLoadError> {
        let Some(obj) = value.as_object() else {
            return Err(ModelLoadError::MissingPredictor);
        };
        if obj.contains_key("model") {
            Ok(Self::Wrapped(serde_json::from_value(value)?))
        } else if obj.contains_key("type") {
            Ok(Self::Bare(value))
        } else {
            Err(ModelLoadError::MissingPredictor)
        }
    }

    fn into_bundle(self, source: Option<&Path>) -> Result<ModelBundle, ModelLoadError> {
        let (model, threshold, features, version) = match self {
            Self::Wrapped(w) => (
                w.model.filter(|m| !m.is_null()),
                w.threshold,
                w.features,
                w.version,
            ),
            Self::Bare(model) => (Some(model), None, None, None),
        };

        let model = model.ok_or(ModelLoadError::MissingPredictor)?;
        let features = features.unwrap_or_else(canonical_features);
        let predictor = model::from_value(model, features.len())?;

        ModelBundle::new(
            predictor,
            threshold.unwrap_or(DEFAULT_THRESHOLD),
            features,
            version,
            source,
        )
    }
}

/// Parse a bundle from its JSON value.
pub fn from_value(value: Value, source: Option<&Path>) -> Result<ModelBundle, ModelLoadError> {
    BundleShape::from_value(value)?.into_bundle(source)
}

/// Load a bundle from a specific file.
pub fn load(path: &Path) -> Result<ModelBundle, ModelLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ModelLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&contents)?;
    let bundle = from_value(value, Some(path))?;

    info!(
        path = %path.display(),
        model_type = %bundle.info().model_type,
        threshold = bundle.threshold(),
        features = bundle.features().len(),
        "loaded model bundle"
    );
    Ok(bundle)
}

/// First candidate that exists as a file.
pub fn resolve_path(candidates: &[PathBuf]) -> Option<&Path> {
    candidates
        .iter()
        .find(|p| {
            let exists = p.is_file();
            debug!(path = %p.display(), exists, "probing model path");
            exists
        })
        .map(PathBuf::as_path)
}

/// Load from the first existing candidate path.
pub fn load_first(candidates: &[PathBuf]) -> Result<ModelBundle, ModelLoadError> {
    let path = resolve_path(candidates).ok_or_else(|| ModelLoadError::NotFound {
        searched: candidates.to_vec(),
    })?;
    load(path)
}
