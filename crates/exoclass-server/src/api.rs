//! Request handlers and response payloads.
//!
//! Probabilities, thresholds and means are rounded to four decimals on the
//! way out. Predictions and confidence bands are always computed from the
//! unrounded probability.

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use exoclass_ai::ModelInfo;
use exoclass_core::{
    BatchClassification, BatchSummary, Classification, Confidence, Feature, FeatureRecord, Label,
    ValidationError, Violation,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::AppState;
use crate::error::ApiError;

pub const SERVICE_NAME: &str = "Exoplanet Classification API";

/// Round to four decimal places for presentation.
pub fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

// ── Payloads ──

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub version: &'static str,
    pub health: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
    pub model_info: Option<ModelInfo>,
}

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub prediction: Label,
    pub probability: f64,
    pub confidence: Confidence,
    pub threshold_used: f64,
    pub model_info: ModelInfo,
}

impl PredictionResponse {
    pub fn new(result: &Classification, model_info: &ModelInfo) -> Self {
        Self {
            prediction: result.prediction,
            probability: round4(result.probability),
            confidence: result.confidence,
            threshold_used: round4(result.threshold),
            model_info: model_info.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CandidatePrediction {
    pub candidate_id: usize,
    pub prediction: Label,
    pub probability: f64,
    pub confidence: Confidence,
}

#[derive(Debug, Serialize)]
pub struct BatchPredictionResponse {
    pub predictions: Vec<CandidatePrediction>,
    pub summary: BatchSummary,
}

impl BatchPredictionResponse {
    pub fn new(batch: &BatchClassification) -> Self {
        let predictions = batch
            .results
            .iter()
            .enumerate()
            .map(|(candidate_id, r)| CandidatePrediction {
                candidate_id,
                prediction: r.prediction,
                probability: round4(r.probability),
                confidence: r.confidence,
            })
            .collect();
        let summary = BatchSummary {
            mean_probability: round4(batch.summary.mean_probability),
            threshold_used: round4(batch.summary.threshold_used),
            ..batch.summary
        };
        Self {
            predictions,
            summary,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ModelInfoResponse {
    pub model_info: ModelInfo,
    pub features_required: Vec<String>,
    pub feature_descriptions: BTreeMap<&'static str, &'static str>,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub message: &'static str,
    pub model_info: ModelInfo,
}

// ── Request parsing ──

/// Validate a `{"candidates": [...]}` body, collecting violations from
/// every candidate under `candidates[i].<field>` paths.
pub fn parse_batch(body: &Value) -> Result<Vec<FeatureRecord>, ValidationError> {
    let Value::Object(map) = body else {
        return Err(ValidationError::single(
            "body",
            "expected a JSON object with a 'candidates' list",
        ));
    };
    let items = match map.get("candidates") {
        None | Some(Value::Null) => {
            return Err(ValidationError::single("candidates", "field required"));
        }
        Some(Value::Array(items)) => items,
        Some(_) => return Err(ValidationError::single("candidates", "must be a list")),
    };

    let mut records = Vec::with_capacity(items.len());
    let mut violations = Vec::new();
    for (i, item) in items.iter().enumerate() {
        let prefix = format!("candidates[{i}]");
        match item {
            Value::Object(candidate) => match FeatureRecord::from_map(candidate) {
                Ok(record) => records.push(record),
                Err(e) => violations.extend(e.with_prefix(&prefix).violations),
            },
            _ => violations.push(Violation {
                field: prefix,
                message: "expected a JSON object of feature values".into(),
            }),
        }
    }

    if violations.is_empty() {
        Ok(records)
    } else {
        Err(ValidationError { violations })
    }
}

// ── Handlers ──

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        health: "/health",
    })
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let model_info = state.model.info();
    Json(HealthResponse {
        status: if model_info.is_some() {
            "healthy"
        } else {
            "unhealthy"
        },
        model_loaded: model_info.is_some(),
        model_info,
    })
}

pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let Json(body) = payload?;
    let record = FeatureRecord::from_value(&body)?;

    // One snapshot for both the prediction and the reported metadata.
    let (result, bundle) = state.model.classify(&record)?;
    Ok(Json(PredictionResponse::new(&result, bundle.info())))
}

pub async fn predict_batch(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BatchPredictionResponse>, ApiError> {
    let Json(body) = payload?;
    let records = parse_batch(&body)?;
    debug!(candidates = records.len(), "batch request");

    let batch = state.model.classify_batch(&records)?;
    Ok(Json(BatchPredictionResponse::new(&batch)))
}

pub async fn model_info(
    State(state): State<AppState>,
) -> Result<Json<ModelInfoResponse>, ApiError> {
    let info = state.model.info().ok_or(ApiError::ModelUnavailable)?;
    let feature_descriptions = Feature::ALL
        .iter()
        .map(|f| (f.name(), f.description()))
        .collect();
    Ok(Json(ModelInfoResponse {
        features_required: info.features.clone(),
        model_info: info,
        feature_descriptions,
    }))
}

pub async fn reload_model(
    State(state): State<AppState>,
) -> Result<Json<ReloadResponse>, ApiError> {
    let handle = state.model.clone();
    let paths = state.model_paths.clone();
    info!(candidates = paths.len(), "model reload requested");

    let model_info = tokio::task::spawn_blocking(move || handle.load_from(&paths))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(ReloadResponse {
        message: "Model reloaded successfully",
        model_info,
    }))
}
