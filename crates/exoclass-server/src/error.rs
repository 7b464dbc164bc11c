//! Endpoint error type and its mapping onto HTTP responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use exoclass_ai::{ClassifyError, ModelLoadError, PredictionError};
use exoclass_core::{ValidationError, Violation};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("model not loaded")]
    ModelUnavailable,

    #[error("model reload failed: {0}")]
    ModelLoad(#[from] ModelLoadError),

    #[error("prediction failed: {0}")]
    Prediction(#[from] PredictionError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ClassifyError> for ApiError {
    fn from(e: ClassifyError) -> Self {
        match e {
            ClassifyError::ModelUnavailable => Self::ModelUnavailable,
            ClassifyError::Prediction(p) => Self::Prediction(p),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(ValidationError::single("body", rejection.body_text()))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::ModelLoad(_) | Self::Prediction(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::ModelUnavailable => "model_unavailable",
            Self::ModelLoad(_) => "model_load_error",
            Self::Prediction(_) => "prediction_error",
            Self::Internal(_) => "internal_error",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: ErrorDetail<'a>,
}

#[derive(Serialize)]
struct ErrorDetail<'a> {
    #[serde(rename = "type")]
    error_type: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    violations: Option<&'a [Violation]>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            warn!(error = %self, status = status.as_u16(), "request rejected");
        }

        let violations = match &self {
            Self::Validation(v) => Some(v.violations.as_slice()),
            _ => None,
        };
        let body = ErrorBody {
            error: ErrorDetail {
                error_type: self.kind(),
                message: self.to_string(),
                violations,
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let missing = ValidationError::single("orbital_period", "field required");
        let validation = ApiError::from(missing);
        assert_eq!(validation.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            ApiError::from(ClassifyError::ModelUnavailable).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(ModelLoadError::MissingPredictor).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let row_count = PredictionError::RowCount {
            expected: 1,
            actual: 0,
        };
        assert_eq!(
            ApiError::from(row_count).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Internal("join".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn classify_error_keeps_its_kind() {
        let err = ApiError::from(ClassifyError::Prediction(PredictionError::Shape {
            expected: 6,
            actual: 3,
        }));
        match err {
            ApiError::Prediction(PredictionError::Shape { expected, actual }) => {
                assert_eq!((expected, actual), (6, 3));
            }
            other => panic!("expected a shape error, got {other:?}"),
        }
    }
}
