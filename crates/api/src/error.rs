//! API Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use feature_normalizer::ValidationError;
use grade_model::ModelError;
use serde_json::json;
use storage::StorageError;
use thiserror::Error;
use tracing::error;

/// Errors surfaced to API clients
#[derive(Debug, Error)]
pub enum ApiError {
    /// Input failed normalization or the range contract
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Prediction could not be made for the given subject/gender
    #[error(transparent)]
    Model(#[from] ModelError),

    /// A grade field was present but not numeric
    #[error("{0} must be a valid number")]
    InvalidGrade(&'static str),

    /// A feedback submission is missing one of its grade fields
    #[error("missing or invalid {0} value")]
    MissingGrade(&'static str),

    /// Persistence failure
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::Model(_)
            | ApiError::InvalidGrade(_)
            | ApiError::MissingGrade(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
