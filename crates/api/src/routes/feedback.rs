//! Feedback Route
//!
//! Accepts observed-outcome rows (features plus actual G1/G2/G3) for later
//! retraining.

use axum::extract::State;
use axum::Json;
use feature_normalizer::{normalize, RawInput, RawValue};
use metrics::counter;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::error::ApiError;
use crate::AppState;

/// Response for the feedback endpoint
#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub message: &'static str,
}

/// Observed grade in a feedback submission. Unlike the predict endpoint,
/// every grade is required and must arrive as a JSON number.
fn observed_grade(raw: &RawInput, key: &'static str) -> Result<f64, ApiError> {
    match raw.get(key) {
        Some(RawValue::Number(n)) if n.is_finite() => Ok(*n),
        _ => Err(ApiError::MissingGrade(key)),
    }
}

/// Store a feedback training row.
pub async fn post_feedback(
    State(state): State<Arc<AppState>>,
    Json(raw): Json<RawInput>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    debug!(fields = raw.len(), "feedback submission");

    let g1 = observed_grade(&raw, "G1")?;
    let g2 = observed_grade(&raw, "G2")?;
    let g3 = observed_grade(&raw, "G3")?;

    let record = normalize(&raw)?;
    state.repository.insert_feedback(&record, g1, g2, g3).await?;

    counter!("grade_feedback_total").increment(1);

    Ok(Json(FeedbackResponse {
        message: "Data saved successfully",
    }))
}
