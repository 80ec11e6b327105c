//! Prediction Route

use axum::extract::State;
use axum::Json;
use feature_normalizer::{normalize, RawInput, RawValue};
use metrics::counter;
use serde::Serialize;
use std::sync::Arc;
use storage::NewPrediction;
use tracing::debug;

use crate::error::ApiError;
use crate::AppState;

/// Predicted grades, keyed the way the models name them
#[derive(Debug, Serialize)]
pub struct PredictedGrades {
    #[serde(rename = "G3")]
    pub g3: f64,
}

/// Response for the predict endpoint
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub predictions: PredictedGrades,
    pub grade_level: &'static str,
}

/// Prior-period grade riding alongside the raw form fields.
///
/// Absent or empty-string means "not provided" and defaults to 0.0; anything
/// else must be numeric.
fn grade_field(raw: &RawInput, key: &'static str) -> Result<f64, ApiError> {
    match raw.get(key) {
        None => Ok(0.0),
        Some(RawValue::Number(n)) if n.is_finite() => Ok(*n),
        Some(RawValue::Text(t)) if t.trim().is_empty() => Ok(0.0),
        Some(RawValue::Text(t)) => t
            .trim()
            .parse::<f64>()
            .map_err(|_| ApiError::InvalidGrade(key)),
        Some(_) => Err(ApiError::InvalidGrade(key)),
    }
}

/// Predict the final-period grade for a raw form submission.
///
/// The body is the flat map of raw form fields plus optional G1/G2. The
/// submission is normalized and validated here; a contract violation is a
/// 400 naming the offending field.
pub async fn post_predict(
    State(state): State<Arc<AppState>>,
    Json(raw): Json<RawInput>,
) -> Result<Json<PredictResponse>, ApiError> {
    debug!(fields = raw.len(), "prediction request");

    let g1 = grade_field(&raw, "G1")?;
    let g2 = grade_field(&raw, "G2")?;

    let record = normalize(&raw)?;
    let prediction = state.registry.predict(&record, g1, g2)?;

    state
        .repository
        .insert_prediction(&NewPrediction {
            subject: record.text("subject").unwrap_or_default().to_string(),
            gender: record.text("gender").unwrap_or_default().to_string(),
            g1,
            g2,
            g3: prediction.g3,
            grade_level: prediction.grade_level.as_str().to_string(),
        })
        .await?;

    counter!("grade_predictions_total").increment(1);

    Ok(Json(PredictResponse {
        predictions: PredictedGrades { g3: prediction.g3 },
        grade_level: prediction.grade_level.as_str(),
    }))
}
