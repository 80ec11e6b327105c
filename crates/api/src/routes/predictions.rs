//! Prediction History Route

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ApiError;
use crate::AppState;
use storage::PredictionRow;

/// Query parameters for the predictions listing
#[derive(Debug, Deserialize)]
pub struct PredictionQuery {
    /// Maximum number of records
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

/// Response for the predictions listing
#[derive(Debug, Serialize)]
pub struct PredictionListResponse {
    pub data: Vec<PredictionRow>,
    pub count: usize,
}

/// Recent stored predictions, newest first
pub async fn get_predictions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PredictionQuery>,
) -> Result<Json<PredictionListResponse>, ApiError> {
    let limit = params.limit.min(500);
    let data = state.repository.recent_predictions(limit as i64).await?;

    Ok(Json(PredictionListResponse {
        count: data.len(),
        data,
    }))
}
