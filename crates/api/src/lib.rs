//! Grade Prediction API Server
//!
//! REST API for the grade prediction service: raw form submissions in,
//! normalized features through the models, predictions and feedback rows
//! into storage.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_governor::GovernorLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
pub mod error;
pub mod rate_limit;
mod routes;

use config::ServerConfig;
use grade_model::ModelRegistry;
use storage::Repository;

/// Application state shared across handlers
pub struct AppState {
    /// Storage repository
    pub repository: Repository,
    /// Grade model registry
    pub registry: ModelRegistry,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
    /// Prometheus render handle
    pub metrics: PrometheusHandle,
}

impl AppState {
    /// Create new application state
    pub fn new(repository: Repository, registry: ModelRegistry, metrics: PrometheusHandle) -> Self {
        Self {
            repository,
            registry,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
            metrics,
        }
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub components: ComponentStatus,
    pub metrics: SystemMetrics,
}

/// Component status
#[derive(Debug, Serialize)]
pub struct ComponentStatus {
    pub model: ComponentHealth,
    pub database: ComponentHealth,
}

/// Individual component health
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// System metrics
#[derive(Debug, Serialize)]
pub struct SystemMetrics {
    pub prediction_count: i64,
    pub feedback_count: i64,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/predict", post(routes::predict::post_predict))
        .route("/api/v1/feedback", post(routes::feedback::post_feedback))
        .route(
            "/api/v1/predictions",
            get(routes::predictions::get_predictions),
        )
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let prediction_count = state.repository.prediction_count().await.unwrap_or(0);
    let feedback_count = state.repository.feedback_count().await.unwrap_or(0);

    let response = HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        components: ComponentStatus {
            model: ComponentHealth {
                status: if state.registry.is_empty() {
                    "degraded".to_string()
                } else {
                    "ok".to_string()
                },
                detail: Some(format!("{} models loaded", state.registry.len())),
            },
            database: ComponentHealth {
                status: "ok".to_string(),
                detail: None,
            },
        },
        metrics: SystemMetrics {
            prediction_count,
            feedback_count,
        },
    };

    Json(response)
}

/// Prometheus metrics handler
async fn metrics_handler(State(state): State<Arc<AppState>>) -> String {
    state.metrics.render()
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Run the server
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let repository = Repository::connect(&config.database_url).await?;
    let registry = match &config.models_dir {
        Some(dir) => ModelRegistry::from_dir(dir)?,
        None => ModelRegistry::builtin(),
    };
    let metrics = PrometheusBuilder::new().install_recorder()?;

    let state = Arc::new(AppState::new(repository, registry, metrics));
    let governor = rate_limit::create_governor_config(&config.rate_limit);
    let app = create_router(state).layer(GovernorLayer { config: governor });

    info!("Starting API server on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn test_state() -> Arc<AppState> {
        let repository = Repository::in_memory().await.unwrap();
        let registry = ModelRegistry::builtin();
        let metrics = PrometheusBuilder::new().build_recorder().handle();
        Arc::new(AppState::new(repository, registry, metrics))
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn response_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_predict_roundtrip() {
        let state = test_state().await;
        let app = create_router(state.clone());

        let body = json!({
            "subject": "mathematics",
            "gender": "female",
            "age": 16,
            "studytime": "3",
            "higher": "yes",
            "Mjob": "teacher",
            "G1": 12,
            "G2": 13
        });

        let response = app
            .oneshot(json_request("/api/v1/predict", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let value = response_json(response).await;
        let g3 = value["predictions"]["G3"].as_f64().unwrap();
        assert!((0.0..=20.0).contains(&g3));
        assert!(value["grade_level"].is_string());

        // The prediction was persisted
        assert_eq!(state.repository.prediction_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_predict_rejects_out_of_range_field() {
        let app = create_router(test_state().await);

        let response = app
            .oneshot(json_request("/api/v1/predict", json!({ "age": 29 })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let value = response_json(response).await;
        let message = value["error"].as_str().unwrap();
        assert!(message.contains("age"), "unexpected error: {message}");
    }

    #[tokio::test]
    async fn test_predict_rejects_non_numeric_grade() {
        let app = create_router(test_state().await);

        let response = app
            .oneshot(json_request("/api/v1/predict", json!({ "G1": "twelve" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let value = response_json(response).await;
        assert_eq!(value["error"], "G1 must be a valid number");
    }

    #[tokio::test]
    async fn test_feedback_requires_all_grades() {
        let state = test_state().await;
        let app = create_router(state.clone());

        let response = app
            .clone()
            .oneshot(json_request(
                "/api/v1/feedback",
                json!({ "G1": 11.0, "G2": 12.0 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value = response_json(response).await;
        assert_eq!(value["error"], "missing or invalid G3 value");

        let response = app
            .oneshot(json_request(
                "/api/v1/feedback",
                json!({ "G1": 11.0, "G2": 12.0, "G3": 13.0, "higher": "yes" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(state.repository.feedback_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_predictions_listing() {
        let state = test_state().await;
        let app = create_router(state.clone());

        app.clone()
            .oneshot(json_request("/api/v1/predict", json!({ "G1": 10, "G2": 11 })))
            .await
            .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/predictions?limit=10")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let value = response_json(response).await;
        assert_eq!(value["count"], 1);
        assert_eq!(value["data"][0]["gender"], "female");
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_router(test_state().await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let value = response_json(response).await;
        assert_eq!(value["status"], "healthy");
        assert_eq!(value["components"]["model"]["status"], "ok");
        assert_eq!(value["metrics"]["prediction_count"], 0);
    }
}
