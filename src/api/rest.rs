//! Axum REST API handlers

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::error::Error;
use crate::service::ClassifyService;

use super::dto::*;

/// Application state shared across handlers
pub struct AppState {
    pub service: Arc<ClassifyService>,
    pub start_time: Instant,
}

/// Create the REST API router
pub fn create_rest_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/classify", post(classify_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        // 20MB is plenty for a single base64 image
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Classify every qualifying face in the request image
async fn classify_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ClassifyRequest>,
) -> Result<Json<ClassifyResponse>, (StatusCode, Json<ErrorResponse>)> {
    let result = state
        .service
        .classify(request.image)
        .await
        .map_err(|e| {
            error!("Classification failed: {}", e);
            let (status, code) = match &e {
                Error::Decode(_) => (StatusCode::BAD_REQUEST, "INVALID_IMAGE"),
                Error::Io(_) => (StatusCode::BAD_REQUEST, "UNREADABLE_IMAGE"),
                Error::ArtifactsNotLoaded => (StatusCode::SERVICE_UNAVAILABLE, "NOT_READY"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "CLASSIFICATION_FAILED"),
            };
            (status, Json(ErrorResponse::new(&e.to_string(), code)))
        })?;

    Ok(Json(ClassifyResponse {
        results: result.faces.into_iter().map(Into::into).collect(),
        inference_time_ms: result.inference_time_ms,
    }))
}

/// Health check
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        artifacts_loaded: state.service.store().is_loaded(),
    })
}

/// Metrics
async fn metrics_handler(State(state): State<Arc<AppState>>) -> Json<MetricsResponse> {
    Json(MetricsResponse {
        artifacts_loaded: state.service.store().is_loaded(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}
