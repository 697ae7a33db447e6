//! Axum REST handlers for the price prediction service

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::dto::ErrorResponse;

use super::model::PriceEstimator;

pub struct PriceAppState {
    pub estimator: Arc<PriceEstimator>,
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub location: String,
    pub total_sqft: f64,
    pub bhk: u32,
    pub bath: u32,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub estimated_price: f64,
}

#[derive(Debug, Serialize)]
pub struct LocationsResponse {
    pub locations: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PriceHealthResponse {
    pub healthy: bool,
    pub version: String,
}

/// Create the price prediction router
pub fn create_price_router(state: Arc<PriceAppState>) -> Router {
    Router::new()
        .route("/api/v1/locations", get(locations_handler))
        .route("/api/v1/predict", post(predict_handler))
        .route("/health", get(health_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Available location names for the frontend dropdown
async fn locations_handler(State(state): State<Arc<PriceAppState>>) -> Json<LocationsResponse> {
    Json(LocationsResponse {
        locations: state.estimator.locations().to_vec(),
    })
}

/// Predict a home price
async fn predict_handler(
    State(state): State<Arc<PriceAppState>>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, (StatusCode, Json<ErrorResponse>)> {
    if request.total_sqft <= 0.0 {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                "total_sqft must be positive",
                "INVALID_SQFT",
            )),
        ));
    }

    let estimated_price = state.estimator.estimate(
        &request.location,
        request.total_sqft,
        request.bath as f64,
        request.bhk as f64,
    );

    Ok(Json(PredictResponse { estimated_price }))
}

/// Health check
async fn health_handler() -> Json<PriceHealthResponse> {
    Json(PriceHealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
