//! REST API request/response data transfer objects

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::engine::ingest::ImageSource;
use crate::service::FaceClassification;

/// Classify request: exactly one image source.
#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub image: ImageSource,
}

/// Classify response
#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub results: Vec<FaceClassificationDto>,
    pub inference_time_ms: u64,
}

/// One record per detected face.
#[derive(Debug, Serialize)]
pub struct FaceClassificationDto {
    pub class: String,
    pub class_probability: Vec<f64>,
    pub class_dictionary: BTreeMap<String, usize>,
}

impl From<FaceClassification> for FaceClassificationDto {
    fn from(f: FaceClassification) -> Self {
        Self {
            class: f.class,
            class_probability: f.class_probability,
            class_dictionary: f.class_dictionary,
        }
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub version: String,
    pub artifacts_loaded: bool,
}

/// Metrics response
#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub artifacts_loaded: bool,
    pub uptime_seconds: u64,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(error: &str, code: &str) -> Self {
        Self {
            error: error.to_string(),
            code: code.to_string(),
        }
    }
}
