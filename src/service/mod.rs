//! Service layer

pub mod classify_service;
pub mod types;

pub use classify_service::ClassifyService;
pub use types::{ClassificationResult, FaceClassification};
