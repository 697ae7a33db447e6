//! Service layer types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Classification result for a whole image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub faces: Vec<FaceClassification>,
    pub inference_time_ms: u64,
}

/// One record per detected face, in detector order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceClassification {
    /// Predicted class name.
    pub class: String,
    /// Per-class probabilities as percentages, rounded to 2 decimals.
    pub class_probability: Vec<f64>,
    /// Class name -> label dictionary, for client-side display.
    pub class_dictionary: BTreeMap<String, usize>,
}
