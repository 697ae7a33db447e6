//! Trained classifier
//!
//! The classifier artifact is opaque to the rest of the pipeline: anything
//! implementing [`Classifier`] can sit behind the artifact store. The shipped
//! implementation is a multinomial linear model (softmax over affine logits),
//! persisted with bincode.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::utils::math::{argmax, softmax};

/// Predict/predict-probability capability over a fixed-length feature vector.
pub trait Classifier: Send + Sync {
    fn n_classes(&self) -> usize;
    fn n_features(&self) -> usize;

    /// Predicted integer class label.
    fn predict(&self, features: &ArrayView1<f64>) -> usize;

    /// Probability per class, summing to 1.
    fn predict_proba(&self, features: &ArrayView1<f64>) -> Vec<f64>;
}

/// Multinomial linear classifier: logits = W x + b.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearClassifier {
    /// One weight row per class, `n_classes x n_features`.
    weights: Array2<f64>,
    bias: Array1<f64>,
}

impl LinearClassifier {
    pub fn new(weights: Array2<f64>, bias: Array1<f64>) -> Result<Self> {
        if weights.nrows() != bias.len() {
            return Err(Error::InvalidModel(format!(
                "weight rows ({}) do not match bias length ({})",
                weights.nrows(),
                bias.len()
            )));
        }
        if weights.nrows() == 0 {
            return Err(Error::InvalidModel("classifier has zero classes".into()));
        }
        Ok(Self { weights, bias })
    }

    /// Load a classifier from a binary artifact file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let model: Self = bincode::deserialize(&bytes)?;
        if model.weights.nrows() != model.bias.len() {
            return Err(Error::InvalidModel(
                "weight rows do not match bias length".into(),
            ));
        }
        Ok(model)
    }

    /// Save the classifier to a binary artifact file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        let bytes = bincode::serialize(self)?;
        writer.write_all(&bytes)?;
        Ok(())
    }

    fn logits(&self, features: &ArrayView1<f64>) -> Array1<f64> {
        self.weights.dot(features) + &self.bias
    }
}

impl Classifier for LinearClassifier {
    fn n_classes(&self) -> usize {
        self.weights.nrows()
    }

    fn n_features(&self) -> usize {
        self.weights.ncols()
    }

    fn predict(&self, features: &ArrayView1<f64>) -> usize {
        let logits = self.logits(features);
        argmax(logits.as_slice().unwrap_or(&[]))
    }

    fn predict_proba(&self, features: &ArrayView1<f64>) -> Vec<f64> {
        let logits = self.logits(features);
        softmax(logits.as_slice().unwrap_or(&[]))
    }
}
