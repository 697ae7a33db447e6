//! Classification pipeline stages
//!
//! Ingestion, cascade detection, wavelet feature extraction, feature fusion
//! and the classifier trait. Each stage is a pure synchronous computation.

pub mod cascade;
pub mod classifier;
pub mod detector;
pub mod features;
pub mod ingest;
pub mod wavelet;

pub use cascade::CascadeModel;
pub use classifier::{Classifier, LinearClassifier};
pub use detector::{DetectedFace, FaceDetector};
pub use ingest::ImageSource;
pub use wavelet::Wavelet;
