//! Classification service - core business logic
//!
//! Orchestrates ingestion, detection, feature extraction and prediction for
//! one request. Requests are independent and stateless apart from the shared
//! read-only artifact set.

use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::artifacts::{ArtifactStore, LoadedArtifacts};
use crate::config::WaveletConfig;
use crate::engine::detector::{DetectedFace, FaceDetector};
use crate::engine::features::fuse;
use crate::engine::ingest::{load_image, ImageSource};
use crate::engine::wavelet::Wavelet;
use crate::error::Result;
use crate::utils::math::round2;

use super::types::{ClassificationResult, FaceClassification};

pub struct ClassifyService {
    detector: Arc<FaceDetector>,
    store: Arc<ArtifactStore>,
    wavelet: Wavelet,
    level: usize,
}

impl ClassifyService {
    pub fn new(
        detector: Arc<FaceDetector>,
        store: Arc<ArtifactStore>,
        wavelet_config: &WaveletConfig,
    ) -> Result<Self> {
        let wavelet = Wavelet::from_name(&wavelet_config.family)?;
        Ok(Self {
            detector,
            store,
            wavelet,
            level: wavelet_config.level,
        })
    }

    /// Classify every qualifying face in the image.
    ///
    /// Returns one record per face in detector order; zero qualifying faces
    /// yields an empty list, not an error.
    pub async fn classify(&self, source: ImageSource) -> Result<ClassificationResult> {
        let start = Instant::now();

        // Precondition: artifacts must be loaded before any pixel work.
        let artifacts = self.store.get()?;

        let detector = self.detector.clone();
        let wavelet = self.wavelet;
        let level = self.level;
        let faces = tokio::task::spawn_blocking(move || -> Result<Vec<FaceClassification>> {
            let image = load_image(&source)?;
            let detected = detector.detect(&image);
            detected
                .iter()
                .map(|face| classify_face(face, &artifacts, wavelet, level))
                .collect()
        })
        .await??;

        let inference_time_ms = start.elapsed().as_millis() as u64;
        info!(
            "Classified {} face(s) in {}ms",
            faces.len(),
            inference_time_ms
        );

        Ok(ClassificationResult {
            faces,
            inference_time_ms,
        })
    }

    pub fn store(&self) -> &Arc<ArtifactStore> {
        &self.store
    }
}

fn classify_face(
    face: &DetectedFace,
    artifacts: &LoadedArtifacts,
    wavelet: Wavelet,
    level: usize,
) -> Result<FaceClassification> {
    let features = fuse(&face.crop, wavelet, level);
    let view = features.view();

    let label = artifacts.classifier.predict(&view);
    let class = artifacts.classes.name_of(label)?.to_string();
    let class_probability = artifacts
        .classifier
        .predict_proba(&view)
        .into_iter()
        .map(|p| round2(p * 100.0))
        .collect();

    Ok(FaceClassification {
        class,
        class_probability,
        class_dictionary: artifacts.classes.as_dictionary().clone(),
    })
}
