//! Shared builders for integration tests: synthetic cascade models, a
//! constant-output classifier and images with face/eye shaped regions.

use std::collections::BTreeMap;
use std::sync::Arc;

use base64::Engine;
use image::{Rgb, RgbImage};
use ndarray::{Array1, Array2};

use celebface::artifacts::{ArtifactStore, ClassMap, LoadedArtifacts};
use celebface::config::{ArtifactsConfig, DetectorConfig, WaveletConfig};
use celebface::engine::cascade::{CascadeModel, CascadeStage, HaarFeature, WeightedRect};
use celebface::engine::features::FEATURE_LEN;
use celebface::engine::ingest::ImageSource;
use celebface::engine::{FaceDetector, LinearClassifier};
use celebface::service::ClassifyService;

fn whole_window_feature(window: u32, threshold_mean: f32, left: f32, right: f32) -> HaarFeature {
    HaarFeature {
        rects: vec![WeightedRect {
            x: 0,
            y: 0,
            width: window,
            height: window,
            weight: 1.0,
        }],
        threshold: threshold_mean * (window * window) as f32,
        left_val: left,
        right_val: right,
    }
}

/// Cascade firing on windows whose mean intensity falls in (lo, hi).
pub fn band_cascade(window: u32, lo: f32, hi: f32) -> CascadeModel {
    CascadeModel {
        window_width: window,
        window_height: window,
        stages: vec![CascadeStage {
            threshold: 0.5,
            features: vec![
                whole_window_feature(window, hi, 1.0, 0.0),
                whole_window_feature(window, lo, -1.0, 0.0),
            ],
        }],
    }
}

/// Face cascade matched to [`face_image`].
pub fn face_cascade() -> CascadeModel {
    band_cascade(24, 50.0, 115.0)
}

/// Eye cascade matched to [`face_image`]: fires on dark windows.
pub fn eye_cascade() -> CascadeModel {
    band_cascade(6, -1.0, 30.0)
}

pub fn detector_config() -> DetectorConfig {
    DetectorConfig {
        scale_factor: 1.3,
        min_neighbors: 1,
        min_eyes: 2,
        eye_scale_factor: 1.1,
        eye_min_neighbors: 1,
    }
}

pub fn wavelet_config() -> WaveletConfig {
    WaveletConfig {
        family: "db1".to_string(),
        level: 5,
    }
}

/// Classifier that ignores its input and always predicts class 1 with
/// probabilities [0.1, 0.9].
pub fn stub_classifier() -> LinearClassifier {
    LinearClassifier::new(
        Array2::zeros((2, FEATURE_LEN)),
        Array1::from(vec![(0.1f64).ln(), (0.9f64).ln()]),
    )
    .unwrap()
}

pub fn stub_class_map() -> ClassMap {
    ClassMap::from_map(BTreeMap::from([
        ("a".to_string(), 0),
        ("b".to_string(), 1),
    ]))
}

/// Artifacts config rooted at a fresh temp directory.
pub fn temp_artifacts_config(tag: &str) -> ArtifactsConfig {
    let dir = std::env::temp_dir().join(format!(
        "celebface-it-{}-{}",
        tag,
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    ArtifactsConfig {
        dir,
        face_cascade: "face_cascade.bin".to_string(),
        eye_cascade: "eye_cascade.bin".to_string(),
        classifier: "classifier.bin".to_string(),
        class_dictionary: "class_dictionary.json".to_string(),
        price_model: "price_model.bin".to_string(),
        price_columns: "columns.json".to_string(),
    }
}

/// White canvas with a gray face square; `with_eyes` adds two dark squares.
pub fn face_image(with_eyes: bool) -> RgbImage {
    let mut img = RgbImage::from_pixel(100, 100, Rgb([255, 255, 255]));
    for y in 38..62 {
        for x in 38..62 {
            img.put_pixel(x, y, Rgb([100, 100, 100]));
        }
    }
    if with_eyes {
        for (ex, ey) in [(41u32, 42u32), (53, 42)] {
            for y in ey..ey + 8 {
                for x in ex..ex + 8 {
                    img.put_pixel(x, y, Rgb([10, 10, 10]));
                }
            }
        }
    }
    img
}

/// Encode an image as a base64 PNG data URI source.
pub fn base64_source(img: &RgbImage) -> ImageSource {
    let mut buffer = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img.clone())
        .write_to(&mut buffer, image::ImageFormat::Png)
        .unwrap();
    let encoded = base64::engine::general_purpose::STANDARD.encode(buffer.into_inner());
    ImageSource::Base64(format!("data:image/png;base64,{}", encoded))
}

/// Full service wired with the synthetic cascades and a pre-installed store.
pub fn stub_service(store: Arc<ArtifactStore>) -> ClassifyService {
    let detector = Arc::new(FaceDetector::new(
        face_cascade(),
        eye_cascade(),
        detector_config(),
    ));
    ClassifyService::new(detector, store, &wavelet_config()).unwrap()
}

/// Store with the stub artifacts installed directly.
pub fn installed_store() -> Arc<ArtifactStore> {
    let store = ArtifactStore::new(&temp_artifacts_config("installed"));
    store.install(LoadedArtifacts {
        classifier: Arc::new(stub_classifier()),
        classes: Arc::new(stub_class_map()),
    });
    Arc::new(store)
}
