//! Face detection with an eye-count quality gate
//!
//! Runs a frontal-face cascade over the grayscale image, then an eye cascade
//! inside each face region. A face crop is kept only when at least two eyes
//! are found inside it; this filters false positives and non-frontal faces.

use image::{imageops, GrayImage, RgbImage};

use crate::config::DetectorConfig;

use super::cascade::{CascadeModel, Rect};

/// A face region that passed the eye gate, with its color crop.
#[derive(Debug, Clone)]
pub struct DetectedFace {
    pub rect: Rect,
    pub crop: RgbImage,
}

pub struct FaceDetector {
    face_cascade: CascadeModel,
    eye_cascade: CascadeModel,
    config: DetectorConfig,
}

impl FaceDetector {
    pub fn new(face_cascade: CascadeModel, eye_cascade: CascadeModel, config: DetectorConfig) -> Self {
        Self {
            face_cascade,
            eye_cascade,
            config,
        }
    }

    /// Detect qualifying faces in an RGB image.
    ///
    /// Returns crops in the face cascade's native scan order. Zero faces (or
    /// zero faces passing the eye gate) is an empty vec, not an error.
    pub fn detect(&self, image: &RgbImage) -> Vec<DetectedFace> {
        let gray = imageops::grayscale(image);

        let faces = self.face_cascade.detect(
            &gray,
            self.config.scale_factor,
            self.config.min_neighbors,
        );

        let mut detected = Vec::new();
        for rect in faces {
            let eyes = self.eyes_in_region(&gray, &rect);
            if eyes.len() < self.config.min_eyes {
                continue;
            }
            let crop = imageops::crop_imm(image, rect.x, rect.y, rect.width, rect.height).to_image();
            detected.push(DetectedFace { rect, crop });
        }

        detected
    }

    /// Run the eye cascade over the grayscale sub-region of a face box.
    fn eyes_in_region(&self, gray: &GrayImage, face: &Rect) -> Vec<Rect> {
        let roi = imageops::crop_imm(gray, face.x, face.y, face.width, face.height).to_image();
        self.eye_cascade.detect(
            &roi,
            self.config.eye_scale_factor,
            self.config.eye_min_neighbors,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::cascade::{CascadeStage, HaarFeature, WeightedRect};
    use image::Rgb;

    /// Cascade firing on windows whose mean intensity falls in (lo, hi).
    fn band_cascade(window: u32, lo: f32, hi: f32) -> CascadeModel {
        let area = (window * window) as f32;
        CascadeModel {
            window_width: window,
            window_height: window,
            stages: vec![CascadeStage {
                threshold: 0.5,
                features: vec![
                    HaarFeature {
                        rects: vec![WeightedRect {
                            x: 0,
                            y: 0,
                            width: window,
                            height: window,
                            weight: 1.0,
                        }],
                        threshold: hi * area,
                        left_val: 1.0,
                        right_val: 0.0,
                    },
                    HaarFeature {
                        rects: vec![WeightedRect {
                            x: 0,
                            y: 0,
                            width: window,
                            height: window,
                            weight: 1.0,
                        }],
                        threshold: lo * area,
                        left_val: -1.0,
                        right_val: 0.0,
                    },
                ],
            }],
        }
    }

    fn dark_cascade(window: u32, max_mean: f32) -> CascadeModel {
        band_cascade(window, -1.0, max_mean)
    }

    fn test_config() -> DetectorConfig {
        DetectorConfig {
            scale_factor: 1.3,
            min_neighbors: 1,
            min_eyes: 2,
            eye_scale_factor: 1.1,
            eye_min_neighbors: 1,
        }
    }

    /// White canvas with a gray "face" square; optionally with two dark "eyes".
    fn face_image(with_eyes: bool) -> RgbImage {
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

    fn detector() -> FaceDetector {
        FaceDetector::new(band_cascade(24, 50.0, 115.0), dark_cascade(6, 30.0), test_config())
    }

    #[test]
    fn face_with_two_eyes_is_detected() {
        let faces = detector().detect(&face_image(true));
        assert_eq!(faces.len(), 1);
        let face = &faces[0];
        assert_eq!((face.rect.width, face.rect.height), (24, 24));
        assert_eq!(face.crop.dimensions(), (24, 24));
    }

    #[test]
    fn face_without_eyes_is_gated_out() {
        // The face cascade still fires, the eye gate drops the region.
        let faces = detector().detect(&face_image(false));
        assert!(faces.is_empty());
    }

    #[test]
    fn blank_image_yields_empty_sequence() {
        let img = RgbImage::from_pixel(100, 100, Rgb([255, 255, 255]));
        assert!(detector().detect(&img).is_empty());
    }
}
