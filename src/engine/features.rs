//! Feature fusion
//!
//! Builds the fixed-length vector fed to the classifier: the raw face crop
//! resized to 32x32 and flattened (3072 values), followed by the wavelet
//! high-frequency image resized to 32x32 and flattened (1024 values).
//!
//! The raw-then-wavelet ordering is the contract the classifier artifact was
//! trained against; changing it silently breaks every prediction.

use image::{imageops, RgbImage};
use ndarray::Array1;

use super::wavelet::{w2d, Wavelet};

/// Side length both fused images are resized to.
pub const FACE_SIZE: u32 = 32;

/// Total feature vector length: 32*32*3 raw + 32*32 wavelet.
pub const FEATURE_LEN: usize = (FACE_SIZE * FACE_SIZE * 3 + FACE_SIZE * FACE_SIZE) as usize;

/// Fuse a color face crop into a classifier input vector.
///
/// The wavelet image is computed from the unresized crop, then resized; both
/// resizes use bilinear interpolation. Output length is always [`FEATURE_LEN`]
/// regardless of crop size.
pub fn fuse(crop: &RgbImage, wavelet: Wavelet, level: usize) -> Array1<f64> {
    let raw = imageops::resize(crop, FACE_SIZE, FACE_SIZE, imageops::FilterType::Triangle);
    let har = w2d(crop, wavelet, level);
    let har = imageops::resize(&har, FACE_SIZE, FACE_SIZE, imageops::FilterType::Triangle);

    let mut features = Vec::with_capacity(FEATURE_LEN);
    features.extend(raw.as_raw().iter().map(|&v| v as f64));
    features.extend(har.as_raw().iter().map(|&v| v as f64));

    Array1::from(features)
}
