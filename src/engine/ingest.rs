//! Image ingestion
//!
//! Decodes a request image from either a base64 payload (optionally carrying
//! a `data:image/...;base64,` header) or a filesystem path into an in-memory
//! RGB pixel buffer.

use base64::Engine;
use image::{DynamicImage, RgbImage};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Where a request image comes from. Exactly one variant is supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ImageSource {
    Base64(String),
    Path(String),
}

/// Materialize an [`ImageSource`] into pixels.
pub fn load_image(source: &ImageSource) -> Result<RgbImage> {
    match source {
        ImageSource::Base64(data) => decode_base64_image(data),
        ImageSource::Path(path) => {
            let bytes = std::fs::read(path)?;
            decode_image(&bytes)
        }
    }
}

/// Decode a base64 image string, stripping any data-URI header first.
pub fn decode_base64_image(b64: &str) -> Result<RgbImage> {
    // Browsers send "data:image/jpeg;base64,<payload>"; keep only the payload.
    let payload = match b64.split_once(',') {
        Some((_, rest)) => rest,
        None => b64,
    };
    let bytes = base64::engine::general_purpose::STANDARD.decode(payload.trim())?;
    decode_image(&bytes)
}

/// Decode image bytes with EXIF orientation handling.
/// This ensures images are correctly oriented regardless of how they were captured.
pub fn decode_image(data: &[u8]) -> Result<RgbImage> {
    let image = image::load_from_memory(data)?;
    let oriented = apply_exif_orientation(data, image);
    Ok(oriented.to_rgb8())
}

/// Apply EXIF orientation to correct image rotation.
/// Mobile phones often store images with EXIF orientation tags instead of rotating pixels.
fn apply_exif_orientation(data: &[u8], image: DynamicImage) -> DynamicImage {
    use std::io::Cursor;

    let orientation = match exif::Reader::new().read_from_container(&mut Cursor::new(data)) {
        Ok(exif_data) => exif_data
            .get_field(exif::Tag::Orientation, exif::In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .unwrap_or(1) as u8,
        Err(_) => 1,
    };

    // See: https://exiftool.org/TagNames/EXIF.html (Orientation)
    match orientation {
        1 => image,
        2 => image.fliph(),
        3 => image.rotate180(),
        4 => image.flipv(),
        5 => image.rotate90().fliph(),
        6 => image.rotate90(),
        7 => image.rotate270().fliph(),
        8 => image.rotate270(),
        _ => image,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([120, 40, 200]));
        let mut buffer = std::io::Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buffer, image::ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn decodes_plain_base64() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(png_bytes(4, 3));
        let img = decode_base64_image(&encoded).unwrap();
        assert_eq!(img.dimensions(), (4, 3));
    }

    #[test]
    fn strips_data_uri_header() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(png_bytes(2, 2));
        let with_header = format!("data:image/png;base64,{}", encoded);
        let img = decode_base64_image(&with_header).unwrap();
        assert_eq!(img.dimensions(), (2, 2));
    }

    #[test]
    fn malformed_base64_is_a_decode_error() {
        let err = decode_base64_image("!!not-base64!!").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn garbage_bytes_are_a_decode_error() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"not an image");
        let err = decode_base64_image(&encoded).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn source_deserializes_from_tagged_json() {
        let source: ImageSource =
            serde_json::from_str(r#"{"kind": "base64", "value": "abcd"}"#).unwrap();
        assert!(matches!(source, ImageSource::Base64(ref v) if v == "abcd"));
    }
}
