//! Haar cascade object detection
//!
//! Viola-Jones style boosted cascade over Haar-like rectangle features,
//! evaluated on an integral image with a multi-scale sliding window.
//! Cascade models are opaque serde artifacts loaded once at startup.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A weighted rectangle inside the detection window, in window coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightedRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub weight: f32,
}

/// A single Haar feature: a weighted sum of rectangle sums compared against
/// a threshold, contributing either `left_val` or `right_val` to its stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HaarFeature {
    pub rects: Vec<WeightedRect>,
    pub threshold: f32,
    pub left_val: f32,
    pub right_val: f32,
}

/// One boosting stage. A window is rejected as soon as any stage sum falls
/// below the stage threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CascadeStage {
    pub threshold: f32,
    pub features: Vec<HaarFeature>,
}

/// A trained cascade model for one object shape (face, eye).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CascadeModel {
    pub window_width: u32,
    pub window_height: u32,
    pub stages: Vec<CascadeStage>,
}

impl CascadeModel {
    /// Load a cascade from a binary artifact file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let model: Self = bincode::deserialize(&bytes)?;
        Ok(model)
    }

    /// Save the cascade to a binary artifact file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        let bytes = bincode::serialize(self)?;
        writer.write_all(&bytes)?;
        Ok(())
    }

    /// Run the cascade over a grayscale image.
    ///
    /// The window is scanned at increasing scales (multiplied by
    /// `scale_factor` per pass) and raw hits are grouped; only clusters with
    /// at least `min_neighbors` members survive. Returns detections in scan
    /// order; an image smaller than the base window yields an empty vec.
    pub fn detect(&self, image: &GrayImage, scale_factor: f32, min_neighbors: u32) -> Vec<Rect> {
        let (img_w, img_h) = image.dimensions();
        if img_w < self.window_width || img_h < self.window_height {
            return Vec::new();
        }

        let integral = IntegralImage::new(image);
        let mut raw = Vec::new();

        let mut scale = 1.0f32;
        loop {
            let win_w = (self.window_width as f32 * scale) as u32;
            let win_h = (self.window_height as f32 * scale) as u32;
            if win_w > img_w || win_h > img_h {
                break;
            }

            let step = ((scale * 2.0) as u32).max(1);
            let mut y = 0;
            while y + win_h <= img_h {
                let mut x = 0;
                while x + win_w <= img_w {
                    if self.evaluate_window(&integral, x, y, scale) {
                        raw.push(Rect::new(x, y, win_w, win_h));
                    }
                    x += step;
                }
                y += step;
            }

            scale *= scale_factor;
        }

        group_detections(raw, min_neighbors)
    }

    fn evaluate_window(&self, integral: &IntegralImage, x: u32, y: u32, scale: f32) -> bool {
        for stage in &self.stages {
            let mut stage_sum = 0.0f32;
            for feature in &stage.features {
                let feature_sum = feature.evaluate(integral, x, y, scale);
                stage_sum += if feature_sum < feature.threshold * scale * scale {
                    feature.left_val
                } else {
                    feature.right_val
                };
            }
            if stage_sum < stage.threshold {
                return false;
            }
        }
        true
    }
}

impl HaarFeature {
    fn evaluate(&self, integral: &IntegralImage, ox: u32, oy: u32, scale: f32) -> f32 {
        let mut sum = 0.0f32;
        for r in &self.rects {
            let rx = ox + (r.x as f32 * scale) as u32;
            let ry = oy + (r.y as f32 * scale) as u32;
            let rw = (r.width as f32 * scale) as u32;
            let rh = (r.height as f32 * scale) as u32;
            sum += integral.rect_sum(rx, ry, rw, rh) as f32 * r.weight;
        }
        sum
    }
}

/// Summed-area table with a one-pixel zero border.
pub struct IntegralImage {
    data: Vec<u64>,
    width: usize,
}

impl IntegralImage {
    pub fn new(src: &GrayImage) -> Self {
        let (w, h) = src.dimensions();
        let width = w as usize + 1;
        let mut data = vec![0u64; width * (h as usize + 1)];
        let raw = src.as_raw();

        for y in 0..h as usize {
            let mut row_sum = 0u64;
            for x in 0..w as usize {
                row_sum += raw[y * w as usize + x] as u64;
                let idx = (y + 1) * width + (x + 1);
                data[idx] = data[idx - width] + row_sum;
            }
        }

        Self { data, width }
    }

    /// Sum of pixel values inside the rectangle.
    pub fn rect_sum(&self, x: u32, y: u32, w: u32, h: u32) -> u64 {
        let x0 = x as usize;
        let y0 = y as usize;
        let x1 = x0 + w as usize;
        let y1 = y0 + h as usize;

        self.data[y1 * self.width + x1] + self.data[y0 * self.width + x0]
            - self.data[y1 * self.width + x0]
            - self.data[y0 * self.width + x1]
    }
}

/// Group overlapping raw detections and drop clusters with fewer than
/// `min_neighbors` members. Each surviving cluster is averaged into one rect.
fn group_detections(raw: Vec<Rect>, min_neighbors: u32) -> Vec<Rect> {
    if raw.is_empty() {
        return raw;
    }

    let mut clusters: Vec<Vec<usize>> = Vec::new();

    for i in 0..raw.len() {
        let assigned = clusters
            .iter()
            .position(|members| members.iter().any(|&j| rects_similar(&raw[i], &raw[j])));
        match assigned {
            Some(c) => clusters[c].push(i),
            None => clusters.push(vec![i]),
        }
    }

    let mut grouped = Vec::new();
    for members in clusters {
        if (members.len() as u32) < min_neighbors.max(1) {
            continue;
        }
        let n = members.len() as u32;
        let sum = members.iter().fold((0u64, 0u64, 0u64, 0u64), |acc, &j| {
            let r = &raw[j];
            (
                acc.0 + r.x as u64,
                acc.1 + r.y as u64,
                acc.2 + r.width as u64,
                acc.3 + r.height as u64,
            )
        });
        grouped.push(Rect::new(
            (sum.0 / n as u64) as u32,
            (sum.1 / n as u64) as u32,
            (sum.2 / n as u64) as u32,
            (sum.3 / n as u64) as u32,
        ));
    }

    grouped
}

/// Two rects belong to the same cluster when their corners agree within a
/// fraction of their average width/height.
fn rects_similar(a: &Rect, b: &Rect) -> bool {
    const EPS: f32 = 0.2;
    let dx = EPS * 0.5 * (a.width + b.width) as f32;
    let dy = EPS * 0.5 * (a.height + b.height) as f32;

    (a.x as f32 - b.x as f32).abs() <= dx
        && (a.y as f32 - b.y as f32).abs() <= dy
        && ((a.x + a.width) as f32 - (b.x + b.width) as f32).abs() <= dx
        && ((a.y + a.height) as f32 - (b.y + b.height) as f32).abs() <= dy
}
