//! 2D discrete wavelet transform
//!
//! Multi-level db1 (Haar) decomposition and reconstruction over `Array2<f32>`
//! planes, used to strip the low-frequency approximation band from a face
//! crop so only edge/texture content remains.

use image::{imageops, GrayImage, RgbImage};
use ndarray::Array2;

use crate::error::{Error, Result};

/// Supported wavelet families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wavelet {
    /// Daubechies-1, identical to the Haar wavelet.
    Db1,
}

impl Wavelet {
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "db1" | "haar" => Ok(Wavelet::Db1),
            other => Err(Error::InvalidModel(format!(
                "unsupported wavelet family: {other}"
            ))),
        }
    }
}

/// Detail sub-bands produced at one decomposition level.
#[derive(Debug, Clone)]
pub struct DetailBands {
    pub horizontal: Array2<f32>,
    pub vertical: Array2<f32>,
    pub diagonal: Array2<f32>,
}

/// A multi-level 2D decomposition: one approximation band plus per-level
/// detail bands ordered coarsest-first.
#[derive(Debug, Clone)]
pub struct Decomposition {
    pub approx: Array2<f32>,
    pub details: Vec<DetailBands>,
}

const FRAC_1_SQRT_2: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// One level of 1D analysis with symmetric edge extension.
/// Output halves have length ceil(n / 2).
fn analyze(signal: &[f32], lo: &mut Vec<f32>, hi: &mut Vec<f32>) {
    let n = signal.len();
    let half = (n + 1) / 2;
    lo.clear();
    hi.clear();
    lo.reserve(half);
    hi.reserve(half);
    for k in 0..half {
        let a = signal[2 * k];
        let b = if 2 * k + 1 < n {
            signal[2 * k + 1]
        } else {
            // symmetric extension duplicates the final sample
            signal[n - 1]
        };
        lo.push((a + b) * FRAC_1_SQRT_2);
        hi.push((a - b) * FRAC_1_SQRT_2);
    }
}

/// Inverse of [`analyze`]; output length is 2 * half.
fn synthesize(lo: &[f32], hi: &[f32], out: &mut Vec<f32>) {
    out.clear();
    out.reserve(lo.len() * 2);
    for (a, d) in lo.iter().zip(hi.iter()) {
        out.push((a + d) * FRAC_1_SQRT_2);
        out.push((a - d) * FRAC_1_SQRT_2);
    }
}

/// One 2D analysis level: rows first, then columns of both halves.
fn analyze_2d(data: &Array2<f32>) -> (Array2<f32>, DetailBands) {
    let (rows, cols) = data.dim();
    let half_cols = (cols + 1) / 2;
    let half_rows = (rows + 1) / 2;

    // Row pass
    let mut row_lo = Array2::zeros((rows, half_cols));
    let mut row_hi = Array2::zeros((rows, half_cols));
    let mut lo = Vec::new();
    let mut hi = Vec::new();
    let mut buf = Vec::with_capacity(cols.max(rows));
    for r in 0..rows {
        buf.clear();
        buf.extend(data.row(r).iter().copied());
        analyze(&buf, &mut lo, &mut hi);
        for c in 0..half_cols {
            row_lo[[r, c]] = lo[c];
            row_hi[[r, c]] = hi[c];
        }
    }

    // Column pass
    let mut ll = Array2::zeros((half_rows, half_cols));
    let mut lh = Array2::zeros((half_rows, half_cols));
    let mut hl = Array2::zeros((half_rows, half_cols));
    let mut hh = Array2::zeros((half_rows, half_cols));
    for c in 0..half_cols {
        buf.clear();
        buf.extend(row_lo.column(c).iter().copied());
        analyze(&buf, &mut lo, &mut hi);
        for r in 0..half_rows {
            ll[[r, c]] = lo[r];
            lh[[r, c]] = hi[r];
        }

        buf.clear();
        buf.extend(row_hi.column(c).iter().copied());
        analyze(&buf, &mut lo, &mut hi);
        for r in 0..half_rows {
            hl[[r, c]] = lo[r];
            hh[[r, c]] = hi[r];
        }
    }

    (
        ll,
        DetailBands {
            horizontal: hl,
            vertical: lh,
            diagonal: hh,
        },
    )
}

/// One 2D synthesis level, the inverse of [`analyze_2d`].
fn synthesize_2d(approx: &Array2<f32>, detail: &DetailBands) -> Array2<f32> {
    let (half_rows, half_cols) = approx.dim();
    let out_rows = half_rows * 2;
    let out_cols = half_cols * 2;

    // Column pass first (inverse order of analysis)
    let mut row_lo = Array2::zeros((out_rows, half_cols));
    let mut row_hi = Array2::zeros((out_rows, half_cols));
    let mut lo = Vec::with_capacity(half_rows.max(half_cols));
    let mut hi = Vec::with_capacity(half_rows.max(half_cols));
    let mut merged = Vec::new();
    for c in 0..half_cols {
        lo.clear();
        hi.clear();
        lo.extend(approx.column(c).iter().copied());
        hi.extend(detail.vertical.column(c).iter().copied());
        synthesize(&lo, &hi, &mut merged);
        for r in 0..out_rows {
            row_lo[[r, c]] = merged[r];
        }

        lo.clear();
        hi.clear();
        lo.extend(detail.horizontal.column(c).iter().copied());
        hi.extend(detail.diagonal.column(c).iter().copied());
        synthesize(&lo, &hi, &mut merged);
        for r in 0..out_rows {
            row_hi[[r, c]] = merged[r];
        }
    }

    // Row pass
    let mut out = Array2::zeros((out_rows, out_cols));
    for r in 0..out_rows {
        lo.clear();
        hi.clear();
        lo.extend(row_lo.row(r).iter().copied());
        hi.extend(row_hi.row(r).iter().copied());
        synthesize(&lo, &hi, &mut merged);
        for c in 0..out_cols {
            out[[r, c]] = merged[c];
        }
    }

    out
}

/// Multi-level 2D wavelet decomposition.
///
/// Decomposition stops early once the approximation band can no longer be
/// halved, so `level` is an upper bound for small inputs.
pub fn wavedec2(data: &Array2<f32>, _wavelet: Wavelet, level: usize) -> Decomposition {
    let mut approx = data.clone();
    let mut details = Vec::with_capacity(level);

    for _ in 0..level {
        let (rows, cols) = approx.dim();
        if rows < 2 || cols < 2 {
            break;
        }
        let (next, bands) = analyze_2d(&approx);
        approx = next;
        details.push(bands);
    }

    // coarsest-first, matching reconstruction order
    details.reverse();
    Decomposition { approx, details }
}

/// Inverse multi-level 2D wavelet transform.
///
/// Output dimensions can exceed the original by one per odd-sized level;
/// callers resize downstream.
pub fn waverec2(dec: &Decomposition, _wavelet: Wavelet) -> Array2<f32> {
    let mut approx = dec.approx.clone();
    for bands in &dec.details {
        let (dr, dc) = bands.horizontal.dim();
        // Trim the odd-extension row/column introduced by the previous level.
        if approx.dim() != (dr, dc) {
            approx = approx.slice(ndarray::s![..dr, ..dc]).to_owned();
        }
        approx = synthesize_2d(&approx, bands);
    }
    approx
}

/// Extract the high-frequency component image of a color face crop.
///
/// Grayscale, normalize to [0, 1], decompose `level` deep, zero the
/// approximation band, reconstruct, rescale to 8-bit. Pure and deterministic
/// given (image, wavelet, level).
pub fn w2d(img: &RgbImage, wavelet: Wavelet, level: usize) -> GrayImage {
    let gray = imageops::grayscale(img);
    let (width, height) = gray.dimensions();

    let mut plane = Array2::zeros((height as usize, width as usize));
    for (x, y, pixel) in gray.enumerate_pixels() {
        plane[[y as usize, x as usize]] = pixel.0[0] as f32 / 255.0;
    }

    let reconstructed = if level == 0 {
        plane
    } else {
        let mut dec = wavedec2(&plane, wavelet, level);
        dec.approx.fill(0.0);
        waverec2(&dec, wavelet)
    };

    let (out_rows, out_cols) = reconstructed.dim();
    let mut raw = Vec::with_capacity(out_rows * out_cols);
    for r in 0..out_rows {
        for c in 0..out_cols {
            // saturating float-to-u8 cast clamps negatives and overshoot
            raw.push((reconstructed[[r, c]] * 255.0) as u8);
        }
    }

    GrayImage::from_raw(out_cols as u32, out_rows as u32, raw)
        .unwrap_or_else(|| GrayImage::new(0, 0))
}
