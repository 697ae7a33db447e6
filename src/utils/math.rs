//! Math utility functions

/// Softmax function
pub fn softmax(x: &[f64]) -> Vec<f64> {
    let max_val = x.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exp_vals: Vec<f64> = x.iter().map(|v| (v - max_val).exp()).collect();
    let sum: f64 = exp_vals.iter().sum();
    exp_vals.iter().map(|v| v / sum).collect()
}

/// Argmax - find index of maximum value
pub fn argmax(x: &[f64]) -> usize {
    x.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}

/// Round to two decimal places
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
