//! Deterministic numeric and vector helpers.

#![forbid(unsafe_code)]

/// Round a floating point value to `decimals` decimal places.
#[must_use]
pub fn round_f64(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Return a 4-decimal ratio and guard division by zero.
#[must_use]
pub fn safe_ratio(numer: usize, denom: usize) -> f64 {
    if denom == 0 {
        0.0
    } else {
        round_f64(numer as f64 / denom as f64, 4)
    }
}

/// Dot product of two equal-length vectors.
///
/// Extra components of the longer slice are ignored.
#[must_use]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Sum of squared components.
#[must_use]
pub fn squared_norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum()
}

/// Dot product of two sparse vectors given as `(dimension, weight)` entries
/// sorted by dimension.
#[must_use]
pub fn sparse_dot(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut acc = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                acc += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    acc
}

/// Cosine from a precomputed dot product and squared norms, clamped to `[0, 1]`.
///
/// The denominator is `sqrt(na * nb)` rather than `sqrt(na) * sqrt(nb)`: for
/// identical inputs the dot product and both squared norms are the same sum,
/// and `sqrt(s * s) == s` is exact, so self-similarity is exactly `1.0`.
/// A zero-magnitude side yields `0.0`.
#[must_use]
pub fn cosine_from_parts(dot: f64, na: f64, nb: f64) -> f64 {
    let denom = (na * nb).sqrt();
    if na == 0.0 || nb == 0.0 || denom == 0.0 || !denom.is_finite() {
        return 0.0;
    }
    (dot / denom).clamp(0.0, 1.0)
}

/// Cosine similarity of two dense vectors, clamped to `[0, 1]`.
///
/// Returns `0.0` when either vector has zero magnitude or the dimensions
/// differ.
#[must_use]
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }
    cosine_from_parts(dot(a, b), squared_norm(a), squared_norm(b))
}
