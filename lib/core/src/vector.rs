//! Scalar vector math shared by the index and the explainers.

/// Guard added to norms before division, so all-zero vectors produce a
/// similarity of 0 instead of NaN.
pub const NORM_EPSILON: f32 = 1e-8;

/// Dot product of two equal-length slices
#[inline]
#[must_use]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// L2 (Euclidean) norm
#[inline]
#[must_use]
pub fn norm(a: &[f32]) -> f32 {
    a.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Squared Euclidean distance
#[inline]
#[must_use]
pub fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Compute cosine similarity between two vectors
///
/// Both norms carry [`NORM_EPSILON`], so a zero vector on either side yields
/// a similarity near 0 rather than NaN. Mismatched lengths yield 0.
#[inline]
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    dot(a, b) / ((norm(a) + NORM_EPSILON) * (norm(b) + NORM_EPSILON))
}

/// Normalize a vector to unit length in place
///
/// Zero vectors are left untouched.
#[inline]
pub fn normalize(v: &mut [f32]) {
    let magnitude = norm(v);
    if magnitude > f32::EPSILON {
        let inv = 1.0 / magnitude;
        for x in v.iter_mut() {
            *x *= inv;
        }
    }
}
