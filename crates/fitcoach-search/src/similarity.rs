//! Vector similarity math.

/// Cosine similarity between two vectors.
///
/// Returns a value in [-1, 1] for non-zero vectors of equal length.
/// A zero vector has no direction, so similarity against one is 0.0
/// rather than an error or NaN. Mismatched lengths also score 0.0;
/// vectors from different embedding models are simply not comparable.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for i in 0..a.len() {
        dot += a[i] * b[i];
        norm_a += a[i] * a[i];
        norm_b += b[i] * b[i];
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}
