//! Cosine distance between embedding vectors.
//!
//! Vectors are stored as `f32` but every accumulation here runs in `f64`.
//! Semantic distance is `1 - cosine_similarity`, range \[0, 2\]. A zero-norm
//! vector has similarity 0 with everything, so its distance is exactly 1.

/// Dot product of two equal-length vectors, accumulated in `f64`.
#[inline]
pub fn dot_product(a: &[f32], b: &[f32]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(&x, &y)| f64::from(x) * f64::from(y))
        .sum()
}

/// Squared L2 norm, accumulated in `f64`.
///
/// Uses the same accumulation order as [`dot_product`], so
/// `norm_sq(a) == dot_product(a, a)` bit for bit.
#[inline]
pub fn norm_sq(a: &[f32]) -> f64 {
    dot_product(a, a)
}

/// Cosine similarity from a dot product and both squared norms.
///
/// Returns 0 when either norm is zero. The norms are combined under a single
/// square root so that a vector compared with itself yields exactly 1.
#[inline]
pub fn similarity_from_parts(dot: f64, norm_sq_a: f64, norm_sq_b: f64) -> f64 {
    if norm_sq_a == 0.0 || norm_sq_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_sq_a * norm_sq_b).sqrt()).clamp(-1.0, 1.0)
}

/// Cosine similarity of two vectors. Range: \[-1, 1\].
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    similarity_from_parts(dot_product(a, b), norm_sq(a), norm_sq(b))
}

/// Semantic distance `1 - cosine_similarity(a, b)`. Range: \[0, 2\].
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    1.0 - cosine_similarity(a, b)
}

/// Semantic distance with both squared norms precomputed.
///
/// Skips the two norm passes; only the dot product is computed.
#[inline]
pub fn cosine_distance_prenorm(a: &[f32], b: &[f32], norm_sq_a: f64, norm_sq_b: f64) -> f64 {
    1.0 - similarity_from_parts(dot_product(a, b), norm_sq_a, norm_sq_b)
}
