use ndarray::ArrayView1;

/// Norms below this are treated as zero vectors
const NORM_EPSILON: f32 = 1e-8;

/// Cosine similarity of two vectors, in [-1, 1]
///
/// Returns 0.0 for vectors of different length and for zero vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let a = ArrayView1::from(a);
    let b = ArrayView1::from(b);

    let norm_a = a.dot(&a).sqrt();
    let norm_b = b.dot(&b).sqrt();
    if norm_a < NORM_EPSILON || norm_b < NORM_EPSILON {
        return 0.0;
    }

    // clamp rounding noise such as 1.0000001
    (a.dot(&b) / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Scale a vector to unit length in place (zero vectors are left untouched)
pub fn l2_normalize_in_place(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm < NORM_EPSILON {
        return;
    }
    for x in v.iter_mut() {
        *x /= norm;
    }
}
