/// Cosine similarity computed on int8 codes.
///
/// Accumulates in `i64`, so no intermediate can overflow for any vector length that
/// fits in memory. Returns `0.0` for mismatched lengths, empty input, or when either
/// vector has zero norm.
#[inline]
pub fn cosine_similarity_i8(a: &[i8], b: &[i8]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (dot, norm_a_sq, norm_b_sq) =
        a.iter()
            .zip(b.iter())
            .fold((0i64, 0i64, 0i64), |(dot, na, nb), (&av, &bv)| {
                let av = i64::from(av);
                let bv = i64::from(bv);
                (dot + av * bv, na + av * av, nb + bv * bv)
            });

    if norm_a_sq == 0 || norm_b_sq == 0 {
        return 0.0;
    }

    let denom = (norm_a_sq as f64).sqrt() * (norm_b_sq as f64).sqrt();
    ((dot as f64) / denom).clamp(-1.0, 1.0) as f32
}
