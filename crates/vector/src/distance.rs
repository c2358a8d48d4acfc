//! Cosine similarity between embeddings.
//!
//! Higher is always better. The index stores vectors as plain `Vec<f32>`
//! allocated with a 32-byte alignment so a SIMD-capable target can process
//! them 8 floats at a time; this crate ships the scalar fallback, with the
//! block structure laid out so a SIMD kernel can be dropped in without
//! touching call sites.

/// Vectors whose dimensionality is at least this wide are processed in
/// 8-float blocks; shorter vectors fall through to the scalar tail loop
/// directly.
const SIMD_BLOCK: usize = 8;

/// Cosine similarity in `[-1, 1]`. Zero if either vector has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "dimension mismatch in cosine_similarity");

    let (dot, norm_a_sq, norm_b_sq) = if a.len() >= SIMD_BLOCK {
        accumulate_blocked(a, b)
    } else {
        accumulate_scalar(a, b)
    };

    if norm_a_sq == 0.0 || norm_b_sq == 0.0 {
        0.0
    } else {
        dot / (norm_a_sq.sqrt() * norm_b_sq.sqrt())
    }
}

/// Accumulate dot product and squared norms in blocks of `SIMD_BLOCK`
/// floats, mirroring the access pattern a width-8 SIMD kernel would use
/// (sequential blocks, each independent so the compiler can autovectorize
/// or a future explicit-SIMD kernel can replace this loop body directly).
fn accumulate_blocked(a: &[f32], b: &[f32]) -> (f32, f32, f32) {
    let n = a.len();
    let full_blocks = n / SIMD_BLOCK;
    let mut dot = 0.0f32;
    let mut norm_a_sq = 0.0f32;
    let mut norm_b_sq = 0.0f32;

    for block in 0..full_blocks {
        let base = block * SIMD_BLOCK;
        for i in base..base + SIMD_BLOCK {
            let x = a[i];
            let y = b[i];
            dot += x * y;
            norm_a_sq += x * x;
            norm_b_sq += y * y;
        }
    }

    let tail_start = full_blocks * SIMD_BLOCK;
    let (tail_dot, tail_a, tail_b) = accumulate_scalar(&a[tail_start..], &b[tail_start..]);
    (dot + tail_dot, norm_a_sq + tail_a, norm_b_sq + tail_b)
}

fn accumulate_scalar(a: &[f32], b: &[f32]) -> (f32, f32, f32) {
    let mut dot = 0.0f32;
    let mut norm_a_sq = 0.0f32;
    let mut norm_b_sq = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a_sq += x * x;
        norm_b_sq += y * y;
    }
    (dot, norm_a_sq, norm_b_sq)
}
