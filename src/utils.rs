use crate::error::{KMeansError, Result};
use ndarray::{Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::f32::consts::PI;
use tracing::debug;
use wide::{f32x4, f32x8};

/// Squared Euclidean distance between two equal-length slices (SIMD).
#[inline]
pub fn euclidean_distance_squared(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    let dim = a.len().min(b.len());
    let (a, b) = (&a[..dim], &b[..dim]);
    let mut j = 0;

    // SIMD 8-element chunks
    let mut acc8 = f32x8::splat(0.0);
    let mut lane8 = [0.0f32; 8];
    let mut other8 = [0.0f32; 8];
    while j + 8 <= dim {
        lane8.copy_from_slice(&a[j..j + 8]);
        other8.copy_from_slice(&b[j..j + 8]);
        let diff = f32x8::from(lane8) - f32x8::from(other8);
        acc8 += diff * diff;
        j += 8;
    }

    // SIMD 4-element chunks
    let mut acc4 = f32x4::splat(0.0);
    let mut lane4 = [0.0f32; 4];
    let mut other4 = [0.0f32; 4];
    while j + 4 <= dim {
        lane4.copy_from_slice(&a[j..j + 4]);
        other4.copy_from_slice(&b[j..j + 4]);
        let diff = f32x4::from(lane4) - f32x4::from(other4);
        acc4 += diff * diff;
        j += 4;
    }

    // Tail elements
    let mut tail = 0.0;
    while j < dim {
        let diff = a[j] - b[j];
        tail += diff * diff;
        j += 1;
    }

    acc8.reduce_add() + acc4.reduce_add() + tail
}

/// Squared Euclidean distance between two matrix rows.
/// Falls back to a scalar loop when either row is not contiguous.
#[inline]
pub fn row_distance_squared(a: ArrayView1<f32>, b: ArrayView1<f32>) -> f32 {
    match (a.as_slice(), b.as_slice()) {
        (Some(a), Some(b)) => euclidean_distance_squared(a, b),
        _ => a
            .iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y) * (x - y))
            .sum(),
    }
}

#[inline]
pub fn row_distance(a: ArrayView1<f32>, b: ArrayView1<f32>) -> f32 {
    row_distance_squared(a, b).sqrt()
}

/// Generates points scattered around `n_categories` evenly spaced spots on
/// the unit circle.
///
/// Each point picks a category `c`, giving the angle `2πc / n_categories`.
/// Even coordinates take the cosine and odd coordinates the sine of that
/// angle, then every coordinate is shifted into `[x - deviation, x)`.
/// Batches are generated in parallel, each from its own RNG derived from
/// `seed`, so the output only depends on the arguments.
pub fn generate_circle_clusters(
    n: usize,
    n_dims: usize,
    n_categories: usize,
    deviation: f32,
    seed: u64,
) -> Result<Array2<f32>> {
    if n_categories == 0 {
        return Err(KMeansError::InvalidConfig(
            "n_categories must be at least 1".into(),
        ));
    }
    let batch_size = 1000;
    let total_batches = (n + batch_size - 1) / batch_size;
    debug!(
        n,
        n_dims, n_categories, total_batches, "generating circle clusters"
    );

    let batches: Vec<Vec<f32>> = (0..total_batches)
        .into_par_iter()
        .map(|batch_num| {
            let start_idx = batch_num * batch_size;
            let end_idx = ((batch_num + 1) * batch_size).min(n);

            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(batch_num as u64));
            let mut values = Vec::with_capacity((end_idx - start_idx) * n_dims);

            for _ in start_idx..end_idx {
                let category = rng.gen_range(0..n_categories);
                let angle = 2.0 * PI * category as f32 / n_categories as f32;
                for j in 0..n_dims {
                    let x = if j % 2 == 0 { angle.cos() } else { angle.sin() };
                    values.push(x - deviation + deviation * rng.gen::<f32>());
                }
            }
            values
        })
        .collect();

    let flat: Vec<f32> = batches.into_iter().flatten().collect();
    Array2::from_shape_vec((n, n_dims), flat).map_err(|e| KMeansError::ShapeMismatch {
        expected: format!("{} x {}", n, n_dims),
        actual: e.to_string(),
    })
}
