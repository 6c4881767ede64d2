use lloyd_kmeans::Dataset;
use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::PathBuf;

/// Build a dataset from literal rows
#[allow(dead_code)]
pub fn dataset(rows: &[&[f32]]) -> Dataset {
    Dataset::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
}

/// The four-point square used by the end-to-end scenarios:
/// (0,0), (0,1), (10,0), (10,1)
#[allow(dead_code)]
pub fn two_column_square() -> Dataset {
    dataset(&[&[0.0, 0.0], &[0.0, 1.0], &[10.0, 0.0], &[10.0, 1.0]])
}

/// Create synthetic data with well-separated clusters
/// Returns (data, true_labels)
#[allow(dead_code)]
pub fn create_gaussian_clusters(
    num_clusters: usize,
    points_per_cluster: usize,
    dim: usize,
    separation: f32,
    seed: u64,
) -> (Dataset, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);

    let total_points = num_clusters * points_per_cluster;
    let mut data = Array2::<f32>::zeros((total_points, dim));
    let mut true_labels = Vec::with_capacity(total_points);

    for cluster_id in 0..num_clusters {
        let center: Vec<f32> = (0..dim)
            .map(|d| (cluster_id as f32) * separation + (d as f32) * 0.1)
            .collect();

        for point_id in 0..points_per_cluster {
            let idx = cluster_id * points_per_cluster + point_id;
            true_labels.push(cluster_id);

            for d in 0..dim {
                let noise: f32 = rng.gen_range(-0.5..0.5);
                data[(idx, d)] = center[d] + noise;
            }
        }
    }

    (Dataset::from_array(data).unwrap(), true_labels)
}

/// Generate deterministic test vectors (for reproducibility)
#[allow(dead_code)]
pub fn create_deterministic_dataset(n: usize, dim: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let data: Vec<f32> = (0..n * dim).map(|_| rng.gen_range(-10.0..10.0)).collect();
    Dataset::from_flat(data, n, dim).unwrap()
}

/// Calculate squared Euclidean distance
#[allow(dead_code)]
pub fn euclidean_distance_squared(a: ArrayView1<f32>, b: ArrayView1<f32>) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Calculate the Euclidean distance between two points
#[allow(dead_code)]
pub fn euclidean_distance(a: ArrayView1<f32>, b: ArrayView1<f32>) -> f32 {
    euclidean_distance_squared(a, b).sqrt()
}

/// Verify that each point is assigned to its nearest centroid
#[allow(dead_code)]
pub fn verify_optimal_assignment(
    data: &Dataset,
    centroids: &Array2<f32>,
    labels: &Array1<usize>,
) -> bool {
    for (i, &assigned_label) in labels.iter().enumerate() {
        let point = data.point(i);
        let assigned_dist = euclidean_distance(point, centroids.row(assigned_label));

        for c in 0..centroids.nrows() {
            let dist = euclidean_distance(point, centroids.row(c));
            if dist < assigned_dist - 1e-5 {
                return false;
            }
        }
    }
    true
}

/// Coordinate-wise mean of the points carrying `label`
#[allow(dead_code)]
pub fn mean_of_cluster(data: &Dataset, labels: &Array1<usize>, label: usize) -> Option<Vec<f32>> {
    let members: Vec<usize> = (0..data.n_points()).filter(|&i| labels[i] == label).collect();
    if members.is_empty() {
        return None;
    }
    let mut sum = vec![0.0f32; data.n_dims()];
    for &i in &members {
        for (d, v) in data.point(i).iter().enumerate() {
            sum[d] += v;
        }
    }
    Some(sum.into_iter().map(|s| s / members.len() as f32).collect())
}

#[allow(dead_code)]
pub fn assert_rows_close(actual: &Array2<f32>, expected: &[&[f32]], tol: f32) {
    assert_eq!(actual.nrows(), expected.len(), "row count");
    for (r, row) in expected.iter().enumerate() {
        for (c, &want) in row.iter().enumerate() {
            let got = actual[(r, c)];
            assert!(
                (got - want).abs() <= tol,
                "centroid ({}, {}) = {}, expected {}",
                r,
                c,
                got,
                want
            );
        }
    }
}

/// Path for a scratch file under the system temp dir
#[allow(dead_code)]
pub fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join("lloyd_kmeans_tests")
        .join(format!("{}_{}", std::process::id(), name))
}

/// Clean up scratch files by name
#[allow(dead_code)]
pub fn cleanup_scratch(names: &[&str]) {
    for name in names {
        let _ = fs::remove_file(scratch_path(name));
    }
}
