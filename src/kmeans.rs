use crate::dataset::Dataset;
use crate::utils::{row_distance, row_distance_squared};
use ndarray::{Array1, Array2};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// What the updater does with a centroid that received no points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyClusterPolicy {
    /// Leave the 0/0 result in place: every coordinate becomes NaN and the
    /// centroid never wins an assignment again. This holds for centroid 0
    /// too: the nearest-centroid search starts from +inf rather than from
    /// column 0, so a NaN centroid 0 does not absorb every point.
    Propagate,
    /// Keep the centroid where it was before the update.
    KeepPrevious,
    /// Move the centroid onto a uniformly drawn data point.
    #[default]
    Reseed,
}

/// A centroid that ended an iteration without any assigned points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmptyCluster {
    pub iteration: usize,
    pub cluster: usize,
}

/// Result of one assign + update cycle.
#[derive(Clone, Debug)]
pub struct StepOutcome {
    pub centroids: Array2<f32>,
    pub labels: Array1<usize>,
    pub counts: Vec<usize>,
    pub empty_clusters: Vec<EmptyCluster>,
    /// Largest Euclidean distance any centroid moved during the step.
    pub displacement: f32,
}

/// Euclidean distance from every point to every centroid, shape (N, K).
pub fn compute_distances(data: &Dataset, centroids: &Array2<f32>) -> Array2<f32> {
    let n = data.n_points();
    let k = centroids.nrows();
    let mut distances = Array2::<f32>::zeros((n, k));
    for i in 0..n {
        let point = data.point(i);
        for c in 0..k {
            distances[(i, c)] = row_distance(point, centroids.row(c));
        }
    }
    distances
}

/// Index of the strictly smallest distance in each row; the lowest index
/// wins ties and NaN entries never win.
pub fn assign_labels(distances: &Array2<f32>) -> Array1<usize> {
    distances
        .rows()
        .into_iter()
        .map(|row| {
            let mut best_c = 0usize;
            let mut best_dist = f32::INFINITY;
            for (c, &dist) in row.iter().enumerate() {
                if dist < best_dist {
                    best_dist = dist;
                    best_c = c;
                }
            }
            best_c
        })
        .collect()
}

/// Assigner: distance matrix plus the nearest-centroid label of every point.
pub fn assign_points(data: &Dataset, centroids: &Array2<f32>) -> (Array1<usize>, Array2<f32>) {
    let distances = compute_distances(data, centroids);
    let labels = assign_labels(&distances);
    (labels, distances)
}

/// Updater: per-cluster coordinate means. Empty clusters come out as NaN.
pub fn update_centroids(data: &Dataset, labels: &Array1<usize>, k: usize) -> (Array2<f32>, Vec<usize>) {
    let dim = data.n_dims();
    let mut sums = Array2::<f32>::zeros((k, dim));
    let mut counts = vec![0usize; k];

    for (i, &c) in labels.iter().enumerate() {
        counts[c] += 1;
        let mut bucket = sums.row_mut(c);
        bucket += &data.point(i);
    }

    for c in 0..k {
        let count = counts[c] as f32;
        sums.row_mut(c).mapv_inplace(|s| s / count);
    }

    (sums, counts)
}

/// Applies `policy` to every cluster with a zero count and reports each one.
pub fn handle_empty_clusters<R: Rng + ?Sized>(
    centroids: &mut Array2<f32>,
    previous: &Array2<f32>,
    counts: &[usize],
    data: &Dataset,
    policy: EmptyClusterPolicy,
    iteration: usize,
    rng: &mut R,
) -> Vec<EmptyCluster> {
    let mut empty = Vec::new();

    for (c, &count) in counts.iter().enumerate() {
        if count > 0 {
            continue;
        }
        empty.push(EmptyCluster { iteration, cluster: c });

        match policy {
            EmptyClusterPolicy::Propagate => {
                warn!(iteration, cluster = c, "empty cluster, centroid left as NaN");
            }
            EmptyClusterPolicy::KeepPrevious => {
                warn!(iteration, cluster = c, "empty cluster, keeping previous centroid");
                centroids.row_mut(c).assign(&previous.row(c));
            }
            EmptyClusterPolicy::Reseed => {
                let ri = rng.gen_range(0..data.n_points());
                warn!(iteration, cluster = c, point = ri, "empty cluster, reseeded from data point");
                centroids.row_mut(c).assign(&data.point(ri));
            }
        }
    }

    empty
}

/// Largest per-centroid Euclidean movement between two centroid sets.
/// Centroids with NaN coordinates are ignored.
pub fn max_centroid_displacement(curr: &Array2<f32>, prev: &Array2<f32>) -> f32 {
    (0..curr.nrows())
        .map(|c| row_distance_squared(curr.row(c), prev.row(c)).sqrt())
        .fold(0.0, f32::max)
}

/// One Lloyd iteration: assign every point, then recompute the centroids.
pub fn lloyd_step<R: Rng + ?Sized>(
    data: &Dataset,
    centroids: &Array2<f32>,
    policy: EmptyClusterPolicy,
    iteration: usize,
    rng: &mut R,
) -> StepOutcome {
    let k = centroids.nrows();
    let (labels, _distances) = assign_points(data, centroids);
    let (mut new_centroids, counts) = update_centroids(data, &labels, k);
    let empty_clusters = handle_empty_clusters(
        &mut new_centroids,
        centroids,
        &counts,
        data,
        policy,
        iteration,
        rng,
    );
    let displacement = max_centroid_displacement(&new_centroids, centroids);

    StepOutcome {
        centroids: new_centroids,
        labels,
        counts,
        empty_clusters,
        displacement,
    }
}

/// Within-cluster sum of squared distances for the given labels.
pub fn inertia(data: &Dataset, centroids: &Array2<f32>, labels: &Array1<usize>) -> f32 {
    labels
        .iter()
        .enumerate()
        .map(|(i, &c)| row_distance_squared(data.point(i), centroids.row(c)))
        .sum()
}
