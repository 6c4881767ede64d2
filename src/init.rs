use crate::dataset::Dataset;
use crate::error::KMeansError;
use crate::utils::row_distance_squared;
use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, trace};

/// Strategy used to pick the starting centroids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitMethod {
    /// Every coordinate drawn uniformly from `[0, 1)`, ignoring the data.
    #[serde(rename = "random")]
    Random,
    /// Greedy farthest-point seeding starting from data point 0.
    #[serde(rename = "kmeans++")]
    KMeansPlusPlus,
}

impl InitMethod {
    pub fn name(&self) -> &'static str {
        match self {
            InitMethod::Random => "random",
            InitMethod::KMeansPlusPlus => "kmeans++",
        }
    }

    /// Produces `k` initial centroids for `data`.
    ///
    /// Callers must ensure `1 <= k <= data.n_points()`.
    pub fn initialize<R: Rng + ?Sized>(&self, data: &Dataset, k: usize, rng: &mut R) -> Seeding {
        match self {
            InitMethod::Random => {
                info!("Initialized centroids using random initialization");
                random_init(k, data.n_dims(), rng)
            }
            InitMethod::KMeansPlusPlus => {
                info!("Initialized centroids using kmeans++ algorithm");
                kmeans_plus_plus_init(data, k)
            }
        }
    }
}

impl fmt::Display for InitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InitMethod {
    type Err = KMeansError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(InitMethod::Random),
            "kmeans++" => Ok(InitMethod::KMeansPlusPlus),
            other => Err(KMeansError::UnknownInitMethod(other.to_string())),
        }
    }
}

/// Initial centroids plus the data indices they were copied from.
/// `chosen` is empty for random seeding.
#[derive(Clone, Debug)]
pub struct Seeding {
    pub centroids: Array2<f32>,
    pub chosen: Vec<usize>,
}

/// Uniform `[0, 1)` coordinates for each of the `k` centroids.
pub fn random_init<R: Rng + ?Sized>(k: usize, n_dims: usize, rng: &mut R) -> Seeding {
    let mut centroids = Array2::<f32>::zeros((k, n_dims));
    for c in 0..k {
        for d in 0..n_dims {
            centroids[(c, d)] = rng.gen::<f32>();
        }
    }
    Seeding {
        centroids,
        chosen: Vec::new(),
    }
}

/// Deterministic farthest-point seeding.
///
/// Centroid 0 is data point 0. Every later centroid is the not-yet-chosen
/// point whose squared distance to its nearest chosen centroid is largest;
/// the lowest index wins ties.
pub fn kmeans_plus_plus_init(data: &Dataset, k: usize) -> Seeding {
    let n = data.n_points();
    let points = data.view();
    let mut centroids = Array2::<f32>::zeros((k, data.n_dims()));
    let mut chosen = Vec::with_capacity(k);
    let mut is_chosen = vec![false; n];

    centroids.row_mut(0).assign(&points.row(0));
    chosen.push(0);
    is_chosen[0] = true;
    debug!("K-means++: centroid 0 is data point 0");

    for c in 1..k {
        let mut best: Option<(usize, f32)> = None;

        for i in 0..n {
            if is_chosen[i] {
                trace!("K-means++: skipped point {}", i);
                continue;
            }

            let min_dist = (0..c)
                .map(|prev| row_distance_squared(points.row(i), centroids.row(prev)))
                .fold(f32::INFINITY, f32::min);

            // Strict comparison keeps the lowest index on ties; NaN never wins.
            let farther = match best {
                Some((_, best_dist)) => min_dist > best_dist,
                None => !min_dist.is_nan(),
            };
            if farther {
                best = Some((i, min_dist));
            }
        }

        // k <= n leaves at least one unchosen point per round.
        let Some((idx, dist)) = best else {
            break;
        };
        centroids.row_mut(c).assign(&points.row(idx));
        chosen.push(idx);
        is_chosen[idx] = true;
        debug!(
            "K-means++: appended data point {} as centroid {} (dist²={:.4})",
            idx, c, dist
        );
    }

    Seeding { centroids, chosen }
}
