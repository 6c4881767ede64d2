use crate::dataset::Dataset;
use crate::error::{KMeansError, Result};
use crate::init::InitMethod;
use crate::kmeans::{self, EmptyCluster, EmptyClusterPolicy};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Configuration for a K-means run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KMeansConfig {
    /// Number of clusters (K).
    pub n_clusters: usize,

    pub init: InitMethod,

    /// Number of assign + update cycles (default: 300).
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,

    /// Centroid displacement threshold (default: 1e-3). Only consulted when
    /// `early_stop` is set.
    #[serde(default = "default_tolerance")]
    pub tolerance: f32,

    /// Stop once no centroid moves more than `tolerance` in one iteration.
    /// Off by default: the loop then always runs `max_iter` times.
    #[serde(default)]
    pub early_stop: bool,

    #[serde(default)]
    pub empty_cluster: EmptyClusterPolicy,

    /// Seed for the RNG used by `fit`. `None` draws one from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_max_iter() -> usize {
    300
}

fn default_tolerance() -> f32 {
    1e-3
}

impl KMeansConfig {
    pub fn new(n_clusters: usize, init: InitMethod) -> Self {
        Self {
            n_clusters,
            init,
            max_iter: default_max_iter(),
            tolerance: default_tolerance(),
            early_stop: false,
            empty_cluster: EmptyClusterPolicy::default(),
            seed: None,
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_early_stop(mut self, early_stop: bool) -> Self {
        self.early_stop = early_stop;
        self
    }

    pub fn with_empty_cluster_policy(mut self, policy: EmptyClusterPolicy) -> Self {
        self.empty_cluster = policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks the settings that do not depend on the data.
    pub fn validate(&self) -> Result<()> {
        if self.n_clusters == 0 {
            return Err(KMeansError::InvalidConfig(
                "number of clusters must be at least 1".into(),
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(KMeansError::InvalidConfig(format!(
                "tolerance must be a non-negative finite number, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Where a clustering object is in its fit lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FitState {
    Uninitialized,
    Initialized,
    Iterating(usize),
    Done,
}

/// Summary of a completed fit.
#[derive(Clone, Debug, PartialEq)]
pub struct FitReport {
    /// Assign + update cycles actually run.
    pub iterations: usize,
    /// Iteration (1-based) after which early stopping fired.
    pub converged_at: Option<usize>,
    /// Displacement measured in the last iteration, if any ran.
    pub last_displacement: Option<f32>,
    pub empty_clusters: Vec<EmptyCluster>,
    /// Data indices used as seeds (farthest-point seeding only).
    pub seed_points: Vec<usize>,
}

/// K-means clustering over dense `f32` vectors.
pub struct KMeansClustering {
    config: KMeansConfig,
    centroids: Option<Array2<f32>>,
    state: FitState,
}

impl KMeansClustering {
    pub fn new(config: KMeansConfig) -> Self {
        Self {
            config,
            centroids: None,
            state: FitState::Uninitialized,
        }
    }

    /// Builds a clustering from a textual method name (`random` or `kmeans++`).
    pub fn from_method_name(n_clusters: usize, init_method: &str) -> Result<Self> {
        let init = init_method.parse::<InitMethod>()?;
        Ok(Self::new(KMeansConfig::new(n_clusters, init)))
    }

    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }

    pub fn state(&self) -> FitState {
        self.state
    }

    /// Fits on a flat row-major buffer of `n * n_dims` values.
    pub fn fit(&mut self, x: &[f32], n: usize, n_dims: usize) -> Result<FitReport> {
        let dataset = Dataset::from_flat(x.to_vec(), n, n_dims)?;
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.fit_dataset(&dataset, &mut rng)
    }

    /// Fits with a caller-owned RNG, used by random seeding and by reseeding
    /// of empty clusters.
    pub fn fit_dataset<R: Rng + ?Sized>(&mut self, data: &Dataset, rng: &mut R) -> Result<FitReport> {
        self.check_fit_inputs(data)?;

        let seeding = self.config.init.initialize(data, self.config.n_clusters, rng);
        self.centroids = Some(seeding.centroids.clone());
        self.state = FitState::Initialized;

        let mut report = self.run_iterations(data, seeding.centroids, rng)?;
        report.seed_points = seeding.chosen;
        Ok(report)
    }

    /// Fits starting from the given centroids instead of running the
    /// initializer.
    pub fn fit_with_centroids(&mut self, data: &Dataset, initial: Array2<f32>) -> Result<FitReport> {
        self.check_fit_inputs(data)?;
        let expected = (self.config.n_clusters, data.n_dims());
        if initial.dim() != expected {
            return Err(KMeansError::ShapeMismatch {
                expected: format!("{}x{} centroids", expected.0, expected.1),
                actual: format!("{}x{}", initial.nrows(), initial.ncols()),
            });
        }

        self.centroids = Some(initial.clone());
        self.state = FitState::Initialized;

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.run_iterations(data, initial, &mut rng)
    }

    fn check_fit_inputs(&self, data: &Dataset) -> Result<()> {
        self.config.validate()?;
        if self.config.n_clusters > data.n_points() {
            return Err(KMeansError::InvalidConfig(format!(
                "cannot form {} clusters from {} points",
                self.config.n_clusters,
                data.n_points()
            )));
        }
        Ok(())
    }

    fn run_iterations<R: Rng + ?Sized>(
        &mut self,
        data: &Dataset,
        mut centroids: Array2<f32>,
        rng: &mut R,
    ) -> Result<FitReport> {
        let mut report = FitReport {
            iterations: 0,
            converged_at: None,
            last_displacement: None,
            empty_clusters: Vec::new(),
            seed_points: Vec::new(),
        };

        for iter in 0..self.config.max_iter {
            self.state = FitState::Iterating(iter);

            let step = kmeans::lloyd_step(data, &centroids, self.config.empty_cluster, iter, rng);
            centroids = step.centroids;
            report.iterations += 1;
            report.last_displacement = Some(step.displacement);
            report.empty_clusters.extend(step.empty_clusters);
            debug!(
                "Iteration {}: max centroid displacement {:.6}",
                iter, step.displacement
            );

            if self.config.early_stop && step.displacement < self.config.tolerance {
                info!("Converged early at iteration {}", iter + 1);
                report.converged_at = Some(iter + 1);
                break;
            }
        }

        self.centroids = Some(centroids);
        self.state = FitState::Done;
        Ok(report)
    }

    /// The K x n_dims centroid matrix.
    pub fn centroids(&self) -> Result<&Array2<f32>> {
        self.centroids.as_ref().ok_or(KMeansError::NotFitted)
    }

    /// Flat row-major view of the centroids, as written to centroid dumps.
    pub fn centroid_buffer(&self) -> Result<&[f32]> {
        self.centroids()?.as_slice().ok_or_else(|| {
            KMeansError::InvalidInput("centroid matrix is not in row-major layout".into())
        })
    }

    /// Nearest-centroid label for every point of `data`.
    pub fn predict(&self, data: &Dataset) -> Result<Array1<usize>> {
        let centroids = self.fitted_centroids_for(data)?;
        let (labels, _) = kmeans::assign_points(data, centroids);
        Ok(labels)
    }

    /// Within-cluster sum of squared distances of `data` to its nearest centroid.
    pub fn inertia(&self, data: &Dataset) -> Result<f32> {
        let centroids = self.fitted_centroids_for(data)?;
        let (labels, _) = kmeans::assign_points(data, centroids);
        Ok(kmeans::inertia(data, centroids, &labels))
    }

    fn fitted_centroids_for(&self, data: &Dataset) -> Result<&Array2<f32>> {
        if self.state != FitState::Done {
            return Err(KMeansError::NotFitted);
        }
        let centroids = self.centroids()?;
        if centroids.ncols() != data.n_dims() {
            return Err(KMeansError::ShapeMismatch {
                expected: format!("{} dimensions", centroids.ncols()),
                actual: format!("{} dimensions", data.n_dims()),
            });
        }
        Ok(centroids)
    }
}
