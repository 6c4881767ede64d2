//! Lloyd K-means clustering over dense `f32` vectors, seeded either with
//! uniform random centroids or with greedy farthest-point ("kmeans++")
//! selection.

pub mod api;
pub use api::{FitReport, FitState, KMeansClustering, KMeansConfig};

pub mod config;
pub mod dataset;
pub mod dump;
pub mod error;
pub mod init;
pub mod kmeans;
pub mod timer;
pub mod utils;

pub use dataset::Dataset;
pub use error::{KMeansError, Result};
pub use init::InitMethod;
pub use kmeans::{EmptyCluster, EmptyClusterPolicy};
