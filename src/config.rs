use crate::api::KMeansConfig;
use crate::error::Result;
use crate::init::InitMethod;
use crate::kmeans::EmptyClusterPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for the demo run: data generation, clustering and output files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub data: DataConfig,
    pub kmeans: KMeansConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub n_points: usize,
    pub n_dims: usize,
    pub n_categories: usize,
    pub deviation: f32,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub data_file: String,
    pub centroid_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            n_points: 100,
            n_dims: 2,
            n_categories: 5,
            deviation: 0.05,
            seed: 42,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            dir: PathBuf::from("."),
            data_file: "X_data.bin".to_string(),
            centroid_file: "centroid_data.bin".to_string(),
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            data: DataConfig::default(),
            kmeans: KMeansConfig::new(5, InitMethod::Random)
                .with_max_iter(0)
                .with_tolerance(0.01)
                .with_empty_cluster_policy(EmptyClusterPolicy::Reseed),
            output: OutputConfig::default(),
        }
    }
}

impl DemoConfig {
    /// Load config from YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: DemoConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    pub fn data_path(&self) -> PathBuf {
        self.output.dir.join(&self.output.data_file)
    }

    pub fn centroid_path(&self) -> PathBuf {
        self.output.dir.join(&self.output.centroid_file)
    }
}
