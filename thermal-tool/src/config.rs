//! Preview tool configuration format.

use anyhow::Result;
use noisy_float::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thermal_dl::dataset::Split;

/// The main preview configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub dataset: DatasetConfig,
    pub pipeline: PipelineConfig,
}

/// Dataset options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// The directory holding the `hit-uav` layout.
    pub root_dir: PathBuf,
    pub split: Split,
    /// The classes of interest, in target index order.
    pub classes: Vec<String>,
}

/// Transform pipeline options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub background_prob: R64,
    pub area_scale: (R64, R64),
    pub ratio: (R64, R64),
    pub down_scale_factor: Option<R64>,
    pub flip_prob: R64,
}

impl Config {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let text = std::fs::read_to_string(path)?;
        let config = json5::from_str(&text)?;
        Ok(config)
    }
}
