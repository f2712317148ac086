//! Configuration of [`EpisodeDriver`](super::EpisodeDriver).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`EpisodeDriver`](super::EpisodeDriver).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct DriverConfig {
    /// The maximum number of environment steps in an episode.
    pub max_steps: usize,

    /// Random seed for building environments and policies.
    pub seed: i64,

    /// Interval of progress logs in environment steps. `0` disables them.
    pub log_interval: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            max_steps: 1000,
            seed: 42,
            log_interval: 100,
        }
    }
}

impl DriverConfig {
    /// Sets the maximum number of environment steps in an episode.
    pub fn max_steps(mut self, v: usize) -> Self {
        self.max_steps = v;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: i64) -> Self {
        self.seed = v;
        self
    }

    /// Sets the interval of progress logs.
    pub fn log_interval(mut self, v: usize) -> Self {
        self.log_interval = v;
        self
    }

    /// Constructs [`DriverConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`DriverConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
