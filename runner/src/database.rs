pub mod batched;
pub mod delayed;

use llbench_dataset::{Dataset, DatasetError, Measurement};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("Failed to write dataset: {0}")]
    Dataset(#[from] DatasetError),
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreMode {
    /// write once, after the last run finished
    #[default]
    Delayed,
    /// rewrite the dataset every `size` measurements
    Batched,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    #[serde(default)]
    pub mode: StoreMode,
    // only used by the batched mode
    #[serde(default = "default_batch_size")]
    pub size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            mode: StoreMode::default(),
            size: default_batch_size(),
        }
    }
}

impl StoreConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.mode == StoreMode::Batched && self.size == 0 {
            Err("size must be at least 1 for the batched mode")
        } else {
            Ok(())
        }
    }
}

fn default_batch_size() -> usize {
    1
}

/// Sink for the measurements of one sweep, writing to a single dataset file
#[derive(Debug)]
pub enum ConnectionAdapters {
    Delayed(delayed::DelayedConnection),
    Batched(batched::BatchedConnection),
}

impl ConnectionAdapters {
    pub fn load(config: &StoreConfig, path: PathBuf) -> Self {
        match config.mode {
            StoreMode::Delayed => Self::Delayed(delayed::DelayedConnection::load(path)),
            StoreMode::Batched => {
                Self::Batched(batched::BatchedConnection::load(path, config.size))
            }
        }
    }

    pub fn store(&mut self, measurement: Measurement) -> Result<(), ConnectionError> {
        match self {
            Self::Delayed(connection) => connection.store(measurement),
            Self::Batched(connection) => connection.store(measurement),
        }
    }

    /// Write the complete dataset and hand it back
    pub fn close(self) -> Result<Dataset, ConnectionError> {
        match self {
            Self::Delayed(connection) => connection.close(),
            Self::Batched(connection) => connection.close(),
        }
    }
}
