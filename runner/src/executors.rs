pub mod local;

use crate::{config::ExecutorConfig, ingest::IngestorError};
use llbench_dataset::Configuration;
use std::{path::PathBuf, process::ExitStatus};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("Failed to spawn {}: {source}", exec.display())]
    Spawn {
        exec: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to wait for the benchmark: {0}")]
    Child(#[from] std::io::Error),
    #[error("Benchmark {config} exited with {status}")]
    ExitStatus {
        config: Configuration,
        status: ExitStatus,
    },
    #[error("Benchmark {config} violated the output protocol: {source}")]
    Ingest {
        config: Configuration,
        #[source]
        source: IngestorError,
    },
}

/// Runs one configuration and reports its throughput in ops/sec
pub trait Invoker {
    fn invoke(&mut self, config: &Configuration) -> Result<f64, ExecutorError>;
}

impl<F> Invoker for F
where
    F: FnMut(&Configuration) -> Result<f64, ExecutorError>,
{
    fn invoke(&mut self, config: &Configuration) -> Result<f64, ExecutorError> {
        self(config)
    }
}

#[derive(Clone, Debug)]
pub enum Executors {
    Local(local::LocalExecutor),
}

impl Executors {
    pub fn load(config: &ExecutorConfig) -> Self {
        Self::Local(local::LocalExecutor::load(config))
    }
}

impl Invoker for Executors {
    fn invoke(&mut self, config: &Configuration) -> Result<f64, ExecutorError> {
        match self {
            Self::Local(executor) => executor.invoke(config),
        }
    }
}
