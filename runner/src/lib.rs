pub mod config;
pub mod database;
pub mod executors;
pub mod grid;
pub mod ingest;
pub mod sweep;

use config::ConfigErrors;
use database::ConnectionError;
use sweep::SweepError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error(transparent)]
    Config(#[from] ConfigErrors),
    #[error("Sweep aborted: {0}")]
    Sweep(#[from] SweepError),
    #[error(transparent)]
    Connection(#[from] ConnectionError),
}
