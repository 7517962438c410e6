use crate::{
    database::{ConnectionAdapters, ConnectionError},
    executors::{ExecutorError, Invoker},
    grid::{self, Grid},
};
use llbench_dataset::Measurement;
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Error, Debug)]
pub enum SweepError {
    #[error(transparent)]
    Executor(#[from] ExecutorError),
    #[error(transparent)]
    Connection(#[from] ConnectionError),
}

/// Runs every configuration of a list of grids, strictly one after the other
#[derive(Debug)]
pub struct Sweep<'a> {
    grids: &'a [Grid],
}

impl<'a> Sweep<'a> {
    pub fn new(grids: &'a [Grid]) -> Self {
        Self { grids }
    }

    pub fn len(&self) -> usize {
        grid::total_len(self.grids)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invoke every configuration and hand each measurement to `connection`.
    /// The first failure aborts the sweep, nothing is retried or skipped.
    #[instrument(skip_all, fields(total = self.len()), level = "info")]
    pub fn run<I: Invoker>(
        &self,
        invoker: &mut I,
        connection: &mut ConnectionAdapters,
    ) -> Result<usize, SweepError> {
        let total = self.len();
        let mut processed = 0;

        for config in grid::expand_all(self.grids) {
            info!("Running config {config} ({}/{total})", processed + 1);

            let throughput = invoker.invoke(&config)?;
            info!(throughput, "Done with {config}");

            connection.store(Measurement::new(config, throughput))?;
            processed += 1;
        }

        info!("Done with processing");

        Ok(processed)
    }
}
