use super::ConnectionError;
use llbench_dataset::{Dataset, Measurement};
use std::path::PathBuf;
use tracing::{debug, info};

/// Rewrites the whole dataset every `size` measurements, so an aborted sweep keeps the runs it
/// finished up to the last flush.
#[derive(Debug)]
pub struct BatchedConnection {
    path: PathBuf,
    buffer: Dataset,
    size: usize,
    pending: usize,
}

impl BatchedConnection {
    pub fn load(path: PathBuf, size: usize) -> Self {
        Self {
            path,
            buffer: Dataset::default(),
            size: size.max(1),
            pending: 0,
        }
    }

    pub fn store(&mut self, measurement: Measurement) -> Result<(), ConnectionError> {
        self.buffer.results.push(measurement);
        self.pending += 1;

        if self.pending == self.size {
            self.flush()?;
        }

        Ok(())
    }

    fn flush(&mut self) -> Result<(), ConnectionError> {
        self.buffer.store(&self.path)?;
        self.pending = 0;
        debug!(
            path = ?self.path,
            "Flushed {} measurements",
            self.buffer.len()
        );

        Ok(())
    }

    pub fn close(mut self) -> Result<Dataset, ConnectionError> {
        self.flush()?;
        info!(
            path = ?self.path,
            "Wrote {} measurements",
            self.buffer.len()
        );

        Ok(self.buffer)
    }
}
