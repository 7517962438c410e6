use super::ConnectionError;
use llbench_dataset::{Dataset, Measurement};
use std::path::PathBuf;
use tracing::info;

/// Buffers every measurement and writes the dataset once on close.
/// Dropping it without closing writes nothing.
#[derive(Debug)]
pub struct DelayedConnection {
    path: PathBuf,
    buffer: Dataset,
}

impl DelayedConnection {
    pub fn load(path: PathBuf) -> Self {
        Self {
            path,
            buffer: Dataset::default(),
        }
    }

    pub fn store(&mut self, measurement: Measurement) -> Result<(), ConnectionError> {
        self.buffer.results.push(measurement);

        Ok(())
    }

    pub fn close(self) -> Result<Dataset, ConnectionError> {
        self.buffer.store(&self.path)?;
        info!(
            path = ?self.path,
            "Wrote {} measurements",
            self.buffer.len()
        );

        Ok(self.buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use llbench_dataset::Configuration;
    use tempfile::tempdir;

    #[test]
    fn nothing_is_written_before_close() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.yaml");
        let mut connection = DelayedConnection::load(path.clone());

        for threads in [1, 2, 4] {
            connection
                .store(Measurement::new(
                    Configuration::new("readonly", "lock_free", threads),
                    threads as f64,
                ))
                .unwrap();
        }
        assert!(!path.exists());

        let dataset = connection.close().unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(Dataset::load(&path).unwrap(), dataset);
    }

    #[test]
    fn dropped_connection_leaves_no_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.yaml");
        let mut connection = DelayedConnection::load(path.clone());

        connection
            .store(Measurement::new(Configuration::new("queue", "lock_free", 2), 1.0))
            .unwrap();
        drop(connection);

        assert!(!path.exists());
    }
}
