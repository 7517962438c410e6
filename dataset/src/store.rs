use crate::Dataset;
use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
    str::FromStr,
};
use thiserror::Error;
use tracing::{debug, instrument, warn};

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to access dataset file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Dataset is not valid YAML: {0}")]
    Format(#[from] serde_yaml::Error),
    #[error("Measurement {index} is invalid: {reason}")]
    InvalidMeasurement { index: usize, reason: &'static str },
}

impl Dataset {
    /// load a dataset written by `Dataset::store`
    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let text = fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = text.parse::<Dataset>()?;

        debug!(measurements = dataset.len(), "Loaded dataset");

        Ok(dataset)
    }

    /// Write the dataset to `path`.
    ///
    /// The document goes to a temporary sibling first and is renamed into place, readers never
    /// see a partially written dataset.
    #[instrument(level = "debug", skip(self), fields(measurements = self.len()))]
    pub fn store(&self, path: &Path) -> Result<(), DatasetError> {
        let text = self.to_yaml()?;
        let tmp = tmp_path(path);
        let io_error = |source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        };

        let written = File::create(&tmp)
            .and_then(|mut file| {
                file.write_all(text.as_bytes())?;
                file.sync_all()
            })
            .and_then(|()| fs::rename(&tmp, path));

        if let Err(source) = written {
            if tmp.exists() {
                if let Err(e) = fs::remove_file(&tmp) {
                    warn!(tmp = ?tmp, "Failed to remove temporary dataset file: {e}");
                }
            }

            return Err(io_error(source));
        }
        debug!(path = ?path, "Stored dataset");

        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String, DatasetError> {
        Ok(serde_yaml::to_string(self)?)
    }

    fn validate(&self) -> Result<(), DatasetError> {
        for (index, measurement) in self.results.iter().enumerate() {
            let reason = if measurement.config.threads == 0 {
                "thread count must be at least 1"
            } else if !measurement.throughput.is_finite() {
                "throughput must be finite"
            } else if measurement.throughput < 0.0 {
                "throughput must not be negative"
            } else {
                continue;
            };

            return Err(DatasetError::InvalidMeasurement { index, reason });
        }

        Ok(())
    }
}

impl FromStr for Dataset {
    type Err = DatasetError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let dataset: Dataset = serde_yaml::from_str(text)?;
        dataset.validate()?;

        Ok(dataset)
    }
}

/// `results.yaml` -> `.results.yaml.tmp` in the same directory, so the rename stays on one
/// file system
fn tmp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset".to_owned());

    path.with_file_name(format!(".{name}.tmp"))
}
