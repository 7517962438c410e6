use crate::{database::StoreConfig, grid::Grid};
use llbench_dataset::{Benchmark, Policy};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashSet,
    fs::{self, File},
    hash::Hash,
    io::Error,
    os::unix::fs::MetadataExt,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{error, instrument, warn};

/// thread counts swept by the built-in grids
pub const DEFAULT_THREADS: [u32; 9] = [1, 6, 12, 18, 24, 30, 36, 42, 48];

// check if a file is executable
pub fn check_executable(path: &Path) -> Result<bool, ConfigErrors> {
    if !path.is_file() {
        Err(ConfigErrors::FileNotFound(path.to_path_buf()))
    } else {
        match File::open(path).map(|file| file.metadata()) {
            Ok(Ok(metadata)) => Ok((metadata.mode() & 0o111) != 0),
            Ok(Err(e)) | Err(e) => Err(ConfigErrors::MetadataNotFound(e)),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigErrors {
    #[error("Failed to read config file {}: {}", .0.display(), .1)]
    Unreadable(PathBuf, #[source] Error),
    #[error("Config is malformed: {0}")]
    Malformed(#[from] serde_yaml::Error),
    #[error("Config failed {0} preflight check(s)")]
    Preflight(usize),
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("Metadata not found")]
    MetadataNotFound(#[source] Error),
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SweepConfig {
    #[serde(default)]
    pub executor: ExecutorConfig,
    #[serde(default, alias = "database")]
    pub store: StoreConfig,
    // Grids are expanded in declaration order
    pub grids: Vec<Grid>,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExecutorConfig {
    // Benchmark executable, invoked once per configuration
    #[serde(default = "default_exec")]
    pub exec: PathBuf,
    // Seconds every single run is asked to take, passed as --runtime
    #[serde(default = "default_runtime")]
    pub runtime: u64,
    // Extra arguments appended after the fixed ones
    #[serde(default)]
    pub params: Vec<String>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            exec: default_exec(),
            runtime: default_runtime(),
            params: Vec::new(),
        }
    }
}

impl Default for SweepConfig {
    /// Every benchmark under every policy. The queue benchmark needs a producer and a consumer,
    /// its grid skips single threaded runs.
    fn default() -> Self {
        let policies = Policy::ALL.map(|policy| policy.as_str().to_owned()).to_vec();

        let grids = Benchmark::ALL
            .into_iter()
            .map(|bench| Grid {
                benchmarks: vec![bench.as_str().to_owned()],
                policies: policies.clone(),
                threads: DEFAULT_THREADS
                    .into_iter()
                    .filter(|&threads| !bench.requires_concurrency() || threads > 1)
                    .collect(),
            })
            .collect();

        Self {
            executor: ExecutorConfig::default(),
            store: StoreConfig::default(),
            grids,
        }
    }
}

impl SweepConfig {
    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> Result<Self, ConfigErrors> {
        let text = fs::read_to_string(path)
            .map_err(|error| ConfigErrors::Unreadable(path.to_path_buf(), error))?;

        text.parse()
    }

    /// Validate the whole config, reporting every problem instead of stopping at the first one.
    /// The executable is only checked if it is actually going to be spawned.
    pub fn preflight_checks(&self, check_exec: bool) -> Result<(), ConfigErrors> {
        let mut errors = 0;

        if self.grids.is_empty() {
            error!("No grid was defined, there is nothing to run");
            errors += 1;
        }

        for (index, grid) in self.grids.iter().enumerate() {
            for (field, empty) in [
                ("benchmarks", grid.benchmarks.is_empty()),
                ("policies", grid.policies.is_empty()),
                ("threads", grid.threads.is_empty()),
            ] {
                if empty {
                    error!("grids[{index}].{field} is empty, the grid would be a NOP");
                    errors += 1;
                }
            }

            for (field, repeated) in [
                ("benchmarks", has_duplicates(&grid.benchmarks)),
                ("policies", has_duplicates(&grid.policies)),
                ("threads", has_duplicates(&grid.threads)),
            ] {
                if repeated {
                    error!("grids[{index}].{field} repeats a value, configurations would run twice");
                    errors += 1;
                }
            }

            if grid.threads.contains(&0) {
                error!("grids[{index}].threads contains 0, thread counts start at 1");
                errors += 1;
            }

            for bench in grid.benchmarks.iter() {
                if bench.parse::<Benchmark>().is_err() {
                    warn!("grids[{index}] uses unknown benchmark '{bench}', it won't be plotted");
                }
            }

            for policy in grid.policies.iter() {
                if policy.parse::<Policy>().is_err() {
                    warn!("grids[{index}] uses unknown policy '{policy}', it won't be plotted");
                }
            }
        }

        if self.executor.runtime == 0 {
            error!("executor.runtime cannot be 0");
            errors += 1;
        }

        if let Err(reason) = self.store.validate() {
            error!("store: {reason}");
            errors += 1;
        }

        if check_exec {
            match check_executable(&self.executor.exec) {
                Ok(true) => {}
                Ok(false) => {
                    error!(
                        "executor.exec ({}) is not executable",
                        self.executor.exec.to_string_lossy()
                    );
                    errors += 1;
                }
                Err(e) => {
                    error!(
                        "Failed to determine if executor.exec ({}) is an executable: {e}",
                        self.executor.exec.to_string_lossy()
                    );
                    errors += 1;
                }
            }
        }

        if errors == 0 {
            Ok(())
        } else {
            Err(ConfigErrors::Preflight(errors))
        }
    }
}

impl std::str::FromStr for SweepConfig {
    type Err = ConfigErrors;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Ok(serde_yaml::from_str(text)?)
    }
}

fn has_duplicates<T: Eq + Hash>(values: &[T]) -> bool {
    let mut seen = HashSet::with_capacity(values.len());

    !values.iter().all(|value| seen.insert(value))
}

fn default_exec() -> PathBuf {
    PathBuf::from("./bench")
}

fn default_runtime() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::StoreMode;
    use std::{fs::Permissions, os::unix::fs::PermissionsExt};
    use tempfile::tempdir;

    #[test]
    fn default_grids() {
        let config = SweepConfig::default();

        assert_eq!(config.grids.len(), 2);
        assert_eq!(config.grids[0].benchmarks, vec!["readonly"]);
        assert_eq!(config.grids[0].threads, DEFAULT_THREADS.to_vec());
        assert_eq!(config.grids[1].benchmarks, vec!["queue"]);
        assert_eq!(config.grids[1].threads, DEFAULT_THREADS[1..].to_vec());
        assert_eq!(
            config.grids[1].policies,
            vec!["global_lock", "per_node_lock", "lock_free", "lock_free_rcu"]
        );
        assert_eq!(config.executor.runtime, 30);
        assert_eq!(config.executor.exec, PathBuf::from("./bench"));
    }

    #[test]
    fn parse_minimal() {
        let config = "grids:\n  - benchmarks: [readonly]\n    policies: [global_lock, lock_free]\n    threads: [1, 2]\n"
            .parse::<SweepConfig>()
            .unwrap();

        assert_eq!(config.executor, ExecutorConfig::default());
        assert_eq!(config.store.mode, StoreMode::Delayed);
        assert_eq!(config.grids[0].threads, vec![1, 2]);
        assert!(config.preflight_checks(false).is_ok());
    }

    #[test]
    fn parse_full() {
        let config = "
executor:
  exec: /opt/bench
  runtime: 5
  params: [--pin]
store:
  mode: batched
  size: 3
grids:
  - benchmarks: [queue]
    policies: [lock_free_rcu]
    threads: [12, 6]
"
        .parse::<SweepConfig>()
        .unwrap();

        assert_eq!(config.executor.exec, PathBuf::from("/opt/bench"));
        assert_eq!(config.executor.runtime, 5);
        assert_eq!(config.executor.params, vec!["--pin"]);
        assert_eq!(config.store.mode, StoreMode::Batched);
        assert_eq!(config.store.size, 3);
        assert_eq!(config.grids[0].threads, vec![12, 6]);
    }

    #[test]
    fn malformed_grids_fail_to_parse() {
        // wrong type
        assert!(matches!(
            "grids:\n  - {benchmarks: readonly, policies: [lock_free], threads: [1]}\n"
                .parse::<SweepConfig>(),
            Err(ConfigErrors::Malformed(_))
        ));
        // negative thread count
        assert!("grids:\n  - {benchmarks: [readonly], policies: [lock_free], threads: [-1]}\n"
            .parse::<SweepConfig>()
            .is_err());
        // misspelled field
        assert!("grids:\n  - {benchmark: [readonly], policies: [lock_free], threads: [1]}\n"
            .parse::<SweepConfig>()
            .is_err());
    }

    #[test]
    fn preflight_counts_every_problem() {
        let mut config = "grids:\n  - {benchmarks: [], policies: [lock_free], threads: [0, 1]}\n"
            .parse::<SweepConfig>()
            .unwrap();
        config.executor.runtime = 0;

        assert!(matches!(
            config.preflight_checks(false),
            Err(ConfigErrors::Preflight(3))
        ));
    }

    #[test]
    fn preflight_rejects_repeated_values() {
        let config = "grids:\n  - {benchmarks: [readonly, readonly], policies: [lock_free], threads: [1, 1]}\n  - {benchmarks: [queue], policies: [lock_free, global_lock], threads: [2, 4]}\n"
            .parse::<SweepConfig>()
            .unwrap();

        assert!(matches!(
            config.preflight_checks(false),
            Err(ConfigErrors::Preflight(2))
        ));
    }

    #[test]
    fn preflight_unknown_names_are_not_fatal() {
        let config = "grids:\n  - {benchmarks: [stack], policies: [spinlock], threads: [1]}\n"
            .parse::<SweepConfig>()
            .unwrap();

        assert!(config.preflight_checks(false).is_ok());
    }

    #[test]
    fn preflight_checks_executable() {
        let dir = tempdir().unwrap();
        let exec = dir.path().join("bench");
        fs::write(&exec, "#!/bin/sh\necho 1\n").unwrap();

        let mut config = SweepConfig::default();
        config.executor.exec = exec.clone();
        assert!(config.preflight_checks(true).is_err());

        fs::set_permissions(&exec, Permissions::from_mode(0o755)).unwrap();
        assert!(config.preflight_checks(true).is_ok());

        config.executor.exec = dir.path().join("missing");
        assert!(config.preflight_checks(true).is_err());
        assert!(config.preflight_checks(false).is_ok());
    }
}
