use super::{ExecutorError, Invoker};
use crate::{
    config::ExecutorConfig,
    ingest::{self, IngestorError, RunOutput},
};
use llbench_dataset::Configuration;
use std::{
    io::Read,
    path::PathBuf,
    process::{Command, Stdio},
    time::Instant,
};
use tracing::{debug, instrument, trace};

/// Executor that spawns the benchmark on the local machine, one run at a time.
///
/// Runs must never overlap, they would compete for the cores being measured.
#[derive(Clone, Debug)]
pub struct LocalExecutor {
    exec: PathBuf,
    runtime: u64,
    params: Vec<String>,
}

impl LocalExecutor {
    pub fn load(config: &ExecutorConfig) -> Self {
        Self {
            exec: config.exec.clone(),
            runtime: config.runtime,
            params: config.params.clone(),
        }
    }

    /// `--bench <name> --policy <name> --num-threads <n> --runtime <secs>` followed by the extra
    /// params
    pub fn args(&self, config: &Configuration) -> Vec<String> {
        let mut args = vec![
            "--bench".to_owned(),
            config.bench.clone(),
            "--policy".to_owned(),
            config.policy.clone(),
            "--num-threads".to_owned(),
            config.threads.to_string(),
            "--runtime".to_owned(),
            self.runtime.to_string(),
        ];
        args.extend(self.params.iter().cloned());

        args
    }
}

impl Invoker for LocalExecutor {
    #[instrument(skip(self), fields(exec = ?self.exec), level = "debug")]
    fn invoke(&mut self, config: &Configuration) -> Result<f64, ExecutorError> {
        let start = Instant::now();

        let mut child = Command::new(&self.exec)
            .args(self.args(config))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| ExecutorError::Spawn {
                exec: self.exec.clone(),
                source,
            })?;

        // drain the pipe before waiting, a full pipe would block the child forever
        let mut stdout = Vec::new();
        let drained = match child.stdout.take() {
            Some(mut pipe) => pipe.read_to_end(&mut stdout).map(|_| ()),
            None => Ok(()),
        };
        // always reap the child, even if reading its output failed
        let status = child.wait()?;
        let runtime = start.elapsed().as_nanos();

        debug!("Finished in {runtime} ns | status: {}", status.success());

        if !status.success() {
            return Err(ExecutorError::ExitStatus {
                config: config.clone(),
                status,
            });
        }
        drained?;

        let ingest_error = |source| ExecutorError::Ingest {
            config: config.clone(),
            source,
        };
        let stdout = String::from_utf8(stdout)
            .map_err(|e| ingest_error(IngestorError::InvalidUtf8(e.utf8_error())))?;
        trace!("Output: {stdout}");

        let output = RunOutput {
            runtime,
            stdout,
            status: status.code(),
        };

        ingest::parse_throughput(&output).map_err(ingest_error)
    }
}
