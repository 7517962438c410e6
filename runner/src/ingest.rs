use std::str::Utf8Error;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error, PartialEq)]
pub enum IngestorError {
    #[error("Benchmark printed nothing")]
    Empty,
    #[error("Benchmark printed {0} tokens, expected a single number")]
    MultipleTokens(usize),
    #[error("Benchmark output is not valid UTF-8: {0}")]
    InvalidUtf8(Utf8Error),
    #[error("Benchmark output '{0}' is not a number")]
    NotANumber(String),
    #[error("Benchmark reported a non-finite throughput ({0})")]
    NotFinite(f64),
    #[error("Benchmark reported a negative throughput ({0})")]
    Negative(f64),
}

#[derive(Debug, Clone, Default)]
/// container for information extracted from running a benchmark
pub struct RunOutput {
    // wall clock runtime in ns
    pub runtime: u128,
    pub stdout: String,
    // exit code, None if the process was killed by a signal
    pub status: Option<i32>,
}

/// The benchmark reports a single floating point number, its throughput in ops/sec over all
/// threads. Surrounding whitespace is ignored, anything else is a protocol violation.
#[tracing::instrument(level = "debug", skip(output), fields(runtime_ns = output.runtime as u64))]
pub fn parse_throughput(output: &RunOutput) -> Result<f64, IngestorError> {
    let text = output.stdout.trim();

    let result = match text.split_whitespace().count() {
        0 => Err(IngestorError::Empty),
        1 => match text.parse::<f64>() {
            Ok(value) if !value.is_finite() => Err(IngestorError::NotFinite(value)),
            Ok(value) if value < 0.0 => Err(IngestorError::Negative(value)),
            Ok(value) => Ok(value),
            Err(_) => Err(IngestorError::NotANumber(text.to_owned())),
        },
        tokens => Err(IngestorError::MultipleTokens(tokens)),
    };

    match &result {
        Ok(throughput) => debug!(throughput, "Ingested benchmark output"),
        Err(e) => error!(
            stdout = %output.stdout,
            status = ?output.status,
            "Failed to ingest benchmark output: {e}"
        ),
    }

    result
}
