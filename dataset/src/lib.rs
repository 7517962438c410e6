pub mod names;
pub mod store;

pub use names::{Benchmark, Policy};
pub use store::DatasetError;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single benchmark invocation, uniquely identified by its three fields
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Configuration {
    pub bench: String,
    pub policy: String,
    pub threads: u32,
}

impl Configuration {
    pub fn new(bench: impl Into<String>, policy: impl Into<String>, threads: u32) -> Self {
        Self {
            bench: bench.into(),
            policy: policy.into(),
            threads,
        }
    }

    /// true if both names match, the thread count is ignored
    pub fn matches(&self, bench: &str, policy: &str) -> bool {
        self.bench == bench && self.policy == policy
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{bench: {}, policy: {}, threads: {}}}",
            self.bench, self.policy, self.threads
        )
    }
}

/// A configuration paired with the throughput (ops/sec, summed over all threads) it produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Measurement {
    pub config: Configuration,
    pub throughput: f64,
}

impl Measurement {
    pub fn new(config: Configuration, throughput: f64) -> Self {
        Self { config, throughput }
    }
}

/// All measurements of one sweep, in the order the runs were executed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dataset {
    #[serde(rename = "RESULTS")]
    pub results: Vec<Measurement>,
}

impl Dataset {
    pub fn new(results: Vec<Measurement>) -> Self {
        Self { results }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Measurement> {
        self.results.iter()
    }

    /// all measurements for a benchmark/policy pair, in dataset order
    pub fn select<'a>(
        &'a self,
        bench: &'a str,
        policy: &'a str,
    ) -> impl Iterator<Item = &'a Measurement> + 'a {
        self.results
            .iter()
            .filter(move |measurement| measurement.config.matches(bench, policy))
    }
}

impl FromIterator<Measurement> for Dataset {
    fn from_iter<I: IntoIterator<Item = Measurement>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Extend<Measurement> for Dataset {
    fn extend<I: IntoIterator<Item = Measurement>>(&mut self, iter: I) {
        self.results.extend(iter)
    }
}
