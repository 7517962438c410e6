use itertools::iproduct;
use llbench_dataset::Configuration;
use serde::{Deserialize, Serialize};

/// Declarative sweep: every benchmark under every policy at every thread count
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Grid {
    pub benchmarks: Vec<String>,
    pub policies: Vec<String>,
    // run in the declared order, not sorted
    pub threads: Vec<u32>,
}

impl Grid {
    /// Cartesian product, benchmarks outermost, then policies, then threads
    pub fn expand(&self) -> impl Iterator<Item = Configuration> + '_ {
        iproduct!(
            self.benchmarks.iter(),
            self.policies.iter(),
            self.threads.iter()
        )
        .map(|(bench, policy, &threads)| Configuration::new(bench.as_str(), policy.as_str(), threads))
    }

    pub fn len(&self) -> usize {
        self.benchmarks.len() * self.policies.len() * self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Expand all grids in declaration order. Overlapping grids are not deduplicated.
pub fn expand_all(grids: &[Grid]) -> impl Iterator<Item = Configuration> + '_ {
    grids.iter().flat_map(Grid::expand)
}

pub fn total_len(grids: &[Grid]) -> usize {
    grids.iter().map(Grid::len).sum()
}
