//! Known benchmark and policy names.
//!
//! The order of `ALL` is the canonical order used for rendering, it decides which line gets which
//! colour and where it sits in the legend.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} '{name}'")]
pub struct UnknownName {
    pub kind: &'static str,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Benchmark {
    Readonly,
    Queue,
}

impl Benchmark {
    pub const ALL: [Benchmark; 2] = [Benchmark::Readonly, Benchmark::Queue];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Readonly => "readonly",
            Self::Queue => "queue",
        }
    }

    /// the queue benchmark needs at least a producer and a consumer
    pub fn requires_concurrency(&self) -> bool {
        matches!(self, Self::Queue)
    }
}

impl FromStr for Benchmark {
    type Err = UnknownName;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|bench| bench.as_str() == name)
            .ok_or_else(|| UnknownName {
                kind: "benchmark",
                name: name.to_owned(),
            })
    }
}

impl fmt::Display for Benchmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    GlobalLock,
    PerNodeLock,
    LockFree,
    LockFreeRcu,
}

impl Policy {
    pub const ALL: [Policy; 4] = [
        Policy::GlobalLock,
        Policy::PerNodeLock,
        Policy::LockFree,
        Policy::LockFreeRcu,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GlobalLock => "global_lock",
            Self::PerNodeLock => "per_node_lock",
            Self::LockFree => "lock_free",
            Self::LockFreeRcu => "lock_free_rcu",
        }
    }

    /// short name, used for legends
    pub fn label(&self) -> &'static str {
        match self {
            Self::GlobalLock => "g-lock",
            Self::PerNodeLock => "pn-lock",
            Self::LockFree => "lock-f",
            Self::LockFreeRcu => "lock-f-rcu",
        }
    }
}

impl FromStr for Policy {
    type Err = UnknownName;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|policy| policy.as_str() == name)
            .ok_or_else(|| UnknownName {
                kind: "policy",
                name: name.to_owned(),
            })
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_back() {
        for bench in Benchmark::ALL {
            assert_eq!(bench.as_str().parse::<Benchmark>(), Ok(bench));
        }
        for policy in Policy::ALL {
            assert_eq!(policy.as_str().parse::<Policy>(), Ok(policy));
        }
    }

    #[test]
    fn unknown_names_are_rejected() {
        let error = "stack".parse::<Benchmark>().unwrap_err();

        assert_eq!(error.to_string(), "unknown benchmark 'stack'");
        assert!("spinlock".parse::<Policy>().is_err());
    }

    #[test]
    fn canonical_order() {
        let labels = Policy::ALL.map(|policy| policy.label());

        assert_eq!(labels, ["g-lock", "pn-lock", "lock-f", "lock-f-rcu"]);
        assert_eq!(Benchmark::ALL.map(|bench| bench.as_str()), ["readonly", "queue"]);
    }
}
