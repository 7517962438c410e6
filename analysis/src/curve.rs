use clap::ValueEnum;
use llbench_dataset::Dataset;

/// How per-core throughput is put on the y axis, one mode per rendering pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Scale {
    #[default]
    Linear,
    /// base 10 logarithm of every value
    Log,
}

impl Scale {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Self::Linear => value,
            Self::Log => value.log10(),
        }
    }

    pub fn axis_label(self) -> &'static str {
        match self {
            Self::Linear => "throughput (ops/sec/core)",
            Self::Log => "log10 throughput (ops/sec/core)",
        }
    }
}

/// Per-core throughput over thread count for one benchmark/policy pair, ordered by thread count
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Curve {
    points: Vec<(u32, f64)>,
}

impl Curve {
    /// Unknown names or pairs without measurements give an empty curve
    pub fn build(dataset: &Dataset, bench: &str, policy: &str, scale: Scale) -> Self {
        let mut raw = dataset
            .select(bench, policy)
            .map(|measurement| (measurement.config.threads, measurement.throughput))
            .collect::<Vec<_>>();
        // stable, equal thread counts keep their run order
        raw.sort_by_key(|&(threads, _)| threads);

        let points = raw
            .into_iter()
            .map(|(threads, throughput)| (threads, scale.apply(throughput / f64::from(threads))))
            .collect();

        Self { points }
    }

    pub fn points(&self) -> &[(u32, f64)] {
        &self.points
    }

    pub fn xs(&self) -> Vec<u32> {
        self.points.iter().map(|&(threads, _)| threads).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|&(_, value)| value).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use llbench_dataset::{Configuration, Measurement};

    fn dataset(results: &[(&str, &str, u32, f64)]) -> Dataset {
        results
            .iter()
            .map(|&(bench, policy, threads, throughput)| {
                Measurement::new(Configuration::new(bench, policy, threads), throughput)
            })
            .collect()
    }

    #[test]
    fn per_core_normalization() {
        let dataset = dataset(&[("readonly", "lock_free", 6, 600.0)]);
        let curve = Curve::build(&dataset, "readonly", "lock_free", Scale::Linear);

        assert_eq!(curve.points(), &[(6, 100.0)]);
    }

    #[test]
    fn sorted_by_thread_count() {
        let dataset = dataset(&[
            ("queue", "global_lock", 12, 120.0),
            ("queue", "global_lock", 1, 10.0),
            ("queue", "global_lock", 6, 60.0),
        ]);
        let curve = Curve::build(&dataset, "queue", "global_lock", Scale::Linear);

        assert_eq!(curve.xs(), vec![1, 6, 12]);
        assert_eq!(curve.ys(), vec![10.0, 10.0, 10.0]);
    }

    #[test]
    fn only_matching_pairs_are_used() {
        let dataset = dataset(&[
            ("readonly", "global_lock", 1, 10.0),
            ("readonly", "lock_free", 1, 20.0),
            ("queue", "global_lock", 2, 40.0),
        ]);
        let curve = Curve::build(&dataset, "readonly", "global_lock", Scale::Linear);

        assert_eq!(curve.points(), &[(1, 10.0)]);
    }

    #[test]
    fn missing_pair_is_empty() {
        let dataset = dataset(&[("readonly", "lock_free", 2, 10.0)]);

        assert!(Curve::build(&dataset, "queue", "lock_free", Scale::Linear).is_empty());
        assert_eq!(Curve::build(&Dataset::default(), "queue", "lock_free", Scale::Log).len(), 0);
    }

    #[test]
    fn log_scale() {
        let dataset = dataset(&[
            ("readonly", "lock_free_rcu", 2, 2000.0),
            ("readonly", "lock_free_rcu", 1, 100.0),
            ("readonly", "lock_free_rcu", 4, 0.0),
        ]);
        let curve = Curve::build(&dataset, "readonly", "lock_free_rcu", Scale::Log);

        assert_eq!(curve.xs(), vec![1, 2, 4]);
        assert_eq!(curve.ys()[..2], [2.0, 3.0]);
        // zero throughput has no logarithm, the point is kept and skipped when drawing
        assert_eq!(curve.ys()[2], f64::NEG_INFINITY);
    }
}
