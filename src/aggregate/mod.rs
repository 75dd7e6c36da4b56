//! Combining repetitions into per-structure summaries.

mod stat;

pub use stat::AggregateStat;

use crate::config::Workload;
use crate::measurement::{Metric, RunResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Structure name to aggregated statistics.
pub type Aggregate = BTreeMap<String, StructureAggregate>;

/// Aggregated statistics for one structure across all repetitions it reported in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureAggregate {
    /// Insert phase
    pub insert_ms: AggregateStat,
    /// Search-hit phase
    pub search_hit_ms: AggregateStat,
    /// Search-miss phase
    pub search_miss_ms: AggregateStat,
    /// Per-repetition totals, aggregated as their own series
    pub total_ms: AggregateStat,
    /// Throughput derived from the medians
    pub ops_per_sec: OpsPerSec,
}

impl StructureAggregate {
    /// Statistics for one metric.
    pub fn stat(&self, metric: Metric) -> &AggregateStat {
        match metric {
            Metric::Insert => &self.insert_ms,
            Metric::SearchHit => &self.search_hit_ms,
            Metric::SearchMiss => &self.search_miss_ms,
            Metric::Total => &self.total_ms,
        }
    }
}

/// Operations per second, `None` where the median duration is zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpsPerSec {
    /// Inserts per second
    pub insert: Option<f64>,
    /// Successful searches per second
    pub search_hit: Option<f64>,
    /// Unsuccessful searches per second
    pub search_miss: Option<f64>,
}

impl OpsPerSec {
    fn derive(workload: &Workload, insert: f64, hit: f64, miss: f64) -> Self {
        Self {
            insert: rate(workload.n_insert, insert),
            search_hit: rate(workload.n_hit, hit),
            search_miss: rate(workload.n_miss, miss),
        }
    }
}

fn rate(count: u64, median_ms: f64) -> Option<f64> {
    let secs = median_ms / 1000.0;
    if secs > 0.0 {
        Some(count as f64 / secs)
    } else {
        None
    }
}

/// Aggregate per-repetition results.
///
/// The name universe is the union of names across `runs`. A structure's
/// series only holds the repetitions it actually reported in; absent
/// repetitions are skipped, never filled in.
pub fn aggregate_runs(runs: &[RunResult], workload: &Workload) -> Aggregate {
    let names: BTreeSet<&str> = runs.iter().flat_map(RunResult::names).collect();
    let mut aggregate = Aggregate::new();

    for name in names {
        let series = |metric: Metric| -> Vec<f64> {
            runs.iter()
                .filter_map(|run| run.get(name))
                .map(|timings| timings.get(metric))
                .collect()
        };

        let stats = (
            AggregateStat::from_samples(series(Metric::Insert)),
            AggregateStat::from_samples(series(Metric::SearchHit)),
            AggregateStat::from_samples(series(Metric::SearchMiss)),
            AggregateStat::from_samples(series(Metric::Total)),
        );
        let (Some(insert_ms), Some(search_hit_ms), Some(search_miss_ms), Some(total_ms)) = stats
        else {
            continue;
        };

        if insert_ms.count() < runs.len() {
            tracing::warn!(
                structure = name,
                present = insert_ms.count(),
                repetitions = runs.len(),
                "Structure missing from some repetitions"
            );
        }

        let ops_per_sec = OpsPerSec::derive(
            workload,
            insert_ms.median,
            search_hit_ms.median,
            search_miss_ms.median,
        );

        aggregate.insert(
            name.to_string(),
            StructureAggregate {
                insert_ms,
                search_hit_ms,
                search_miss_ms,
                total_ms,
                ops_per_sec,
            },
        );
    }

    aggregate
}
