//! All-time best median total per structure.
//!
//! Always recomputed from the full ledger; there is no incremental state
//! that could drift from the history it summarizes.

use crate::record::{commit_prefix, RunRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Structure name to its best-ever record.
pub type BestTable = BTreeMap<String, BestRecord>;

/// Provenance of the lowest median total seen for a structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestRecord {
    /// Lowest median total, in milliseconds
    pub total_ms_median: f64,
    /// Commit prefix of the record that set it
    #[serde(rename = "sha")]
    pub commit: String,
    /// Timestamp of the record that set it
    pub timestamp: String,
}

/// Scan `records` in order and keep, per structure, the lowest median total.
///
/// Comparison is strict, so on exact ties the earliest record wins.
pub fn best_ever<'a>(records: impl IntoIterator<Item = &'a RunRecord>) -> BestTable {
    let mut best = BestTable::new();

    for record in records {
        for (name, stats) in &record.aggregate {
            let total = stats.total_ms.median;
            let improves = best
                .get(name)
                .map_or(true, |current| total < current.total_ms_median);

            if improves {
                best.insert(
                    name.clone(),
                    BestRecord {
                        total_ms_median: total,
                        commit: commit_prefix(&record.commit).to_string(),
                        timestamp: record.timestamp.clone(),
                    },
                );
            }
        }
    }

    best
}
