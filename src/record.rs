//! The aggregated record of one benchmark invocation.
//!
//! Field names match the JSON ledger written by earlier versions of the
//! harness, so existing `bench_history.json` files remain readable.

use crate::aggregate::{aggregate_runs, Aggregate};
use crate::config::{Workload, LOCAL_COMMIT};
use crate::measurement::RunResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp layout used in every persisted record.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Length of the commit prefix shown in reports.
pub const COMMIT_PREFIX_LEN: usize = 12;

/// One complete aggregated benchmark run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// UTC timestamp, `YYYY-MM-DDTHH:MM:SSZ`
    pub timestamp: String,
    /// Commit identifier of the code under test
    #[serde(rename = "git_sha", default = "default_commit")]
    pub commit: String,
    /// Platform the benchmark ran on
    #[serde(rename = "runner_os", default)]
    pub platform: String,
    /// Workload handed to every repetition
    pub workload: Workload,
    /// Number of repetitions executed
    pub repetitions: usize,
    /// Per-structure statistics
    pub aggregate: Aggregate,
    /// Raw per-repetition results, kept for auditing
    #[serde(default)]
    pub raw_runs: Vec<RunResult>,
}

fn default_commit() -> String {
    LOCAL_COMMIT.to_string()
}

impl RunRecord {
    /// Aggregate `runs` into a new record stamped with `at`.
    pub fn from_runs(
        runs: Vec<RunResult>,
        workload: Workload,
        commit: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        let aggregate = aggregate_runs(&runs, &workload);
        Self {
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            commit: commit.into(),
            platform: platform_descriptor(),
            workload,
            repetitions: runs.len(),
            aggregate,
            raw_runs: runs,
        }
    }

    /// Commit identifier truncated for display.
    pub fn commit_prefix(&self) -> &str {
        commit_prefix(&self.commit)
    }
}

/// Truncate a commit identifier to [`COMMIT_PREFIX_LEN`] characters.
pub fn commit_prefix(commit: &str) -> &str {
    match commit.char_indices().nth(COMMIT_PREFIX_LEN) {
        Some((idx, _)) => &commit[..idx],
        None => commit,
    }
}

/// Operating system and architecture of the current process.
pub fn platform_descriptor() -> String {
    format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH)
}
