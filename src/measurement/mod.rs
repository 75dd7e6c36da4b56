//! Per-repetition measurement types.

pub mod parser;

pub use parser::{LineGrammar, MeasurementLine, OlympicsGrammar, Parser};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The four timings recorded for one structure in one repetition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timings {
    /// Insert phase duration in milliseconds
    pub insert_ms: f64,
    /// Search-hit phase duration in milliseconds
    pub search_hit_ms: f64,
    /// Search-miss phase duration in milliseconds
    pub search_miss_ms: f64,
    /// Sum of the three phases
    pub total_ms: f64,
}

impl Timings {
    /// Build timings from the three phase durations; the total is derived.
    pub fn new(insert_ms: f64, search_hit_ms: f64, search_miss_ms: f64) -> Self {
        Self {
            insert_ms,
            search_hit_ms,
            search_miss_ms,
            total_ms: insert_ms + search_hit_ms + search_miss_ms,
        }
    }

    /// Value of one metric.
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Insert => self.insert_ms,
            Metric::SearchHit => self.search_hit_ms,
            Metric::SearchMiss => self.search_miss_ms,
            Metric::Total => self.total_ms,
        }
    }
}

/// One timing column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// `insert_ms`
    Insert,
    /// `search_hit_ms`
    SearchHit,
    /// `search_miss_ms`
    SearchMiss,
    /// `total_ms`
    Total,
}

impl Metric {
    /// All metrics in persisted order.
    pub const ALL: [Metric; 4] = [
        Metric::Insert,
        Metric::SearchHit,
        Metric::SearchMiss,
        Metric::Total,
    ];

    /// Persisted field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Insert => "insert_ms",
            Metric::SearchHit => "search_hit_ms",
            Metric::SearchMiss => "search_miss_ms",
            Metric::Total => "total_ms",
        }
    }
}

/// Structure name to timings for a single repetition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunResult(BTreeMap<String, Timings>);

impl RunResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record timings for a structure, replacing an earlier entry of the same name.
    pub fn insert(&mut self, name: impl Into<String>, timings: Timings) -> Option<Timings> {
        self.0.insert(name.into(), timings)
    }

    /// Timings for a structure, if it reported in this repetition.
    pub fn get(&self, name: &str) -> Option<&Timings> {
        self.0.get(name)
    }

    /// Structure names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterate over `(name, timings)` pairs, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Timings)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of structures.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no structure reported.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Timings)> for RunResult {
    fn from_iter<I: IntoIterator<Item = (String, Timings)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
