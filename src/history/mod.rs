//! Append-only history ledger.
//!
//! The ledger holds every [`RunRecord`] ever produced, in insertion order.
//! [`HistoryStore::load`] and [`HistoryStore::append`] are its only access
//! paths; entries are never edited, reordered or dropped. Callers must
//! serialize pipeline invocations: stores do no locking.

pub mod best;

pub use best::{best_ever, BestRecord, BestTable};

use crate::artifact;
use crate::record::RunRecord;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The persisted ledger document, `{"history": [RunRecord, ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryLog {
    history: Vec<RunRecord>,
}

impl HistoryLog {
    /// Records in insertion order.
    pub fn records(&self) -> &[RunRecord] {
        &self.history
    }

    /// Most recently appended record.
    pub fn latest(&self) -> Option<&RunRecord> {
        self.history.last()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Whether the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    fn push(&mut self, record: RunRecord) {
        self.history.push(record);
    }
}

/// Storage backend for the ledger.
pub trait HistoryStore {
    /// Load the full ledger; an absent ledger is empty.
    fn load(&self) -> Result<HistoryLog>;

    /// Append one record to the end of the ledger and persist it.
    fn append(&mut self, record: RunRecord) -> Result<()>;
}

/// Ledger persisted as a single JSON document.
#[derive(Debug, Clone)]
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    /// Create a store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the ledger file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for JsonHistoryStore {
    fn load(&self) -> Result<HistoryLog> {
        Ok(artifact::read_json::<HistoryLog>(&self.path)?.unwrap_or_default())
    }

    fn append(&mut self, record: RunRecord) -> Result<()> {
        let mut log = self.load()?;
        log.push(record);
        artifact::write_json(&self.path, &log)?;

        tracing::info!(
            path = %self.path.display(),
            records = log.len(),
            "Appended run to history"
        );
        Ok(())
    }
}

/// Ledger kept in memory, for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistoryStore {
    log: HistoryLog,
}

impl MemoryHistoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn load(&self) -> Result<HistoryLog> {
        Ok(self.log.clone())
    }

    fn append(&mut self, record: RunRecord) -> Result<()> {
        self.log.push(record);
        Ok(())
    }
}
