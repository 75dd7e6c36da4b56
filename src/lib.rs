//! # Data Structures Olympics
//!
//! Performance-regression tracking for interchangeable list-like data
//! structures. The harness drives an external benchmark executable over
//! several repetitions, parses its output, aggregates the repetitions into
//! robust statistics and keeps an append-only ledger from which the
//! all-time best median per structure is derived.
//!
//! ## Pipeline
//!
//! 1. [`toolchain::Toolchain::build`] compiles the executable once
//! 2. each repetition is run and parsed by [`measurement::Parser`]
//! 3. [`aggregate::aggregate_runs`] summarizes the repetitions into a [`RunRecord`]
//! 4. [`history::HistoryStore::append`] adds the record to the ledger
//! 5. [`history::best_ever`] rescans the full ledger
//! 6. [`report`] renders the leaderboard and injects it into the README
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ds_olympics::{Config, Environment, Olympics, ProcessToolchain};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> ds_olympics::Result<()> {
//!     let config = Config::load("bench_config.json")?;
//!     let olympics = Olympics::new(config, Environment::from_env(), ProcessToolchain::new());
//!
//!     olympics.run_benchmark().await?;
//!     let mut ledger = olympics.history_store();
//!     let update = olympics.update_leaderboard(&mut ledger)?;
//!     println!("{}", update.report);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod aggregate;
pub mod artifact;
pub mod config;
pub mod error;
pub mod history;
pub mod measurement;
pub mod pipeline;
pub mod record;
pub mod report;
pub mod telemetry;
pub mod toolchain;

// Re-export main types for convenience
pub use aggregate::{AggregateStat, OpsPerSec, StructureAggregate};
pub use config::{Config, Environment, Workload};
pub use error::{Error, Result};
pub use history::{best_ever, BestRecord, HistoryStore, JsonHistoryStore, MemoryHistoryStore};
pub use measurement::{Parser, RunResult, Timings};
pub use pipeline::{LeaderboardUpdate, Olympics};
pub use record::RunRecord;
pub use toolchain::{ProcessToolchain, Toolchain};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
