//! The benchmark and leaderboard steps.
//!
//! [`Olympics::run_benchmark`] builds the executable, runs every repetition
//! one after another, aggregates and writes the latest-run artifact.
//! [`Olympics::update_leaderboard`] appends that artifact to the ledger,
//! recomputes the best-ever table from the full history and publishes the
//! report. Both steps read and rewrite shared files without locking; only
//! one invocation may run at a time.

use crate::artifact;
use crate::config::{Config, Environment};
use crate::history::{best_ever, BestTable, HistoryStore, JsonHistoryStore};
use crate::measurement::Parser;
use crate::record::RunRecord;
use crate::report::{self, inject};
use crate::toolchain::Toolchain;
use crate::Result;
use chrono::Utc;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Outcome of a leaderboard update.
#[derive(Debug, Clone)]
pub struct LeaderboardUpdate {
    /// Rendered leaderboard document
    pub report: String,
    /// Best-ever table over the full history
    pub best: BestTable,
    /// Ledger size after the append
    pub history_len: usize,
}

/// Benchmark harness bound to a configuration and a toolchain.
pub struct Olympics<T> {
    config: Config,
    env: Environment,
    toolchain: T,
    parser: Parser,
}

impl<T: Toolchain> Olympics<T> {
    /// Create a harness with the default output parser.
    pub fn new(config: Config, env: Environment, toolchain: T) -> Self {
        Self {
            config,
            env,
            toolchain,
            parser: Parser::new(),
        }
    }

    /// Replace the output parser.
    pub fn with_parser(mut self, parser: Parser) -> Self {
        self.parser = parser;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Ledger store at the configured history path.
    pub fn history_store(&self) -> JsonHistoryStore {
        JsonHistoryStore::new(&self.config.paths.history)
    }

    /// Build, run every repetition and write the latest-run artifact.
    ///
    /// Any failing step aborts the whole run; a failed repetition is never
    /// retried or skipped.
    #[instrument(skip(self))]
    pub async fn run_benchmark(&self) -> Result<RunRecord> {
        self.config.validate()?;

        let binary = self.toolchain.build(&self.config.build).await?;
        let args = self.config.workload.to_args();
        let reps = self.config.repetitions;

        let mut runs = Vec::with_capacity(reps);
        for i in 1..=reps {
            info!("=== repetition {}/{} ===", i, reps);
            let start = Instant::now();

            let output = self.toolchain.run(&binary, &args).await?;
            debug!(repetition = i, output = %output, "Executable output");

            let run = self.parser.parse(&output, i)?;
            info!(
                repetition = i,
                structures = run.len(),
                elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Repetition complete"
            );
            runs.push(run);
        }

        let record = RunRecord::from_runs(
            runs,
            self.config.workload,
            self.env.commit.clone(),
            Utc::now(),
        );

        artifact::write_latest(&self.config.paths.results, &record)?;
        artifact::append_text(
            self.env.step_summary.as_deref(),
            &report::render_step_summary(&record),
        )?;

        info!(
            structures = record.aggregate.len(),
            "Wrote {} and job summary",
            self.config.paths.results.display()
        );
        Ok(record)
    }

    /// Append the latest run to `store` and publish the leaderboard.
    #[instrument(skip(self, store))]
    pub fn update_leaderboard(&self, store: &mut impl HistoryStore) -> Result<LeaderboardUpdate> {
        let paths = &self.config.paths;
        let latest = artifact::read_latest(&paths.results)?;

        store.append(latest.clone())?;
        let history = store.load()?;
        let best = best_ever(history.records());

        let report = report::render_leaderboard(&latest, &best);
        artifact::write_file(&paths.leaderboard, &report)?;
        inject::inject_into_file(&paths.readme, &report)?;
        artifact::append_text(
            self.env.step_summary.as_deref(),
            report::LEADERBOARD_UPDATED_NOTE,
        )?;

        info!(
            history = history.len(),
            "Updated {}, {} and ledger",
            paths.leaderboard.display(),
            paths.readme.display()
        );

        Ok(LeaderboardUpdate {
            report,
            best,
            history_len: history.len(),
        })
    }
}
