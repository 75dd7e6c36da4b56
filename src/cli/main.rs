//! Data Structures Olympics CLI
//!
//! Runs the benchmark step, the leaderboard step, or both.
//!
//! Usage:
//!   olympics [OPTIONS] <COMMAND>
//!
//! Commands:
//!   run          Build the executable, run all repetitions, write the latest-run artifact
//!   leaderboard  Append the latest run to the ledger and publish the leaderboard
//!   all          `run` followed by `leaderboard`
//!   best         Print the best-ever table from the ledger

use anyhow::Context;
use clap::{Parser, Subcommand};
use ds_olympics::{
    best_ever, telemetry, Config, Environment, HistoryStore, Olympics, ProcessToolchain,
};
use std::path::PathBuf;
use tracing::info;

/// Data Structures Olympics
///
/// Tracks insert/search performance of list-like data structures across
/// commits and keeps an all-time leaderboard.
#[derive(Parser, Debug)]
#[command(name = "olympics")]
#[command(about = "Benchmark data structures and maintain the leaderboard")]
#[command(version)]
struct Args {
    /// Configuration file path
    #[arg(short, long, env = "OLYMPICS_CONFIG", default_value = ds_olympics::config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Log level
    #[arg(long, env = "OLYMPICS_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON log format
    #[arg(long, env = "OLYMPICS_JSON_LOGS")]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Build the executable, run all repetitions, write the latest-run artifact
    Run,
    /// Append the latest run to the ledger and publish the leaderboard
    Leaderboard,
    /// Run the benchmark, then update the leaderboard
    All,
    /// Print the best-ever table from the ledger without modifying it
    Best,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    telemetry::init_logging(&args.log_level, args.json_logs)?;
    info!("Data Structures Olympics v{}", ds_olympics::VERSION);

    let config = Config::load(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config.display()))?;
    let olympics = Olympics::new(config, Environment::from_env(), ProcessToolchain::new());

    match args.command {
        Command::Run => run(&olympics).await,
        Command::Leaderboard => leaderboard(&olympics),
        Command::All => {
            run(&olympics).await?;
            leaderboard(&olympics)
        }
        Command::Best => best(&olympics),
    }
}

async fn run(olympics: &Olympics<ProcessToolchain>) -> anyhow::Result<()> {
    let record = olympics.run_benchmark().await.context("benchmark step failed")?;
    println!(
        "[ok] Wrote {} and job summary ({} structures, {} repetitions)",
        olympics.config().paths.results.display(),
        record.aggregate.len(),
        record.repetitions
    );
    Ok(())
}

fn leaderboard(olympics: &Olympics<ProcessToolchain>) -> anyhow::Result<()> {
    let mut store = olympics.history_store();
    let update = olympics
        .update_leaderboard(&mut store)
        .context("leaderboard step failed")?;

    let paths = &olympics.config().paths;
    println!(
        "[ok] Updated {}, {} and {} ({} runs in history)",
        paths.leaderboard.display(),
        paths.readme.display(),
        paths.history.display(),
        update.history_len
    );
    Ok(())
}

fn best(olympics: &Olympics<ProcessToolchain>) -> anyhow::Result<()> {
    let store = olympics.history_store();
    let history = store
        .load()
        .with_context(|| format!("reading ledger {}", store.path().display()))?;
    let best = best_ever(history.records());

    if best.is_empty() {
        println!("No runs recorded in {}", store.path().display());
        return Ok(());
    }

    println!("{:-<78}", "");
    println!(
        "{:<24} {:>16} {:>14} {:>22}",
        "Structure", "Best total (ms)", "Commit", "Timestamp (UTC)"
    );
    println!("{:-<78}", "");
    for (name, record) in &best {
        println!(
            "{:<24} {:>16.3} {:>14} {:>22}",
            name, record.total_ms_median, record.commit, record.timestamp
        );
    }
    println!("{:-<78}", "");
    Ok(())
}
