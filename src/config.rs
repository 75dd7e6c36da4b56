//! Harness configuration.
//!
//! Settings are layered with the `config` crate: built-in defaults, then an
//! optional JSON file, then `OLYMPICS__`-prefixed environment variables
//! (`OLYMPICS__WORKLOAD__SEED=7`, `OLYMPICS__REPETITIONS=3`).

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default location of the optional configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "bench_config.json";

/// Fallback commit identifier when the environment does not provide one.
pub const LOCAL_COMMIT: &str = "local";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Build collaborator inputs
    pub build: BuildConfig,
    /// Parameters passed to every repetition
    pub workload: Workload,
    /// Number of repetitions per benchmark run
    pub repetitions: usize,
    /// Persisted file locations
    pub paths: PathsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            build: BuildConfig::default(),
            workload: Workload::default(),
            repetitions: 5,
            paths: PathsConfig::default(),
        }
    }
}

/// Declarative inputs of the external build step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BuildConfig {
    /// Compiler executable
    pub cc: String,
    /// Whitespace-separated compiler flags
    pub cflags: String,
    /// Source files, in command-line order
    pub sources: Vec<PathBuf>,
    /// Output binary path
    pub output: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            cc: "gcc".to_string(),
            cflags: "-O3 -std=c11".to_string(),
            sources: vec![
                PathBuf::from("main.c"),
                PathBuf::from("skiplist.c"),
                PathBuf::from("list.c"),
            ],
            output: PathBuf::from("bench"),
        }
    }
}

/// Operation counts and seed handed to the benchmark executable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Workload {
    /// Number of inserts
    pub n_insert: u64,
    /// Number of searches for present keys
    pub n_hit: u64,
    /// Number of searches for absent keys
    pub n_miss: u64,
    /// Random seed
    pub seed: u64,
}

impl Default for Workload {
    fn default() -> Self {
        Self {
            n_insert: 100_000,
            n_hit: 100_000,
            n_miss: 100_000,
            seed: 42,
        }
    }
}

impl Workload {
    /// Positional arguments for the benchmark executable.
    pub fn to_args(&self) -> Vec<String> {
        vec![
            self.n_insert.to_string(),
            self.n_hit.to_string(),
            self.n_miss.to_string(),
            self.seed.to_string(),
        ]
    }
}

/// Locations of the files the pipeline reads and writes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    /// Latest-run artifact, overwritten every run
    pub results: PathBuf,
    /// Append-only history ledger
    pub history: PathBuf,
    /// Standalone leaderboard document
    pub leaderboard: PathBuf,
    /// Document receiving the injected leaderboard section
    pub readme: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            results: PathBuf::from("bench_results.json"),
            history: PathBuf::from("bench_history.json"),
            leaderboard: PathBuf::from("OLYMPICS.md"),
            readme: PathBuf::from("README.md"),
        }
    }
}

impl Config {
    /// Load configuration from an optional file and the environment.
    ///
    /// A missing file is not an error; the defaults apply instead.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path).required(false))
            .add_source(
                ::config::Environment::with_prefix("OLYMPICS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        tracing::debug!(path = %path.display(), ?config, "Loaded configuration");
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.repetitions == 0 {
            return Err(Error::config("repetitions must be at least 1"));
        }
        if self.build.cc.trim().is_empty() {
            return Err(Error::config("build.cc must not be empty"));
        }
        if self.build.sources.is_empty() {
            return Err(Error::config("build.sources must list at least one file"));
        }
        if self.build.output.as_os_str().is_empty() {
            return Err(Error::config("build.output must not be empty"));
        }
        Ok(())
    }
}

/// Run parameters sourced from the process environment.
///
/// Captured once so the pipeline never reads ambient state on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    /// Commit identifier of the code under test
    pub commit: String,
    /// CI step-summary file; `None` discards summaries
    pub step_summary: Option<PathBuf>,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            commit: LOCAL_COMMIT.to_string(),
            step_summary: None,
        }
    }
}

impl Environment {
    /// Read `GITHUB_SHA` and `GITHUB_STEP_SUMMARY`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Unset and empty values are
    /// treated alike.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let commit = lookup("GITHUB_SHA")
            .filter(|sha| !sha.is_empty())
            .unwrap_or_else(|| LOCAL_COMMIT.to_string());
        let step_summary = lookup("GITHUB_STEP_SUMMARY")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        Self {
            commit,
            step_summary,
        }
    }
}
