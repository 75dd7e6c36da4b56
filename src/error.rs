//! Error types for the benchmark harness.
//!
//! Every variant is fatal for the pipeline invocation that raised it. Nothing
//! here is retried.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the harness.
#[derive(Error, Debug)]
pub enum Error {
    /// The external build step exited unsuccessfully
    #[error("Build failed ({status}): {command}")]
    Build {
        /// Command line that was executed
        command: String,
        /// Exit status description
        status: String,
        /// Combined output of the compiler
        output: String,
    },

    /// A repetition of the benchmark executable exited unsuccessfully
    #[error("Benchmark execution failed ({status}): {binary}")]
    Execution {
        /// Binary that was executed
        binary: PathBuf,
        /// Exit status description
        status: String,
        /// Combined output of the executable
        output: String,
    },

    /// A repetition produced no recognizable measurement lines
    #[error("No benchmark lines parsed in repetition {repetition}. Check the bench output format.")]
    NoMeasurementsParsed {
        /// One-based repetition index
        repetition: usize,
    },

    /// The leaderboard step ran before any benchmark step
    #[error("{} not found, run the benchmark step first", path.display())]
    MissingArtifact {
        /// Expected location of the latest-run artifact
        path: PathBuf,
    },

    /// A persisted ledger or artifact could not be decoded
    #[error("Malformed persisted state in {}: {source}", path.display())]
    MalformedState {
        /// File that failed to decode
        path: PathBuf,
        /// Underlying decode error
        #[source]
        source: serde_json::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Detailed error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a build error.
    pub fn build(
        command: impl Into<String>,
        status: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Error::Build {
            command: command.into(),
            status: status.into(),
            output: output.into(),
        }
    }

    /// Create an execution error.
    pub fn execution(
        binary: impl Into<PathBuf>,
        status: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Error::Execution {
            binary: binary.into(),
            status: status.into(),
            output: output.into(),
        }
    }

    /// Create a missing-artifact error.
    pub fn missing_artifact(path: impl Into<PathBuf>) -> Self {
        Error::MissingArtifact { path: path.into() }
    }

    /// Create a malformed-state error.
    pub fn malformed(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Error::MalformedState {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Get the error category for log fields.
    pub fn category(&self) -> &'static str {
        match self {
            Error::Build { .. } => "build",
            Error::Execution { .. } => "execution",
            Error::NoMeasurementsParsed { .. } => "parse",
            Error::MissingArtifact { .. } => "missing_artifact",
            Error::MalformedState { .. } => "malformed_state",
            Error::Config { .. } => "config",
            Error::Io(_) => "io",
            Error::Serialization(_) => "serialization",
        }
    }
}

impl From<::config::ConfigError> for Error {
    fn from(err: ::config::ConfigError) -> Self {
        Error::config(err.to_string())
    }
}
