//! External collaborators: the compiler and the benchmark executable.
//!
//! The pipeline only talks to a [`Toolchain`], so tests can substitute a
//! fake that returns canned output without touching a real compiler.

mod process;

pub use process::ProcessToolchain;

use crate::config::BuildConfig;
use crate::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Builds and runs the benchmark executable.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use ds_olympics::config::BuildConfig;
/// use ds_olympics::toolchain::Toolchain;
/// use std::path::{Path, PathBuf};
///
/// struct Canned;
///
/// #[async_trait]
/// impl Toolchain for Canned {
///     async fn build(&self, config: &BuildConfig) -> ds_olympics::Result<PathBuf> {
///         Ok(config.output.clone())
///     }
///
///     async fn run(&self, _binary: &Path, _args: &[String]) -> ds_olympics::Result<String> {
///         Ok("[list] inserts: 1.0 ms, search hit: 2.0 ms, search miss: 3.0 ms\n".to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait Toolchain: Send + Sync {
    /// Compile the benchmark executable and return its path.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Build`] when the compiler exits unsuccessfully.
    async fn build(&self, config: &BuildConfig) -> Result<PathBuf>;

    /// Run the executable once and return its combined output.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Execution`] when the executable exits
    /// unsuccessfully.
    async fn run(&self, binary: &Path, args: &[String]) -> Result<String>;
}
