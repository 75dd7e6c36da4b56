//! Subprocess-backed toolchain.

use super::Toolchain;
use crate::config::BuildConfig;
use crate::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tokio::process::Command;

/// Runs the compiler and the executable as child processes.
///
/// Calls block until the child exits; there is no timeout, so a hung
/// executable stalls the run.
#[derive(Debug, Clone, Default)]
pub struct ProcessToolchain {
    working_dir: Option<PathBuf>,
}

impl ProcessToolchain {
    /// Create a toolchain that runs in the current directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every command from `dir` instead of the current directory.
    pub fn with_working_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: Some(dir.into()),
        }
    }

    fn base_dir(&self) -> Result<PathBuf> {
        match &self.working_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }

    fn command(&self, program: impl AsRef<std::ffi::OsStr>) -> Command {
        let mut cmd = Command::new(program);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

/// Stdout followed by stderr.
fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

fn compile_args(config: &BuildConfig) -> Vec<String> {
    let mut args: Vec<String> = config.cflags.split_whitespace().map(String::from).collect();
    args.extend(config.sources.iter().map(|s| s.to_string_lossy().into_owned()));
    args.push("-o".to_string());
    args.push(config.output.to_string_lossy().into_owned());
    args
}

#[async_trait]
impl Toolchain for ProcessToolchain {
    async fn build(&self, config: &BuildConfig) -> Result<PathBuf> {
        let args = compile_args(config);
        let command_line = format!("{} {}", config.cc, args.join(" "));
        tracing::info!(command = %command_line, "[build]");

        let output = self
            .command(&config.cc)
            .args(&args)
            .output()
            .await
            .map_err(|e| Error::build(&command_line, format!("failed to spawn: {e}"), ""))?;

        if !output.status.success() {
            return Err(Error::build(
                command_line,
                output.status.to_string(),
                combined_output(&output),
            ));
        }

        // resolve relative outputs so the binary is never looked up on PATH
        let binary = if config.output.is_absolute() {
            config.output.clone()
        } else {
            self.base_dir()?.join(&config.output)
        };
        Ok(binary)
    }

    async fn run(&self, binary: &Path, args: &[String]) -> Result<String> {
        tracing::info!(binary = %binary.display(), args = %args.join(" "), "[run]");

        let output = self
            .command(binary)
            .args(args)
            .output()
            .await
            .map_err(|e| Error::execution(binary, format!("failed to spawn: {e}"), ""))?;

        let text = combined_output(&output);
        if !output.status.success() {
            return Err(Error::execution(binary, output.status.to_string(), text));
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_args() {
        let args = compile_args(&BuildConfig::default());
        assert_eq!(
            args,
            vec!["-O3", "-std=c11", "main.c", "skiplist.c", "list.c", "-o", "bench"]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_captures_stdout_and_stderr() {
        let toolchain = ProcessToolchain::new();
        let out = toolchain
            .run(
                Path::new("/bin/sh"),
                &["-c".to_string(), "echo out; echo err 1>&2".to_string()],
            )
            .await
            .unwrap();
        assert_eq!(out, "out\nerr\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_failure_is_execution_error() {
        let toolchain = ProcessToolchain::new();
        let err = toolchain
            .run(Path::new("/bin/sh"), &["-c".to_string(), "echo boom; exit 3".to_string()])
            .await
            .unwrap_err();

        match err {
            Error::Execution { output, .. } => assert_eq!(output, "boom\n"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_build_failure_is_build_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let toolchain = ProcessToolchain::with_working_dir(dir.path());
        let config = BuildConfig {
            cc: "false".to_string(),
            ..BuildConfig::default()
        };

        let err = toolchain.build(&config).await.unwrap_err();
        assert!(matches!(err, Error::Build { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_build_resolves_relative_output() {
        let dir = tempfile::TempDir::new().unwrap();
        let toolchain = ProcessToolchain::with_working_dir(dir.path());
        let config = BuildConfig {
            cc: "true".to_string(),
            ..BuildConfig::default()
        };

        let binary = toolchain.build(&config).await.unwrap();
        assert_eq!(binary, dir.path().join("bench"));
    }
}
