//! File I/O for persisted artifacts.
//!
//! Provides reading and writing of the latest-run artifact and the
//! whole-file replace used by every other persisted document.

use crate::record::RunRecord;
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Replace the contents of `path` with `contents`.
///
/// The data is written to a sibling temporary file first and then renamed
/// over the target, so readers see either the old or the new file.
pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = temp_path(path);
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Serialize `value` as pretty JSON into `path`.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    write_file(path, &json)
}

/// Read JSON from `path`, returning `None` when the file does not exist.
///
/// # Errors
///
/// A file that exists but fails to decode is reported as
/// [`Error::MalformedState`]; it is never replaced with a default.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    serde_json::from_str(&json)
        .map(Some)
        .map_err(|e| Error::malformed(path, e))
}

/// Overwrite the latest-run artifact.
pub fn write_latest(path: &Path, record: &RunRecord) -> Result<()> {
    write_json(path, record)?;
    tracing::info!(path = %path.display(), "Wrote latest-run artifact");
    Ok(())
}

/// Read the latest-run artifact.
///
/// # Errors
///
/// Returns [`Error::MissingArtifact`] when the benchmark step has not
/// produced one yet.
pub fn read_latest(path: &Path) -> Result<RunRecord> {
    read_json(path)?.ok_or_else(|| Error::missing_artifact(path))
}

/// Append `text` to `path`, or do nothing when `path` is `None`.
pub fn append_text(path: Option<&Path>, text: &str) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    file.write_all(text.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Workload;
    use crate::measurement::{RunResult, Timings};
    use chrono::Utc;
    use tempfile::TempDir;

    fn record() -> RunRecord {
        let mut run = RunResult::new();
        run.insert("skiplist", Timings::new(1.0, 1.0, 1.0));
        RunRecord::from_runs(vec![run], Workload::default(), "local", Utc::now())
    }

    #[test]
    fn test_write_and_read_latest() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join("bench_results.json");

        let written = record();
        write_latest(&path, &written).unwrap();
        assert!(!temp_path(&path).exists());

        let read = read_latest(&path).unwrap();
        assert_eq!(read, written);
    }

    #[test]
    fn test_missing_latest() {
        let temp_dir = TempDir::new().unwrap();
        let err = read_latest(&temp_dir.path().join("bench_results.json")).unwrap_err();
        assert!(matches!(err, Error::MissingArtifact { .. }));
    }

    #[test]
    fn test_malformed_latest() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bench_results.json");
        fs::write(&path, "{\"timestamp\": 3").unwrap();

        let err = read_latest(&path).unwrap_err();
        assert!(matches!(err, Error::MalformedState { .. }));
        // the broken file is left untouched
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"timestamp\": 3");
    }

    #[test]
    fn test_append_text() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("summary.md");

        append_text(Some(&path), "one\n").unwrap();
        append_text(Some(&path), "two\n").unwrap();
        append_text(None, "discarded").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }
}
