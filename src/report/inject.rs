//! Injection of a rendered section into a larger document.
//!
//! The section lives between [`START_MARKER`] and [`END_MARKER`]. The
//! section is closed by the first end marker that has a start marker before
//! it, and opened by the nearest such start marker. Only the bytes strictly
//! between that pair are ever replaced; everything else in the document,
//! stray markers included, is carried over verbatim.

use crate::{artifact, Result};
use std::fs;
use std::io;
use std::path::Path;

/// Opening sentinel of the injected section.
pub const START_MARKER: &str = "<!-- OLYMPICS START -->";

/// Closing sentinel of the injected section.
pub const END_MARKER: &str = "<!-- OLYMPICS END -->";

fn marked_section(content: &str) -> String {
    format!("{START_MARKER}\n\n{content}\n\n{END_MARKER}\n")
}

/// Byte range of the section body, between the end of the start marker and
/// the beginning of the end marker.
fn section_body(text: &str) -> Option<(usize, usize)> {
    let first_start = text.find(START_MARKER)?;
    let after = first_start + START_MARKER.len();
    let end = after + text[after..].find(END_MARKER)?;
    let start = text[..end].rfind(START_MARKER)?;
    Some((start + START_MARKER.len(), end))
}

/// Place `content` into `document`.
///
/// - a marked section exists: its body is replaced with `content` padded by
///   blank lines
/// - otherwise: a new marked section is appended after a blank line
/// - no document at all: the result is just the marked section
///
/// An unpaired marker never pairs with a section appended later, so
/// reinjecting the same content is a no-op for any document.
pub fn inject_section(document: Option<&str>, content: &str) -> String {
    let Some(text) = document else {
        return marked_section(content);
    };

    match section_body(text) {
        Some((body_start, body_end)) => format!(
            "{}\n\n{}\n\n{}",
            &text[..body_start],
            content,
            &text[body_end..]
        ),
        None => format!("{}\n\n{}", text.trim_end(), marked_section(content)),
    }
}

/// Inject `content` into the document at `path`, creating it if needed.
pub fn inject_into_file(path: &Path, content: &str) -> Result<()> {
    let existing = match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => return Err(e.into()),
    };

    let updated = inject_section(existing.as_deref(), content);
    if existing.as_deref() == Some(updated.as_str()) {
        tracing::debug!(path = %path.display(), "Injected section unchanged");
        return Ok(());
    }

    artifact::write_file(path, &updated)?;
    tracing::info!(path = %path.display(), "Updated injected section");
    Ok(())
}
