//! Version marker embedded in the primary artifact's header
//!
//! ```text
//! ---
//! cco_version: 4.2.0
//! last_update_check: 2026-10-19T08:00:00Z
//! ---
//! ```
//!
//! The header is read with `serde_yaml`. It is never re-serialized: the
//! timestamp is refreshed by replacing its line so every other byte of the
//! artifact stays as fetched.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_yaml::Value;

use super::validator::split_header;

pub const VERSION_KEY: &str = "cco_version";
pub const TIMESTAMP_KEY: &str = "last_update_check";

/// Installed version plus the last time it was synchronized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionMarker {
    pub version: String,
    pub last_update_check: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct MarkerHeader {
    cco_version: Option<Value>,
    last_update_check: Option<Value>,
}

/// Read the marker from artifact content.
///
/// Returns `Ok(None)` when the content has no header or the header carries no
/// version, and an error only when the header is not valid YAML.
pub fn read_marker(content: &[u8]) -> Result<Option<VersionMarker>, serde_yaml::Error> {
    let Some((header, _)) = split_header(content) else {
        return Ok(None);
    };
    let header = String::from_utf8_lossy(header);
    if header.trim().is_empty() {
        return Ok(None);
    }

    let parsed: MarkerHeader = serde_yaml::from_str(&header)?;
    let Some(version) = parsed.cco_version.as_ref().and_then(scalar_to_string) else {
        return Ok(None);
    };

    let last_update_check = parsed
        .last_update_check
        .as_ref()
        .and_then(scalar_to_string)
        .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
        .map(|ts| ts.with_timezone(&Utc));

    Ok(Some(VersionMarker {
        version: version.trim().trim_start_matches('v').to_string(),
        last_update_check,
    }))
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Format a timestamp the way it is stored in the marker
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Return `content` with `last_update_check` set to `at`.
///
/// An existing timestamp line is replaced in place. Otherwise a new line is
/// inserted after the version line, or first in the header when there is no
/// version line. Returns `None` when `content` has no header.
pub fn stamp_marker(content: &str, at: DateTime<Utc>) -> Option<String> {
    let (header, _) = split_header(content.as_bytes())?;

    let lines: Vec<&str> = content.split_inclusive('\n').collect();
    let newline = if lines[0].ends_with("\r\n") { "\r\n" } else { "\n" };
    let stamp_line = format!("{TIMESTAMP_KEY}: {}{newline}", format_timestamp(at));

    // lines[0] is the opening delimiter; header lines follow it
    let mut header_lines = 0;
    let mut consumed = 0;
    while consumed < header.len() {
        consumed += lines[1 + header_lines].len();
        header_lines += 1;
    }
    let header_range = 1..=header_lines;
    let header_slice = &lines[1..1 + header_lines];

    let has_stamp = header_slice.iter().any(|l| is_key_line(l, TIMESTAMP_KEY));
    let insert_after = header_slice
        .iter()
        .position(|l| is_key_line(l, VERSION_KEY))
        .map_or(0, |i| i + 1);

    let mut out = String::with_capacity(content.len() + stamp_line.len());
    for (idx, line) in lines.iter().enumerate() {
        if header_range.contains(&idx) && is_key_line(line, TIMESTAMP_KEY) {
            out.push_str(&stamp_line);
            continue;
        }
        out.push_str(line);
        if !has_stamp && idx == insert_after {
            out.push_str(&stamp_line);
        }
    }
    Some(out)
}

fn is_key_line(line: &str, key: &str) -> bool {
    is_key_line_bytes(line.as_bytes(), key)
}

/// `key` followed by optional spaces or tabs and a colon
fn is_key_line_bytes(line: &[u8], key: &str) -> bool {
    line.strip_prefix(key.as_bytes()).is_some_and(|rest| {
        rest.iter()
            .find(|b| !matches!(b, b' ' | b'\t'))
            .is_some_and(|b| *b == b':')
    })
}

/// Compare two artifacts ignoring the header's `last_update_check` line.
///
/// A freshly fetched primary artifact never carries the timestamp the
/// previous run stamped on disk, so plain byte equality would report it as
/// changed on every run.
pub fn equivalent_ignoring_stamp(a: &[u8], b: &[u8]) -> bool {
    if a == b {
        return true;
    }
    without_stamp(a) == without_stamp(b)
}

fn without_stamp(bytes: &[u8]) -> Vec<u8> {
    let Some((header, _)) = split_header(bytes) else {
        return bytes.to_vec();
    };
    let header_start = header.as_ptr() as usize - bytes.as_ptr() as usize;
    let header_end = header_start + header.len();

    let mut out = Vec::with_capacity(bytes.len());
    out.extend_from_slice(&bytes[..header_start]);
    for line in header.split_inclusive(|b| *b == b'\n') {
        if !is_key_line_bytes(line, TIMESTAMP_KEY) {
            out.extend_from_slice(line);
        }
    }
    out.extend_from_slice(&bytes[header_end..]);
    out
}
