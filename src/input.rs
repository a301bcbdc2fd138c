// src/input.rs

//! Input reconciliation: turning `--count` and `--input` lines into a
//! [`JobSet`].

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::errors::{MultiError, Result};
use crate::types::JobSet;

/// Effective count: `None` and `Some(0)` both mean "unspecified" and fall
/// back to a single job.
pub fn effective_count(count: Option<usize>) -> usize {
    match count {
        Some(c) if c > 0 => c,
        _ => 1,
    }
}

/// Reconcile an optional explicit count with optional input lines.
///
/// - Without input: `count` jobs with empty items.
/// - With input: `max(count, lines.len())` jobs; indices past the end of the
///   input get an empty item.
pub fn reconcile(count: Option<usize>, lines: Option<Vec<String>>) -> JobSet {
    let count = effective_count(count);
    match lines {
        None => JobSet::from_items(count, &[]),
        Some(lines) => JobSet::from_items(count.max(lines.len()), &lines),
    }
}

/// Split raw input into trimmed lines.
///
/// A final newline does not produce a trailing empty entry, a trailing
/// partial line is kept, and blank lines in the middle stay as `""`.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(|l| l.trim().to_string()).collect()
}

/// Read `reader` to the end and split it into lines.
///
/// Invalid UTF-8 is replaced with U+FFFD rather than rejected.
pub async fn read_lines<R>(mut reader: R) -> Result<Vec<String>>
where
    R: AsyncRead + Unpin,
{
    let mut raw = Vec::new();
    reader
        .read_to_end(&mut raw)
        .await
        .map_err(MultiError::Input)?;
    Ok(split_lines(&String::from_utf8_lossy(&raw)))
}
