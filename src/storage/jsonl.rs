//! JSON Lines record dumps.
//!
//! Each non-blank line is one usage record. A line that fails to parse is
//! an error: dropping it would silently shrink percentage denominators.

use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use super::StorageError;

/// Parse every non-blank line of `contents`, failing on the first bad one.
///
/// Line numbers in errors are 1-based and count blank lines.
pub fn parse_lines<T: DeserializeOwned>(contents: &str) -> Result<Vec<T>, StorageError> {
    let mut records = Vec::new();
    let mut blank = 0usize;

    for (i, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            blank += 1;
            continue;
        }
        records.push(parse_line(line, i + 1)?);
    }

    if blank > 0 {
        trace!("Skipped {} blank lines", blank);
    }
    debug!("Parsed {} JSONL records", records.len());
    Ok(records)
}

fn parse_line<T: DeserializeOwned>(line: &str, line_num: usize) -> Result<T, StorageError> {
    serde_json::from_str(line).map_err(|source| StorageError::Parse {
        line: line_num,
        source,
    })
}
