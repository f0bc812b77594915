//! Loading already-fetched record dumps.
//!
//! The aggregation core never touches the filesystem; this module is how the
//! CLI turns a backend payload saved to disk into typed records. Two layouts
//! are accepted:
//! - A JSON array of records (`.json`)
//! - JSON Lines, one record per line (`.jsonl`, `.ndjson`)

mod jsonl;

pub use jsonl::*;

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while loading records.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse record on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}

/// On-disk layout of a record dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    JsonArray,
    JsonLines,
}

impl RecordFormat {
    /// Pick a format from the file extension, falling back to sniffing the
    /// first non-whitespace byte.
    pub fn detect(path: &Path, contents: &str) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("jsonl") | Some("ndjson") => RecordFormat::JsonLines,
            Some("json") => RecordFormat::JsonArray,
            _ if contents.trim_start().starts_with('[') => RecordFormat::JsonArray,
            _ => RecordFormat::JsonLines,
        }
    }
}

/// Load every record from a JSON array or JSONL file.
pub fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StorageError> {
    if !path.exists() {
        return Err(StorageError::PathNotFound(path.to_path_buf()));
    }

    let contents = std::fs::read_to_string(path)?;
    let format = RecordFormat::detect(path, &contents);
    debug!("Loading {:?} as {:?}", path, format);

    let records: Vec<T> = match format {
        RecordFormat::JsonArray => serde_json::from_str(&contents)?,
        RecordFormat::JsonLines => parse_lines(&contents)?,
    };

    info!("Loaded {} records from {:?}", records.len(), path);
    Ok(records)
}
