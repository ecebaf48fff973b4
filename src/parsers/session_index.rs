//! Reader for the optional `sessions-index.json` sidecar in a project directory
//!
//! The sidecar is written by Claude Code, not by this crate, and can lag behind the
//! logs actually on disk. It is only ever read here, and callers treat it as a hint.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::deserializers::{
    deserialize_lenient_bool, deserialize_non_empty_string, deserialize_optional_timestamp,
};

pub const SESSION_INDEX_FILENAME: &str = "sessions-index.json";

/// Parsed sidecar index
#[derive(Debug, Clone, Default)]
pub struct SessionIndexFile {
    pub original_path: Option<PathBuf>,
    pub entries: Vec<SessionIndexEntry>,
    /// Entries that were present but could not be decoded
    pub skipped_entries: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIndexEntry {
    pub session_id: String,
    #[serde(default, deserialize_with = "deserialize_non_empty_string")]
    pub full_path: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty_string")]
    pub first_prompt: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty_string")]
    pub summary: Option<String>,
    #[serde(default)]
    pub message_count: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub modified: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_non_empty_string")]
    pub git_branch: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty_string")]
    pub project_path: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_bool")]
    pub is_sidechain: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIndexFile {
    #[serde(default, deserialize_with = "deserialize_non_empty_string")]
    original_path: Option<String>,
    #[serde(default)]
    entries: Option<Vec<Value>>,
}

pub fn session_index_path(project_dir: &Path) -> PathBuf {
    project_dir.join(SESSION_INDEX_FILENAME)
}

/// Load the sidecar index of a project directory
///
/// Returns `Ok(None)` when there is no sidecar. Entries are decoded one by one so a
/// single malformed entry is skipped instead of discarding the index.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or is not a JSON object.
pub fn load_session_index(project_dir: &Path) -> Result<Option<SessionIndexFile>> {
    let path = session_index_path(project_dir);
    if !path.is_file() {
        return Ok(None);
    }

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read session index: {}", path.display()))?;
    let file: RawIndexFile = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse session index: {}", path.display()))?;

    let mut entries = Vec::new();
    let mut skipped_entries = 0;
    for value in file.entries.unwrap_or_default() {
        match serde_json::from_value::<SessionIndexEntry>(value) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping malformed session index entry");
                skipped_entries += 1;
            }
        }
    }

    Ok(Some(SessionIndexFile {
        original_path: file.original_path.map(PathBuf::from),
        entries,
        skipped_entries,
    }))
}

/// Just the `originalPath` of a project's sidecar, if readable and non-empty
pub fn read_original_path(project_dir: &Path) -> Option<PathBuf> {
    match load_session_index(project_dir) {
        Ok(index) => index.and_then(|index| index.original_path),
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring unreadable session index");
            None
        }
    }
}
