//! Rewinding a conversation by deleting a message and everything after it in its branch
//!
//! A rewind removes the target record and all of its descendants (records whose
//! `parentUuid` chain leads back to it) from the log. The log is copied to a
//! timestamped backup first, and every line that is not part of the deleted
//! subtree is written back byte for byte, including blank lines, records this
//! crate does not understand, and lines that are not JSON at all.
//!
//! # Error Handling Strategy
//!
//! - **Missing log**: not an error; reported as an unsuccessful [`DeleteResult`]
//!   with no backup.
//! - **Unknown target**: not an error; reported as unsuccessful, and the backup
//!   already taken is kept.
//! - **I/O failures** while backing up, reading or rewriting propagate as
//!   `anyhow::Error` with the path in context. A failure after the backup leaves
//!   the backup in place.

pub mod backup;
pub mod closure;

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub use backup::{BACKUP_INFIX, RestoredBackup, create_backup, list_backups, restore_latest_backup};
pub use closure::descendant_closure;

use crate::models::DeleteResult;
use crate::parsers::deserializers::deserialize_non_empty_string;

/// What a rewind would delete, computed without touching the log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewindPlan {
    pub target_uuid: String,
    /// Uuids to delete, the target included, in lexical order
    pub closure: Vec<String>,
    /// Non-blank lines that would remain
    pub retained_lines: usize,
}

/// Tree identity of one log line
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LineIdentity {
    #[serde(default, deserialize_with = "deserialize_non_empty_string")]
    uuid: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty_string")]
    parent_uuid: Option<String>,
}

struct IndexedLine<'a> {
    raw: &'a [u8],
    uuid: Option<String>,
    parent_uuid: Option<String>,
}

/// Splits on `\n` only, so blank lines and a trailing newline survive a rewrite
fn index_lines(content: &[u8]) -> Vec<IndexedLine<'_>> {
    content
        .split(|&byte| byte == b'\n')
        .map(|raw| {
            let identity = if raw.trim_ascii().is_empty() {
                None
            } else {
                serde_json::from_slice::<LineIdentity>(raw).ok()
            };
            let (uuid, parent_uuid) = identity.map_or((None, None), |id| (id.uuid, id.parent_uuid));
            IndexedLine { raw, uuid, parent_uuid }
        })
        .collect()
}

/// Closure of `target` over every line with a uuid, or `None` if no line carries it
///
/// Meta and sidechain records take part: deleting a message also deletes the
/// hidden records hanging off it.
fn closure_in(lines: &[IndexedLine<'_>], target: &str) -> Option<BTreeSet<String>> {
    if !lines.iter().any(|line| line.uuid.as_deref() == Some(target)) {
        return None;
    }
    let links = lines
        .iter()
        .filter_map(|line| line.uuid.as_deref().map(|uuid| (uuid, line.parent_uuid.as_deref())));
    Some(descendant_closure(links, target))
}

fn is_retained(line: &IndexedLine<'_>, closure: &BTreeSet<String>) -> bool {
    line.uuid.as_ref().is_none_or(|uuid| !closure.contains(uuid))
}

fn read_log_bytes(log_path: &Path) -> Result<Vec<u8>> {
    fs::read(log_path).with_context(|| format!("Failed to read session log: {}", log_path.display()))
}

/// Preview a rewind without backing up or writing anything
///
/// Returns `None` when the log does not exist or no line carries `target_uuid`.
pub fn plan_rewind(log_path: &Path, target_uuid: &str) -> Result<Option<RewindPlan>> {
    if !log_path.exists() {
        return Ok(None);
    }

    let content = read_log_bytes(log_path)?;
    let lines = index_lines(&content);
    let Some(closure) = closure_in(&lines, target_uuid) else {
        return Ok(None);
    };

    let retained_lines = lines
        .iter()
        .filter(|line| !line.raw.trim_ascii().is_empty() && is_retained(line, &closure))
        .count();

    Ok(Some(RewindPlan {
        target_uuid: target_uuid.to_string(),
        closure: closure.into_iter().collect(),
        retained_lines,
    }))
}

/// Delete the message `target_uuid` and all of its descendants from a log
///
/// The log is backed up to `<log>.bak.<epoch-millis>` before it is read. Lines
/// without a uuid, including unparseable ones, are always kept.
///
/// # Errors
///
/// Returns an error if the backup cannot be created, or the log cannot be read
/// or rewritten. A missing log or an unknown target is reported through
/// [`DeleteResult::success`] instead.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use claude_conversations::delete_messages_from;
///
/// let log = Path::new("/Users/alice/.claude/projects/-Users-alice-app/abc.jsonl");
/// let result = delete_messages_from(log, "6f1c2a9e-0d4b-4c1e-9a51-3b2f1d7e8c90")?;
/// if result.success {
///     println!("Deleted {} messages", result.deleted_count);
/// }
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn delete_messages_from(log_path: &Path, target_uuid: &str) -> Result<DeleteResult> {
    if !log_path.exists() {
        return Ok(DeleteResult::missing_log());
    }

    let backup_path = create_backup(log_path)?;

    let content = read_log_bytes(log_path)?;
    let lines = index_lines(&content);
    let Some(closure) = closure_in(&lines, target_uuid) else {
        tracing::info!(log = %log_path.display(), target = target_uuid, "Rewind target not found");
        return Ok(DeleteResult::target_not_found(backup_path));
    };

    let kept: Vec<&[u8]> =
        lines.iter().filter(|line| is_retained(line, &closure)).map(|line| line.raw).collect();
    fs::write(log_path, kept.join(&b'\n'))
        .with_context(|| format!("Failed to rewrite session log: {}", log_path.display()))?;

    tracing::info!(
        log = %log_path.display(),
        target = target_uuid,
        deleted = closure.len(),
        kept_lines = kept.len(),
        "Rewound session log"
    );

    Ok(DeleteResult { success: true, backup_path: Some(backup_path), deleted_count: closure.len() })
}
