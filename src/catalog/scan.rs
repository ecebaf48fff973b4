//! Direct scan of a session log for listing metadata
//!
//! Used when a project has no sidecar index, and for logs the sidecar does not
//! mention yet.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Utc};

use super::projects::session_id_of;
use crate::models::{Content, ContentBlock, ConversationEntry, Role};
use crate::parsers::conversation::read_log;
use crate::parsers::record::LogRecord;
use crate::utils::text::{NO_PROMPT, PREVIEW_MAX_CHARS, clean_prompt, is_ide_noise, truncate_chars};

/// Project fields copied onto every scanned entry
#[derive(Debug, Clone)]
pub(crate) struct ProjectContext<'a> {
    pub path: &'a Path,
    pub name: &'a str,
}

/// Metadata gathered from the records of one log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSummary {
    pub message_count: usize,
    pub first_prompt: Option<String>,
    pub git_branch: Option<String>,
    pub summary: Option<String>,
}

/// Summarize log content
///
/// Counts visible user/assistant records, takes the first usable user prompt,
/// the first git branch any record carries and the last `summary` record's text.
pub fn summarize_log(content: &str) -> LogSummary {
    let mut result = LogSummary::default();

    for record in content.lines().filter_map(LogRecord::parse) {
        if result.git_branch.is_none() {
            result.git_branch = record.git_branch.clone();
        }

        if record.is_summary() {
            if let Some(text) = record.summary.as_deref() {
                result.summary = Some(clean_prompt(text));
            }
            continue;
        }

        if !record.is_visible_message() {
            continue;
        }
        result.message_count += 1;

        if result.first_prompt.is_none() && record.record_role() == Some(Role::User) {
            result.first_prompt = record.message.as_ref().and_then(|payload| prompt_preview(&payload.content));
        }
    }

    result
}

/// Cleaned, truncated preview of a user prompt, if it has any usable text
fn prompt_preview(content: &Content) -> Option<String> {
    let cleaned = match content {
        Content::Text(text) => Some(clean_prompt(text)).filter(|cleaned| !cleaned.is_empty()),
        Content::Blocks(blocks) => blocks.iter().find_map(|block| match block {
            ContentBlock::Text { text } => {
                let cleaned = clean_prompt(text);
                (!is_ide_noise(&cleaned)).then_some(cleaned)
            }
            _ => None,
        }),
    }?;
    Some(truncate_chars(&cleaned, PREVIEW_MAX_CHARS))
}

/// File creation and modification times
///
/// Creation falls back to modification time where the platform has no birth time.
pub(crate) fn file_times(path: &Path) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    match fs::metadata(path) {
        Ok(metadata) => {
            let modified = metadata.modified().ok().map(to_utc);
            let created = metadata.created().ok().map(to_utc).or(modified);
            (created, modified)
        }
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Failed to stat session log");
            (None, None)
        }
    }
}

fn to_utc(time: SystemTime) -> DateTime<Utc> {
    DateTime::<Utc>::from(time)
}

/// Placeholder modification time for logs that cannot be stat'ed
pub(crate) fn unknown_time() -> DateTime<Utc> {
    to_utc(SystemTime::UNIX_EPOCH)
}

/// Build a listing entry for one log file by reading it directly
///
/// An unreadable file still produces an entry, with defaults in place of
/// whatever could not be read.
pub(crate) fn scan_log_file(log_path: &Path, project: &ProjectContext<'_>) -> ConversationEntry {
    let summary = match read_log(log_path) {
        Ok(content) => summarize_log(&content),
        Err(e) => {
            tracing::warn!(path = %log_path.display(), error = %e, "Failed to scan session log");
            LogSummary::default()
        }
    };
    let (created, modified) = file_times(log_path);

    ConversationEntry {
        session_id: session_id_of(log_path).unwrap_or_default(),
        log_path: log_path.to_path_buf(),
        first_prompt: summary.first_prompt.unwrap_or_else(|| NO_PROMPT.to_string()),
        summary: summary.summary,
        message_count: summary.message_count,
        created,
        modified: modified.unwrap_or_else(unknown_time),
        git_branch: summary.git_branch,
        project_path: project.path.to_path_buf(),
        project_name: project.name.to_string(),
        is_sidechain: false,
    }
}
