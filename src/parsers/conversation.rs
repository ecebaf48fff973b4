use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::record::LogRecord;
use crate::models::{Message, Role};

/// List the visible messages of a session log, in file order
///
/// Missing or unreadable files yield an empty list. See [`parse_messages`] for
/// which records are kept.
pub fn list_messages(path: &Path) -> Vec<Message> {
    if !path.exists() {
        return Vec::new();
    }

    match read_log(path) {
        Ok(content) => parse_messages(&content),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read session log");
            Vec::new()
        }
    }
}

/// Reads a log as text, replacing invalid UTF-8 so one bad line cannot hide the rest
pub(crate) fn read_log(path: &Path) -> Result<String> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read session log: {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Parse session log content into visible messages
///
/// Each line is parsed on its own and malformed lines are skipped. Kept records
/// are `user`/`assistant` records that are not meta context, not sidechains, and
/// carry a `message` payload. The role comes from the payload when it names a
/// user or assistant, otherwise from the record type.
pub fn parse_messages(content: &str) -> Vec<Message> {
    let mut messages = Vec::new();
    let mut skipped = 0usize;

    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let Some(record) = LogRecord::parse(line) else {
            skipped += 1;
            continue;
        };

        if let Some(message) = into_message(record, index + 1) {
            messages.push(message);
        }
    }

    if skipped > 0 {
        tracing::debug!(skipped, kept = messages.len(), "Skipped unparseable log lines");
    }

    messages
}

fn into_message(record: LogRecord, line_number: usize) -> Option<Message> {
    if !record.is_visible_message() {
        return None;
    }
    let record_role = record.record_role()?;
    let payload = record.message?;

    let role = payload.role.as_deref().and_then(Role::parse).unwrap_or(record_role);

    Some(Message {
        uuid: record.uuid.unwrap_or_default(),
        parent_uuid: record.parent_uuid,
        role,
        timestamp: record.timestamp,
        line_number,
        content: payload.content,
        model: payload.model,
    })
}
