use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::projects::{ProjectDir, log_files, project_dirs, session_id_of};
use super::scan::{ProjectContext, file_times, scan_log_file, unknown_time};
use crate::models::ConversationEntry;
use crate::parsers::session_index::{SessionIndexEntry, SessionIndexFile, load_session_index};
use crate::utils::text::{NO_PROMPT, clean_prompt};
use crate::utils::{ClaudeLayout, display_name, reconstruct_path, validate_directory_token};

/// List conversations, most recently modified first
///
/// With a project token, only that project directory is read; without one, every
/// project is. Each project's sidecar index is reconciled against the log files
/// actually present, so logs the index has not caught up with still appear.
/// Sidechain sessions are never listed.
///
/// An invalid token or a missing project directory yields an empty list.
///
/// # Examples
///
/// ```no_run
/// use claude_conversations::{ClaudeLayout, list_conversations};
///
/// let layout = ClaudeLayout::from_env()?;
/// for entry in list_conversations(&layout, Some("-Users-alice-my-app")) {
///     println!("{} {}", entry.session_id, entry.title());
/// }
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn list_conversations(layout: &ClaudeLayout, project_token: Option<&str>) -> Vec<ConversationEntry> {
    let dirs = match project_token {
        Some(token) => {
            if let Err(e) = validate_directory_token(token) {
                tracing::warn!(error = %e, "Rejected project token");
                return Vec::new();
            }
            let path = layout.project_dir(token);
            // Symlinked project directories are refused, as in the full listing
            if !fs::symlink_metadata(&path).is_ok_and(|metadata| metadata.is_dir()) {
                return Vec::new();
            }
            vec![ProjectDir { token: token.to_string(), path }]
        }
        None => project_dirs(layout),
    };

    let mut conversations: Vec<ConversationEntry> =
        dirs.iter().flat_map(|dir| project_conversations(dir, layout.home())).collect();

    conversations.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.session_id.cmp(&b.session_id)));
    conversations
}

/// Conversations of one project directory, unsorted
fn project_conversations(dir: &ProjectDir, home: &Path) -> Vec<ConversationEntry> {
    match load_session_index(&dir.path) {
        Ok(Some(index)) => reconcile(dir, home, index),
        Ok(None) => scan_all(dir, home),
        Err(e) => {
            tracing::warn!(project = %dir.token, error = %e, "Falling back to scanning session logs");
            scan_all(dir, home)
        }
    }
}

fn scan_all(dir: &ProjectDir, home: &Path) -> Vec<ConversationEntry> {
    let resolved_path = reconstruct_path(&dir.token, home);
    let name = project_name(&resolved_path, &dir.token);
    let project = ProjectContext { path: &resolved_path, name: &name };

    log_files(&dir.path).iter().map(|log| scan_log_file(log, &project)).collect()
}

/// Merge sidecar entries with a scan of the logs the sidecar does not know about
fn reconcile(dir: &ProjectDir, home: &Path, index: SessionIndexFile) -> Vec<ConversationEntry> {
    let resolved_path =
        index.original_path.clone().unwrap_or_else(|| reconstruct_path(&dir.token, home));
    let name = project_name(&resolved_path, &dir.token);
    let project = ProjectContext { path: &resolved_path, name: &name };

    // Sidechain ids count as known so their logs do not resurface through the scan
    let known_ids: HashSet<&str> = index.entries.iter().map(|entry| entry.session_id.as_str()).collect();

    let unindexed: Vec<PathBuf> = log_files(&dir.path)
        .into_iter()
        .filter(|log| session_id_of(log).is_some_and(|id| !known_ids.contains(id.as_str())))
        .collect();

    if !unindexed.is_empty() {
        tracing::debug!(project = %dir.token, count = unindexed.len(), "Scanning logs missing from session index");
    }

    let mut conversations: Vec<ConversationEntry> = index
        .entries
        .iter()
        .filter(|entry| !entry.is_sidechain)
        .map(|entry| from_index_entry(entry, &dir.path, &project))
        .collect();
    conversations.extend(unindexed.iter().map(|log| scan_log_file(log, &project)));
    conversations
}

fn from_index_entry(entry: &SessionIndexEntry, project_dir: &Path, project: &ProjectContext<'_>) -> ConversationEntry {
    let log_path = entry
        .full_path
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| project_dir.join(format!("{}.jsonl", entry.session_id)));

    let (created, modified) = match (entry.created, entry.modified) {
        (Some(created), Some(modified)) => (Some(created), modified),
        (created, modified) => {
            let (file_created, file_modified) = file_times(&log_path);
            (created.or(file_created), modified.or(file_modified).unwrap_or_else(unknown_time))
        }
    };

    ConversationEntry {
        session_id: entry.session_id.clone(),
        first_prompt: clean_prompt(entry.first_prompt.as_deref().unwrap_or(NO_PROMPT)),
        summary: entry.summary.as_deref().map(clean_prompt),
        message_count: entry.message_count.map_or(0, |count| count as usize),
        created,
        modified,
        git_branch: entry.git_branch.clone(),
        project_path: entry.project_path.as_ref().map_or_else(|| project.path.to_path_buf(), PathBuf::from),
        project_name: project.name.to_string(),
        is_sidechain: false,
        log_path,
    }
}

fn project_name(resolved_path: &Path, token: &str) -> String {
    display_name(resolved_path).unwrap_or_else(|| token.to_string())
}
