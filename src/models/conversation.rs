use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One conversation (session log) as shown in a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationEntry {
    pub session_id: String,
    pub log_path: PathBuf,
    pub first_prompt: String,
    pub summary: Option<String>,
    pub message_count: usize,
    pub created: Option<DateTime<Utc>>,
    pub modified: DateTime<Utc>,
    pub git_branch: Option<String>,
    pub project_path: PathBuf,
    pub project_name: String,
    pub is_sidechain: bool,
}

impl ConversationEntry {
    /// Title for listings: the summary when one exists, else the first prompt
    pub fn title(&self) -> &str {
        match self.summary.as_deref() {
            Some(summary) if !summary.is_empty() => summary,
            _ => &self.first_prompt,
        }
    }
}
