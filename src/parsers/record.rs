use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::deserializers::{
    deserialize_lenient_bool, deserialize_non_empty_string, deserialize_optional_timestamp,
};
use crate::models::{Content, Role};

const RECORD_TYPE_USER: &str = "user";
const RECORD_TYPE_ASSISTANT: &str = "assistant";
const RECORD_TYPE_SUMMARY: &str = "summary";

/// One line of a session log
///
/// Logs interleave conversation records with structural ones (`summary`,
/// `file-history-snapshot`, `queue-operation`, `system`), so every field is
/// optional and unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    #[serde(rename = "type", default, deserialize_with = "deserialize_non_empty_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty_string")]
    pub uuid: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty_string")]
    pub parent_uuid: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_lenient_bool")]
    pub is_meta: bool,
    #[serde(default, deserialize_with = "deserialize_lenient_bool")]
    pub is_sidechain: bool,
    #[serde(default, deserialize_with = "deserialize_non_empty_string")]
    pub git_branch: Option<String>,
    /// Text of a `summary` record
    #[serde(default, deserialize_with = "deserialize_non_empty_string")]
    pub summary: Option<String>,
    #[serde(default)]
    pub message: Option<MessagePayload>,
}

/// The `message` object of a user/assistant record
#[derive(Debug, Clone, Deserialize)]
pub struct MessagePayload {
    #[serde(default, deserialize_with = "deserialize_non_empty_string")]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Content,
    #[serde(default, deserialize_with = "deserialize_non_empty_string")]
    pub model: Option<String>,
}

impl LogRecord {
    /// Parses one log line; `None` for blank or malformed lines
    pub fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        serde_json::from_str(trimmed).ok()
    }

    /// Role implied by the record type, for user/assistant records only
    pub fn record_role(&self) -> Option<Role> {
        match self.kind.as_deref() {
            Some(RECORD_TYPE_USER) => Some(Role::User),
            Some(RECORD_TYPE_ASSISTANT) => Some(Role::Assistant),
            _ => None,
        }
    }

    /// A user/assistant record that is neither meta context nor a sidechain
    pub fn is_visible_message(&self) -> bool {
        self.record_role().is_some() && !self.is_meta && !self.is_sidechain
    }

    pub fn is_summary(&self) -> bool {
        self.kind.as_deref() == Some(RECORD_TYPE_SUMMARY)
    }
}
