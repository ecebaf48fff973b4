use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::parsers::deserializers;

/// Speaker of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A visible user or assistant message from a session log
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub uuid: String,
    pub parent_uuid: Option<String>,
    pub role: Role,
    pub timestamp: Option<DateTime<Utc>>,
    /// 1-based line of the record in the log, for diagnostics only
    pub line_number: usize,
    pub content: Content,
    pub model: Option<String>,
}

impl Message {
    /// Text blocks joined by blank lines; reasoning and tool traffic are left out
    pub fn plain_text(&self) -> String {
        self.content.plain_text()
    }

    /// True for user records that only carry tool results back to the model
    pub fn is_tool_result_only(&self) -> bool {
        match &self.content {
            Content::Blocks(blocks) => {
                !blocks.is_empty()
                    && blocks.iter().all(|block| matches!(block, ContentBlock::ToolResult { .. }))
            }
            Content::Text(_) => false,
        }
    }
}

/// Message body: either a bare string or an ordered list of blocks
///
/// Deserialization never fails: unknown or malformed blocks are dropped and
/// anything that is neither a string nor an array becomes empty text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl Default for Content {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl<'de> Deserialize<'de> for Content {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(deserializers::content_from_value(value))
    }
}

impl Content {
    pub fn plain_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Blocks(blocks) => blocks
                .iter()
                .filter_map(|block| match block {
                    ContentBlock::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("\n\n"),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Blocks(blocks) => blocks.is_empty(),
        }
    }
}

/// One typed block of message content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    Thinking {
        thinking: String,
    },
    ToolUse {
        #[serde(default)]
        id: String,
        name: String,
        #[serde(default)]
        input: Value,
    },
    ToolResult {
        #[serde(default)]
        tool_use_id: String,
        #[serde(default)]
        content: Option<Content>,
        #[serde(default, deserialize_with = "deserializers::deserialize_lenient_bool")]
        is_error: bool,
    },
    /// Any tag this crate does not know yet
    #[serde(other)]
    Unknown,
}
