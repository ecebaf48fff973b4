use std::path::PathBuf;

use serde::Serialize;

/// A project directory under `~/.claude/projects/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// On-disk directory name, the encoded form of `resolved_path`
    pub directory_token: String,
    pub resolved_path: PathBuf,
    pub display_name: String,
    pub conversation_count: usize,
}
