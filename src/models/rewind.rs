use std::path::PathBuf;

use serde::Serialize;

/// Receipt returned by a rewind
///
/// `backup_path` is `None` only when the log did not exist. A rewind whose target
/// uuid is absent reports `success: false` but still carries the backup it took.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub success: bool,
    pub backup_path: Option<PathBuf>,
    pub deleted_count: usize,
}

impl DeleteResult {
    pub fn missing_log() -> Self {
        Self { success: false, backup_path: None, deleted_count: 0 }
    }

    pub fn target_not_found(backup_path: PathBuf) -> Self {
        Self { success: false, backup_path: Some(backup_path), deleted_count: 0 }
    }
}
