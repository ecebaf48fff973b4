use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use walkdir::WalkDir;

/// Separator between a log's file name and the backup's epoch-millisecond suffix
pub const BACKUP_INFIX: &str = ".bak.";

/// `<log>.bak.<millis>`, next to the log
pub fn backup_path_for(log_path: &Path, millis: i64) -> PathBuf {
    let mut name = log_path.file_name().map(OsString::from).unwrap_or_default();
    name.push(format!("{BACKUP_INFIX}{millis}"));
    log_path.with_file_name(name)
}

/// Copy a log to a fresh `<log>.bak.<epoch-millis>` file
///
/// The backup name is claimed with `create_new`, and the millisecond value is
/// bumped until a free name is found, so an existing backup is never overwritten.
pub fn create_backup(log_path: &Path) -> Result<PathBuf> {
    let mut millis = Utc::now().timestamp_millis();

    let (backup_path, mut backup) = loop {
        let candidate = backup_path_for(log_path, millis);
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(file) => break (candidate, file),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => millis += 1,
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to back up {}: cannot create {}", log_path.display(), candidate.display()));
            }
        }
    };

    let copied = File::open(log_path)
        .and_then(|mut source| io::copy(&mut source, &mut backup))
        .and_then(|bytes| backup.sync_all().map(|()| bytes));

    match copied {
        Ok(bytes) => {
            tracing::info!(log = %log_path.display(), backup = %backup_path.display(), bytes, "Backed up session log");
            Ok(backup_path)
        }
        Err(e) => {
            drop(backup);
            // A partial copy must not pass for a backup
            let _ = fs::remove_file(&backup_path);
            Err(e).with_context(|| format!("Failed to back up {}", log_path.display()))
        }
    }
}

/// Backups of a log, oldest first by their millisecond suffix
pub fn list_backups(log_path: &Path) -> Vec<PathBuf> {
    let (Some(dir), Some(name)) = (log_path.parent(), log_path.file_name()) else {
        return Vec::new();
    };
    let prefix = format!("{}{BACKUP_INFIX}", name.to_string_lossy());
    let dir = if dir.as_os_str().is_empty() { Path::new(".") } else { dir };

    let mut backups: Vec<(u64, PathBuf)> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let millis = entry
                .file_name()
                .to_str()?
                .strip_prefix(&prefix)?
                .parse::<u64>()
                .ok()?;
            Some((millis, entry.into_path()))
        })
        .collect();

    backups.sort();
    backups.into_iter().map(|(_, path)| path).collect()
}

/// Outcome of [`restore_latest_backup`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoredBackup {
    /// Backup whose content is now in the log
    pub restored_from: PathBuf,
    /// Backup of the log as it was before the restore, if the log existed
    pub replaced_backup: Option<PathBuf>,
}

/// Copy the most recent backup back over the log
///
/// The log is itself backed up first, so whatever the restore overwrites (such as
/// lines appended after a rewind) stays recoverable. That new backup becomes the
/// most recent one, so a second restore undoes the first.
///
/// Returns `None` when the log has no backups. Backups are left in place.
pub fn restore_latest_backup(log_path: &Path) -> Result<Option<RestoredBackup>> {
    let Some(latest) = list_backups(log_path).pop() else {
        return Ok(None);
    };

    let replaced_backup = if log_path.exists() { Some(create_backup(log_path)?) } else { None };

    fs::copy(&latest, log_path).with_context(|| {
        format!("Failed to restore {} from {}", log_path.display(), latest.display())
    })?;
    tracing::info!(log = %log_path.display(), backup = %latest.display(), "Restored session log from backup");

    Ok(Some(RestoredBackup { restored_from: latest, replaced_backup }))
}
