use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::models::Project;
use crate::parsers::session_index::read_original_path;
use crate::utils::{ClaudeLayout, display_name, reconstruct_path};

/// Extension of session log files
pub const LOG_EXTENSION: &str = "jsonl";

/// A project directory found on disk, before any log is read
#[derive(Debug, Clone)]
pub(crate) struct ProjectDir {
    pub token: String,
    pub path: PathBuf,
}

/// List every project under `<claude_dir>/projects`, sorted by display name
///
/// The project's source path comes from the sidecar index's `originalPath` when
/// present, otherwise it is reconstructed from the directory token. The
/// conversation count is always the number of log files actually on disk.
///
/// A missing projects directory yields an empty list.
///
/// # Examples
///
/// ```no_run
/// use claude_conversations::{ClaudeLayout, list_projects};
///
/// let layout = ClaudeLayout::from_env()?;
/// for project in list_projects(&layout) {
///     println!("{} ({})", project.display_name, project.conversation_count);
/// }
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn list_projects(layout: &ClaudeLayout) -> Vec<Project> {
    let mut projects: Vec<Project> = project_dirs(layout)
        .into_iter()
        .map(|dir| {
            let resolved_path = resolve_project_path(&dir.path, &dir.token, layout.home());
            let display_name = display_name(&resolved_path).unwrap_or_else(|| dir.token.clone());
            let conversation_count = log_files(&dir.path).len();
            Project { directory_token: dir.token, resolved_path, display_name, conversation_count }
        })
        .collect();

    projects.sort_by(compare_projects);
    projects
}

/// Source path of a project directory: sidecar `originalPath`, else reconstructed from the token
pub fn resolve_project_path(project_dir: &Path, token: &str, home: &Path) -> PathBuf {
    read_original_path(project_dir).unwrap_or_else(|| reconstruct_path(token, home))
}

/// Immediate subdirectories of the projects root, excluding dot-directories
///
/// Symlinks are not followed, so a linked directory is not treated as a project.
pub(crate) fn project_dirs(layout: &ClaudeLayout) -> Vec<ProjectDir> {
    let root = layout.projects_dir();
    if !root.is_dir() {
        return Vec::new();
    }

    let mut dirs = Vec::new();
    for entry in WalkDir::new(&root).min_depth(1).max_depth(1).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(root = %root.display(), error = %e, "Failed to read projects directory entry");
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        let token = entry.file_name().to_string_lossy().into_owned();
        if token.starts_with('.') {
            continue;
        }
        dirs.push(ProjectDir { token, path: entry.into_path() });
    }
    dirs
}

/// Regular `*.jsonl` files directly inside a project directory, sorted by name
pub(crate) fn log_files(project_dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(project_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == LOG_EXTENSION))
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

/// Session id of a log file: its name without the `.jsonl` extension
pub(crate) fn session_id_of(log_path: &Path) -> Option<String> {
    log_path.file_stem().map(|stem| stem.to_string_lossy().into_owned())
}

/// Case-insensitive by display name, then exact name, then token
fn compare_projects(a: &Project, b: &Project) -> Ordering {
    a.display_name
        .to_lowercase()
        .cmp(&b.display_name.to_lowercase())
        .then_with(|| a.display_name.cmp(&b.display_name))
        .then_with(|| a.directory_token.cmp(&b.directory_token))
}
