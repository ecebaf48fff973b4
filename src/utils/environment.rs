use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Environment variable that relocates the Claude directory away from `~/.claude`
pub const CLAUDE_CONFIG_DIR_ENV: &str = "CLAUDE_CONFIG_DIR";

/// Locations the catalog reads from
///
/// `home_dir` is needed alongside `claude_dir` because project directory names encode
/// absolute paths, and decoding strips the encoded home prefix first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaudeLayout {
    pub claude_dir: PathBuf,
    pub home_dir: PathBuf,
}

impl ClaudeLayout {
    pub fn new(claude_dir: impl Into<PathBuf>, home_dir: impl Into<PathBuf>) -> Self {
        Self { claude_dir: claude_dir.into(), home_dir: home_dir.into() }
    }

    /// Resolve the layout from `HOME` and an optional `CLAUDE_CONFIG_DIR` override
    pub fn from_env() -> Result<Self> {
        let home = get_home_dir()?;
        let claude_dir = match env::var_os(CLAUDE_CONFIG_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => home.join(".claude"),
        };
        Ok(Self { claude_dir, home_dir: home })
    }

    /// The `projects/` directory holding one subdirectory per encoded project path
    pub fn projects_dir(&self) -> PathBuf {
        self.claude_dir.join("projects")
    }

    pub fn project_dir(&self, directory_token: &str) -> PathBuf {
        self.projects_dir().join(directory_token)
    }

    pub fn home(&self) -> &Path {
        &self.home_dir
    }
}

/// Get the user's home directory from `HOME`
pub fn get_home_dir() -> Result<PathBuf> {
    let home = env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home))
}
