//! Project and conversation catalog over `~/.claude/projects/`
//!
//! # Error Handling Strategy
//!
//! Listing never fails. Everything is re-read from disk on each call and problems
//! degrade to smaller results:
//!
//! - **Missing directories**: a missing projects root or project directory lists nothing.
//!
//! - **Sidecar index**: a `sessions-index.json` that cannot be read or parsed is
//!   logged and ignored; the project's logs are scanned directly instead.
//!
//! - **Unreadable logs**: a log that cannot be read still gets an entry, with a
//!   placeholder prompt and zero messages.
//!
//! - **Caller input**: a project token that is not a single directory name is
//!   rejected with a warning and lists nothing.

pub mod conversations;
pub mod projects;
pub mod scan;

pub use conversations::list_conversations;
pub use projects::{LOG_EXTENSION, list_projects, resolve_project_path};
pub use scan::{LogSummary, summarize_log};
