//! Claude Conversations - Browse and rewind Claude Code conversation logs
//!
//! This library reads the session logs Claude Code keeps under `~/.claude/projects/`
//! and supports:
//!
//! - Listing projects, with their source paths recovered from encoded directory names
//! - Listing a project's conversations, reconciling the `sessions-index.json` sidecar
//!   with the logs actually on disk
//! - Parsing a log into its visible user/assistant messages
//! - Rewinding a conversation by deleting a message and all of its descendants,
//!   after backing up the log
//!
//! # Example
//!
//! ```no_run
//! use claude_conversations::{ClaudeLayout, list_conversations, list_messages, list_projects};
//!
//! let layout = ClaudeLayout::from_env()?;
//! let project = &list_projects(&layout)[0];
//! let conversations = list_conversations(&layout, Some(&project.directory_token));
//! let messages = list_messages(&conversations[0].log_path);
//! println!("{} has {} messages", project.display_name, messages.len());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod catalog;
pub mod cli;
pub mod filters;
pub mod models;
pub mod parsers;
pub mod rewind;
pub mod utils;

// Re-export commonly used types
pub use catalog::{list_conversations, list_projects};
pub use models::{Content, ContentBlock, ConversationEntry, DeleteResult, Message, Project, Role};
pub use parsers::list_messages;
pub use rewind::{RewindPlan, delete_messages_from, plan_rewind};
pub use utils::{ClaudeLayout, encode_path, format_path_with_tilde, reconstruct_path};
