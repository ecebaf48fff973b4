//! Data models for Claude Code conversation logs.
//!
//! - [`Project`] - a project directory and its resolved source path
//! - [`ConversationEntry`] - one session log as listed for a project
//! - [`Message`] - a visible user/assistant record with typed [`Content`]
//! - [`DeleteResult`] - the receipt of a rewind
//!
//! Models serialize with camelCase keys; that JSON is what the CLI's `--json`
//! output hands to other front ends. Deserialization of log records lives in
//! the `parsers` module.

pub mod conversation;
pub mod message;
pub mod project;
pub mod rewind;

pub use conversation::ConversationEntry;
pub use message::{Content, ContentBlock, Message, Role};
pub use project::Project;
pub use rewind::DeleteResult;
