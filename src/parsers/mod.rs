//! JSONL parsers for Claude Code session logs and sidecar indexes
//!
//! # Error Handling Strategy
//!
//! Logs are append-only streams written by another process, so parsing is
//! best-effort:
//!
//! - **Individual line failures**: a line that is not valid JSON, or not a record
//!   shape this crate understands, is skipped. One corrupt line never hides the rest.
//!
//! - **Missing files**: a log that does not exist parses to an empty list.
//!
//! - **Sidecar index**: [`load_session_index`] returns `anyhow::Result` so callers can
//!   tell "absent" from "corrupt"; the catalog logs the error and falls back to
//!   scanning logs directly.
//!
//! - **Unknown content**: content blocks with unknown tags are dropped rather than
//!   rejecting the message, so newer log producers keep working.

pub mod conversation;
pub mod deserializers;
pub mod record;
pub mod session_index;

pub use conversation::{list_messages, parse_messages};
pub use record::LogRecord;
pub use session_index::{SESSION_INDEX_FILENAME, load_session_index};
