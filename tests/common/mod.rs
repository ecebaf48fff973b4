//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use claude_conversations::{ClaudeLayout, encode_path};
use serde_json::{Value, json};
use tempfile::TempDir;

/// Builder for a fake home directory holding `.claude/projects/`
///
/// The temp dir plays the role of `$HOME`, so project tokens can be built from
/// real directories under it with [`ClaudeDirBuilder::source_token`].
pub struct ClaudeDirBuilder {
    temp_dir: TempDir,
}

impl ClaudeDirBuilder {
    /// Create a new builder with an empty .claude/projects directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir_all(temp_dir.path().join(".claude").join("projects"))
            .expect("Failed to create projects dir");
        Self { temp_dir }
    }

    /// The fake home directory
    pub fn home(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn layout(&self) -> ClaudeLayout {
        layout_for(&self.temp_dir)
    }

    /// Create a source directory under home, e.g. "code/my-app"
    pub fn with_source_dir(self, relative: &str) -> Self {
        fs::create_dir_all(self.home().join(relative)).expect("Failed to create source dir");
        self
    }

    /// Token Claude would use for a directory under home
    pub fn source_token(&self, relative: &str) -> String {
        encode_path(&self.home().join(relative))
    }

    /// Add a project directory with the given token and log files
    pub fn with_project(self, token: &str, logs: &[LogFileBuilder]) -> Self {
        let project_dir = self.layout().project_dir(token);
        fs::create_dir_all(&project_dir).expect("Failed to create project dir");

        for log in logs {
            log.create_in(&project_dir);
        }

        self
    }

    /// Write a sessions-index.json into an existing project directory
    pub fn with_sidecar(self, token: &str, sidecar: SidecarIndexBuilder) -> Self {
        sidecar.write_to(&self.layout().project_dir(token));
        self
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for ClaudeDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Layout of a directory built by [`ClaudeDirBuilder`]
pub fn layout_for(home: &TempDir) -> ClaudeLayout {
    ClaudeLayout::new(home.path().join(".claude"), home.path())
}

/// Builder for one session log file
pub struct LogFileBuilder {
    session_id: String,
    lines: Vec<String>,
}

impl LogFileBuilder {
    pub fn new(session_id: &str) -> Self {
        Self { session_id: session_id.to_string(), lines: Vec::new() }
    }

    /// Add a record line
    pub fn with_record(mut self, record: RecordBuilder) -> Self {
        self.lines.push(record.to_json());
        self
    }

    /// Add a line verbatim (malformed JSON, blank lines...)
    pub fn with_raw_line(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    pub fn content(&self) -> String {
        let mut content = self.lines.join("\n");
        content.push('\n');
        content
    }

    /// Create the file in the given directory
    pub fn create_in(&self, dir: &Path) -> PathBuf {
        let path = dir.join(format!("{}.jsonl", self.session_id));
        fs::write(&path, self.content()).expect("Failed to write log file");
        path
    }
}

/// Builder for one log record
pub struct RecordBuilder {
    record: Value,
}

impl RecordBuilder {
    fn message(kind: &str, uuid: &str, text: &str) -> Self {
        Self {
            record: json!({
                "type": kind,
                "uuid": uuid,
                "parentUuid": null,
                "sessionId": "550e8400-e29b-41d4-a716-446655440000",
                "timestamp": "2025-01-15T10:30:00.000Z",
                "message": { "role": kind, "content": text },
            }),
        }
    }

    /// A user message with plain text content
    pub fn user(uuid: &str, text: &str) -> Self {
        Self::message("user", uuid, text)
    }

    /// An assistant message with plain text content
    pub fn assistant(uuid: &str, text: &str) -> Self {
        Self::message("assistant", uuid, text)
    }

    /// A summary record, as Claude Code appends when compacting a session
    pub fn summary(text: &str, leaf_uuid: &str) -> Self {
        Self { record: json!({ "type": "summary", "summary": text, "leafUuid": leaf_uuid }) }
    }

    /// A file-history-snapshot record with no uuid
    pub fn snapshot() -> Self {
        Self {
            record: json!({
                "type": "file-history-snapshot",
                "messageId": "61b36c7f",
                "snapshot": { "trackedFileBackups": {} },
                "isSnapshotUpdate": false,
            }),
        }
    }

    pub fn parent(mut self, parent_uuid: &str) -> Self {
        self.record["parentUuid"] = json!(parent_uuid);
        self
    }

    pub fn meta(mut self) -> Self {
        self.record["isMeta"] = json!(true);
        self
    }

    pub fn sidechain(mut self) -> Self {
        self.record["isSidechain"] = json!(true);
        self
    }

    pub fn git_branch(mut self, branch: &str) -> Self {
        self.record["gitBranch"] = json!(branch);
        self
    }

    pub fn model(mut self, model: &str) -> Self {
        self.record["message"]["model"] = json!(model);
        self
    }

    pub fn timestamp(mut self, timestamp: Value) -> Self {
        self.record["timestamp"] = timestamp;
        self
    }

    /// Replace the content with a block array
    pub fn blocks(mut self, blocks: Vec<Value>) -> Self {
        self.record["message"]["content"] = Value::Array(blocks);
        self
    }

    pub fn text_block(text: &str) -> Value {
        json!({ "type": "text", "text": text })
    }

    pub fn thinking_block(text: &str) -> Value {
        json!({ "type": "thinking", "thinking": text, "signature": "sig" })
    }

    pub fn tool_use_block(id: &str, name: &str, input: Value) -> Value {
        json!({ "type": "tool_use", "id": id, "name": name, "input": input })
    }

    pub fn tool_result_block(tool_use_id: &str, content: &str, is_error: bool) -> Value {
        json!({ "type": "tool_result", "tool_use_id": tool_use_id, "content": content, "is_error": is_error })
    }

    pub fn to_json(&self) -> String {
        self.record.to_string()
    }
}

/// Builder for a project's sessions-index.json
pub struct SidecarIndexBuilder {
    original_path: Option<String>,
    entries: Vec<Value>,
}

impl SidecarIndexBuilder {
    pub fn new() -> Self {
        Self { original_path: None, entries: Vec::new() }
    }

    pub fn original_path(mut self, path: &str) -> Self {
        self.original_path = Some(path.to_string());
        self
    }

    /// Add a regular entry
    pub fn entry(self, session_id: &str, first_prompt: &str, modified: &str) -> Self {
        self.raw_entry(json!({
            "sessionId": session_id,
            "firstPrompt": first_prompt,
            "messageCount": 2,
            "created": modified,
            "modified": modified,
            "isSidechain": false,
        }))
    }

    /// Add an entry flagged as a sidechain
    pub fn sidechain_entry(self, session_id: &str) -> Self {
        self.raw_entry(json!({ "sessionId": session_id, "firstPrompt": "sub-agent", "isSidechain": true }))
    }

    /// Add an entry verbatim
    pub fn raw_entry(mut self, entry: Value) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn to_json(&self) -> String {
        let mut index = json!({ "version": 1, "entries": self.entries });
        if let Some(path) = &self.original_path {
            index["originalPath"] = json!(path);
        }
        index.to_string()
    }

    pub fn write_to(&self, project_dir: &Path) {
        fs::write(project_dir.join("sessions-index.json"), self.to_json())
            .expect("Failed to write sessions-index.json");
    }
}

impl Default for SidecarIndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A linear conversation: u1 → a1 → u2 → a2
pub fn linear_conversation(session_id: &str) -> LogFileBuilder {
    LogFileBuilder::new(session_id)
        .with_record(RecordBuilder::user("u1", "First question").git_branch("main"))
        .with_record(RecordBuilder::assistant("a1", "First answer").parent("u1"))
        .with_record(RecordBuilder::user("u2", "Second question").parent("a1"))
        .with_record(RecordBuilder::assistant("a2", "Second answer").parent("u2"))
}
