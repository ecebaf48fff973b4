//! Plain-text rendering for the CLI
//!
//! Every string that came out of a log or sidecar index is passed through
//! [`sanitize_for_terminal`] before it is rendered.

use std::fmt::Write;
use std::path::Path;

use serde_json::Value;

use crate::models::{Content, ContentBlock, ConversationEntry, DeleteResult, Message, Project};
use crate::rewind::{RestoredBackup, RewindPlan};
use crate::utils::format_path_with_tilde;
use crate::utils::terminal::{sanitize_for_terminal, single_line};
use crate::utils::text::truncate_chars;
use crate::utils::timestamps::{format_message_time, format_timestamp};

/// Longest tool input or result shown before it is cut off
const TOOL_PREVIEW_CHARS: usize = 200;
const TITLE_CHARS: usize = 80;

fn clean_line(text: &str) -> String {
    single_line(&sanitize_for_terminal(text))
}

pub fn projects(projects: &[Project], home: &Path) -> String {
    if projects.is_empty() {
        return "No projects found\n".to_string();
    }

    let names: Vec<String> = projects.iter().map(|p| clean_line(&p.display_name)).collect();
    let width = names.iter().map(|name| name.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    for (project, name) in projects.iter().zip(&names) {
        let _ = writeln!(
            out,
            "{name:<width$}  {count:>4}  {path}  ({token})",
            count = project.conversation_count,
            path = clean_line(&format_path_with_tilde(&project.resolved_path, home)),
            token = clean_line(&project.directory_token),
        );
    }
    out
}

pub fn conversations(conversations: &[ConversationEntry]) -> String {
    if conversations.is_empty() {
        return "No conversations found\n".to_string();
    }

    let mut out = String::new();
    for entry in conversations {
        let mut header = format!(
            "{}  {}  {} msgs  {}",
            clean_line(&entry.session_id),
            format_timestamp(&entry.modified),
            entry.message_count,
            clean_line(&entry.project_name),
        );
        if let Some(branch) = &entry.git_branch {
            let _ = write!(header, "  [{}]", clean_line(branch));
        }
        let _ = writeln!(out, "{header}");
        let _ = writeln!(out, "    {}", truncate_chars(&clean_line(entry.title()), TITLE_CHARS));
    }
    out
}

pub fn messages(messages: &[Message]) -> String {
    if messages.is_empty() {
        return "No messages\n".to_string();
    }

    let mut out = String::new();
    for (index, message) in messages.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{}", message_header(message));
        render_content(&mut out, &message.content);
    }
    out
}

fn message_header(message: &Message) -> String {
    let label = if message.is_tool_result_only() { "tool result" } else { message.role.as_str() };
    let mut header = format!("── {label}");
    if let Some(timestamp) = &message.timestamp {
        let _ = write!(header, " · {} ({})", format_message_time(timestamp), format_timestamp(timestamp));
    }
    if let Some(model) = &message.model {
        let _ = write!(header, " · {}", clean_line(model));
    }
    if !message.uuid.is_empty() {
        let _ = write!(header, " · {}", clean_line(&message.uuid));
    }
    header
}

fn render_content(out: &mut String, content: &Content) {
    match content {
        Content::Text(text) => push_text(out, text),
        Content::Blocks(blocks) => {
            for block in blocks {
                render_block(out, block);
            }
        }
    }
}

fn render_block(out: &mut String, block: &ContentBlock) {
    match block {
        ContentBlock::Text { text } => push_text(out, text),
        ContentBlock::Thinking { thinking } => {
            for line in sanitize_for_terminal(thinking).lines() {
                let _ = writeln!(out, "  💭 {line}");
            }
        }
        ContentBlock::ToolUse { name, input, .. } => {
            let _ = writeln!(out, "  ⚙ {} {}", clean_line(name), compact_json(input));
        }
        ContentBlock::ToolResult { content, is_error, .. } => {
            let label = if *is_error { "✗ error" } else { "↳ result" };
            let text = content.as_ref().map(Content::plain_text).unwrap_or_default();
            let _ = writeln!(out, "  {label}: {}", truncate_chars(&clean_line(&text), TOOL_PREVIEW_CHARS));
        }
        ContentBlock::Unknown => {}
    }
}

fn push_text(out: &mut String, text: &str) {
    let text = sanitize_for_terminal(text);
    if text.trim().is_empty() {
        return;
    }
    out.push_str(text.trim_end());
    out.push('\n');
}

/// One-line JSON for tool inputs, cut to a readable length
fn compact_json(value: &Value) -> String {
    if value.is_null() {
        return String::new();
    }
    let json = serde_json::to_string(value).unwrap_or_default();
    let json = clean_line(&json);
    if json.chars().count() > TOOL_PREVIEW_CHARS {
        format!("{}…", truncate_chars(&json, TOOL_PREVIEW_CHARS))
    } else {
        json
    }
}

pub fn rewind_plan(plan: &RewindPlan) -> String {
    let mut out = format!(
        "Rewinding to before {} would delete {} message(s):\n",
        clean_line(&plan.target_uuid),
        plan.closure.len()
    );
    for uuid in &plan.closure {
        let _ = writeln!(out, "  {}", clean_line(uuid));
    }
    let _ = writeln!(out, "{} line(s) would remain. Re-run with --yes to apply.", plan.retained_lines);
    out
}

pub fn delete_result(result: &DeleteResult) -> String {
    let mut out = format!("Deleted {} message(s)\n", result.deleted_count);
    if let Some(backup) = &result.backup_path {
        let _ = writeln!(out, "Backup: {}", backup.display());
    }
    out
}

pub fn restored_backup(log: &Path, restored: &RestoredBackup) -> String {
    let mut out = format!("Restored {} from {}\n", log.display(), restored.restored_from.display());
    if let Some(replaced) = &restored.replaced_backup {
        let _ = writeln!(out, "Previous content saved to {}", replaced.display());
    }
    out
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;
    use crate::models::Role;

    fn message(content: Content) -> Message {
        Message {
            uuid: "u1".to_string(),
            parent_uuid: None,
            role: Role::Assistant,
            timestamp: Some(Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 0).unwrap()),
            line_number: 1,
            content,
            model: Some("claude-sonnet-4".to_string()),
        }
    }

    #[test]
    fn test_message_blocks_render() {
        let out = messages(&[message(Content::Blocks(vec![
            ContentBlock::Thinking { thinking: "plan\nsteps".to_string() },
            ContentBlock::Text { text: "Done \x1b[31mred\x1b[0m".to_string() },
            ContentBlock::ToolUse { id: "t1".to_string(), name: "Bash".to_string(), input: json!({"command": "ls"}) },
            ContentBlock::ToolResult {
                tool_use_id: "t1".to_string(),
                content: Some(Content::Text("boom".to_string())),
                is_error: true,
            },
        ]))]);

        assert!(out.starts_with("── assistant · Mar 7 09:05"));
        assert!(out.contains("claude-sonnet-4 · u1"));
        assert!(out.contains("  💭 plan\n  💭 steps\n"));
        assert!(out.contains("Done red\n"));
        assert!(out.contains(r#"⚙ Bash {"command":"ls"}"#));
        assert!(out.contains("✗ error: boom"));
        assert!(!out.contains('\x1b'));
    }

    #[test]
    fn test_tool_result_only_header() {
        let mut result = message(Content::Blocks(vec![ContentBlock::ToolResult {
            tool_use_id: "t1".to_string(),
            content: Some(Content::Text("ok".to_string())),
            is_error: false,
        }]));
        result.role = Role::User;
        result.model = None;

        let out = messages(&[result]);
        assert!(out.starts_with("── tool result · "));
        assert!(out.contains("↳ result: ok"));
    }

    #[test]
    fn test_long_tool_input_is_cut() {
        let out = compact_json(&json!({"text": "x".repeat(500)}));
        assert!(out.ends_with('…'));
        assert_eq!(out.chars().count(), TOOL_PREVIEW_CHARS + 1);
    }

    #[test]
    fn test_empty_listings() {
        assert_eq!(projects(&[], Path::new("/home/u")), "No projects found\n");
        assert_eq!(conversations(&[]), "No conversations found\n");
        assert_eq!(messages(&[]), "No messages\n");
    }

    #[test]
    fn test_projects_use_tilde() {
        let out = projects(
            &[Project {
                directory_token: "-home-u-app".to_string(),
                resolved_path: PathBuf::from("/home/u/app"),
                display_name: "app".to_string(),
                conversation_count: 3,
            }],
            Path::new("/home/u"),
        );
        assert_eq!(out, "app     3  ~/app  (-home-u-app)\n");
    }

    #[test]
    fn test_rewind_plan_text() {
        let plan = RewindPlan {
            target_uuid: "b".to_string(),
            closure: vec!["b".to_string(), "c".to_string()],
            retained_lines: 4,
        };
        let out = rewind_plan(&plan);
        assert!(out.contains("would delete 2 message(s)"));
        assert!(out.contains("  c\n"));
        assert!(out.contains("--yes"));
    }

    #[test]
    fn test_conversation_header_sanitized() {
        let entry = ConversationEntry {
            session_id: "s1\x1b]0;title\x07\x1b[2J".to_string(),
            log_path: PathBuf::from("/p/s1.jsonl"),
            first_prompt: "hello".to_string(),
            summary: None,
            message_count: 1,
            created: None,
            modified: Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 0).unwrap(),
            git_branch: None,
            project_path: PathBuf::from("/p"),
            project_name: "p".to_string(),
            is_sidechain: false,
        };

        let out = conversations(&[entry]);
        assert!(out.starts_with("s1  "));
        assert!(!out.contains('\x1b'));
        assert!(!out.contains('\x07'));
    }

    #[test]
    fn test_restored_backup_text() {
        let restored = RestoredBackup {
            restored_from: PathBuf::from("/p/s.jsonl.bak.1"),
            replaced_backup: Some(PathBuf::from("/p/s.jsonl.bak.2")),
        };
        let out = restored_backup(Path::new("/p/s.jsonl"), &restored);
        assert_eq!(out, "Restored /p/s.jsonl from /p/s.jsonl.bak.1\nPrevious content saved to /p/s.jsonl.bak.2\n");
    }
}
