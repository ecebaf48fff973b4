/// Rewind engine tests: closure correctness, line-order independence, conservative
/// retention of lines the engine cannot interpret, and backup behavior
mod common;

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use claude_conversations::rewind::{descendant_closure, list_backups, restore_latest_backup};
use claude_conversations::{delete_messages_from, list_messages, plan_rewind};
use common::{LogFileBuilder, RecordBuilder, linear_conversation};
use tempfile::TempDir;

/// Tree used by most tests
///
/// ```text
/// r ─ a ─ b ─ c
///     │   └ d
///     └ e ─ f
/// x (second root)
/// ```
fn tree_lines() -> Vec<String> {
    vec![
        RecordBuilder::user("r", "root").to_json(),
        RecordBuilder::assistant("a", "a").parent("r").to_json(),
        RecordBuilder::user("b", "b").parent("a").to_json(),
        RecordBuilder::assistant("c", "c").parent("b").to_json(),
        RecordBuilder::assistant("d", "d").parent("b").to_json(),
        RecordBuilder::user("e", "e").parent("a").to_json(),
        RecordBuilder::assistant("f", "f").parent("e").to_json(),
        RecordBuilder::user("x", "x").to_json(),
    ]
}

fn write_lines(dir: &Path, lines: &[String]) -> std::path::PathBuf {
    let path = dir.join("s.jsonl");
    fs::write(&path, format!("{}\n", lines.join("\n"))).unwrap();
    path
}

fn surviving_uuids(log: &Path) -> BTreeSet<String> {
    list_messages(log).into_iter().map(|m| m.uuid).collect()
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_closure_matches_expected_subtrees() {
    for (target, expected) in [
        ("b", set(&["b", "c", "d"])),
        ("e", set(&["e", "f"])),
        ("a", set(&["a", "b", "c", "d", "e", "f"])),
        ("c", set(&["c"])),
        ("x", set(&["x"])),
    ] {
        let temp = TempDir::new().unwrap();
        let log = write_lines(temp.path(), &tree_lines());

        let result = delete_messages_from(&log, target).unwrap();
        assert!(result.success);
        assert_eq!(result.deleted_count, expected.len(), "target {target}");

        let all = set(&["r", "a", "b", "c", "d", "e", "f", "x"]);
        let expected_survivors: BTreeSet<String> = all.difference(&expected).cloned().collect();
        assert_eq!(surviving_uuids(&log), expected_survivors, "target {target}");
    }
}

#[test]
fn test_line_order_does_not_change_result() {
    let base = tree_lines();
    let mut orders = vec![base.clone()];
    let mut reversed = base.clone();
    reversed.reverse();
    orders.push(reversed);
    for shift in 1..base.len() {
        let mut rotated = base.clone();
        rotated.rotate_left(shift);
        orders.push(rotated);
    }

    for lines in orders {
        let temp = TempDir::new().unwrap();
        let log = write_lines(temp.path(), &lines);

        let result = delete_messages_from(&log, "a").unwrap();
        assert_eq!(result.deleted_count, 6);
        assert_eq!(surviving_uuids(&log), set(&["r", "x"]));

        // Survivors keep their relative order
        let kept: Vec<&String> = lines.iter().filter(|l| l.contains(r#""uuid":"r""#) || l.contains(r#""uuid":"x""#)).collect();
        let expected = format!("{}\n", kept.iter().map(|s| s.as_str()).collect::<Vec<_>>().join("\n"));
        assert_eq!(fs::read_to_string(&log).unwrap(), expected);
    }
}

#[test]
fn test_unparseable_and_uuidless_lines_are_retained() {
    let temp = TempDir::new().unwrap();
    let log = LogFileBuilder::new("s")
        .with_record(RecordBuilder::user("u1", "hello"))
        .with_raw_line("{truncated json")
        .with_raw_line("")
        .with_record(RecordBuilder::snapshot())
        .with_raw_line(r#"{"type":"user","uuid":"","parentUuid":"u1","message":{"content":"empty uuid"}}"#)
        .with_raw_line(r#"{"type":"user","uuid":42,"parentUuid":"u1"}"#)
        .with_record(RecordBuilder::assistant("a1", "reply").parent("u1"))
        .create_in(temp.path());

    let result = delete_messages_from(&log, "u1").unwrap();
    assert_eq!(result.deleted_count, 2);

    let remaining = fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = remaining.split('\n').collect();
    assert_eq!(lines[0], "{truncated json");
    assert_eq!(lines[1], "");
    assert!(lines[2].contains("file-history-snapshot"));
    assert!(lines[3].contains("empty uuid"));
    assert!(lines[4].contains(r#""uuid":42"#));
    assert_eq!(lines.len(), 6, "trailing newline preserved");
}

#[test]
fn test_cycle_in_log_terminates() {
    let temp = TempDir::new().unwrap();
    let log = LogFileBuilder::new("s")
        .with_record(RecordBuilder::user("p", "p").parent("q"))
        .with_record(RecordBuilder::assistant("q", "q").parent("p"))
        .with_record(RecordBuilder::user("z", "z"))
        .create_in(temp.path());

    let result = delete_messages_from(&log, "p").unwrap();
    assert_eq!(result.deleted_count, 2);
    assert_eq!(surviving_uuids(&log), set(&["z"]));
}

#[test]
fn test_plan_matches_delete() {
    let temp = TempDir::new().unwrap();
    let log = write_lines(temp.path(), &tree_lines());

    let plan = plan_rewind(&log, "b").unwrap().unwrap();
    assert_eq!(plan.closure, vec!["b", "c", "d"]);
    assert_eq!(plan.retained_lines, 5);
    assert!(list_backups(&log).is_empty());

    let result = delete_messages_from(&log, "b").unwrap();
    assert_eq!(result.deleted_count, plan.closure.len());
    assert_eq!(list_messages(&log).len(), plan.retained_lines);
}

#[test]
fn test_reparse_is_idempotent_after_rewind() {
    let temp = TempDir::new().unwrap();
    let log = linear_conversation("s").create_in(temp.path());

    delete_messages_from(&log, "a2").unwrap();
    let first = list_messages(&log);
    let second = list_messages(&log);
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[test]
fn test_each_rewind_takes_its_own_backup_and_restore_undoes_last() {
    let temp = TempDir::new().unwrap();
    let log = linear_conversation("s").create_in(temp.path());
    let original = fs::read_to_string(&log).unwrap();

    let first = delete_messages_from(&log, "a2").unwrap();
    let after_first = fs::read_to_string(&log).unwrap();
    let second = delete_messages_from(&log, "a1").unwrap();

    let first_backup = first.backup_path.unwrap();
    let second_backup = second.backup_path.unwrap();
    assert_ne!(first_backup, second_backup);
    assert_eq!(fs::read_to_string(&first_backup).unwrap(), original);
    assert_eq!(fs::read_to_string(&second_backup).unwrap(), after_first);
    assert_eq!(list_backups(&log), vec![first_backup, second_backup.clone()]);

    let restored = restore_latest_backup(&log).unwrap().unwrap();
    assert_eq!(restored.restored_from, second_backup);
    assert_eq!(fs::read_to_string(&log).unwrap(), after_first);
}

#[test]
fn test_restore_keeps_lines_written_after_rewind() {
    let temp = TempDir::new().unwrap();
    let log = linear_conversation("s").create_in(temp.path());

    delete_messages_from(&log, "u2").unwrap();
    let mut appended = fs::read_to_string(&log).unwrap();
    appended.push_str(&RecordBuilder::user("new", "written after the rewind").to_json());
    appended.push('\n');
    fs::write(&log, &appended).unwrap();

    let restored = restore_latest_backup(&log).unwrap().unwrap();
    assert!(!fs::read_to_string(&log).unwrap().contains("written after the rewind"));

    let replaced = restored.replaced_backup.unwrap();
    assert_eq!(fs::read_to_string(&replaced).unwrap(), appended);
    assert_eq!(list_backups(&log).len(), 2);

    // Restoring again brings the appended content back
    restore_latest_backup(&log).unwrap();
    assert_eq!(fs::read_to_string(&log).unwrap(), appended);
}

#[test]
fn test_unreadable_log_is_an_error_without_backup() {
    let temp = TempDir::new().unwrap();
    let log = temp.path().join("s.jsonl");
    fs::create_dir(&log).unwrap();

    let err = delete_messages_from(&log, "u1").unwrap_err();
    assert!(format!("{err:#}").contains("Failed to back up"), "unexpected error: {err:#}");
    assert!(list_backups(&log).is_empty());

    let names: Vec<String> = fs::read_dir(temp.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["s.jsonl"]);
}

#[test]
fn test_missing_log_reports_failure_without_backup() {
    let temp = TempDir::new().unwrap();
    let log = temp.path().join("absent.jsonl");

    let result = delete_messages_from(&log, "u1").unwrap();
    assert!(!result.success);
    assert!(result.backup_path.is_none());
    assert!(fs::read_dir(temp.path()).unwrap().next().is_none());
}

#[test]
fn test_descendant_closure_public_api() {
    let links = vec![("child", Some("root")), ("root", None), ("other", Some("elsewhere"))];
    let closure = descendant_closure(links, "root");
    assert_eq!(closure, set(&["child", "root"]));
}
