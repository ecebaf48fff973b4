use std::path::Path;

use chrono::NaiveDate;

use super::ast::{FieldFilter, FilterExpr, FilterField};
use crate::models::ConversationEntry;

/// Apply a query to conversation entries, keeping matches in their original order
///
/// Filter logic:
/// - Same-field OR: branch:main branch:dev → (main OR dev)
/// - Cross-field AND: project:app branch:main → (app AND main)
/// - Every free-text term must match the first prompt or the summary
///
/// `home` is what a leading `~` in a `project:` value expands to.
pub fn apply_filters(entries: Vec<ConversationEntry>, filter: &FilterExpr, home: &Path) -> Vec<ConversationEntry> {
    if filter.is_empty() {
        return entries;
    }

    entries.into_iter().filter(|entry| evaluate_filter(entry, filter, home)).collect()
}

/// Evaluate filter expression against a single entry
fn evaluate_filter(entry: &ConversationEntry, filter: &FilterExpr, home: &Path) -> bool {
    let text_matches = filter.text_terms.iter().all(|term| match_text(entry, term));

    text_matches
        && FilterField::ALL.iter().all(|&field| {
            let mut filters = filter.filters_for(field).peekable();
            filters.peek().is_none()
                || filters.any(|field_filter| evaluate_field_filter(entry, field_filter, home))
        })
}

/// Evaluate single field filter against entry
fn evaluate_field_filter(entry: &ConversationEntry, filter: &FieldFilter, home: &Path) -> bool {
    match filter.field {
        FilterField::Project => match_project(entry, &filter.value, home),
        FilterField::Branch => match_branch(entry, &filter.value),
        FilterField::Since => match_since(entry, &filter.value),
    }
}

/// Case-insensitive substring of the first prompt or summary
fn match_text(entry: &ConversationEntry, term: &str) -> bool {
    let needle = term.to_lowercase();
    entry.first_prompt.to_lowercase().contains(&needle)
        || entry.summary.as_deref().is_some_and(|summary| summary.to_lowercase().contains(&needle))
}

/// Match project name or path (case-insensitive substring match)
fn match_project(entry: &ConversationEntry, value: &str, home: &Path) -> bool {
    let lower_value = value.to_lowercase();

    let search_value = if lower_value.starts_with('~') {
        let home_str = home.to_string_lossy().to_lowercase();
        lower_value.replacen('~', &home_str, 1)
    } else {
        lower_value
    };

    entry.project_name.to_lowercase().contains(&search_value)
        || entry.project_path.to_string_lossy().to_lowercase().contains(&search_value)
}

/// Match git branch (case-insensitive substring match)
fn match_branch(entry: &ConversationEntry, value: &str) -> bool {
    entry
        .git_branch
        .as_deref()
        .is_some_and(|branch| branch.to_lowercase().contains(&value.to_lowercase()))
}

/// Match since date (modified >= date at UTC midnight)
fn match_since(entry: &ConversationEntry, value: &str) -> bool {
    let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") else {
        return false;
    };
    let filter_datetime = date.and_time(chrono::NaiveTime::MIN).and_utc();
    entry.modified >= filter_datetime
}
