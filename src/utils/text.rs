//! Preview text cleaning for conversation listings
//!
//! Prompts stored in logs often carry markup (`<command-name>`, `<system-reminder>`)
//! and editor status lines injected by IDE integrations. Listings show a cleaned,
//! single-line preview instead. Full message content is never cleaned.

use std::sync::LazyLock;

use regex::Regex;

/// Maximum length, in characters, of a preview derived by scanning a log
pub const PREVIEW_MAX_CHARS: usize = 100;

/// Placeholder used when a conversation has no usable first prompt
pub const NO_PROMPT: &str = "No prompt";

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));

static IDE_NOISE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^The user opened the file .+$",
        r"^This may or may not be related to the current task\.?$",
        r"^The user is currently viewing",
        r"^The user's cursor is",
        r"^The user has the following file",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("noise pattern is valid"))
    .collect()
});

/// Removes `<...>` tags and trims the result
pub fn strip_tags(text: &str) -> String {
    TAG_PATTERN.replace_all(text, "").trim().to_string()
}

/// True for blank lines and editor status lines that carry no user intent
pub fn is_ide_noise(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || IDE_NOISE_PATTERNS.iter().any(|pattern| pattern.is_match(trimmed))
}

/// Cleans a prompt or summary for display in a listing
///
/// Tags are stripped, noise lines dropped, and the remaining lines joined with
/// single spaces. If nothing survives, the tag-stripped text is returned as is.
///
/// # Examples
///
/// ```
/// use claude_conversations::utils::text::clean_prompt;
///
/// let raw = "<system>The user opened the file app.ts</system>\nPlease fix the bug";
/// assert_eq!(clean_prompt(raw), "Please fix the bug");
/// ```
pub fn clean_prompt(raw: &str) -> String {
    let stripped = strip_tags(raw);
    let cleaned = stripped
        .split('\n')
        .filter(|line| !is_ide_noise(line))
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ");

    if cleaned.is_empty() { stripped } else { cleaned }
}

/// Truncates to at most `max_chars` characters without splitting a code point
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}
