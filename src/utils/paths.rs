use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

use anyhow::{Result, bail};

/// Character that replaces every path separator in a project directory name
pub const TOKEN_DELIMITER: char = '-';

/// Encodes a file system path into Claude's project directory format
///
/// Every `/` becomes `-`, so the encoding is lossy: `/foo/bar` and `/foo-bar`
/// produce the same token.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use claude_conversations::encode_path;
///
/// let path = PathBuf::from("/Users/foo/my-app");
/// assert_eq!(encode_path(&path), "-Users-foo-my-app");
/// ```
pub fn encode_path(path: &Path) -> String {
    path.to_string_lossy().replace(std::path::MAIN_SEPARATOR, &TOKEN_DELIMITER.to_string())
}

/// Recovers a real file system path from a hyphen-encoded project directory name
///
/// Because hyphens inside directory names are indistinguishable from encoded
/// separators, the token is resolved against the live file system: after stripping
/// the encoded home prefix, each step greedily takes the longest run of segments
/// that names an existing entry under the path resolved so far. When nothing
/// matches, the remaining segments become one final leaf, which may not exist.
///
/// This is a heuristic, not an inverse of [`encode_path`]: when both `my-app` and
/// `my/app` exist, the token for `my/app` still decodes to `my-app`.
///
/// File system errors during probing (e.g. permission denied) count as "missing".
pub fn reconstruct_path(token: &str, home: &Path) -> PathBuf {
    let home_prefix = encode_path(home);

    let (base, remainder) = match token.strip_prefix(home_prefix.as_str()) {
        Some(rest) if rest.is_empty() => return home.to_path_buf(),
        Some(rest) if rest.starts_with(TOKEN_DELIMITER) => {
            (home.to_path_buf(), &rest[TOKEN_DELIMITER.len_utf8()..])
        }
        // Prefix matched inside a segment ("-home-al" vs "-home-alice-...")
        _ => {
            let rest = token.strip_prefix(TOKEN_DELIMITER).unwrap_or(token);
            (PathBuf::from(std::path::MAIN_SEPARATOR_STR), rest)
        }
    };

    if remainder.is_empty() {
        return base;
    }

    let segments: Vec<&str> = remainder.split(TOKEN_DELIMITER).collect();
    let mut resolved = base;
    let mut start = 0;

    while start < segments.len() {
        let matched_end = (start + 1..=segments.len()).rev().find(|&end| {
            let candidate = segments[start..end].join("-");
            !candidate.is_empty() && entry_exists(&resolved.join(&candidate))
        });

        match matched_end {
            Some(end) => {
                resolved.push(segments[start..end].join("-"));
                start = end;
            }
            None => {
                resolved.push(segments[start..].join("-"));
                break;
            }
        }
    }

    resolved
}

fn entry_exists(path: &Path) -> bool {
    matches!(path.try_exists(), Ok(true))
}

/// Validates that a caller-supplied project token names exactly one directory entry
///
/// Tokens come from callers of the catalog, so they are checked before being joined
/// onto the projects directory.
///
/// # Errors
///
/// Returns an error if the token is empty, contains a path separator, or is a
/// `.`/`..` component.
pub fn validate_directory_token(token: &str) -> Result<()> {
    if token.is_empty() {
        bail!("Project token is empty");
    }

    let mut components = Path::new(token).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) if name == token => Ok(()),
        _ => bail!("Project token must be a single directory name: {}", token),
    }
}

/// Final path segment used as a human-readable project name
pub fn display_name(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}

/// Formats a path with ~ substitution for the home directory
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use claude_conversations::format_path_with_tilde;
///
/// let formatted = format_path_with_tilde(Path::new("/Users/alice/app"), Path::new("/Users/alice"));
/// assert_eq!(formatted, "~/app");
/// ```
pub fn format_path_with_tilde(path: &Path, home: &Path) -> String {
    if let Ok(relative) = path.strip_prefix(home) {
        if relative.as_os_str().is_empty() {
            return "~".to_string();
        }
        return format!("~/{}", relative.display());
    }

    match path.to_string_lossy() {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}
