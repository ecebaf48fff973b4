//! Query parser for conversation listings.
//!
//! Parses a search box query into a [`FilterExpr`] for evaluation.
//!
//! # Syntax
//!
//! ```text
//! query  := term*
//! term   := word | "quoted words" | field:value | field:"quoted value"
//! field  := project | branch | since (case-insensitive)
//! ```
//!
//! # Supported Fields
//!
//! - `project:path` - Project name or path (supports ~ expansion and partial matches)
//! - `branch:name` - Git branch (partial match)
//! - `since:YYYY-MM-DD` - Conversations modified on or after the date
//!
//! Any other word is free text, including words with a colon such as `error:`
//! or `http://localhost`.
//!
//! # Examples
//!
//! ```rust
//! # use claude_conversations::filters::parser::parse_filter;
//! // Free text
//! let expr = parse_filter("login bug").unwrap();
//!
//! // Free text scoped to a project and branch
//! let expr = parse_filter("login project:~/code/app branch:main").unwrap();
//!
//! // Same field is OR'd
//! let expr = parse_filter("branch:main branch:release").unwrap();
//!
//! // Quoted values for spaces
//! let expr = parse_filter("\"exact phrase\" project:\"my project\"").unwrap();
//! ```
//!
//! # Validation
//!
//! - `since` dates must be YYYY-MM-DD format and semantically valid
//! - Empty field values are rejected

use std::iter::Peekable;
use std::str::Chars;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;

use super::ast::{FieldFilter, FilterExpr, FilterField};

/// Token types produced by the tokenizer
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    /// field:value or field:"quoted value"
    FieldValue { field: FilterField, value: String },
    /// word or "quoted words"
    Text(String),
}

/// Tokenize query input into tokens
///
/// Only a known field name before the first `:` makes a word a filter, so
/// `error:`, `http://localhost` and `TODO:` stay free text. Text following a
/// closing quote in the same word becomes a word of its own.
fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    let mut carried: Option<String> = None;

    loop {
        let word = match carried.take() {
            Some(word) => word,
            None => {
                while chars.next_if(|ch| ch.is_whitespace()).is_some() {}
                if chars.peek().is_none() {
                    break;
                }
                read_word(&mut chars)
            }
        };

        if let Some(quoted) = word.strip_prefix('"') {
            let (text, rest) = read_quoted_value(&mut chars, quoted)?;
            if !text.trim().is_empty() {
                tokens.push(Token::Text(text));
            }
            carried = rest;
            continue;
        }

        match split_field(&word) {
            Some((field, raw_value)) => {
                let value = match raw_value.strip_prefix('"') {
                    Some(quoted) => {
                        let (value, rest) = read_quoted_value(&mut chars, quoted)?;
                        carried = rest;
                        value
                    }
                    None => raw_value.to_string(),
                };

                if value.is_empty() {
                    return Err(anyhow!("Missing value for field: {}", word));
                }

                tokens.push(Token::FieldValue { field, value });
            }
            None => tokens.push(Token::Text(word)),
        }
    }

    Ok(tokens)
}

/// Read a word (until whitespace or end)
fn read_word(chars: &mut Peekable<Chars>) -> String {
    let mut word = String::new();

    while let Some(ch) = chars.next_if(|ch| !ch.is_whitespace()) {
        word.push(ch);
    }

    word
}

/// Read the rest of a quoted value whose opening quote is already stripped from `initial`
///
/// Returns the value and whatever followed the closing quote within `initial`.
fn read_quoted_value(chars: &mut Peekable<Chars>, initial: &str) -> Result<(String, Option<String>)> {
    if let Some((value, rest)) = initial.split_once('"') {
        let rest = (!rest.is_empty()).then(|| rest.to_string());
        return Ok((value.to_string(), rest));
    }

    let mut value = initial.to_string();
    for ch in chars.by_ref() {
        if ch == '"' {
            return Ok((value, None));
        }
        value.push(ch);
    }

    Err(anyhow!("Unterminated quoted string"))
}

/// Split `field:value` when the prefix names a filter field
fn split_field(word: &str) -> Option<(FilterField, &str)> {
    let (name, value) = word.split_once(':')?;
    Some((parse_field(name)?, value))
}

/// Parse field name into FilterField enum (case-insensitive)
fn parse_field(field: &str) -> Option<FilterField> {
    match field.to_lowercase().as_str() {
        "project" => Some(FilterField::Project),
        "branch" => Some(FilterField::Branch),
        "since" => Some(FilterField::Since),
        _ => None,
    }
}

/// Parse a query string into a FilterExpr
///
/// Examples:
/// - "login" → one free-text term
/// - "project:foo branch:main" → two field filters, AND'd
/// - "branch:main branch:dev" → two field filters, OR'd
/// - "\"foo bar\" since:2024-01-01" → a phrase and a date filter
/// - "error: http://localhost" → two free-text terms
pub fn parse_filter(input: &str) -> Result<FilterExpr> {
    let mut expr = FilterExpr::new();
    if input.trim().is_empty() {
        return Ok(expr);
    }

    let tokens = tokenize(input).context("Failed to tokenize filter")?;

    for token in tokens {
        match token {
            Token::FieldValue { field, value } => {
                validate_value(field, &value)?;
                expr.add_filter(FieldFilter::new(field, value));
            }
            Token::Text(text) => expr.add_text_term(text),
        }
    }

    Ok(expr)
}

/// Validate filter value based on field type
fn validate_value(field: FilterField, value: &str) -> Result<()> {
    match field {
        FilterField::Since => {
            if !is_valid_date_format(value) {
                return Err(anyhow!("Invalid date format: '{}' (expected YYYY-MM-DD)", value));
            }
            Ok(())
        }
        FilterField::Project | FilterField::Branch => {
            if value.trim().is_empty() {
                return Err(anyhow!("Filter value cannot be empty"));
            }
            Ok(())
        }
    }
}

/// Check if string is valid YYYY-MM-DD format
fn is_valid_date_format(s: &str) -> bool {
    // chrono alone accepts "2024-1-5"
    if s.len() != 10 {
        return false;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}
