//! Terminal output sanitization
//!
//! Log content is written by other programs and may contain escape sequences.
//! Anything the CLI prints from a log (prompts, message text, tool output) goes
//! through [`sanitize_for_terminal`] first so it cannot move the cursor, retitle
//! the window or clear the screen.

const ESC: char = '\x1b';
const BEL: char = '\x07';

/// Removes ANSI escape sequences and control characters from log-derived text
///
/// Strips CSI sequences (`ESC [ ... final`), OSC sequences (`ESC ] ... BEL` or
/// `ESC ] ... ESC \`), two-character escapes, and every control character except
/// tab and newline. Carriage returns are dropped so CRLF content prints cleanly.
///
/// # Examples
///
/// ```
/// use claude_conversations::utils::terminal::sanitize_for_terminal;
///
/// assert_eq!(sanitize_for_terminal("\x1b[31mRed\x1b[0m text"), "Red text");
/// ```
pub fn sanitize_for_terminal(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == ESC {
            match chars.next() {
                Some('[') => {
                    // Parameters and intermediates run until a final byte in @..~
                    for next in chars.by_ref() {
                        if ('@'..='~').contains(&next) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    while let Some(next) = chars.next() {
                        if next == BEL {
                            break;
                        }
                        if next == ESC && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                // Two-character escape such as ESC c (reset) or a lone ESC at the end
                _ => {}
            }
            continue;
        }

        if ch.is_control() && ch != '\t' && ch != '\n' {
            continue;
        }

        result.push(ch);
    }

    result
}

/// Collapses all whitespace runs to single spaces, for one-line listings
pub fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
