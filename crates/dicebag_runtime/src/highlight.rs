//! Syntax highlighting for the command line.

use std::borrow::Cow;

use crate::command::KEYWORDS;

const RESET: &str = "\x1b[0m";
const BOLD_GREEN: &str = "\x1b[1;32m";
const MAGENTA: &str = "\x1b[35m";
const CYAN: &str = "\x1b[36m";
const YELLOW: &str = "\x1b[1;33m";
const RED: &str = "\x1b[31m";

/// Highlighter for the `|`-separated command language.
pub struct CommandHighlighter;

impl CommandHighlighter {
    /// Creates a new highlighter.
    pub const fn new() -> Self {
        Self
    }

    /// Highlight a line of input.
    ///
    /// The first word of each step is a keyword; later words are colored by
    /// shape: plain numbers, signed modifiers, or names.
    #[allow(clippy::unused_self)]
    pub fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.is_empty() {
            return Cow::Borrowed(line);
        }

        let mut result = String::with_capacity(line.len() * 2);
        let mut word = String::new();
        let mut first_in_step = true;

        for c in line.chars() {
            if c.is_whitespace() || c == '|' {
                if !word.is_empty() {
                    push_word(&mut result, &word, first_in_step);
                    word.clear();
                    first_in_step = false;
                }
                if c == '|' {
                    result.push_str(YELLOW);
                    result.push(c);
                    result.push_str(RESET);
                    first_in_step = true;
                } else {
                    result.push(c);
                }
            } else {
                word.push(c);
            }
        }
        if !word.is_empty() {
            push_word(&mut result, &word, first_in_step);
        }

        Cow::Owned(result)
    }
}

impl Default for CommandHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

fn push_word(out: &mut String, word: &str, is_keyword_position: bool) {
    let color = if is_keyword_position {
        if KEYWORDS.contains(&word) {
            Some(BOLD_GREEN)
        } else {
            Some(RED)
        }
    } else if word.starts_with(['+', '-']) && word[1..].chars().all(|c| c.is_ascii_digit()) {
        Some(CYAN)
    } else if word.chars().all(|c| c.is_ascii_digit()) {
        Some(MAGENTA)
    } else {
        None
    };

    match color {
        Some(color) => {
            out.push_str(color);
            out.push_str(word);
            out.push_str(RESET);
        }
        None => out.push_str(word),
    }
}
