//! Error types for usage-text parsing.
//!
//! Every failure is a single positioned [`ParseError`]: the parser never
//! recovers, so the first grammar violation aborts the whole parse.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 1-based line and column (in characters) within the parsed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Computes the position of byte `offset` within `text`.
    ///
    /// Offsets past the end of `text` are clamped to the end.
    pub fn at(text: &str, offset: usize) -> Self {
        let mut offset = offset.min(text.len());
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = &text[..offset];
        let line_start = before.rfind('\n').map_or(0, |idx| idx + 1);
        Self {
            line: before.matches('\n').count() + 1,
            column: before[line_start..].chars().count() + 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// The text does not follow the usage or option-record grammar.
    #[error("expected {expected}, found {}", describe_found(.found))]
    Unexpected {
        /// Description of what the grammar accepts at this point.
        expected: String,
        /// The offending character, `None` at end of input.
        found: Option<char>,
    },
    /// No `Usage:` header anywhere in the text.
    #[error("missing `Usage:` header")]
    MissingUsageHeader,
    /// A `[default:` tag was opened but never closed with `]`.
    #[error("unclosed `[default:` tag")]
    UnclosedDefault,
}

fn describe_found(found: &Option<char>) -> String {
    match found {
        None => "end of input".to_string(),
        Some('\n') | Some('\r') => "end of line".to_string(),
        Some(ch) => format!("`{ch}`"),
    }
}

/// A positioned parse failure.
///
/// # Examples
///
/// ```
/// use usage_pattern_parser::parse_usage;
///
/// let err = parse_usage("Usage:\n  prog -\n").unwrap_err();
/// assert_eq!(err.position.line, 2);
/// assert_eq!(err.position.column, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{position}: {kind}")]
pub struct ParseError {
    pub position: Position,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) fn new(position: Position, kind: ParseErrorKind) -> Self {
        Self { position, kind }
    }

    pub(crate) fn unexpected(
        position: Position,
        expected: impl Into<String>,
        found: Option<char>,
    ) -> Self {
        Self::new(
            position,
            ParseErrorKind::Unexpected {
                expected: expected.into(),
                found,
            },
        )
    }
}

/// Convenience alias for results with [`ParseError`].
pub type Result<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_counts_lines_and_chars() {
        let text = "ab\ncdé\nf";
        assert_eq!(Position::at(text, 0), Position { line: 1, column: 1 });
        assert_eq!(Position::at(text, 3), Position { line: 2, column: 1 });
        assert_eq!(Position::at(text, 7), Position { line: 2, column: 4 });
        assert_eq!(Position::at(text, 100), Position { line: 3, column: 2 });
    }

    #[test]
    fn test_error_message_names_position_and_expectation() {
        let err = ParseError::unexpected(Position { line: 2, column: 8 }, "`]`", Some('-'));
        assert_eq!(err.to_string(), "line 2, column 8: expected `]`, found `-`");

        let position = Position { line: 4, column: 1 };
        let err = ParseError::new(position, ParseErrorKind::MissingUsageHeader);
        assert_eq!(err.to_string(), "line 4, column 1: missing `Usage:` header");
    }
}
