//! Backtracking byte cursor over the usage text.

use crate::error::{ParseError, Position};

/// Position within the input. Copying a cursor is a save point; assigning a
/// saved copy back is a backtrack.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Cursor<'a> {
    text: &'a str,
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self { text, offset: 0 }
    }

    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    pub(crate) fn position(&self) -> Position {
        Position::at(self.text, self.offset)
    }

    pub(crate) fn position_at(&self, offset: usize) -> Position {
        Position::at(self.text, offset)
    }

    /// Remaining input.
    pub(crate) fn rest(&self) -> &'a str {
        &self.text[self.offset..]
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.offset >= self.text.len()
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Moves to `offset`, clamped to input length.
    pub(crate) fn seek(&mut self, offset: usize) {
        self.offset = offset.min(self.text.len());
    }

    pub(crate) fn advance(&mut self, bytes: usize) {
        self.seek(self.offset + bytes);
    }

    pub(crate) fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance(expected.len_utf8());
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_str(&mut self, expected: &str) -> bool {
        if self.rest().starts_with(expected) {
            self.advance(expected.len());
            true
        } else {
            false
        }
    }

    /// Consumes the longest prefix whose chars satisfy `pred`.
    pub(crate) fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest.find(|ch: char| !pred(ch)).unwrap_or(rest.len());
        self.advance(len);
        &rest[..len]
    }

    /// Skips spaces and tabs; returns `true` if any were consumed.
    pub(crate) fn skip_inline_ws(&mut self) -> bool {
        !self.eat_while(|ch| ch == ' ' || ch == '\t').is_empty()
    }

    /// `true` at a line break or end of input.
    pub(crate) fn at_line_end(&self) -> bool {
        matches!(self.peek(), None | Some('\n') | Some('\r'))
    }

    /// Consumes one line break (`\n` or `\r\n`) if present.
    pub(crate) fn eat_newline(&mut self) -> bool {
        self.eat_str("\r\n") || self.eat('\n')
    }

    /// The rest of the current line, without its line break.
    pub(crate) fn current_line(&self) -> &'a str {
        let rest = self.rest();
        let end = rest.find('\n').unwrap_or(rest.len());
        rest[..end].trim_end_matches('\r')
    }

    /// Skips past the end of the current line.
    pub(crate) fn skip_line(&mut self) {
        let len = self.rest().find('\n').map_or(self.rest().len(), |idx| idx + 1);
        self.advance(len);
    }

    /// Byte offset of the start of the next line whose first non-blank
    /// character is `-`, or the input length.
    pub(crate) fn next_dash_line(&self) -> usize {
        let mut probe = *self;
        probe.skip_line();
        while !probe.is_eof() {
            if probe.current_line().trim_start().starts_with('-') {
                return probe.offset;
            }
            probe.skip_line();
        }
        self.text.len()
    }

    /// Builds a grammar-violation error at the current position.
    pub(crate) fn expected(&self, what: &str) -> ParseError {
        ParseError::unexpected(self.position(), what, self.peek())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_restores_offset() {
        let mut cursor = Cursor::new("--verbose");
        let saved = cursor;
        assert!(cursor.eat_str("--"));
        assert_eq!(cursor.eat_while(|ch| ch.is_ascii_alphabetic()), "verbose");
        assert!(cursor.is_eof());

        cursor = saved;
        assert_eq!(cursor.offset(), 0);
        assert_eq!(cursor.peek(), Some('-'));
    }

    #[test]
    fn test_line_helpers() {
        let mut cursor = Cursor::new("  a b\r\n\n  -x\nrest\n-y");
        assert_eq!(cursor.current_line(), "  a b");
        assert_eq!(cursor.next_dash_line(), 8);

        cursor.skip_line();
        assert_eq!(cursor.current_line(), "");
        assert!(cursor.at_line_end());

        cursor.seek(8);
        assert_eq!(cursor.next_dash_line(), 18);
    }
}
