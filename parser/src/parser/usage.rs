//! Usage block: the `Usage:` header and the invocation lines under it.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};
use usage_pattern_core::{OptPattern, Pattern};

use super::cursor::Cursor;
use super::expr::{ValueFlags, parse_alternatives};
use crate::error::{ParseError, ParseErrorKind, Result};

/// `Usage:` or `usage:` starting a word; other casings do not count.
static USAGE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[Uu]sage:").expect("static regex must compile"));

/// Skips to the `Usage:` header and parses every usage line after it into a
/// single alternation.
///
/// Also returns every option mentioned, with whether it was written with a
/// value. Leaves the cursor at the start of the first line after the block.
pub(crate) fn parse_usage_block(cursor: &mut Cursor<'_>) -> Result<(OptPattern, ValueFlags)> {
    let Some(header) = USAGE_HEADER.find(cursor.rest()) else {
        cursor.seek(usize::MAX);
        return Err(ParseError::new(cursor.position(), ParseErrorKind::MissingUsageHeader));
    };
    cursor.advance(header.end());

    let mut lines = Vec::new();
    let mut flags = ValueFlags::new();

    // `Usage: prog ...` on the header line itself.
    let saved = *cursor;
    cursor.skip_inline_ws();
    if cursor.at_line_end() {
        *cursor = saved;
        cursor.skip_line();
    } else {
        *cursor = saved;
        lines.push(parse_usage_line(cursor, &mut flags)?);
        cursor.eat_newline();
    }

    while !cursor.is_eof() && !ends_usage_block(cursor.current_line()) {
        lines.push(parse_usage_line(cursor, &mut flags)?);
        cursor.eat_newline();
    }

    if lines.is_empty() {
        return Err(cursor.expected("usage line"));
    }
    debug!(lines = lines.len(), options = flags.len(), "Parsed usage block");
    Ok((Pattern::one_of(lines), flags))
}

/// `ws* progname alternatives ws*` up to the end of the line.
fn parse_usage_line(cursor: &mut Cursor<'_>, flags: &mut ValueFlags) -> Result<OptPattern> {
    cursor.skip_inline_ws();
    let program = cursor.eat_while(|ch| !ch.is_whitespace());

    let pattern = parse_alternatives(cursor, flags)?;
    cursor.skip_inline_ws();
    if !cursor.at_line_end() {
        return Err(cursor.expected("expression, `|` or end of line"));
    }
    trace!(program, %pattern, "Parsed usage line");
    Ok(pattern)
}

/// A blank line, an option description, or a section header such as
/// `Options:` ends the block.
fn ends_usage_block(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.is_empty()
        || trimmed.starts_with('-')
        || trimmed
            .split_whitespace()
            .next()
            .is_some_and(|token| token.ends_with(':'))
}
