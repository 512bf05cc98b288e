//! Option-descriptions section parser.
//!
//! The section starts at the first line whose first non-blank character is
//! `-`. Each such line opens a record that runs until the next one:
//!
//! ```text
//!   -o FILE, --output=FILE  Write here [default: out.txt]
//!                           (continuation lines belong to the record)
//! ```

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use usage_pattern_core::{OptInfo, OptInfoMap, OptionAtom};

use super::cursor::Cursor;
use super::expr::{ValueFlags, parse_long_option, parse_short_option};
use crate::error::{ParseError, ParseErrorKind, Result};

/// Opening of a default-value tag; only the keyword is case-insensitive.
static DEFAULT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[default:").expect("static regex must compile"));

/// Parses every option record from the cursor to end of input.
///
/// The map starts with one entry per option seen in the usage lines, so an
/// option written as `--out=FILE` there expects a value even without a
/// description. Each record's [`OptInfo`] is then stored under all of its
/// synonyms; a later record for the same spelling replaces the earlier entry.
pub(crate) fn parse_option_section(
    cursor: &mut Cursor<'_>,
    usage_flags: ValueFlags,
) -> Result<OptInfoMap> {
    let mut infos: OptInfoMap = usage_flags
        .into_iter()
        .map(|(atom, expects_val)| {
            let info = OptInfo {
                expects_val,
                ..OptInfo::default()
            };
            (atom, info)
        })
        .collect();

    while !cursor.is_eof() && !cursor.current_line().trim_start().starts_with('-') {
        cursor.skip_line();
    }

    while !cursor.is_eof() {
        let info = parse_record(cursor)?;
        debug!(
            synonyms = ?info.synonyms.iter().map(ToString::to_string).collect::<Vec<_>>(),
            default = ?info.default_val,
            expects_val = info.expects_val,
            "Parsed option record"
        );
        for synonym in &info.synonyms {
            infos.insert(synonym.clone(), info.clone());
        }
    }

    Ok(infos)
}

/// One record: synonyms, an optional `[default: ...]` tag, then anything up
/// to the next record.
fn parse_record(cursor: &mut Cursor<'_>) -> Result<OptInfo> {
    let record_end = cursor.next_dash_line();
    cursor.skip_inline_ws();

    let mut synonyms = Vec::new();
    let mut expects_val = false;

    let Some((first, takes_value)) = parse_synonym(cursor) else {
        return Err(cursor.expected("short or long option"));
    };
    synonyms.push(first);
    expects_val |= takes_value;

    loop {
        let saved = *cursor;
        if !parse_separator(cursor) {
            break;
        }
        match parse_synonym(cursor) {
            Some((atom, takes_value)) => {
                synonyms.push(atom);
                expects_val |= takes_value;
            }
            None => {
                *cursor = saved;
                break;
            }
        }
    }

    let default_val = parse_default(cursor, record_end)?;
    cursor.seek(record_end);

    Ok(OptInfo {
        default_val,
        expects_val,
        ..OptInfo::from_synonyms(synonyms)
    })
}

fn parse_synonym(cursor: &mut Cursor<'_>) -> Option<(OptionAtom, bool)> {
    if let Some((name, takes_value)) = parse_long_option(cursor) {
        return Some((OptionAtom::LongOption(name), takes_value));
    }
    parse_short_option(cursor)
        .map(|(letter, takes_value)| (OptionAtom::ShortOption(letter), takes_value))
}

/// `,` followed by optional blanks, or one or more blanks.
fn parse_separator(cursor: &mut Cursor<'_>) -> bool {
    let comma = cursor.eat(',');
    let spaced = cursor.skip_inline_ws();
    comma || spaced
}

/// Finds a `[default: value]` tag between the cursor and `record_end`.
fn parse_default(cursor: &Cursor<'_>, record_end: usize) -> Result<Option<String>> {
    let start = cursor.offset();
    let body = &cursor.rest()[..record_end - start];
    let Some(tag) = DEFAULT_TAG.find(body) else {
        return Ok(None);
    };

    let value = &body[tag.end()..];
    match value.find(']') {
        Some(close) => Ok(Some(value[..close].trim().to_string())),
        None => Err(ParseError::new(
            cursor.position_at(start + tag.start()),
            ParseErrorKind::UnclosedDefault,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(text: &str) -> Result<OptInfoMap> {
        parse_option_section(&mut Cursor::new(text), ValueFlags::new())
    }

    fn atom(spelling: &str) -> OptionAtom {
        spelling.parse().unwrap()
    }

    #[test]
    fn test_synonyms_share_one_entry() {
        let infos = section("Options:\n  -v, --verbose  Talk more [default: off]\n").unwrap();
        assert_eq!(infos.len(), 2);
        assert_eq!(infos[&atom("-v")], infos[&atom("--verbose")]);

        let info = &infos[&atom("-v")];
        assert_eq!(info.synonyms.len(), 2);
        assert_eq!(info.default_val.as_deref(), Some("off"));
        assert!(!info.expects_val);
        assert!(!info.is_repeated);
    }

    #[test]
    fn test_value_on_any_synonym_marks_record() {
        let text = "  -o, --output=FILE  Write here\n  -s <n>  Speed\n  -q  QUIET mode\n";
        let infos = section(text).unwrap();
        assert!(infos[&atom("-o")].expects_val);
        assert!(infos[&atom("--output")].expects_val);
        assert!(infos[&atom("-s")].expects_val);
        assert!(!infos[&atom("-q")].expects_val);
    }

    #[test]
    fn test_default_tag_spans_continuation_lines() {
        let text = "  --speed=<kn>  Speed in knots\n\
                    [Default:  10 ]\n  --moored  Moored\n";
        let infos = section(text).unwrap();
        assert_eq!(infos[&atom("--speed")].default_val.as_deref(), Some("10"));
        assert_eq!(infos[&atom("--moored")].default_val, None);
    }

    #[test]
    fn test_default_does_not_leak_into_next_record() {
        let infos = section("  -a  All\n  -b  Both [default: yes]\n").unwrap();
        assert_eq!(infos[&atom("-a")].default_val, None);
        assert_eq!(infos[&atom("-b")].default_val.as_deref(), Some("yes"));
    }

    #[test]
    fn test_later_record_replaces_earlier() {
        let infos = section("  -x, --ex  First\n  -x  Second [default: 2]\n").unwrap();
        assert_eq!(infos[&atom("-x")].synonyms.len(), 1);
        assert_eq!(infos[&atom("-x")].default_val.as_deref(), Some("2"));
        assert_eq!(infos[&atom("--ex")].synonyms.len(), 2);
    }

    #[test]
    fn test_unclosed_default_is_positioned_at_tag() {
        let err = section("  -a  All\n  -b  Both [default: yes\n  -c  Cat ]\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnclosedDefault);
        assert_eq!((err.position.line, err.position.column), (2, 12));
    }

    #[test]
    fn test_record_must_start_with_option() {
        let err = section("  -1  Digit\n").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::Unexpected { .. }));
        assert_eq!((err.position.line, err.position.column), (1, 3));
    }

    #[test]
    fn test_usage_flags_seed_entries_until_described() {
        let mut flags = ValueFlags::new();
        flags.insert(atom("--out"), true);
        flags.insert(atom("-o"), true);
        flags.insert(atom("-q"), false);

        let text = "Options:\n  -o, --output  Write here\n";
        let infos = parse_option_section(&mut Cursor::new(text), flags).unwrap();

        let out = &infos[&atom("--out")];
        assert!(out.expects_val);
        assert!(out.synonyms.is_empty());
        assert!(!infos[&atom("-q")].expects_val);

        let described = &infos[&atom("-o")];
        assert!(!described.expects_val);
        assert_eq!(described.synonyms.len(), 2);
    }

    #[test]
    fn test_no_section_is_empty() {
        assert!(section("\nSee the manual.\n").unwrap().is_empty());
    }
}
