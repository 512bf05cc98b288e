//! Recursive-descent grammar for a single usage expression.
//!
//! Each alternative either succeeds, declines without consuming input
//! (`Ok(None)`, the cursor restored), or fails hard after consuming input
//! (`Err`). Only an unclosed group fails hard; every other alternative backs
//! off so the next one can try the same text.
//!
//! Value placeholders never become atoms. Whether an option was written with
//! one is recorded in a [`ValueFlags`] map alongside the pattern.

use std::collections::BTreeMap;

use usage_pattern_core::{OptPattern, OptionAtom, Pattern};

use super::cursor::Cursor;
use crate::error::Result;

/// Outcome of an alternative that may decline without consuming input.
pub(crate) type Parsed<T> = Result<Option<T>>;

/// Options seen in usage lines, and whether any mention carried a value.
pub(crate) type ValueFlags = BTreeMap<OptionAtom, bool>;

fn note_option(flags: &mut ValueFlags, atom: OptionAtom, takes_value: bool) {
    *flags.entry(atom).or_default() |= takes_value;
}

/// `expr-seq ( '|' expr-seq )*`, flattened into one alternation.
pub(crate) fn parse_alternatives(
    cursor: &mut Cursor<'_>,
    flags: &mut ValueFlags,
) -> Result<OptPattern> {
    let mut branches = vec![parse_sequence(cursor, flags)?];
    loop {
        let saved = *cursor;
        cursor.skip_inline_ws();
        if !cursor.eat('|') {
            *cursor = saved;
            break;
        }
        branches.push(parse_sequence(cursor, flags)?);
    }
    Ok(Pattern::one_of(branches))
}

/// Whitespace-separated expressions, flattened into one sequence.
///
/// Zero expressions is accepted and yields an empty sequence.
pub(crate) fn parse_sequence(
    cursor: &mut Cursor<'_>,
    flags: &mut ValueFlags,
) -> Result<OptPattern> {
    let mut exprs = Vec::new();
    loop {
        let saved = *cursor;
        let spaced = cursor.skip_inline_ws();
        if !exprs.is_empty() && !spaced {
            break;
        }
        match parse_expression(cursor, flags)? {
            Some(expr) => exprs.push(expr),
            None => {
                *cursor = saved;
                break;
            }
        }
    }
    Ok(Pattern::sequence(exprs))
}

/// One expression unit, wrapped in `Repeated` when an ellipsis follows.
pub(crate) fn parse_expression(
    cursor: &mut Cursor<'_>,
    flags: &mut ValueFlags,
) -> Parsed<OptPattern> {
    let Some(unit) = parse_unit(cursor, flags)? else {
        return Ok(None);
    };

    let saved = *cursor;
    cursor.skip_inline_ws();
    if cursor.eat_str("...") {
        Ok(Some(Pattern::repeated(unit)))
    } else {
        *cursor = saved;
        Ok(Some(unit))
    }
}

fn parse_unit(cursor: &mut Cursor<'_>, flags: &mut ValueFlags) -> Parsed<OptPattern> {
    if let Some(inner) = parse_group(cursor, flags, '[', ']')? {
        return Ok(Some(Pattern::optional(inner)));
    }
    if let Some(inner) = parse_group(cursor, flags, '(', ')')? {
        return Ok(Some(inner));
    }
    if let Some(stacked) = parse_stacked_short(cursor, flags) {
        return Ok(Some(stacked));
    }
    if let Some((name, takes_value)) = parse_long_option(cursor) {
        let atom = OptionAtom::LongOption(name);
        note_option(flags, atom.clone(), takes_value);
        return Ok(Some(Pattern::atom(atom)));
    }
    if parse_keyword(cursor, "options") {
        return Ok(Some(Pattern::repeated(Pattern::atom(OptionAtom::AnyOption))));
    }
    if let Some(name) = parse_argument(cursor) {
        return Ok(Some(Pattern::atom(OptionAtom::Argument(name))));
    }
    if let Some(name) = parse_name(cursor) {
        return Ok(Some(Pattern::atom(OptionAtom::Command(name))));
    }
    Ok(None)
}

fn parse_group(
    cursor: &mut Cursor<'_>,
    flags: &mut ValueFlags,
    open: char,
    close: char,
) -> Parsed<OptPattern> {
    if !cursor.eat(open) {
        return Ok(None);
    }
    let inner = parse_alternatives(cursor, flags)?;
    cursor.skip_inline_ws();
    if !cursor.eat(close) {
        return Err(cursor.expected(&format!("expression, `|` or `{close}`")));
    }
    Ok(Some(inner))
}

/// `-abc`: one letter is a plain short option, several are any of them,
/// repeatable.
///
/// Only a single letter may carry a value placeholder; after a stack the
/// next word is left for the following expression.
fn parse_stacked_short(cursor: &mut Cursor<'_>, flags: &mut ValueFlags) -> Option<OptPattern> {
    let saved = *cursor;
    if !cursor.eat('-') {
        return None;
    }
    let letters: Vec<char> = cursor
        .eat_while(|ch| ch.is_ascii_alphabetic())
        .chars()
        .collect();
    if letters.is_empty() {
        *cursor = saved;
        return None;
    }

    if let [letter] = letters.as_slice() {
        let atom = OptionAtom::ShortOption(*letter);
        note_option(flags, atom.clone(), parse_option_value(cursor));
        return Some(Pattern::atom(atom));
    }
    let any_of = letters
        .into_iter()
        .map(|letter| {
            let atom = OptionAtom::ShortOption(letter);
            note_option(flags, atom.clone(), false);
            Pattern::atom(atom)
        })
        .collect();
    Some(Pattern::repeated(Pattern::one_of(any_of)))
}

/// `-x`, optionally followed by a value placeholder.
pub(crate) fn parse_short_option(cursor: &mut Cursor<'_>) -> Option<(char, bool)> {
    let saved = *cursor;
    if !cursor.eat('-') {
        return None;
    }
    match cursor.peek() {
        Some(letter) if letter.is_ascii_alphabetic() => {
            cursor.advance(letter.len_utf8());
            Some((letter, parse_option_value(cursor)))
        }
        _ => {
            *cursor = saved;
            None
        }
    }
}

/// `--name`, optionally followed by a value placeholder.
pub(crate) fn parse_long_option(cursor: &mut Cursor<'_>) -> Option<(String, bool)> {
    let saved = *cursor;
    if !cursor.eat_str("--") {
        return None;
    }
    let Some(name) = parse_name(cursor) else {
        *cursor = saved;
        return None;
    };
    Some((name, parse_option_value(cursor)))
}

/// `=VALUE` or a single space followed by `VALUE` or `<value>`.
///
/// Returns whether a value placeholder was consumed.
pub(crate) fn parse_option_value(cursor: &mut Cursor<'_>) -> bool {
    let saved = *cursor;
    if (cursor.eat('=') || cursor.eat(' ')) && parse_value(cursor) {
        return true;
    }
    *cursor = saved;
    false
}

fn parse_value(cursor: &mut Cursor<'_>) -> bool {
    if parse_argument(cursor).is_some() {
        return true;
    }
    let saved = *cursor;
    if !cursor.peek().is_some_and(|ch| ch.is_ascii_uppercase()) {
        return false;
    }
    cursor.eat_while(|ch| {
        ch.is_ascii_uppercase() || ch.is_ascii_digit() || ch == '_' || ch == '-'
    });
    if cursor.peek().is_some_and(is_name_char) {
        *cursor = saved;
        return false;
    }
    true
}

fn parse_keyword(cursor: &mut Cursor<'_>, keyword: &str) -> bool {
    let saved = *cursor;
    if cursor.eat_str(keyword) && !cursor.peek().is_some_and(is_name_char) {
        return true;
    }
    *cursor = saved;
    false
}

/// `<name>`
fn parse_argument(cursor: &mut Cursor<'_>) -> Option<String> {
    let saved = *cursor;
    if cursor.eat('<') {
        if let Some(name) = parse_name(cursor) {
            if cursor.eat('>') {
                return Some(name);
            }
        }
    }
    *cursor = saved;
    None
}

/// An ASCII alphanumeric followed by alphanumerics, `-` or `_`.
fn parse_name(cursor: &mut Cursor<'_>) -> Option<String> {
    if !cursor.peek().is_some_and(|ch| ch.is_ascii_alphanumeric()) {
        return None;
    }
    Some(cursor.eat_while(is_name_char).to_string())
}

fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_with_flags(text: &str) -> (OptPattern, ValueFlags) {
        let mut cursor = Cursor::new(text);
        let mut flags = ValueFlags::new();
        let parsed = parse_alternatives(&mut cursor, &mut flags).expect("should parse");
        assert!(cursor.is_eof(), "unparsed input: {:?}", cursor.rest());
        (parsed, flags)
    }

    fn expr(text: &str) -> OptPattern {
        parse_with_flags(text).0
    }

    fn short(ch: char) -> OptPattern {
        Pattern::atom(OptionAtom::ShortOption(ch))
    }

    fn long(name: &str) -> OptPattern {
        Pattern::atom(OptionAtom::LongOption(name.into()))
    }

    #[test]
    fn test_atoms_of_each_kind() {
        assert_eq!(expr("-a"), short('a'));
        assert_eq!(expr("--dry-run"), long("dry-run"));
        assert_eq!(expr("<src>"), Pattern::atom(OptionAtom::Argument("src".into())));
        assert_eq!(expr("push"), Pattern::atom(OptionAtom::Command("push".into())));
        assert_eq!(expr("options"), Pattern::repeated(Pattern::atom(OptionAtom::AnyOption)));
        assert_eq!(expr("optionsx"), Pattern::atom(OptionAtom::Command("optionsx".into())));
    }

    #[test]
    fn test_stacked_short_options_repeat() {
        assert_eq!(
            expr("-xy"),
            Pattern::repeated(Pattern::OneOf(vec![short('x'), short('y')]))
        );
    }

    #[test]
    fn test_stacked_short_options_take_no_value() {
        let (parsed, flags) = parse_with_flags("-abc FILE");
        assert_eq!(
            parsed,
            Pattern::Sequence(vec![
                Pattern::repeated(Pattern::OneOf(vec![short('a'), short('b'), short('c')])),
                Pattern::atom(OptionAtom::Command("FILE".into())),
            ])
        );
        assert_eq!(flags.get(&OptionAtom::ShortOption('a')), Some(&false));
    }

    #[test]
    fn test_option_values_are_swallowed() {
        assert_eq!(expr("--speed=<kn>"), long("speed"));
        assert_eq!(expr("--out FILE"), long("out"));
        assert_eq!(expr("-o FILE"), short('o'));

        let mut cursor = Cursor::new("--out File");
        assert_eq!(parse_long_option(&mut cursor), Some(("out".into(), false)));
        assert_eq!(cursor.rest(), " File");

        let mut cursor = Cursor::new("-f=<path>");
        assert_eq!(parse_short_option(&mut cursor), Some(('f', true)));
    }

    #[test]
    fn test_value_flags_are_recorded() {
        let (_, flags) = parse_with_flags("--out=FILE -o <x> [-v] --out");
        assert_eq!(flags.get(&OptionAtom::LongOption("out".into())), Some(&true));
        assert_eq!(flags.get(&OptionAtom::ShortOption('o')), Some(&true));
        assert_eq!(flags.get(&OptionAtom::ShortOption('v')), Some(&false));
        assert_eq!(flags.get(&OptionAtom::Argument("x".into())), None);
    }

    #[test]
    fn test_groups_and_alternation() {
        let parsed = expr("[-a | -b] (go | stop)");
        assert_eq!(
            parsed,
            Pattern::Sequence(vec![
                Pattern::optional(Pattern::OneOf(vec![short('a'), short('b')])),
                Pattern::OneOf(vec![
                    Pattern::atom(OptionAtom::Command("go".into())),
                    Pattern::atom(OptionAtom::Command("stop".into())),
                ]),
            ])
        );
        assert_eq!(expr("(-a)"), short('a'));
        assert_eq!(
            expr("[ -a -b ]"),
            Pattern::optional(Pattern::Sequence(vec![short('a'), short('b')]))
        );
    }

    #[test]
    fn test_ellipsis_wraps_unit() {
        assert_eq!(
            expr("<file>..."),
            Pattern::repeated(Pattern::atom(OptionAtom::Argument("file".into())))
        );
        assert_eq!(
            expr("[--verbose] ..."),
            Pattern::repeated(Pattern::optional(long("verbose")))
        );
    }

    #[test]
    fn test_declined_alternatives_do_not_consume() {
        for text in ["-", "--", "-1", "<>", "<a", "|"] {
            let mut cursor = Cursor::new(text);
            let parsed = parse_expression(&mut cursor, &mut ValueFlags::new()).unwrap();
            assert_eq!(parsed, None, "{text:?}");
            assert_eq!(cursor.offset(), 0, "{text:?}");
        }
    }

    #[test]
    fn test_unclosed_group_fails_hard() {
        let mut cursor = Cursor::new("[-a -b");
        let err = parse_expression(&mut cursor, &mut ValueFlags::new()).unwrap_err();
        assert_eq!(err.position.column, 7);
    }

    #[test]
    fn test_expressions_need_separating_space() {
        let mut cursor = Cursor::new("-a-b");
        assert_eq!(parse_sequence(&mut cursor, &mut ValueFlags::new()).unwrap(), short('a'));
        assert_eq!(cursor.rest(), "-b");
    }
}
