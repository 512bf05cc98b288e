//! Atom and option-metadata type definitions.
//!
//! This module defines the leaves of a parsed usage pattern and the per-option
//! metadata gathered from the option-descriptions section. The types are
//! designed for serialization with [`serde`]: an [`OptionAtom`] serializes as
//! its usage spelling, so an [`OptInfoMap`] becomes a plain JSON object.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Pattern;

/// Leaf of a usage pattern.
///
/// The derived ordering puts short options before long options, then
/// commands, arguments and the `[options]` placeholder; synonym groups are
/// kept in that order.
///
/// # Examples
///
/// ```
/// use usage_pattern_core::OptionAtom;
///
/// let atom: OptionAtom = "--verbose".parse().unwrap();
/// assert_eq!(atom, OptionAtom::LongOption("verbose".into()));
/// assert_eq!(OptionAtom::ShortOption('v').to_string(), "-v");
/// assert!(OptionAtom::ShortOption('v') < atom);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum OptionAtom {
    /// `-x`
    ShortOption(char),
    /// `--name`
    LongOption(String),
    /// A literal word such as a subcommand.
    Command(String),
    /// `<name>`
    Argument(String),
    /// The `options` keyword: any option from the descriptions section.
    AnyOption,
}

impl OptionAtom {
    /// Returns `true` for short and long options.
    pub fn is_option(&self) -> bool {
        matches!(self, OptionAtom::ShortOption(_) | OptionAtom::LongOption(_))
    }
}

impl fmt::Display for OptionAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionAtom::ShortOption(ch) => write!(f, "-{ch}"),
            OptionAtom::LongOption(name) => write!(f, "--{name}"),
            OptionAtom::Command(name) => f.write_str(name),
            OptionAtom::Argument(name) => write!(f, "<{name}>"),
            OptionAtom::AnyOption => f.write_str("[options]"),
        }
    }
}

/// Error returned when a string is not a valid atom spelling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid atom spelling: {0:?}")]
pub struct AtomParseError(pub String);

impl FromStr for OptionAtom {
    type Err = AtomParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AtomParseError(s.to_string());

        if s == "[options]" {
            return Ok(OptionAtom::AnyOption);
        }
        if let Some(name) = s.strip_prefix("--") {
            return if is_name(name) {
                Ok(OptionAtom::LongOption(name.to_string()))
            } else {
                Err(invalid())
            };
        }
        if let Some(rest) = s.strip_prefix('-') {
            let mut chars = rest.chars();
            return match (chars.next(), chars.next()) {
                (Some(ch), None) if ch.is_ascii_alphabetic() => Ok(OptionAtom::ShortOption(ch)),
                _ => Err(invalid()),
            };
        }
        if let Some(name) = s.strip_prefix('<').and_then(|r| r.strip_suffix('>')) {
            return if is_name(name) {
                Ok(OptionAtom::Argument(name.to_string()))
            } else {
                Err(invalid())
            };
        }
        if is_name(s) {
            Ok(OptionAtom::Command(s.to_string()))
        } else {
            Err(invalid())
        }
    }
}

impl From<OptionAtom> for String {
    fn from(atom: OptionAtom) -> Self {
        atom.to_string()
    }
}

impl TryFrom<String> for OptionAtom {
    type Error = AtomParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Returns `true` if `s` is a usage-grammar name: an ASCII alphanumeric
/// followed by alphanumerics, `-` or `_`.
pub fn is_name(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|ch| ch.is_ascii_alphanumeric())
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}

/// A pattern over option atoms.
pub type OptPattern = Pattern<OptionAtom>;

/// Per-option metadata.
///
/// The [`Default`] value is the blank entry used for atoms that have no
/// description: no synonyms, no default, no value, not repeatable.
///
/// # Examples
///
/// ```
/// use usage_pattern_core::{OptInfo, OptionAtom};
///
/// let info = OptInfo::from_synonyms([
///     OptionAtom::LongOption("verbose".into()),
///     OptionAtom::ShortOption('v'),
/// ]);
/// assert_eq!(info.synonyms.len(), 2);
/// assert!(info.default_val.is_none());
/// assert!(!info.is_repeated);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptInfo {
    /// Every spelling treated as the same option.
    pub synonyms: BTreeSet<OptionAtom>,
    /// Value of the `[default: ...]` tag, if any.
    pub default_val: Option<String>,
    /// The option is followed by a value placeholder.
    pub expects_val: bool,
    /// The option may legally appear more than once.
    pub is_repeated: bool,
}

impl OptInfo {
    /// Creates an entry holding only a synonym group.
    pub fn from_synonyms(synonyms: impl IntoIterator<Item = OptionAtom>) -> Self {
        Self {
            synonyms: synonyms.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Sets the default value.
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_val = Some(value.into());
        self
    }

    /// Marks the option as taking a value.
    pub fn expecting_value(mut self) -> Self {
        self.expects_val = true;
        self
    }
}

/// Option metadata keyed by atom.
pub type OptInfoMap = BTreeMap<OptionAtom, OptInfo>;

/// Final parse result: the resolved pattern and its metadata.
///
/// # Examples
///
/// ```
/// use usage_pattern_core::*;
///
/// let format = OptFormat::new(Pattern::atom(OptionAtom::ShortOption('a')), OptInfoMap::new());
/// let json = format.to_json().unwrap();
/// assert_eq!(OptFormat::from_json(&json).unwrap(), format);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptFormat {
    /// Usage pattern with synonyms expanded.
    pub pattern: OptPattern,
    /// Metadata for every atom reachable in `pattern` and every described option.
    pub infos: OptInfoMap,
}

impl OptFormat {
    /// Pairs a pattern with its metadata.
    pub fn new(pattern: OptPattern, infos: OptInfoMap) -> Self {
        Self { pattern, infos }
    }

    /// Looks up the metadata for an atom.
    pub fn info(&self, atom: &OptionAtom) -> Option<&OptInfo> {
        self.infos.get(atom)
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes from JSON produced by [`to_json`](Self::to_json).
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atom_spellings_parse_back() {
        for spelling in ["-v", "--dry-run", "<file_name>", "push", "[options]"] {
            let atom: OptionAtom = spelling.parse().expect("valid spelling");
            assert_eq!(atom.to_string(), spelling);
        }
    }

    #[test]
    fn test_atom_rejects_malformed_spellings() {
        for spelling in ["", "-", "--", "-ab", "<>", "<a b>", "two words", "-1"] {
            assert!(spelling.parse::<OptionAtom>().is_err(), "{spelling:?} should fail");
        }
    }

    #[test]
    fn test_synonyms_order_short_before_long() {
        let info = OptInfo::from_synonyms([
            OptionAtom::LongOption("all".into()),
            OptionAtom::ShortOption('a'),
        ]);
        let ordered: Vec<_> = info.synonyms.iter().map(ToString::to_string).collect();
        assert_eq!(ordered, vec!["-a", "--all"]);
    }

    #[test]
    fn test_info_map_serializes_as_object() {
        let mut infos = OptInfoMap::new();
        infos.insert(
            OptionAtom::ShortOption('o'),
            OptInfo::from_synonyms([OptionAtom::ShortOption('o')])
                .with_default("out.txt")
                .expecting_value(),
        );

        let value = serde_json::to_value(&infos).unwrap();
        assert_eq!(value["-o"]["default_val"], "out.txt");
        assert_eq!(value["-o"]["synonyms"][0], "-o");
        assert_eq!(value["-o"]["expects_val"], true);
    }
}
