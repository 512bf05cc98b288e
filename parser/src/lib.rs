//! Parsing of usage-string help text into pattern trees.
//!
//! This crate reads the "usage string" a program documents itself with: a
//! `Usage:` section listing invocation patterns, followed by an option
//! descriptions section. The result is an [`OptFormat`]: a [`Pattern`] tree
//! whose option leaves already stand for every spelling of the option, plus
//! an [`OptInfoMap`] recording synonyms, defaults, value-taking and
//! repeatability for every atom.
//!
//! # Main entry points
//!
//! - [`parse_usage`]: parse text into a [`Docopt`], which keeps the raw text
//!   next to the result for error reporting.
//! - [`parse_opt_format`]: parse text into the bare [`OptFormat`].
//! - [`parser::UsageParser`]: access to the unresolved usage pattern and
//!   option descriptions.
//!
//! # Example
//!
//! ```
//! use usage_pattern_core::OptionAtom;
//! use usage_pattern_parser::parse_usage;
//!
//! let help = "\
//! Naval Fate.
//!
//! Usage:
//!   naval_fate ship <name> move <x> <y> [--speed=<kn>]
//!   naval_fate ship shoot <x> <y>
//!
//! Options:
//!   -h --help     Show this screen.
//!   --speed=<kn>  Speed in knots [default: 10].
//! ";
//!
//! let docopt = parse_usage(help).unwrap();
//! let speed = docopt.info(&OptionAtom::LongOption("speed".into())).unwrap();
//! assert!(speed.expects_val);
//! assert_eq!(speed.default_val.as_deref(), Some("10"));
//! assert!(!speed.is_repeated);
//! ```
//!
//! Matching actual process arguments against the pattern is left to the
//! consumer.
//!
//! [`Pattern`]: usage_pattern_core::Pattern

pub mod error;
pub mod parser;

use serde::{Deserialize, Serialize};
use usage_pattern_core::{OptFormat, OptInfo, OptInfoMap, OptionAtom};

pub use error::{ParseError, ParseErrorKind, Position, Result};
use parser::UsageParser;

/// A parsed usage text together with the text itself.
///
/// # Examples
///
/// ```
/// use usage_pattern_parser::parse_usage;
///
/// let docopt = parse_usage("Usage:\n  prog -abc\n").unwrap();
/// assert_eq!(docopt.format().pattern.to_string(), "(-a | -b | -c)...");
/// assert!(docopt.usage().starts_with("Usage:"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Docopt {
    usage: String,
    format: OptFormat,
}

impl Docopt {
    /// The original usage text.
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// The resolved pattern and metadata.
    pub fn format(&self) -> &OptFormat {
        &self.format
    }

    /// Metadata for every atom.
    pub fn infos(&self) -> &OptInfoMap {
        &self.format.infos
    }

    /// Looks up the metadata for an atom.
    pub fn info(&self, atom: &OptionAtom) -> Option<&OptInfo> {
        self.format.info(atom)
    }

    /// Discards the text, keeping the resolved format.
    pub fn into_format(self) -> OptFormat {
        self.format
    }
}

/// Parses usage text, keeping the text alongside the result.
///
/// # Errors
///
/// Returns a positioned [`ParseError`] on the first grammar violation, when
/// no `Usage:` header exists, or when a `[default:` tag is never closed.
pub fn parse_usage(text: &str) -> Result<Docopt> {
    let format = parse_opt_format(text)?;
    Ok(Docopt {
        usage: text.to_string(),
        format,
    })
}

/// Parses usage text into its resolved [`OptFormat`].
///
/// # Errors
///
/// Same as [`parse_usage`].
pub fn parse_opt_format(text: &str) -> Result<OptFormat> {
    UsageParser::new(text).parse()
}
