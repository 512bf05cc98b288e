//! Usage-text parser.
//!
//! The text is read in one pass:
//!
//! 1. [`usage`] skips to the `Usage:` header and turns each usage line into a
//!    pattern via the expression grammar in [`expr`], joining lines into one
//!    alternation.
//! 2. [`options`] reads the option-descriptions section after the usage block
//!    into an [`OptInfoMap`].
//! 3. The two halves are resolved together: synonyms are expanded in the
//!    pattern and every atom gets its repeatability.
//!
//! The primary entry point is [`UsageParser::new`] followed by
//! [`UsageParser::parse`], but most consumers should use
//! [`parse_usage`](crate::parse_usage) instead.

mod cursor;
mod expr;
mod options;
mod usage;

use tracing::debug;
use usage_pattern_core::{OptFormat, OptInfoMap, OptPattern, resolve};

use crate::error::Result;
use cursor::Cursor;

/// Parser for a program's usage text.
///
/// Holds no state besides the borrowed text, so one parser can be asked for
/// its results any number of times.
///
/// # Examples
///
/// ```
/// use usage_pattern_core::OptionAtom;
/// use usage_pattern_parser::parser::UsageParser;
///
/// let parser = UsageParser::new("Usage:\n  prog [-v] <file>\n\n  -v, --verbose  Talk more\n");
///
/// let raw = parser.usage_pattern().unwrap();
/// assert_eq!(raw.to_string(), "[-v] <file>");
///
/// let format = parser.parse().unwrap();
/// assert_eq!(format.pattern.to_string(), "[-v | --verbose] <file>");
/// assert!(format.info(&OptionAtom::LongOption("verbose".into())).is_some());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct UsageParser<'a> {
    text: &'a str,
}

impl<'a> UsageParser<'a> {
    /// Creates a parser over `text`.
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    /// Parses and resolves the whole text.
    pub fn parse(&self) -> Result<OptFormat> {
        let (pattern, infos) = self.parse_raw().inspect_err(|err| {
            debug!(error = %err, "Usage text rejected");
        })?;
        let described = infos.len();
        let format = resolve(pattern, infos);
        debug!(
            described,
            atoms = format.infos.len(),
            "Resolved synonyms and repeatability"
        );
        Ok(format)
    }

    /// The usage pattern as written, before synonym expansion.
    pub fn usage_pattern(&self) -> Result<OptPattern> {
        usage::parse_usage_block(&mut Cursor::new(self.text)).map(|(pattern, _)| pattern)
    }

    /// The option descriptions as written, before repeatability is known.
    ///
    /// Options that only appear in usage lines have an entry without
    /// synonyms, carrying whether the usage line gave them a value.
    pub fn option_infos(&self) -> Result<OptInfoMap> {
        self.parse_raw().map(|(_, infos)| infos)
    }

    fn parse_raw(&self) -> Result<(OptPattern, OptInfoMap)> {
        let mut cursor = Cursor::new(self.text);
        let (pattern, usage_flags) = usage::parse_usage_block(&mut cursor)?;
        let infos = options::parse_option_section(&mut cursor, usage_flags)?;
        Ok((pattern, infos))
    }
}
