//! Core pattern types for usage-string grammars.
//!
//! This crate defines the structures produced by parsing a program's usage
//! text and consumed by an argument matcher:
//!
//! - [`Pattern`]: a tree of sequences, alternations, optional and repeated
//!   subpatterns over leaf atoms.
//! - [`OptionAtom`]: a leaf, which is a short or long option, command, argument or
//!   the `[options]` placeholder.
//! - [`OptInfo`] / [`OptInfoMap`]: synonyms, default value, value-taking and
//!   repeatability metadata per atom.
//! - [`OptFormat`]: the resolved pattern together with its metadata.
//!
//! Resolution ([`expand_synonyms`], [`resolve_repeatability`], [`resolve`])
//! turns a raw usage pattern and the described options into an
//! [`OptFormat`]. Validation ([`validate_format`]) checks its structural
//! invariants.
//!
//! # Example
//!
//! ```
//! use usage_pattern_core::*;
//!
//! let usage = Pattern::sequence(vec![
//!     Pattern::atom(OptionAtom::Command("copy".into())),
//!     Pattern::repeated(Pattern::atom(OptionAtom::Argument("file".into()))),
//! ]);
//! let format = resolve(usage, OptInfoMap::new());
//!
//! assert_eq!(format.pattern.to_string(), "copy <file>...");
//! assert!(format.infos[&OptionAtom::Argument("file".into())].is_repeated);
//! assert!(validate_format(&format).is_empty());
//! ```

mod pattern;
mod resolve;
mod types;
mod validate;

pub use pattern::Pattern;
pub use resolve::{can_repeat, expand_synonyms, resolve, resolve_repeatability};
pub use types::*;
pub use validate::{FormatError, validate_format};
