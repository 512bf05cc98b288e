//! Structural validation of a resolved [`OptFormat`].
//!
//! Checks the invariants a downstream matcher relies on, catching malformed
//! hand-built or deserialized formats before they are used.
//!
//! # Examples
//!
//! ```
//! use usage_pattern_core::*;
//!
//! let pattern = Pattern::atom(OptionAtom::Command("run".into()));
//! let format = resolve(pattern.clone(), OptInfoMap::new());
//! assert!(validate_format(&format).is_empty());
//!
//! // Missing metadata for a reachable atom
//! let bare = OptFormat::new(pattern, OptInfoMap::new());
//! assert!(!validate_format(&bare).is_empty());
//! ```

use thiserror::Error;

use crate::{OptFormat, OptPattern, OptionAtom, Pattern};

/// Structural problems found in an [`OptFormat`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// A sequence or alternation with a single child that was never flattened.
    #[error("singleton group not flattened: {0}")]
    UnflattenedGroup(String),
    /// An atom reachable in the pattern has no metadata entry.
    #[error("no metadata for atom: {0}")]
    MissingInfo(OptionAtom),
    /// A synonym listed by one entry has no entry of its own.
    #[error("synonym {synonym} of {key} has no metadata")]
    MissingSynonym {
        /// Entry listing the synonym.
        key: OptionAtom,
        /// The synonym without an entry.
        synonym: OptionAtom,
    },
    /// Two spellings of the same option disagree about their synonym group.
    #[error("synonym groups of {0} and {1} differ")]
    InconsistentSynonyms(OptionAtom, OptionAtom),
}

/// Validates a resolved format.
///
/// Returns every problem found; an empty vector means the format is sound.
pub fn validate_format(format: &OptFormat) -> Vec<FormatError> {
    let mut errors = Vec::new();

    validate_pattern(&format.pattern, &mut errors);

    for atom in format.pattern.atoms() {
        if !format.infos.contains_key(atom) {
            let error = FormatError::MissingInfo(atom.clone());
            if !errors.contains(&error) {
                errors.push(error);
            }
        }
    }

    for (key, info) in &format.infos {
        for synonym in &info.synonyms {
            match format.infos.get(synonym) {
                None => errors.push(FormatError::MissingSynonym {
                    key: key.clone(),
                    synonym: synonym.clone(),
                }),
                Some(other) if other.synonyms != info.synonyms => {
                    let (first, second) = if key < synonym {
                        (key, synonym)
                    } else {
                        (synonym, key)
                    };
                    let error = FormatError::InconsistentSynonyms(first.clone(), second.clone());
                    if !errors.contains(&error) {
                        errors.push(error);
                    }
                }
                Some(_) => {}
            }
        }
    }

    errors
}

fn validate_pattern(pattern: &OptPattern, errors: &mut Vec<FormatError>) {
    match pattern {
        Pattern::Sequence(children) | Pattern::OneOf(children) => {
            if children.len() == 1 {
                errors.push(FormatError::UnflattenedGroup(pattern.to_string()));
            }
            for child in children {
                validate_pattern(child, errors);
            }
        }
        Pattern::Optional(inner) | Pattern::Repeated(inner) => validate_pattern(inner, errors),
        Pattern::Atom(_) => {}
    }
}
