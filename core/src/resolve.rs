//! Whole-tree transforms run after parsing.
//!
//! [`expand_synonyms`] replaces every option leaf with the alternation of all
//! its known spellings, and [`resolve_repeatability`] records for every atom
//! of the expanded pattern whether it may occur more than once.
//!
//! # Example
//!
//! ```
//! use usage_pattern_core::*;
//!
//! let mut infos = OptInfoMap::new();
//! let verbose = OptInfo::from_synonyms([
//!     OptionAtom::ShortOption('v'),
//!     OptionAtom::LongOption("verbose".into()),
//! ]);
//! infos.insert(OptionAtom::ShortOption('v'), verbose.clone());
//! infos.insert(OptionAtom::LongOption("verbose".into()), verbose);
//!
//! let usage = Pattern::repeated(Pattern::atom(OptionAtom::ShortOption('v')));
//! let format = resolve(usage, infos);
//!
//! assert_eq!(format.pattern.to_string(), "(-v | --verbose)...");
//! assert!(format.infos[&OptionAtom::LongOption("verbose".into())].is_repeated);
//! ```

use crate::{OptFormat, OptInfoMap, OptPattern, OptionAtom, Pattern};

/// Expands synonyms and computes repeatability in one step.
pub fn resolve(pattern: OptPattern, infos: OptInfoMap) -> OptFormat {
    let pattern = expand_synonyms(pattern, &infos);
    let infos = resolve_repeatability(&pattern, infos);
    OptFormat::new(pattern, infos)
}

/// Replaces each described option leaf with the alternation of its synonyms.
///
/// Leaves without an entry, and command, argument and `[options]` leaves,
/// are left as they are. A group with a single spelling flattens back to the
/// leaf itself.
pub fn expand_synonyms(pattern: OptPattern, infos: &OptInfoMap) -> OptPattern {
    pattern.map_atoms(&mut |atom| {
        if !atom.is_option() {
            return Pattern::Atom(atom);
        }
        match infos.get(&atom) {
            Some(info) if !info.synonyms.is_empty() => {
                Pattern::one_of(info.synonyms.iter().cloned().map(Pattern::Atom).collect())
            }
            _ => Pattern::Atom(atom),
        }
    })
}

/// Returns `true` if `target` may legally match more than once in `pattern`.
///
/// - A sequence repeats a target if any child does, or if the target occurs
///   more than once among the sequence's leaves.
/// - An alternation repeats a target if any branch does.
/// - An optional node inherits its child's answer.
/// - A repeated node repeats every atom beneath it.
/// - A bare leaf never repeats.
///
/// # Examples
///
/// ```
/// use usage_pattern_core::{can_repeat, Pattern};
///
/// let twice = Pattern::Sequence(vec![Pattern::atom('f'), Pattern::atom('f')]);
/// assert!(can_repeat(&twice, &'f'));
///
/// let branches = Pattern::OneOf(vec![Pattern::atom('f'), Pattern::atom('f')]);
/// assert!(!can_repeat(&branches, &'f'));
/// ```
pub fn can_repeat<A: PartialEq>(pattern: &Pattern<A>, target: &A) -> bool {
    match pattern {
        Pattern::Sequence(children) => {
            children.iter().any(|child| can_repeat(child, target))
                || pattern.atoms().into_iter().filter(|atom| *atom == target).count() > 1
        }
        Pattern::OneOf(children) => children.iter().any(|child| can_repeat(child, target)),
        Pattern::Optional(inner) => can_repeat(inner, target),
        Pattern::Repeated(inner) => inner.atoms().contains(&target),
        Pattern::Atom(_) => false,
    }
}

/// Sets `is_repeated` for every distinct atom of `pattern`.
///
/// Atoms without an entry get a blank [`OptInfo`](crate::OptInfo) first, so
/// the returned map covers every atom reachable in the pattern. Entries for
/// options that never appear in the pattern are kept unchanged.
pub fn resolve_repeatability(pattern: &OptPattern, mut infos: OptInfoMap) -> OptInfoMap {
    let mut seen: Vec<&OptionAtom> = Vec::new();
    for atom in pattern.atoms() {
        if seen.contains(&atom) {
            continue;
        }
        seen.push(atom);
        infos.entry(atom.clone()).or_default().is_repeated = can_repeat(pattern, atom);
    }
    infos
}
