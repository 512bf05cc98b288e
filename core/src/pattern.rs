//! The recursive pattern tree produced by usage-line parsing.
//!
//! A [`Pattern`] is generic over its leaf type so the same structure (and the
//! same flatten and traversal helpers) can carry option atoms, rendered
//! strings, or anything a downstream matcher wants to hang off the leaves.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A tree of sequences, alternations, optional and repeated subpatterns
/// over atoms of type `A`.
///
/// Built through the flattening constructors [`Pattern::sequence`] and
/// [`Pattern::one_of`], a `Sequence` or `OneOf` node never has exactly one
/// child: a singleton collapses into that child.
///
/// # Examples
///
/// ```
/// use usage_pattern_core::Pattern;
///
/// let single = Pattern::sequence(vec![Pattern::atom('a')]);
/// assert_eq!(single, Pattern::Atom('a'));
///
/// let pair = Pattern::one_of(vec![Pattern::atom('a'), Pattern::atom('b')]);
/// assert_eq!(pair.atoms(), vec![&'a', &'b']);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pattern<A> {
    /// Ordered conjunction: every child matches, in order.
    Sequence(Vec<Pattern<A>>),
    /// Ordered alternation: exactly one child matches.
    OneOf(Vec<Pattern<A>>),
    /// Zero or one occurrence.
    Optional(Box<Pattern<A>>),
    /// One or more occurrences.
    Repeated(Box<Pattern<A>>),
    /// Leaf.
    Atom(A),
}

impl<A> Pattern<A> {
    /// Builds a leaf.
    pub fn atom(atom: A) -> Self {
        Pattern::Atom(atom)
    }

    /// Builds a sequence, collapsing a single child into itself.
    pub fn sequence(children: Vec<Pattern<A>>) -> Self {
        Pattern::Sequence(children).flatten()
    }

    /// Builds an alternation, collapsing a single child into itself.
    pub fn one_of(children: Vec<Pattern<A>>) -> Self {
        Pattern::OneOf(children).flatten()
    }

    /// Wraps `inner` as zero-or-one.
    pub fn optional(inner: Pattern<A>) -> Self {
        Pattern::Optional(Box::new(inner))
    }

    /// Wraps `inner` as one-or-more.
    pub fn repeated(inner: Pattern<A>) -> Self {
        Pattern::Repeated(Box::new(inner))
    }

    /// Collapses a singleton `Sequence` or `OneOf` root into its only child.
    ///
    /// Any other node, including empty and multi-child lists, is returned
    /// unchanged. Only the root is inspected.
    ///
    /// # Examples
    ///
    /// ```
    /// use usage_pattern_core::Pattern;
    ///
    /// let nested = Pattern::OneOf(vec![Pattern::Atom(1)]);
    /// assert_eq!(nested.flatten(), Pattern::Atom(1));
    ///
    /// let empty: Pattern<u8> = Pattern::Sequence(vec![]);
    /// assert_eq!(empty.clone().flatten(), empty);
    /// ```
    pub fn flatten(self) -> Self {
        match self {
            Pattern::Sequence(mut children) | Pattern::OneOf(mut children)
                if children.len() == 1 =>
            {
                children.remove(0)
            }
            other => other,
        }
    }

    /// Returns every leaf atom, left to right, duplicates included.
    pub fn atoms(&self) -> Vec<&A> {
        let mut out = Vec::new();
        self.collect_atoms(&mut out);
        out
    }

    fn collect_atoms<'a>(&'a self, out: &mut Vec<&'a A>) {
        match self {
            Pattern::Sequence(children) | Pattern::OneOf(children) => {
                for child in children {
                    child.collect_atoms(out);
                }
            }
            Pattern::Optional(inner) | Pattern::Repeated(inner) => inner.collect_atoms(out),
            Pattern::Atom(atom) => out.push(atom),
        }
    }

    /// Rewrites every leaf into a new subpattern, keeping node kinds intact.
    ///
    /// # Examples
    ///
    /// ```
    /// use usage_pattern_core::Pattern;
    ///
    /// let pat = Pattern::optional(Pattern::atom(2));
    /// let doubled =
    ///     pat.map_atoms(&mut |n| Pattern::one_of(vec![Pattern::atom(n), Pattern::atom(n * 2)]));
    /// assert_eq!(
    ///     doubled,
    ///     Pattern::optional(Pattern::OneOf(vec![Pattern::Atom(2), Pattern::Atom(4)])),
    /// );
    /// ```
    pub fn map_atoms<B, F>(self, f: &mut F) -> Pattern<B>
    where
        F: FnMut(A) -> Pattern<B>,
    {
        match self {
            Pattern::Sequence(children) => {
                Pattern::Sequence(children.into_iter().map(|c| c.map_atoms(&mut *f)).collect())
            }
            Pattern::OneOf(children) => {
                Pattern::OneOf(children.into_iter().map(|c| c.map_atoms(&mut *f)).collect())
            }
            Pattern::Optional(inner) => Pattern::Optional(Box::new(inner.map_atoms(f))),
            Pattern::Repeated(inner) => Pattern::Repeated(Box::new(inner.map_atoms(f))),
            Pattern::Atom(atom) => f(atom),
        }
    }
}

/// Renders usage-like text: `a b`, `(a | b)`, `[a]`, `a...`.
impl<A: fmt::Display> fmt::Display for Pattern<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Sequence(children) => write_joined(f, children, " "),
            Pattern::OneOf(children) => {
                f.write_str("(")?;
                write_joined(f, children, " | ")?;
                f.write_str(")")
            }
            Pattern::Optional(inner) => match inner.as_ref() {
                // The brackets already group an alternation.
                Pattern::OneOf(children) => {
                    f.write_str("[")?;
                    write_joined(f, children, " | ")?;
                    f.write_str("]")
                }
                other => write!(f, "[{other}]"),
            },
            Pattern::Repeated(inner) => match inner.as_ref() {
                Pattern::Sequence(children) if children.len() > 1 => write!(f, "({inner})..."),
                _ => write!(f, "{inner}..."),
            },
            Pattern::Atom(atom) => write!(f, "{atom}"),
        }
    }
}

fn write_joined<A: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    children: &[Pattern<A>],
    separator: &str,
) -> fmt::Result {
    for (idx, child) in children.iter().enumerate() {
        if idx > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{child}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_collapses_singletons_only() {
        assert_eq!(Pattern::Sequence(vec![Pattern::Atom('x')]).flatten(), Pattern::Atom('x'));
        assert_eq!(Pattern::OneOf(vec![Pattern::Atom('x')]).flatten(), Pattern::Atom('x'));

        let pair = Pattern::Sequence(vec![Pattern::Atom('x'), Pattern::Atom('y')]);
        assert_eq!(pair.clone().flatten(), pair);

        let opt = Pattern::optional(Pattern::OneOf(vec![Pattern::Atom('x')]));
        assert_eq!(opt.clone().flatten(), opt);
    }

    #[test]
    fn test_atoms_keeps_order_and_duplicates() {
        let pat = Pattern::Sequence(vec![
            Pattern::atom(1),
            Pattern::optional(Pattern::OneOf(vec![Pattern::atom(2), Pattern::atom(1)])),
            Pattern::repeated(Pattern::atom(3)),
        ]);
        assert_eq!(pat.atoms(), vec![&1, &2, &1, &3]);
    }

    #[test]
    fn test_display_renders_usage_shape() {
        let pat = Pattern::Sequence(vec![
            Pattern::atom("run"),
            Pattern::optional(Pattern::OneOf(vec![Pattern::atom("-a"), Pattern::atom("-b")])),
            Pattern::repeated(Pattern::atom("<file>")),
        ]);
        assert_eq!(pat.to_string(), "run [-a | -b] <file>...");

        let grouped = Pattern::repeated(Pattern::Sequence(vec![
            Pattern::atom("x"),
            Pattern::atom("y"),
        ]));
        assert_eq!(grouped.to_string(), "(x y)...");
    }
}
