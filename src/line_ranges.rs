//! Highlight-line specification parsing.
//!
//! A highlight spec is a user-supplied string such as `"1,3-5,8"` naming the
//! 1-based source lines that should receive the highlight treatment. Parsing
//! is strictly best-effort: malformed tokens are skipped, never surfaced as
//! errors, and an empty result means "no highlighting".

use std::collections::BTreeSet;

/// A resolved set of 1-based line numbers derived from a highlight spec.
///
/// Duplicates collapse and order is irrelevant. Every element is >= 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineSet(BTreeSet<usize>);

impl LineSet {
    /// Parse a highlight spec into a `LineSet`.
    ///
    /// Grammar: `spec := token (',' token)*` where a token is either a single
    /// integer or `start-end` (inclusive). Whitespace around tokens is
    /// ignored. Tokens that fail to parse are skipped without aborting the
    /// rest of the spec. An inverted range such as `5-3` contributes no
    /// lines.
    pub fn parse(spec: &str) -> Self {
        let mut lines = BTreeSet::new();

        for token in spec.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }

            if token.contains('-') {
                // Range token: only the first two `-` separated parts count,
                // so "1-2-9" reads as 1-2.
                let mut parts = token.split('-');
                let start = parts.next().and_then(|s| s.trim().parse::<usize>().ok());
                let end = parts.next().and_then(|s| s.trim().parse::<usize>().ok());
                let (Some(start), Some(end)) = (start, end) else {
                    continue;
                };
                // An inverted range never enters the loop body and so emits
                // nothing; this quirk is observable and kept.
                for n in start..=end {
                    if n >= 1 {
                        lines.insert(n);
                    }
                }
            } else if let Ok(n) = token.parse::<usize>() {
                if n >= 1 {
                    lines.insert(n);
                }
            }
        }

        Self(lines)
    }

    /// Whether the given 1-based line number is in the set.
    pub fn contains(&self, line: usize) -> bool {
        self.0.contains(&line)
    }

    /// Whether the set is empty (callers treat this as "no highlighting").
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of lines in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate the line numbers in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<usize> for LineSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().filter(|&n| n >= 1).collect())
    }
}
