//! Types for in-block search.

/// A single search match within a block's source text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchMatch {
    /// Source line index (0-based).
    pub line: usize,
    /// Column position in the line (0-indexed, characters).
    pub column: usize,
    /// Length of the match in characters.
    pub length: usize,
}

impl SearchMatch {
    /// Create a new search match.
    pub fn new(line: usize, column: usize, length: usize) -> Self {
        Self {
            line,
            column,
            length,
        }
    }
}
