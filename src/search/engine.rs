//! Search engine for block source text.

use regex::{Regex, RegexBuilder};

use super::types::SearchMatch;

/// Queries shorter than this never run.
const DEFAULT_MIN_QUERY_LEN: usize = 2;

/// Performs case-insensitive literal substring searches over source lines.
///
/// The query text is escaped before compilation so pattern metacharacters
/// always match literally.
pub struct SearchEngine {
    /// Queries shorter than this yield no matches.
    min_query_len: usize,
    /// Cached compiled pattern for the current query: (query, compiled).
    cached_regex: Option<(String, Regex)>,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchEngine {
    /// Create a new search engine with the default minimum query length.
    pub fn new() -> Self {
        Self::with_min_query_len(DEFAULT_MIN_QUERY_LEN)
    }

    /// Create a new search engine with an explicit minimum query length.
    pub fn with_min_query_len(min_query_len: usize) -> Self {
        Self {
            min_query_len,
            cached_regex: None,
        }
    }

    /// Search through source lines and return all non-overlapping matches in
    /// document order.
    ///
    /// Queries shorter than the minimum length return no matches; callers
    /// treat that as "clear any prior highlighting", not as a failure.
    pub fn search(&mut self, lines: &[String], query: &str) -> Vec<SearchMatch> {
        if query.chars().count() < self.min_query_len {
            return Vec::new();
        }

        let regex = match self.get_or_compile(query) {
            Ok(re) => re,
            Err(e) => {
                // Escaped literals always compile; treat failure as no match.
                log::debug!("search pattern failed to compile for {query:?}: {e}");
                return Vec::new();
            }
        };

        let mut matches = Vec::new();
        for (line_idx, line) in lines.iter().enumerate() {
            for mat in regex.find_iter(line) {
                let column = byte_offset_to_char_offset(line, mat.start());
                let length = byte_offset_to_char_offset(line, mat.end()) - column;
                matches.push(SearchMatch::new(line_idx, column, length));
            }
        }
        matches
    }

    /// Get cached pattern or compile a new one from the escaped query.
    /// Cloning a `Regex` only bumps a refcount.
    fn get_or_compile(&mut self, query: &str) -> Result<Regex, regex::Error> {
        if let Some((cached, regex)) = &self.cached_regex
            && cached == query
        {
            return Ok(regex.clone());
        }

        let regex = RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .build()?;
        self.cached_regex = Some((query.to_string(), regex.clone()));
        Ok(regex)
    }

    /// Clear the cached pattern.
    pub fn clear_cache(&mut self) {
        self.cached_regex = None;
    }
}

/// Convert a byte offset to a character offset in a string.
///
/// Needed because regex match positions are byte offsets, but overlay
/// positioning works in characters (one rendered cell per character).
fn byte_offset_to_char_offset(s: &str, byte_offset: usize) -> usize {
    s[..byte_offset].chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_case_insensitive() {
        let mut engine = SearchEngine::new();
        let lines = lines(&["an error occurred", "all good", "ERROR again"]);

        let matches = engine.search(&lines, "ERROR");

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0], SearchMatch::new(0, 3, 5));
        assert_eq!(matches[1], SearchMatch::new(2, 0, 5));
    }

    #[test]
    fn test_multiple_matches_per_line() {
        let mut engine = SearchEngine::new();
        let lines = lines(&["foo bar foo baz foo"]);

        let matches = engine.search(&lines, "foo");

        assert_eq!(matches.len(), 3);
        assert_eq!(matches[1], SearchMatch::new(0, 8, 3));
        assert_eq!(matches[2], SearchMatch::new(0, 16, 3));
    }

    #[test]
    fn test_short_query_is_a_noop() {
        let mut engine = SearchEngine::new();
        let lines = lines(&["aaaa"]);

        assert!(engine.search(&lines, "").is_empty());
        assert!(engine.search(&lines, "a").is_empty());
        assert_eq!(engine.search(&lines, "aa").len(), 2);
    }

    #[test]
    fn test_metacharacters_match_literally() {
        let mut engine = SearchEngine::new();
        let lines = lines(&["price is $5 (roughly)", "anything"]);

        let matches = engine.search(&lines, "$5 (");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0], SearchMatch::new(0, 9, 4));

        // `.` must not act as a wildcard.
        assert!(engine.search(&lines, "a.y").is_empty());
    }

    #[test]
    fn test_unicode_character_offsets() {
        let mut engine = SearchEngine::new();
        let lines = lines(&["📁 Downloads"]);

        let matches = engine.search(&lines, "down");

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].column, 2); // character offset, not byte offset
        assert_eq!(matches[0].length, 4);
    }

    #[test]
    fn test_non_overlapping() {
        let mut engine = SearchEngine::new();
        let lines = lines(&["aaaa"]);

        let matches = engine.search(&lines, "aa");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0], SearchMatch::new(0, 0, 2));
        assert_eq!(matches[1], SearchMatch::new(0, 2, 2));
    }
}
