//! In-block search state.
//!
//! Each block owns one [`SearchState`]: the live query, the ordered match
//! list, the current-match cursor, and the debounce clock for keystroke
//! input. Matches are applied to rendered lines as a non-destructive overlay;
//! the base rendering is never mutated, so clearing the query trivially
//! restores the pre-search output.

mod engine;
pub mod types;

pub use engine::SearchEngine;
pub use types::SearchMatch;

use std::time::Instant;

use codepane_config::SearchTuning;

use crate::styled::StyledLine;
use crate::theme::ThemeColors;

/// Per-block search state.
pub struct SearchState {
    /// Current query string.
    query: String,
    /// All matches found, in document order.
    matches: Vec<SearchMatch>,
    /// Index of the currently highlighted match.
    current: usize,
    /// Search engine instance.
    engine: SearchEngine,
    /// Settle window for keystroke input, in milliseconds.
    debounce_ms: u64,
    /// Last time the query changed (for debouncing).
    last_query_change: Option<Instant>,
    /// Whether a search still has to run for the current query.
    needs_search: bool,
    /// Last query that was actually searched.
    last_searched_query: String,
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new(SearchTuning::default())
    }
}

impl SearchState {
    /// Create search state with the given tuning.
    pub fn new(tuning: SearchTuning) -> Self {
        Self {
            query: String::new(),
            matches: Vec::new(),
            current: 0,
            engine: SearchEngine::with_min_query_len(tuning.min_query_len),
            debounce_ms: tuning.debounce_ms,
            last_query_change: None,
            needs_search: false,
            last_searched_query: String::new(),
        }
    }

    /// Record a keystroke-driven query change. The search itself runs on a
    /// later [`poll`](Self::poll) once the settle window elapses.
    pub fn set_query(&mut self, query: &str) {
        if self.query == query {
            return;
        }
        self.query = query.to_string();
        self.last_query_change = Some(Instant::now());
        self.needs_search = true;
    }

    /// Current query string.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// All current matches.
    pub fn matches(&self) -> &[SearchMatch] {
        &self.matches
    }

    /// Number of matches for the current query.
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// The current match (if any).
    pub fn current_match(&self) -> Option<&SearchMatch> {
        self.matches.get(self.current)
    }

    /// Index of the current match within the match list.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Move to the next match, wrapping around.
    pub fn next_match(&mut self) -> Option<&SearchMatch> {
        if self.matches.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.matches.len();
        self.matches.get(self.current)
    }

    /// Move to the previous match, wrapping around.
    pub fn prev_match(&mut self) -> Option<&SearchMatch> {
        if self.matches.is_empty() {
            return None;
        }
        if self.current == 0 {
            self.current = self.matches.len() - 1;
        } else {
            self.current -= 1;
        }
        self.matches.get(self.current)
    }

    /// Run the pending search if the settle window has elapsed.
    ///
    /// Cooperative: the host calls this from its event loop tick. Returns
    /// `true` when the match list was updated.
    pub fn poll(&mut self, lines: &[String]) -> bool {
        if !self.needs_search {
            return false;
        }
        if let Some(last_change) = self.last_query_change
            && last_change.elapsed().as_millis() < u128::from(self.debounce_ms)
        {
            return false;
        }
        self.run(lines);
        true
    }

    /// Run the search immediately, bypassing the settle window (used for
    /// explicit submit actions).
    pub fn run(&mut self, lines: &[String]) {
        self.needs_search = false;
        if self.query == self.last_searched_query {
            return;
        }
        self.last_searched_query = self.query.clone();

        // A fresh query always starts from scratch; prior matches never
        // compound into the new result.
        self.matches = self.engine.search(lines, &self.query);
        self.current = 0;
        log::trace!(
            "search for {:?}: {} match(es)",
            self.query,
            self.matches.len()
        );
    }

    /// Clear the query and all match state.
    pub fn clear(&mut self) {
        self.query.clear();
        self.matches.clear();
        self.current = 0;
        self.needs_search = false;
        self.last_searched_query.clear();
        self.engine.clear_cache();
    }

    /// Whether any matches are active.
    pub fn has_matches(&self) -> bool {
        !self.matches.is_empty()
    }

    /// Apply match backgrounds to rendered lines.
    ///
    /// `lines` must be a fresh copy of the base rendering with one entry per
    /// source line; the overlay re-spans segments rather than inserting text,
    /// so column offsets stay aligned with the source.
    pub fn apply_overlay(&self, lines: &mut [StyledLine], theme: &ThemeColors) {
        let match_bg = theme.search_match_bg();
        let current_bg = theme.current_match_bg();

        for (idx, m) in self.matches.iter().enumerate() {
            let Some(line) = lines.get_mut(m.line) else {
                continue;
            };
            let bg = if idx == self.current {
                current_bg
            } else {
                match_bg
            };
            line.apply_bg_span(m.column, m.length, bg);
        }
    }
}
