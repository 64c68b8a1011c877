//! Per-block controller.
//!
//! A [`CodeBlockController`] owns the interactive state of one rendered
//! snippet: collapse/expand, fullscreen, copy feedback, and search. The raw
//! source is immutable after attach; everything interactive is an overlay on
//! top of a memoized base rendering, so clearing any overlay restores the
//! exact original output.

pub mod chrome;
pub mod clipboard;

pub use clipboard::{ClipboardSink, CopyError, SystemClipboard};

use std::time::{Duration, Instant};

use codepane_config::{DisplayFlags, RenderOptions, SearchTuning};
use serde::{Deserialize, Serialize};

use crate::highlight::{Highlighter, is_shell_like};
use crate::line_ranges::LineSet;
use crate::page::{HookId, KeyHookRegistry, ScrollLock};
use crate::search::SearchState;
use crate::styled::StyledLine;
use crate::theme::ThemeColors;

/// How long the "copied" affordance stays active.
const COPY_FEEDBACK_MS: u64 = 2000;

/// Chrome rows rendered above the code area (title bar + tab row).
pub const CHROME_HEADER_ROWS: usize = 2;

/// Block markup emitted by the host-side renderer.
///
/// This is the contract with the server-side/host template: a container with
/// language and lazy attributes, a highlight-line spec, and the literal
/// source text. Any missing piece downgrades the affected features to
/// inactive rather than failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockMarkup {
    /// Stable identifier assigned by the host.
    pub id: u64,
    /// Declared language identifier, if any.
    pub language: Option<String>,
    /// Title / filename shown in the tab.
    pub title: Option<String>,
    /// Literal source text. `None` means the markup is structurally
    /// incomplete and features stay inactive.
    pub source: Option<String>,
    /// Highlight-line spec such as `"1,3-5,8"`.
    pub highlight_lines: Option<String>,
    /// Display flags for this block.
    #[serde(default)]
    pub flags: DisplayFlags,
    /// Whether initialization is deferred until the block nears the viewport.
    #[serde(default)]
    pub lazy: bool,
    /// Row where this block starts in the host document.
    #[serde(default)]
    pub start_row: usize,
}

impl BlockMarkup {
    /// Markup with source text and defaults for everything else.
    pub fn new(id: u64, source: &str) -> Self {
        Self {
            id,
            source: Some(source.to_string()),
            ..Default::default()
        }
    }

    /// Set the declared language.
    pub fn with_language(mut self, language: &str) -> Self {
        self.language = Some(language.to_string());
        self
    }

    /// Set the tab title.
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Set the highlight-line spec.
    pub fn with_highlight_lines(mut self, spec: &str) -> Self {
        self.highlight_lines = Some(spec.to_string());
        self
    }

    /// Set the display flags.
    pub fn with_flags(mut self, flags: DisplayFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Mark the block for deferred initialization.
    pub fn lazy(mut self) -> Self {
        self.lazy = true;
        self
    }

    /// Set the document row where the block starts.
    pub fn at_row(mut self, row: usize) -> Self {
        self.start_row = row;
        self
    }

    /// Parse a markup from its JSON interchange form. Missing optional
    /// fields take their defaults, so hosts can emit sparse descriptors.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serialize to the JSON interchange form.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Collapse state of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollapseState {
    /// Code area visible.
    Expanded,
    /// Code area hidden behind the placeholder row.
    Collapsed,
}

/// Visual state of the copy affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyIndicator {
    /// Normal "Copy" affordance.
    Idle,
    /// Write succeeded; shown for a fixed window, then reverts.
    Copied,
    /// Both clipboard paths failed; inline indicator until the next attempt.
    Failed,
}

#[derive(Debug, Clone, Copy)]
enum CopyFeedback {
    Idle,
    Copied { until: Instant },
    Failed,
}

/// Controller attached to one block markup.
pub struct CodeBlockController {
    id: u64,
    language: Option<String>,
    title: Option<String>,
    /// Exact raw text, kept verbatim for the copy action.
    raw_source: Option<String>,
    /// Raw text split into lines; empty when `raw_source` is `None`.
    source_lines: Vec<String>,
    line_set: LineSet,
    flags: DisplayFlags,
    start_row: usize,
    collapse: CollapseState,
    /// Escape-key hook held while fullscreen. `None` means not fullscreen.
    esc_hook: Option<HookId>,
    copy_feedback: CopyFeedback,
    search: SearchState,
    /// Memoized base rendering (syntax colors + line highlights + prompts).
    base_render: Option<Vec<StyledLine>>,
}

impl CodeBlockController {
    /// Attach a controller to a block markup.
    pub fn attach(markup: BlockMarkup, tuning: SearchTuning) -> Self {
        let line_set = markup
            .highlight_lines
            .as_deref()
            .map(LineSet::parse)
            .unwrap_or_default();

        let source_lines: Vec<String> = markup
            .source
            .as_deref()
            .map(|s| s.split('\n').map(str::to_string).collect())
            .unwrap_or_default();

        let collapse = if markup.flags.collapsible && markup.flags.start_collapsed {
            CollapseState::Collapsed
        } else {
            CollapseState::Expanded
        };

        log::debug!(
            "attaching block {} ({} lines, language {:?})",
            markup.id,
            source_lines.len(),
            markup.language
        );

        Self {
            id: markup.id,
            language: markup.language,
            title: markup.title,
            raw_source: markup.source,
            source_lines,
            line_set,
            flags: markup.flags,
            start_row: markup.start_row,
            collapse,
            esc_hook: None,
            copy_feedback: CopyFeedback::Idle,
            search: SearchState::new(tuning),
            base_render: None,
        }
    }

    /// Block identifier.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Row where this block starts in the host document.
    pub fn start_row(&self) -> usize {
        self.start_row
    }

    /// Whether the markup carried source text (features inactive otherwise).
    pub fn has_source(&self) -> bool {
        self.raw_source.is_some()
    }

    /// Number of source lines.
    pub fn line_count(&self) -> usize {
        self.source_lines.len()
    }

    // --- collapse -----------------------------------------------------

    /// Current collapse state.
    pub fn collapse_state(&self) -> CollapseState {
        self.collapse
    }

    /// Whether the code area is currently visible (the accessible
    /// "expanded" indicator).
    pub fn is_expanded(&self) -> bool {
        self.collapse == CollapseState::Expanded
    }

    /// Toggle collapse. No-op unless the block is collapsible and has
    /// source.
    pub fn toggle_collapse(&mut self) -> CollapseState {
        if self.flags.collapsible && self.has_source() {
            self.collapse = match self.collapse {
                CollapseState::Expanded => CollapseState::Collapsed,
                CollapseState::Collapsed => CollapseState::Expanded,
            };
        }
        self.collapse
    }

    // --- fullscreen ---------------------------------------------------

    /// Whether the block is currently fullscreen.
    pub fn is_fullscreen(&self) -> bool {
        self.esc_hook.is_some()
    }

    /// Toggle fullscreen. Entering locks page scroll and registers an
    /// escape-key hook; exiting releases both. Returns the new state.
    pub fn toggle_fullscreen(
        &mut self,
        scroll: &mut ScrollLock,
        hooks: &mut KeyHookRegistry,
    ) -> bool {
        if self.is_fullscreen() {
            self.exit_fullscreen(scroll, hooks);
        } else {
            self.enter_fullscreen(scroll, hooks);
        }
        self.is_fullscreen()
    }

    fn enter_fullscreen(&mut self, scroll: &mut ScrollLock, hooks: &mut KeyHookRegistry) {
        if !self.has_source() || self.esc_hook.is_some() {
            return;
        }
        scroll.lock();
        self.esc_hook = Some(hooks.register());
        log::debug!("block {} entered fullscreen", self.id);
    }

    /// Exit fullscreen. Idempotent: the hook is released and scroll restored
    /// exactly once no matter how many exit paths fire.
    pub fn exit_fullscreen(&mut self, scroll: &mut ScrollLock, hooks: &mut KeyHookRegistry) {
        if let Some(hook) = self.esc_hook.take() {
            hooks.unregister(hook);
            scroll.unlock();
            log::debug!("block {} left fullscreen", self.id);
        }
    }

    /// Handle an escape-key event. Consumes the event (returns `true`) only
    /// while fullscreen.
    pub fn handle_escape(&mut self, scroll: &mut ScrollLock, hooks: &mut KeyHookRegistry) -> bool {
        if self.is_fullscreen() {
            self.exit_fullscreen(scroll, hooks);
            true
        } else {
            false
        }
    }

    // --- copy ---------------------------------------------------------

    /// Copy the raw source text (never markup) to the sink.
    ///
    /// Success arms the "copied" affordance for a fixed window; re-triggering
    /// during the window restarts it. Failure sets the inline error
    /// indicator.
    pub fn request_copy(&mut self, sink: &mut dyn ClipboardSink) -> bool {
        if !self.flags.show_copy_button {
            return false;
        }
        let Some(raw) = &self.raw_source else {
            return false;
        };

        match sink.write_text(raw) {
            Ok(()) => {
                self.copy_feedback = CopyFeedback::Copied {
                    until: Instant::now() + Duration::from_millis(COPY_FEEDBACK_MS),
                };
                true
            }
            Err(e) => {
                log::debug!("copy failed for block {}: {e}", self.id);
                self.copy_feedback = CopyFeedback::Failed;
                false
            }
        }
    }

    /// Copy affordance state as of `now`; reverts an expired "copied" window.
    pub fn copy_indicator_at(&mut self, now: Instant) -> CopyIndicator {
        match self.copy_feedback {
            CopyFeedback::Idle => CopyIndicator::Idle,
            CopyFeedback::Failed => CopyIndicator::Failed,
            CopyFeedback::Copied { until } => {
                if now >= until {
                    self.copy_feedback = CopyFeedback::Idle;
                    CopyIndicator::Idle
                } else {
                    CopyIndicator::Copied
                }
            }
        }
    }

    // --- search -------------------------------------------------------

    /// Record a keystroke-driven search query change.
    pub fn set_search_query(&mut self, query: &str) {
        if self.has_source() {
            self.search.set_query(query);
        }
    }

    /// Run any pending search once its settle window elapses.
    pub fn poll_search(&mut self) -> bool {
        self.search.poll(&self.source_lines)
    }

    /// Run a pending search immediately (explicit submit).
    pub fn run_search(&mut self) {
        self.search.run(&self.source_lines);
    }

    /// Search state (match list, current match, navigation).
    pub fn search(&self) -> &SearchState {
        &self.search
    }

    /// Mutable search state, for match navigation.
    pub fn search_mut(&mut self) -> &mut SearchState {
        &mut self.search
    }

    /// Clear the query and all match overlays.
    pub fn clear_search(&mut self) {
        self.search.clear();
    }

    /// Document row of the current match, for scrolling it into view.
    /// `None` while collapsed or without matches.
    pub fn current_match_row(&self) -> Option<usize> {
        if self.collapse == CollapseState::Collapsed {
            return None;
        }
        self.search
            .current_match()
            .map(|m| self.start_row + CHROME_HEADER_ROWS + m.line)
    }

    // --- rendering ----------------------------------------------------

    /// Drop the memoized base rendering (call after a theme change).
    pub fn invalidate_render(&mut self) {
        self.base_render = None;
    }

    /// Render the block to styled lines.
    ///
    /// Pipeline order is fixed: syntax coloring, then line-range wrapping,
    /// then prompt decoration, then the per-render search overlay. The first
    /// three are memoized; the overlay is applied to a copy each time.
    pub fn render(
        &mut self,
        highlighter: &dyn Highlighter,
        theme: &ThemeColors,
        opts: &RenderOptions,
    ) -> Vec<StyledLine> {
        let width = opts.width;
        let mut out = Vec::new();

        let tab_label = self
            .title
            .clone()
            .or_else(|| self.language.clone())
            .unwrap_or_else(|| "snippet".to_string());

        let copy_label = if self.flags.show_copy_button && self.has_source() {
            Some(match self.copy_indicator_at(Instant::now()) {
                CopyIndicator::Idle => "Copy",
                CopyIndicator::Copied => "✓ Copied!",
                CopyIndicator::Failed => "Copy",
            })
        } else {
            None
        };
        let language_label = if self.flags.show_language_label {
            self.language.as_deref()
        } else {
            None
        };

        out.push(chrome::render_title_bar(&tab_label, width, theme));
        out.push(chrome::render_tab_row(
            &tab_label,
            language_label,
            copy_label,
            width,
            theme,
        ));

        if !self.has_source() {
            // Structurally incomplete markup: chrome only.
            return out;
        }

        if self.collapse == CollapseState::Collapsed {
            out.push(chrome::render_collapsed_row(
                self.source_lines.len(),
                width,
                theme,
            ));
            return out;
        }

        if self.base_render.is_none() {
            self.base_render = Some(self.build_base(highlighter, theme, opts));
        }
        let mut code = self.base_render.clone().unwrap_or_default();

        self.search.apply_overlay(&mut code, theme);

        if self.flags.show_line_numbers {
            let gutter_width = chrome::gutter_width(code.len());
            for (idx, line) in code.iter_mut().enumerate() {
                line.segments
                    .insert(0, chrome::gutter_segment(idx + 1, gutter_width, theme));
            }
        }
        out.extend(code);

        let match_text = if self.search.query().is_empty() {
            None
        } else if self.search.has_matches() {
            Some(format!(
                "{} of {} matches",
                self.search.current_index() + 1,
                self.search.match_count()
            ))
        } else {
            Some("no matches".to_string())
        };
        let copy_error = matches!(self.copy_feedback, CopyFeedback::Failed)
            .then_some("copy failed; select the text manually");

        if match_text.is_some() || copy_error.is_some() {
            out.push(chrome::render_status_row(
                match_text.as_deref(),
                copy_error,
                width,
                theme,
            ));
        }

        out
    }

    /// Build the memoized base rendering: syntax colors, line-range
    /// highlights, shell-prompt decoration.
    fn build_base(
        &self,
        highlighter: &dyn Highlighter,
        theme: &ThemeColors,
        opts: &RenderOptions,
    ) -> Vec<StyledLine> {
        let mut lines = highlighter.highlight(
            self.language.as_deref(),
            &self.source_lines,
            theme,
            opts.code_block_background,
        );

        // Line-range wrapping runs after syntax coloring; the other order
        // would let the colorer repaint the wrap.
        crate::highlight::apply_line_highlights(&mut lines, &self.line_set, theme);

        if self
            .language
            .as_deref()
            .is_some_and(is_shell_like)
        {
            decorate_prompts(&mut lines, &self.source_lines, theme);
        }

        lines
    }
}

/// Recolor the prompt character of command lines.
///
/// Lines whose trimmed text starts with `$` or `>` get the prompt character
/// emphasized. No text is inserted, so column offsets stay aligned with the
/// source for the search overlay.
fn decorate_prompts(lines: &mut [StyledLine], source: &[String], theme: &ThemeColors) {
    let prompt_fg = theme.prompt_fg();
    for (line, raw) in lines.iter_mut().zip(source) {
        let trimmed = raw.trim_start();
        if trimmed.starts_with('$') || trimmed.starts_with('>') {
            let indent = raw.chars().count() - trimmed.chars().count();
            line.restyle_span(indent, 1, |seg| {
                seg.fg = Some(prompt_fg);
                seg.bold = true;
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::KeywordHighlighter;

    fn tuning() -> SearchTuning {
        SearchTuning {
            debounce_ms: 0,
            min_query_len: 2,
        }
    }

    fn controller(markup: BlockMarkup) -> CodeBlockController {
        CodeBlockController::attach(markup, tuning())
    }

    #[test]
    fn test_markup_from_sparse_json() {
        let markup =
            BlockMarkup::from_json(r#"{"id": 3, "source": "hi", "language": "rust"}"#).unwrap();
        assert_eq!(markup.id, 3);
        assert_eq!(markup.language.as_deref(), Some("rust"));
        assert!(!markup.lazy);
        assert!(markup.flags.show_line_numbers);
        assert_eq!(markup.start_row, 0);
    }

    #[test]
    fn test_attach_parses_highlight_spec() {
        let ctl = controller(BlockMarkup::new(1, "a\nb\nc").with_highlight_lines("2,9"));
        assert!(ctl.line_set.contains(2));
        assert!(!ctl.line_set.contains(1));
        assert_eq!(ctl.line_count(), 3);
    }

    #[test]
    fn test_collapse_requires_flag() {
        let mut ctl = controller(BlockMarkup::new(1, "x"));
        assert_eq!(ctl.toggle_collapse(), CollapseState::Expanded);
    }

    #[test]
    fn test_start_collapsed_then_toggle() {
        let flags = DisplayFlags {
            collapsible: true,
            start_collapsed: true,
            ..Default::default()
        };
        let mut ctl = controller(BlockMarkup::new(1, "x\ny").with_flags(flags));
        assert_eq!(ctl.collapse_state(), CollapseState::Collapsed);
        assert!(!ctl.is_expanded());
        assert_eq!(ctl.toggle_collapse(), CollapseState::Expanded);
        assert!(ctl.is_expanded());
    }

    #[test]
    fn test_copy_uses_exact_raw_text() {
        let mut sink = clipboard::tests::RecordingSink::default();
        let mut ctl = controller(BlockMarkup::new(1, "line1\nline2\nline3"));
        assert!(ctl.request_copy(&mut sink));
        assert_eq!(sink.writes, vec!["line1\nline2\nline3"]);
    }

    #[test]
    fn test_copy_feedback_window_and_revert() {
        let mut sink = clipboard::tests::RecordingSink::default();
        let mut ctl = controller(BlockMarkup::new(1, "x"));
        ctl.request_copy(&mut sink);

        let now = Instant::now();
        assert_eq!(ctl.copy_indicator_at(now), CopyIndicator::Copied);
        assert_eq!(
            ctl.copy_indicator_at(now + Duration::from_millis(COPY_FEEDBACK_MS + 10)),
            CopyIndicator::Idle
        );
        // Expired state sticks.
        assert_eq!(ctl.copy_indicator_at(now), CopyIndicator::Idle);
    }

    #[test]
    fn test_copy_failure_sets_indicator() {
        let mut sink = clipboard::tests::RecordingSink {
            fail: true,
            ..Default::default()
        };
        let mut ctl = controller(BlockMarkup::new(1, "x"));
        assert!(!ctl.request_copy(&mut sink));
        assert_eq!(ctl.copy_indicator_at(Instant::now()), CopyIndicator::Failed);
    }

    #[test]
    fn test_missing_source_disables_features() {
        let mut sink = clipboard::tests::RecordingSink::default();
        let markup = BlockMarkup {
            id: 1,
            flags: DisplayFlags {
                collapsible: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut ctl = controller(markup);

        assert!(!ctl.has_source());
        assert!(!ctl.request_copy(&mut sink));
        assert!(sink.writes.is_empty());
        assert_eq!(ctl.toggle_collapse(), CollapseState::Expanded);

        ctl.set_search_query("anything");
        assert!(!ctl.poll_search());

        let mut scroll = ScrollLock::default();
        let mut hooks = KeyHookRegistry::default();
        assert!(!ctl.toggle_fullscreen(&mut scroll, &mut hooks));
        assert!(!scroll.is_locked());
    }

    #[test]
    fn test_fullscreen_enter_escape_restores_everything() {
        let mut scroll = ScrollLock::default();
        let mut hooks = KeyHookRegistry::default();
        let mut ctl = controller(BlockMarkup::new(1, "x"));

        assert!(ctl.toggle_fullscreen(&mut scroll, &mut hooks));
        assert!(scroll.is_locked());
        assert_eq!(hooks.active_count(), 1);

        assert!(ctl.handle_escape(&mut scroll, &mut hooks));
        assert!(!scroll.is_locked());
        assert_eq!(hooks.active_count(), 0);

        // Escape when not fullscreen is not consumed.
        assert!(!ctl.handle_escape(&mut scroll, &mut hooks));
    }

    #[test]
    fn test_fullscreen_exit_is_idempotent() {
        let mut scroll = ScrollLock::default();
        let mut hooks = KeyHookRegistry::default();
        let mut ctl = controller(BlockMarkup::new(1, "x"));

        ctl.toggle_fullscreen(&mut scroll, &mut hooks);
        ctl.exit_fullscreen(&mut scroll, &mut hooks);
        ctl.exit_fullscreen(&mut scroll, &mut hooks);

        assert!(!scroll.is_locked());
        assert_eq!(hooks.active_count(), 0);

        // Re-enter after exit registers exactly one hook again.
        ctl.toggle_fullscreen(&mut scroll, &mut hooks);
        assert_eq!(hooks.active_count(), 1);
    }

    #[test]
    fn test_current_match_row_accounts_for_chrome() {
        let mut ctl = controller(BlockMarkup::new(1, "aa\nbb\ncc").at_row(10));
        ctl.set_search_query("cc");
        ctl.poll_search();
        assert_eq!(ctl.current_match_row(), Some(10 + CHROME_HEADER_ROWS + 2));
    }

    #[test]
    fn test_prompt_decoration_only_for_shell() {
        let theme = ThemeColors::default();
        let opts = RenderOptions::default();
        let hl = KeywordHighlighter;

        let mut shell = controller(BlockMarkup::new(1, "$ ls\nplain").with_language("bash"));
        let lines = shell.render(&hl, &theme, &opts);
        // Row 0/1 are chrome; row 2 is "$ ls".
        let code_row = &lines[CHROME_HEADER_ROWS];
        assert!(
            code_row
                .segments
                .iter()
                .any(|s| s.text.contains('$') && s.fg == Some(theme.prompt_fg()) && s.bold)
        );

        let mut rust = controller(BlockMarkup::new(2, "$ not a prompt").with_language("rust"));
        let lines = rust.render(&hl, &theme, &opts);
        assert!(
            !lines[CHROME_HEADER_ROWS]
                .segments
                .iter()
                .any(|s| s.fg == Some(theme.prompt_fg()) && s.bold)
        );
    }
}
