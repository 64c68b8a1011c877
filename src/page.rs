//! Page-level orchestration.
//!
//! The [`PageController`] owns every block on a page: it discovers block
//! markups (idempotently, so repeated scans never double-attach), defers
//! initialization of lazy blocks until they near the viewport, and routes
//! page-global state — the scroll lock and the escape-key hook — that
//! fullscreen blocks borrow while active.

use std::collections::{BTreeMap, BTreeSet};

use codepane_config::Config;

use crate::block::{BlockMarkup, CHROME_HEADER_ROWS, ClipboardSink, CodeBlockController};
use crate::highlight::{Highlighter, KeywordHighlighter};
use crate::styled::StyledLine;
use crate::theme::ThemeColors;

/// Page scroll lock, held while a block is fullscreen.
#[derive(Debug, Default)]
pub struct ScrollLock {
    locked: bool,
}

impl ScrollLock {
    /// Lock page scrolling.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Restore page scrolling.
    pub fn unlock(&mut self) {
        self.locked = false;
    }

    /// Whether scrolling is currently locked.
    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

/// Handle for a registered key hook; releasing it requires the handle, so a
/// hook cannot be unregistered twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HookId(u64);

/// Registry of active escape-key hooks.
#[derive(Debug, Default)]
pub struct KeyHookRegistry {
    next: u64,
    active: BTreeSet<u64>,
}

impl KeyHookRegistry {
    /// Register a hook and return its handle.
    pub fn register(&mut self) -> HookId {
        let id = self.next;
        self.next += 1;
        self.active.insert(id);
        HookId(id)
    }

    /// Release a hook. Unknown handles are ignored.
    pub fn unregister(&mut self, hook: HookId) {
        self.active.remove(&hook.0);
    }

    /// Number of hooks currently registered.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

/// Controller for all code blocks on a page.
pub struct PageController {
    /// Attached blocks, keyed by id.
    blocks: BTreeMap<u64, CodeBlockController>,
    /// Every id ever discovered, attached or still pending. Rescans skip
    /// these.
    discovered: BTreeSet<u64>,
    /// Lazy blocks discovered but not yet initialized.
    pending: BTreeMap<u64, BlockMarkup>,
    scroll_lock: ScrollLock,
    key_hooks: KeyHookRegistry,
    highlighter: Box<dyn Highlighter>,
    theme: ThemeColors,
    config: Config,
}

impl PageController {
    /// Create a page controller with the default highlighter.
    pub fn new(config: Config) -> Self {
        Self::with_highlighter(config, Box::new(KeywordHighlighter))
    }

    /// Create a page controller with a custom highlighter.
    pub fn with_highlighter(config: Config, highlighter: Box<dyn Highlighter>) -> Self {
        Self {
            blocks: BTreeMap::new(),
            discovered: BTreeSet::new(),
            pending: BTreeMap::new(),
            scroll_lock: ScrollLock::default(),
            key_hooks: KeyHookRegistry::default(),
            highlighter,
            theme: ThemeColors::default(),
            config,
        }
    }

    /// Swap the theme and invalidate every memoized rendering.
    pub fn set_theme(&mut self, theme: ThemeColors) {
        self.theme = theme;
        for block in self.blocks.values_mut() {
            block.invalidate_render();
        }
    }

    /// Scan a batch of block markups, attaching each at most once.
    ///
    /// Already-discovered ids are skipped, so scanning the same page twice
    /// (or re-scanning after dynamic content lands) never duplicates state.
    /// Returns the number of newly discovered blocks.
    pub fn scan(&mut self, markups: Vec<BlockMarkup>) -> usize {
        let mut added = 0;
        for markup in markups {
            if !self.discovered.insert(markup.id) {
                continue;
            }
            added += 1;
            if markup.lazy {
                log::debug!("block {} deferred until near viewport", markup.id);
                self.pending.insert(markup.id, markup);
            } else {
                self.attach(markup);
            }
        }
        added
    }

    /// Re-scan after dynamic content changes. Same contract as
    /// [`scan`](Self::scan): only genuinely new blocks are attached.
    pub fn refresh(&mut self, markups: Vec<BlockMarkup>) -> usize {
        let added = self.scan(markups);
        log::debug!("refresh discovered {added} new block(s)");
        added
    }

    fn attach(&mut self, markup: BlockMarkup) {
        let block = CodeBlockController::attach(markup, self.config.search);
        self.blocks.insert(block.id(), block);
    }

    /// Report the visible row window; initializes lazy blocks within the
    /// configured margin of it. Returns the number of blocks initialized.
    pub fn observe_viewport(&mut self, top: usize, height: usize) -> usize {
        let margin = self.config.render.lazy_margin_rows;
        let window_top = top.saturating_sub(margin);
        let window_bottom = top + height + margin;

        let ready: Vec<u64> = self
            .pending
            .iter()
            .filter(|(_, markup)| {
                let rows = CHROME_HEADER_ROWS
                    + markup
                        .source
                        .as_deref()
                        .map(|s| s.split('\n').count())
                        .unwrap_or(0);
                let block_top = markup.start_row;
                let block_bottom = markup.start_row + rows;
                block_top < window_bottom && block_bottom > window_top
            })
            .map(|(id, _)| *id)
            .collect();

        for id in &ready {
            if let Some(markup) = self.pending.remove(id) {
                log::debug!("block {id} near viewport, initializing");
                self.attach(markup);
            }
        }
        ready.len()
    }

    /// Number of initialized blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Number of lazy blocks still awaiting initialization.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// An initialized block by id.
    pub fn block(&self, id: u64) -> Option<&CodeBlockController> {
        self.blocks.get(&id)
    }

    /// An initialized block by id, mutably.
    pub fn block_mut(&mut self, id: u64) -> Option<&mut CodeBlockController> {
        self.blocks.get_mut(&id)
    }

    /// Whether page scrolling is currently locked.
    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_lock.is_locked()
    }

    /// Toggle fullscreen for one block. Only one block may be fullscreen at
    /// a time: entering fullscreen exits any other block first.
    pub fn toggle_fullscreen(&mut self, id: u64) -> bool {
        let Self {
            blocks,
            scroll_lock,
            key_hooks,
            ..
        } = self;

        for (other_id, block) in blocks.iter_mut() {
            if *other_id != id && block.is_fullscreen() {
                block.exit_fullscreen(scroll_lock, key_hooks);
            }
        }
        match blocks.get_mut(&id) {
            Some(block) => block.toggle_fullscreen(scroll_lock, key_hooks),
            None => false,
        }
    }

    /// Route an escape-key event to the fullscreen block, if any. Returns
    /// `true` when the event was consumed.
    pub fn handle_escape(&mut self) -> bool {
        let Self {
            blocks,
            scroll_lock,
            key_hooks,
            ..
        } = self;

        for block in blocks.values_mut() {
            if block.handle_escape(scroll_lock, key_hooks) {
                return true;
            }
        }
        false
    }

    /// Copy a block's raw source to the sink.
    pub fn copy_block(&mut self, id: u64, sink: &mut dyn ClipboardSink) -> bool {
        match self.blocks.get_mut(&id) {
            Some(block) => block.request_copy(sink),
            None => false,
        }
    }

    /// Run pending searches whose settle window has elapsed. Returns `true`
    /// when any block's match list was updated.
    pub fn poll_search(&mut self) -> bool {
        let mut updated = false;
        for block in self.blocks.values_mut() {
            updated |= block.poll_search();
        }
        updated
    }

    /// Render one block to styled lines.
    pub fn render_block(&mut self, id: u64) -> Option<Vec<StyledLine>> {
        let Self {
            blocks,
            highlighter,
            theme,
            config,
            ..
        } = self;

        blocks
            .get_mut(&id)
            .map(|block| block.render(highlighter.as_ref(), theme, &config.render))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::clipboard::tests::RecordingSink;
    use codepane_config::{RenderOptions, SearchTuning};

    fn config() -> Config {
        Config {
            search: SearchTuning {
                debounce_ms: 0,
                min_query_len: 2,
            },
            render: RenderOptions {
                lazy_margin_rows: 100,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn markup(id: u64) -> BlockMarkup {
        BlockMarkup::new(id, "fn main() {}\nprintln!()")
    }

    #[test]
    fn test_scan_is_idempotent() {
        let mut page = PageController::new(config());
        assert_eq!(page.scan(vec![markup(1), markup(2)]), 2);
        assert_eq!(page.scan(vec![markup(1), markup(2)]), 0);
        assert_eq!(page.block_count(), 2);
    }

    #[test]
    fn test_double_scan_single_copy_write() {
        let mut page = PageController::new(config());
        page.scan(vec![markup(1)]);
        page.scan(vec![markup(1)]);

        let mut sink = RecordingSink::default();
        assert!(page.copy_block(1, &mut sink));
        assert_eq!(sink.writes.len(), 1);
        assert_eq!(sink.writes[0], "fn main() {}\nprintln!()");
    }

    #[test]
    fn test_lazy_block_waits_for_viewport() {
        let mut page = PageController::new(config());
        page.scan(vec![markup(1).lazy().at_row(500)]);

        assert_eq!(page.block_count(), 0);
        assert_eq!(page.pending_count(), 1);

        // Viewport rows 0..50, margin 100: block at row 500 stays pending.
        assert_eq!(page.observe_viewport(0, 50), 0);
        assert_eq!(page.pending_count(), 1);

        // Row 410 puts the window bottom at 410+50+100 = 560 > 500.
        assert_eq!(page.observe_viewport(410, 50), 1);
        assert_eq!(page.block_count(), 1);
        assert_eq!(page.pending_count(), 0);

        // Already initialized; further observations are no-ops.
        assert_eq!(page.observe_viewport(410, 50), 0);
    }

    #[test]
    fn test_lazy_margin_above_viewport() {
        let mut page = PageController::new(config());
        page.scan(vec![markup(1).lazy().at_row(300)]);

        // Block spans rows 300..304; window top 400-100 = 300 overlaps.
        assert_eq!(page.observe_viewport(400, 50), 1);
    }

    #[test]
    fn test_refresh_attaches_only_new_blocks() {
        let mut page = PageController::new(config());
        page.scan(vec![markup(1)]);
        assert_eq!(page.refresh(vec![markup(1), markup(7)]), 1);
        assert_eq!(page.block_count(), 2);
    }

    #[test]
    fn test_single_fullscreen_across_blocks() {
        let mut page = PageController::new(config());
        page.scan(vec![markup(1), markup(2)]);

        assert!(page.toggle_fullscreen(1));
        assert!(page.is_scroll_locked());

        // Entering fullscreen on block 2 exits block 1 first.
        assert!(page.toggle_fullscreen(2));
        assert!(!page.block(1).unwrap().is_fullscreen());
        assert!(page.block(2).unwrap().is_fullscreen());
        assert!(page.is_scroll_locked());
        assert_eq!(page.key_hooks.active_count(), 1);
    }

    #[test]
    fn test_escape_routes_to_fullscreen_block() {
        let mut page = PageController::new(config());
        page.scan(vec![markup(1), markup(2)]);

        assert!(!page.handle_escape());

        page.toggle_fullscreen(2);
        assert!(page.handle_escape());
        assert!(!page.block(2).unwrap().is_fullscreen());
        assert!(!page.is_scroll_locked());
        assert!(!page.handle_escape());
    }

    #[test]
    fn test_fullscreen_unknown_block() {
        let mut page = PageController::new(config());
        assert!(!page.toggle_fullscreen(42));
        assert!(!page.is_scroll_locked());
    }

    #[test]
    fn test_render_block_produces_chrome_and_code() {
        let mut page = PageController::new(config());
        page.scan(vec![markup(1)]);

        let lines = page.render_block(1).unwrap();
        // Title bar, tab row, two code lines.
        assert_eq!(lines.len(), CHROME_HEADER_ROWS + 2);
        assert!(lines[CHROME_HEADER_ROWS].text().contains("fn main()"));
        assert!(page.render_block(99).is_none());
    }

    #[test]
    fn test_poll_search_updates_blocks() {
        let mut page = PageController::new(config());
        page.scan(vec![markup(1)]);

        page.block_mut(1).unwrap().set_search_query("println");
        assert!(page.poll_search());
        assert!(!page.poll_search());
        assert_eq!(page.block(1).unwrap().search().match_count(), 1);
    }
}
