//! codepane — render code snippets in editor-window chrome for terminal UIs.
//!
//! A page hosts any number of code blocks. The [`page::PageController`]
//! discovers block markups idempotently and defers initialization of
//! below-the-fold blocks; each [`block::CodeBlockController`] then owns one
//! block's collapse, fullscreen, copy, and search state and renders it as
//! [`styled::StyledLine`]s inside VS Code-style window chrome.
//!
//! Configuration lives in the `codepane-config` sub-crate.

/// Library version (root crate version, for use by sub-crates).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod block;
pub mod highlight;
pub mod line_ranges;
pub mod page;
pub mod search;
pub mod styled;
pub mod theme;

pub use block::{BlockMarkup, CodeBlockController, CollapseState, CopyIndicator};
pub use line_ranges::LineSet;
pub use page::PageController;
pub use search::{SearchEngine, SearchMatch};
pub use styled::{StyledLine, StyledSegment};
pub use theme::ThemeColors;
