//! Shared integration test helpers for codepane.
//!
//! Include this module at the top of each test file that needs it:
//!
//! ```ignore
//! mod common;
//! use common::{immediate_config, markup, RecordingClipboard};
//! ```
//!
//! Note: Rust integration tests use `mod common;` (not `use`) to bring in
//! helpers from `tests/common/mod.rs`. The `#[allow(dead_code)]` attribute
//! suppresses warnings when only a subset of helpers are used per file.

#![allow(dead_code)]

use codepane::block::{ClipboardSink, CopyError};
use codepane::BlockMarkup;
use codepane_config::{Config, SearchTuning};

/// Config with a zero settle window so searches run on the first poll.
pub fn immediate_config() -> Config {
    Config {
        search: SearchTuning {
            debounce_ms: 0,
            min_query_len: 2,
        },
        ..Default::default()
    }
}

/// Block markup with source text and defaults for everything else.
pub fn markup(id: u64, source: &str) -> BlockMarkup {
    BlockMarkup::new(id, source)
}

/// Clipboard sink that records every write instead of touching the system
/// clipboard. Set `fail` to exercise the error path.
#[derive(Default)]
pub struct RecordingClipboard {
    pub writes: Vec<String>,
    pub fail: bool,
}

impl ClipboardSink for RecordingClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), CopyError> {
        if self.fail {
            return Err(CopyError::Unavailable);
        }
        self.writes.push(text.to_string());
        Ok(())
    }
}
