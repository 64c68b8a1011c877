//! Configuration system for the codepane snippet renderer.
//!
//! This crate provides configuration loading, saving, and default values
//! for the snippet renderer. It includes:
//!
//! - Per-block display flags (line numbers, copy button, collapse behaviour)
//! - Search tuning (debounce window, minimum query length)
//! - Render options (target width, lazy-initialization margin)

pub mod config;
pub mod error;

// Re-export main types for convenience
pub use config::{Config, DisplayFlags, RenderOptions, SearchTuning};
pub use error::ConfigError;
