//! Clipboard writing with a legacy fallback path.
//!
//! The copy action goes through the [`ClipboardSink`] trait so hosts and
//! tests can substitute their own sink. The production [`SystemClipboard`]
//! tries the system clipboard first and falls back to piping the text into a
//! platform clipboard helper process; the helper child is reaped on every
//! exit path.

use std::io::Write;
use std::process::{Command, Stdio};

use thiserror::Error;

/// Errors that can occur while writing to the clipboard.
#[derive(Debug, Error)]
pub enum CopyError {
    /// The system clipboard rejected the write.
    #[error("clipboard write failed: {0}")]
    Clipboard(String),
    /// A helper process ran but did not exit successfully.
    #[error("clipboard helper failed: {0}")]
    Helper(String),
    /// No clipboard mechanism is available on this system.
    #[error("no clipboard mechanism available")]
    Unavailable,
}

/// Receives plain text from the copy action.
pub trait ClipboardSink {
    /// Write text to the clipboard.
    fn write_text(&mut self, text: &str) -> Result<(), CopyError>;
}

/// Production sink: system clipboard via `arboard`, helper process fallback.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), CopyError> {
        match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.to_string())) {
            Ok(()) => Ok(()),
            Err(e) => {
                log::debug!("system clipboard unavailable ({e}), trying helper process");
                copy_via_helper(text)
            }
        }
    }
}

/// Candidate helper commands, tried in order.
fn helper_commands() -> &'static [(&'static str, &'static [&'static str])] {
    if cfg!(target_os = "macos") {
        &[("pbcopy", &[])]
    } else if cfg!(target_os = "windows") {
        &[("clip", &[])]
    } else {
        &[
            ("wl-copy", &[]),
            ("xclip", &["-selection", "clipboard"]),
            ("xsel", &["--input", "--clipboard"]),
        ]
    }
}

/// Pipe text into the first working clipboard helper.
///
/// Every spawned child is waited on before returning, whether the write
/// succeeded or not.
fn copy_via_helper(text: &str) -> Result<(), CopyError> {
    let mut last_err = CopyError::Unavailable;

    for (cmd, args) in helper_commands() {
        let mut child = match Command::new(cmd)
            .args(*args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => child,
            Err(_) => continue, // helper not installed
        };

        let write_result = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Err(std::io::Error::other("helper stdin not captured")),
        };
        // stdin is dropped at this point, signalling EOF to the helper.

        let status = child.wait();

        match (write_result, status) {
            (Ok(()), Ok(status)) if status.success() => return Ok(()),
            (Err(e), _) => last_err = CopyError::Helper(format!("{cmd}: {e}")),
            (_, Ok(status)) => last_err = CopyError::Helper(format!("{cmd}: exit {status}")),
            (_, Err(e)) => last_err = CopyError::Helper(format!("{cmd}: {e}")),
        }
    }

    Err(last_err)
}

#[cfg(test)]
pub mod tests {
    use super::*;

    /// Test sink recording every write.
    #[derive(Default)]
    pub struct RecordingSink {
        pub writes: Vec<String>,
        pub fail: bool,
    }

    impl ClipboardSink for RecordingSink {
        fn write_text(&mut self, text: &str) -> Result<(), CopyError> {
            if self.fail {
                return Err(CopyError::Unavailable);
            }
            self.writes.push(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_recording_sink_captures_text() {
        let mut sink = RecordingSink::default();
        sink.write_text("hello").unwrap();
        assert_eq!(sink.writes, vec!["hello"]);
    }

    #[test]
    fn test_error_display() {
        let err = CopyError::Helper("xclip: exit 1".to_string());
        assert_eq!(err.to_string(), "clipboard helper failed: xclip: exit 1");
        assert_eq!(
            CopyError::Unavailable.to_string(),
            "no clipboard mechanism available"
        );
    }
}
