//! Syntax highlighting and line-range highlighting.
//!
//! The syntax colorer is a collaborator behind the [`Highlighter`] trait; the
//! built-in [`KeywordHighlighter`] does fast tokenisation with string matching
//! against fixed keyword and builtin lists rather than building a parse tree.
//! Line-range highlighting ([`apply_line_highlights`]) runs strictly after
//! syntax coloring, wrapping whole already-colored lines.

mod languages;

pub use languages::{LanguageDef, get_language_def, is_shell_like};

use crate::line_ranges::LineSet;
use crate::styled::{StyledLine, StyledSegment};
use crate::theme::ThemeColors;

/// Recolors raw source lines for display.
///
/// One rendered line is produced per source line; the controller relies on
/// this 1:1 mapping for gutter numbering, line-range wrapping and search
/// overlay alignment.
pub trait Highlighter {
    /// Highlight raw source lines for the declared language.
    fn highlight(
        &self,
        language: Option<&str>,
        lines: &[String],
        theme: &ThemeColors,
        show_bg: bool,
    ) -> Vec<StyledLine>;
}

/// Default keyword-based highlighter.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordHighlighter;

impl Highlighter for KeywordHighlighter {
    fn highlight(
        &self,
        language: Option<&str>,
        lines: &[String],
        theme: &ThemeColors,
        show_bg: bool,
    ) -> Vec<StyledLine> {
        let lang_def = language.and_then(get_language_def);
        lines
            .iter()
            .map(|line| highlight_line(line, lang_def.as_ref(), theme, show_bg))
            .collect()
    }
}

/// Wrap every line whose 1-based index is in the set with the highlight
/// background. Lines outside the set are unchanged.
///
/// Must be called on already-colored lines; coloring afterwards would repaint
/// the wrap.
pub fn apply_line_highlights(lines: &mut [StyledLine], set: &LineSet, theme: &ThemeColors) {
    if set.is_empty() {
        return;
    }
    let bg = theme.line_highlight_bg();
    for (idx, line) in lines.iter_mut().enumerate() {
        if set.contains(idx + 1) {
            line.fill_bg(bg);
        }
    }
}

/// Highlight a single code line using simple keyword matching.
///
/// Returns styled segments with colors for keywords, strings, comments,
/// numbers, and builtins.
fn highlight_line(
    line: &str,
    lang_def: Option<&LanguageDef>,
    theme: &ThemeColors,
    show_bg: bool,
) -> StyledLine {
    let code_bg = show_bg.then(|| theme.code_bg());

    let Some(def) = lang_def else {
        // No language definition: plain text with optional background.
        return StyledLine::new(vec![StyledSegment {
            text: line.to_string(),
            bg: code_bg,
            ..Default::default()
        }]);
    };

    // Full-line comment.
    if !def.line_comment.is_empty() && line.trim_start().starts_with(def.line_comment) {
        return StyledLine::new(vec![StyledSegment {
            text: line.to_string(),
            fg: Some(theme.palette[8]),
            bg: code_bg,
            italic: true,
            ..Default::default()
        }]);
    }

    let mut segments = Vec::new();
    let mut chars = line.char_indices().peekable();

    while let Some(&(byte_pos, ch)) = chars.peek() {
        // String literal.
        if ch == '"' || ch == '\'' {
            let quote = ch;
            let start = byte_pos;
            chars.next(); // consume opening quote
            let mut escaped = false;
            while let Some(&(_, c)) = chars.peek() {
                chars.next();
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == quote {
                    break;
                }
            }
            let end = chars.peek().map(|&(i, _)| i).unwrap_or(line.len());
            segments.push(StyledSegment {
                text: line[start..end].to_string(),
                fg: Some(theme.palette[10]),
                bg: code_bg,
                ..Default::default()
            });
            continue;
        }

        // Inline comment.
        if !def.line_comment.is_empty() && line[byte_pos..].starts_with(def.line_comment) {
            segments.push(StyledSegment {
                text: line[byte_pos..].to_string(),
                fg: Some(theme.palette[8]),
                bg: code_bg,
                italic: true,
                ..Default::default()
            });
            break;
        }

        // Word (identifier or keyword).
        if ch.is_alphanumeric() || ch == '_' {
            let start = byte_pos;
            while let Some(&(_, c)) = chars.peek() {
                if c.is_alphanumeric() || c == '_' {
                    chars.next();
                } else {
                    break;
                }
            }
            let end = chars.peek().map(|&(i, _)| i).unwrap_or(line.len());
            let word = &line[start..end];

            let fg = if def.keywords.contains(&word) {
                Some(theme.palette[13])
            } else if def.builtins.contains(&word) {
                Some(theme.palette[14])
            } else if word.chars().all(|c| c.is_ascii_digit() || c == '_' || c == '.') {
                Some(theme.palette[11])
            } else {
                None
            };

            segments.push(StyledSegment {
                text: word.to_string(),
                fg,
                bg: code_bg,
                ..Default::default()
            });
            continue;
        }

        // Other character (punctuation, whitespace, etc.).
        let start = byte_pos;
        chars.next();
        let end = chars.peek().map(|&(i, _)| i).unwrap_or(line.len());
        segments.push(StyledSegment {
            text: line[start..end].to_string(),
            bg: code_bg,
            ..Default::default()
        });
    }

    if segments.is_empty() {
        // Empty line within the block.
        segments.push(StyledSegment {
            text: String::new(),
            bg: code_bg,
            ..Default::default()
        });
    }

    StyledLine::new(segments)
}
