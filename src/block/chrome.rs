//! Window chrome rendering: title bar, tab row, gutter, status row.

use crate::styled::{StyledLine, StyledSegment};
use crate::theme::ThemeColors;

/// Traffic-light dots shown on the left of the title bar.
const TRAFFIC_LIGHTS: [(char, [u8; 3]); 3] = [
    ('●', [255, 95, 86]),
    ('●', [255, 189, 46]),
    ('●', [39, 201, 63]),
];

/// Pad text to `width` characters with trailing spaces.
fn pad_to(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    format!("{text}{}", " ".repeat(width - len))
}

/// Render the title bar: traffic lights plus centered-ish title text.
pub fn render_title_bar(title: &str, width: usize, theme: &ThemeColors) -> StyledLine {
    let bar_bg = theme.title_bar_bg();
    let mut segments = vec![StyledSegment {
        text: " ".to_string(),
        bg: Some(bar_bg),
        ..Default::default()
    }];

    for (dot, color) in TRAFFIC_LIGHTS {
        segments.push(StyledSegment {
            text: format!("{dot} "),
            fg: Some(color),
            bg: Some(bar_bg),
            ..Default::default()
        });
    }

    let used: usize = segments.iter().map(|s| s.text.chars().count()).sum();
    let title_area = width.saturating_sub(used);
    segments.push(StyledSegment {
        text: pad_to(&format!(" {title}"), title_area),
        fg: Some(theme.fg),
        bg: Some(bar_bg),
        bold: true,
        ..Default::default()
    });

    StyledLine::new(segments)
}

/// Render the tab row: active tab label and optional language label pushed to
/// the right edge, with the copy affordance text when enabled.
pub fn render_tab_row(
    tab_label: &str,
    language_label: Option<&str>,
    copy_label: Option<&str>,
    width: usize,
    theme: &ThemeColors,
) -> StyledLine {
    let bar_bg = theme.title_bar_bg();
    let tab_bg = theme.code_bg();

    let tab_text = format!(" {tab_label} ");
    let mut right = String::new();
    if let Some(lang) = language_label {
        right.push_str(&format!(" {lang} "));
    }
    if let Some(copy) = copy_label {
        right.push_str(&format!("[{copy}] "));
    }

    let tab_len = tab_text.chars().count();
    let right_len = right.chars().count();
    let filler = width.saturating_sub(tab_len + right_len);

    let mut segments = vec![StyledSegment {
        text: tab_text,
        fg: Some(theme.fg),
        bg: Some(tab_bg),
        ..Default::default()
    }];
    if filler > 0 {
        segments.push(StyledSegment {
            text: " ".repeat(filler),
            bg: Some(bar_bg),
            ..Default::default()
        });
    }
    if right_len > 0 {
        segments.push(StyledSegment {
            text: right,
            fg: Some(theme.gutter_fg()),
            bg: Some(bar_bg),
            ..Default::default()
        });
    }

    StyledLine::new(segments)
}

/// Render the gutter cell for one line number, right-aligned to
/// `gutter_width` digits.
pub fn gutter_segment(line_number: usize, gutter_width: usize, theme: &ThemeColors) -> StyledSegment {
    StyledSegment {
        text: format!("{line_number:>gutter_width$} │ "),
        fg: Some(theme.gutter_fg()),
        bg: Some(theme.code_bg()),
        ..Default::default()
    }
}

/// Digits needed to number `line_count` lines.
pub fn gutter_width(line_count: usize) -> usize {
    line_count.max(1).to_string().len()
}

/// Render the collapsed placeholder row shown in place of the code area.
pub fn render_collapsed_row(line_count: usize, width: usize, theme: &ThemeColors) -> StyledLine {
    let text = format!("▸ … {line_count} lines hidden");
    StyledLine::new(vec![StyledSegment {
        text: pad_to(&format!(" {text}"), width),
        fg: Some(theme.gutter_fg()),
        bg: Some(theme.code_bg()),
        italic: true,
        ..Default::default()
    }])
}

/// Render the status row: search match count and copy feedback.
pub fn render_status_row(
    match_text: Option<&str>,
    copy_text: Option<&str>,
    width: usize,
    theme: &ThemeColors,
) -> StyledLine {
    let bar_bg = theme.title_bar_bg();
    let mut left = String::new();
    if let Some(m) = match_text {
        left.push_str(&format!(" {m}"));
    }
    if let Some(c) = copy_text {
        left.push_str(&format!("  {c}"));
    }

    StyledLine::new(vec![StyledSegment {
        text: pad_to(&left, width),
        fg: Some(theme.gutter_fg()),
        bg: Some(bar_bg),
        ..Default::default()
    }])
}
