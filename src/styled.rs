//! Styled-text model shared by the highlight pipeline and the renderer.

/// A segment of styled text within a line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledSegment {
    /// The text content.
    pub text: String,
    /// Foreground color as [r, g, b].
    pub fg: Option<[u8; 3]>,
    /// Background color as [r, g, b].
    pub bg: Option<[u8; 3]>,
    /// Whether this segment is bold.
    pub bold: bool,
    /// Whether this segment is italic.
    pub italic: bool,
    /// Whether this segment is underlined.
    pub underline: bool,
}

/// A single line of styled output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledLine {
    /// The styled segments making up this line.
    pub segments: Vec<StyledSegment>,
}

impl StyledLine {
    /// Creates a new styled line from segments.
    pub fn new(segments: Vec<StyledSegment>) -> Self {
        Self { segments }
    }

    /// Creates a plain unstyled line from text.
    pub fn plain(text: &str) -> Self {
        Self {
            segments: vec![StyledSegment {
                text: text.to_string(),
                ..Default::default()
            }],
        }
    }

    /// The line's text with all styling stripped.
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// The line length in characters.
    pub fn char_len(&self) -> usize {
        self.segments.iter().map(|s| s.text.chars().count()).sum()
    }

    /// Set the background color on every segment of the line.
    pub fn fill_bg(&mut self, bg: [u8; 3]) {
        for seg in &mut self.segments {
            seg.bg = Some(bg);
        }
    }

    /// Recolor the background of a character span, splitting segments at the
    /// span boundaries so styling outside the span is untouched.
    ///
    /// `start` and `len` are character offsets into the flattened line text.
    /// Used for match overlays: the base rendering is never mutated in place,
    /// a copy is re-spanned per render.
    pub fn apply_bg_span(&mut self, start: usize, len: usize, bg: [u8; 3]) {
        self.restyle_span(start, len, |seg| seg.bg = Some(bg));
    }

    /// Restyle a character span with an arbitrary segment mutation, splitting
    /// segments at the span boundaries so styling outside the span is
    /// untouched.
    pub fn restyle_span<F: Fn(&mut StyledSegment)>(&mut self, start: usize, len: usize, f: F) {
        if len == 0 {
            return;
        }
        let end = start + len;
        let mut rebuilt = Vec::with_capacity(self.segments.len() + 2);
        let mut pos = 0;

        for seg in self.segments.drain(..) {
            let seg_len = seg.text.chars().count();
            let seg_start = pos;
            let seg_end = pos + seg_len;
            pos = seg_end;

            // No overlap with the span.
            if seg_end <= start || seg_start >= end {
                rebuilt.push(seg);
                continue;
            }

            let split_at = |s: &str, n: usize| -> usize {
                s.char_indices()
                    .nth(n)
                    .map(|(i, _)| i)
                    .unwrap_or(s.len())
            };

            let overlap_start = start.max(seg_start) - seg_start;
            let overlap_end = end.min(seg_end) - seg_start;

            let b0 = split_at(&seg.text, overlap_start);
            let b1 = split_at(&seg.text, overlap_end);

            if b0 > 0 {
                rebuilt.push(StyledSegment {
                    text: seg.text[..b0].to_string(),
                    ..seg.clone()
                });
            }
            let mut restyled = StyledSegment {
                text: seg.text[b0..b1].to_string(),
                ..seg.clone()
            };
            f(&mut restyled);
            rebuilt.push(restyled);
            if b1 < seg.text.len() {
                rebuilt.push(StyledSegment {
                    text: seg.text[b1..].to_string(),
                    ..seg
                });
            }
        }

        self.segments = rebuilt;
    }
}
