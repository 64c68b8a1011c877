//! Color palette for rendered blocks.

/// Color palette used by the highlight pipeline and the window chrome.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    /// Default foreground color [r, g, b].
    pub fg: [u8; 3],
    /// Default background color [r, g, b].
    pub bg: [u8; 3],
    /// The 16 ANSI colors [r, g, b] (indices 0-15).
    pub palette: [[u8; 3]; 16],
}

impl Default for ThemeColors {
    /// Editor-dark palette modeled on the classic dark+ scheme.
    fn default() -> Self {
        Self {
            fg: [212, 212, 212],
            bg: [30, 30, 30],
            palette: [
                [40, 44, 52],    // 0  Black (panel)
                [244, 71, 71],   // 1  Red
                [106, 153, 85],  // 2  Green
                [220, 220, 170], // 3  Yellow
                [86, 156, 214],  // 4  Blue
                [197, 134, 192], // 5  Magenta
                [78, 201, 176],  // 6  Cyan
                [204, 204, 204], // 7  White
                [128, 128, 128], // 8  Bright black (comments)
                [241, 76, 76],   // 9  Bright red
                [181, 206, 168], // 10 Bright green (strings)
                [215, 186, 125], // 11 Bright yellow (numbers)
                [156, 220, 254], // 12 Bright blue
                [197, 134, 192], // 13 Bright magenta (keywords)
                [86, 156, 214],  // 14 Bright cyan (builtins)
                [255, 255, 255], // 15 Bright white
            ],
        }
    }
}

impl ThemeColors {
    /// Subtle background used behind code lines.
    pub fn code_bg(&self) -> [u8; 3] {
        [
            self.bg[0].saturating_add(12),
            self.bg[1].saturating_add(12),
            self.bg[2].saturating_add(12),
        ]
    }

    /// Background for lines named by a highlight spec. Applied after syntax
    /// coloring so the wrap never disturbs token colors.
    pub fn line_highlight_bg(&self) -> [u8; 3] {
        [
            self.bg[0].saturating_add(35),
            self.bg[1].saturating_add(35),
            self.bg[2].saturating_add(20),
        ]
    }

    /// Background for a search match.
    pub fn search_match_bg(&self) -> [u8; 3] {
        [90, 75, 20]
    }

    /// Background for the current search match.
    pub fn current_match_bg(&self) -> [u8; 3] {
        [140, 100, 20]
    }

    /// Title-bar background.
    pub fn title_bar_bg(&self) -> [u8; 3] {
        [
            self.bg[0].saturating_add(25),
            self.bg[1].saturating_add(25),
            self.bg[2].saturating_add(25),
        ]
    }

    /// Gutter (line-number) foreground.
    pub fn gutter_fg(&self) -> [u8; 3] {
        self.palette[8]
    }

    /// Shell-prompt marker foreground.
    pub fn prompt_fg(&self) -> [u8; 3] {
        self.palette[10]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_bg_is_lighter_than_bg() {
        let theme = ThemeColors::default();
        let bg = theme.code_bg();
        assert!(bg[0] > theme.bg[0]);
    }

    #[test]
    fn test_saturating_bg_near_white() {
        let theme = ThemeColors {
            bg: [250, 250, 250],
            ..Default::default()
        };
        assert_eq!(theme.line_highlight_bg()[0], 255);
    }
}
