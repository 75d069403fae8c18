//! Colour palettes for the two themes.

use ratatui::style::{Color, Modifier, Style};

use crate::core::preferences::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub muted: Color,
    pub border: Color,
    /// Sheet, menus and cards
    pub surface: Color,
    pub accent: Color,
    /// Text drawn on an accent background
    pub on_accent: Color,
    pub word_highlight: Color,
    pub verse_highlight: Color,
    /// Background of a selected verse
    pub verse_selected: Color,
    pub match_bg: Color,
    pub danger: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Palette {
                bg: Color::Rgb(250, 250, 249),
                fg: Color::Rgb(28, 25, 23),
                muted: Color::Rgb(120, 113, 108),
                border: Color::Rgb(214, 211, 209),
                surface: Color::Rgb(255, 255, 255),
                accent: Color::Rgb(37, 99, 235),
                on_accent: Color::Rgb(255, 255, 255),
                word_highlight: Color::Rgb(217, 249, 157),
                verse_highlight: Color::Rgb(254, 240, 138),
                verse_selected: Color::Rgb(239, 246, 255),
                match_bg: Color::Rgb(254, 240, 138),
                danger: Color::Rgb(220, 38, 38),
            },
            Theme::Dark => Palette {
                bg: Color::Rgb(28, 25, 23),
                fg: Color::Rgb(231, 229, 228),
                muted: Color::Rgb(168, 162, 158),
                border: Color::Rgb(68, 64, 60),
                surface: Color::Rgb(41, 37, 36),
                accent: Color::Rgb(96, 165, 250),
                on_accent: Color::Rgb(23, 23, 23),
                word_highlight: Color::Rgb(77, 124, 15),
                verse_highlight: Color::Rgb(113, 63, 18),
                verse_selected: Color::Rgb(30, 41, 59),
                match_bg: Color::Rgb(133, 77, 14),
                danger: Color::Rgb(248, 113, 113),
            },
        }
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.fg)
    }

    pub fn dim(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn heading(&self) -> Style {
        Style::default().fg(self.fg).add_modifier(Modifier::BOLD)
    }

    /// Small uppercase-style section label
    pub fn label(&self) -> Style {
        Style::default().fg(self.muted).add_modifier(Modifier::BOLD)
    }

    pub fn link(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn selected(&self) -> Style {
        Style::default().fg(self.on_accent).bg(self.accent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn themes_differ() {
        let light = Palette::for_theme(Theme::Light);
        let dark = Palette::for_theme(Theme::Dark);
        assert_ne!(light.bg, dark.bg);
        assert_ne!(light.fg, dark.fg);
    }
}
