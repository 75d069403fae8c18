//! # TopBar Component
//!
//! One-line header over every tab.
//!
//! ```text
//!  Grom ▾  Псалом 1 ▾        Відмічено        / ⌕
//! ```
//!
//! Stateless: translation and chapter labels, the status message and the
//! palette are props. The search glyph is clickable.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::core::action::Action;
use crate::tui::component::Component;
use crate::tui::hit::{Hit, HitMap};
use crate::tui::theme::Palette;

/// Label of the bundled translation.
pub const TRANSLATION: &str = "Grom";

const SEARCH: &str = " / ⌕ ";

pub struct TopBar<'a> {
    /// Chapter label, e.g. "Псалом 1"
    pub chapter: &'a str,
    /// Transient status (e.g. "Скопійовано"), empty for none
    pub status_message: &'a str,
    pub palette: &'a Palette,
    pub hits: &'a mut HitMap,
}

impl Component for TopBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let palette = self.palette;
        frame.render_widget(
            Paragraph::new("").style(Style::default().bg(palette.bg)),
            area,
        );

        let left = Line::from(vec![
            Span::styled(format!(" {TRANSLATION} ▾  "), palette.heading()),
            Span::styled(format!("{} ▾", self.chapter), palette.heading()),
        ]);
        let left_width = left.width() as u16;
        frame.render_widget(Paragraph::new(left), area);

        let search_width = (SEARCH.width() as u16).min(area.width);
        let search = Rect::new(
            area.x + area.width - search_width,
            area.y,
            search_width,
            1,
        );
        frame.render_widget(Paragraph::new(Span::styled(SEARCH, palette.dim())), search);
        self.hits.push(search, Hit::Action(Action::OpenSearch));

        if !self.status_message.is_empty() {
            let middle = Rect::new(
                area.x + left_width + 1,
                area.y,
                area.width.saturating_sub(left_width + search_width + 2),
                1,
            );
            frame.render_widget(
                Paragraph::new(Span::styled(self.status_message, palette.link())).centered(),
                middle,
            );
        }
    }
}
