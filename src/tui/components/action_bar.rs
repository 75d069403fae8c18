//! Floating bar over the open sheet: mark, note and share the selection.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::core::action::Action;
use crate::tui::component::Component;
use crate::tui::hit::{Hit, HitMap};
use crate::tui::theme::Palette;

pub const BAR_HEIGHT: u16 = 3;

pub struct ActionBar<'a> {
    /// The selection is already marked
    pub highlighted: bool,
    pub palette: &'a Palette,
    pub hits: &'a mut HitMap,
}

impl ActionBar<'_> {
    fn items(&self) -> [(&'static str, Action, bool); 3] {
        [
            ("✎ Відмітити", Action::ToggleHighlight, self.highlighted),
            ("✐ Нотатка", Action::CreateNote, false),
            ("⇪ Поділитись", Action::ShareSelection, false),
        ]
    }
}

impl Component for ActionBar<'_> {
    /// Draws a bordered bar centred at the bottom of `area`.
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let palette = *self.palette;
        let items = self.items();
        let inner: u16 = items
            .iter()
            .map(|(label, ..)| label.width() as u16 + 2)
            .sum();
        let width = (inner + 2).min(area.width);
        let rect = Rect::new(
            area.x + (area.width - width) / 2,
            (area.y + area.height).saturating_sub(BAR_HEIGHT),
            width,
            BAR_HEIGHT.min(area.height),
        );

        self.hits.push(rect, Hit::Inert);
        let mut spans = Vec::new();
        let mut col = rect.x + 1;
        for (label, action, active) in items {
            let text = format!(" {label} ");
            let w = text.width() as u16;
            let style = if active {
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                palette.text()
            };
            self.hits.push(Rect::new(col, rect.y + 1, w, 1), Hit::Action(action));
            spans.push(Span::styled(text, style));
            col = col.saturating_add(w);
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(palette.border))
            .style(Style::default().bg(palette.surface));
        frame.render_widget(Clear, rect);
        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), rect);
    }
}
