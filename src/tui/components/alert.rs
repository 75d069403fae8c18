//! Modal error box. Any click or Esc/Enter dismisses it.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Padding, Paragraph, Wrap};

use crate::core::action::Action;
use crate::tui::component::Component;
use crate::tui::hit::{Hit, HitMap};
use crate::tui::theme::Palette;

pub struct Alert<'a> {
    pub message: &'a str,
    pub palette: &'a Palette,
    pub hits: &'a mut HitMap,
}

impl Alert<'_> {
    /// Centred box up to 50 columns wide, tall enough for the wrapped text.
    pub fn area(&self, screen: Rect) -> Rect {
        let width = screen.width.saturating_sub(4).clamp(1, 50);
        let text_width = usize::from(width.saturating_sub(4)).max(1);
        let text_rows = textwrap::wrap(self.message, text_width).len();
        let height = u16::try_from(text_rows)
            .unwrap_or(u16::MAX)
            .saturating_add(4)
            .min(screen.height);
        Rect::new(
            screen.x + screen.width.saturating_sub(width) / 2,
            screen.y + screen.height.saturating_sub(height) / 2,
            width,
            height,
        )
    }
}

impl Component for Alert<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let palette = self.palette;
        // The whole screen dismisses
        self.hits.push(area, Hit::Action(Action::DismissAlert));

        let rect = self.area(area);
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(palette.danger))
            .title(Span::styled(
                " Помилка ",
                Style::default()
                    .fg(palette.danger)
                    .add_modifier(Modifier::BOLD),
            ))
            .style(Style::default().bg(palette.surface).fg(palette.fg));
        let body = vec![
            Line::from(Span::raw(self.message.to_string())),
            Line::default(),
            Line::from(Span::styled("OK", palette.link().add_modifier(Modifier::BOLD)))
                .centered(),
        ];
        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(body)
                .block(block.padding(Padding::horizontal(1)))
                .wrap(Wrap { trim: true }),
            rect,
        );
    }
}
