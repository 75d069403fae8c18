//! # Search Input
//!
//! Single-line text field for the search overlay.
//!
//! The buffer is internal state, mirrored into `App::search.query` through
//! `InputEvent::Changed`. The placeholder and palette are props set by the
//! parent before each render. Long queries scroll horizontally so the
//! cursor stays in view.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::preferences::Theme;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::theme::Palette;

/// High-level events emitted by the SearchInput
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// The text changed; carries the whole new query
    Changed(String),
    /// Enter pressed on a non-blank query
    Submit,
}

pub struct SearchInput {
    buffer: String,
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    cursor: usize,
    /// First visible display column
    scroll: u16,
    /// Shown dimmed while the buffer is empty (Prop)
    pub placeholder: &'static str,
    /// Colours (Prop)
    pub palette: Palette,
}

impl Default for SearchInput {
    fn default() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            scroll: 0,
            placeholder: "",
            palette: Palette::for_theme(Theme::Light),
        }
    }
}

impl SearchInput {
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Adopt `query` when it differs from the buffer, cursor at the end.
    pub fn sync(&mut self, query: &str) {
        if self.buffer != query {
            self.buffer = query.to_string();
            self.cursor = self.buffer.len();
        }
    }

    fn cursor_col(&self) -> u16 {
        self.buffer[..self.cursor].width() as u16
    }

    fn update_scroll(&mut self, width: u16) {
        let col = self.cursor_col();
        if width == 0 {
            self.scroll = col;
        } else if col < self.scroll {
            self.scroll = col;
        } else if col >= self.scroll + width {
            self.scroll = col + 1 - width;
        }
    }

    /// The slice of the buffer starting at display column `self.scroll`.
    fn visible(&self) -> &str {
        let mut col = 0u16;
        for (i, c) in self.buffer.char_indices() {
            if col >= self.scroll {
                return &self.buffer[i..];
            }
            col += c.width().unwrap_or(0) as u16;
        }
        ""
    }

    fn changed(&self) -> Option<InputEvent> {
        Some(InputEvent::Changed(self.buffer.clone()))
    }
}

fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

impl Component for SearchInput {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let inner_width = area.width.saturating_sub(4);
        self.update_scroll(inner_width);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.palette.border))
            .style(Style::default().bg(self.palette.surface));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let text_area = Rect::new(inner.x + 1, inner.y, inner_width, inner.height.min(1));
        let span = if self.buffer.is_empty() {
            Span::styled(self.placeholder, self.palette.dim())
        } else {
            Span::styled(self.visible().to_string(), self.palette.text())
        };
        frame.render_widget(Paragraph::new(span), text_area);

        let x = text_area.x + self.cursor_col().saturating_sub(self.scroll);
        frame.set_cursor_position((x.min(text_area.x + inner_width), text_area.y));
    }
}

impl EventHandler for SearchInput {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::Char(c) => {
                self.buffer.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                self.changed()
            }
            TuiEvent::Paste(text) => {
                let line: String = text.chars().filter(|c| !c.is_control()).collect();
                self.buffer.insert_str(self.cursor, &line);
                self.cursor += line.len();
                self.changed()
            }
            TuiEvent::Backspace => {
                if self.cursor == 0 {
                    return None;
                }
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                self.changed()
            }
            TuiEvent::Delete => {
                if self.cursor >= self.buffer.len() {
                    return None;
                }
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                self.changed()
            }
            TuiEvent::Left => {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                None
            }
            TuiEvent::Right => {
                if self.cursor < self.buffer.len() {
                    self.cursor = next_char_boundary(&self.buffer, self.cursor);
                }
                None
            }
            TuiEvent::Home => {
                self.cursor = 0;
                None
            }
            TuiEvent::End => {
                self.cursor = self.buffer.len();
                None
            }
            TuiEvent::Enter => (!self.buffer.trim().is_empty()).then_some(InputEvent::Submit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;

    fn typed(text: &str) -> SearchInput {
        let mut input = SearchInput::default();
        for c in text.chars() {
            input.handle_event(&TuiEvent::Char(c));
        }
        input
    }

    #[test]
    fn typing_reports_the_whole_query() {
        let mut input = typed("муж");
        let res = input.handle_event(&TuiEvent::Char('а'));
        assert_eq!(res, Some(InputEvent::Changed("мужа".into())));
    }

    #[test]
    fn editing_respects_multibyte_characters() {
        let mut input = typed("дерево");
        input.handle_event(&TuiEvent::Left);
        input.handle_event(&TuiEvent::Left);
        assert_eq!(
            input.handle_event(&TuiEvent::Backspace),
            Some(InputEvent::Changed("дерво".into()))
        );
        assert_eq!(
            input.handle_event(&TuiEvent::Delete),
            Some(InputEvent::Changed("деро".into()))
        );
        input.handle_event(&TuiEvent::Home);
        assert_eq!(input.handle_event(&TuiEvent::Backspace), None);
        input.handle_event(&TuiEvent::End);
        assert_eq!(input.handle_event(&TuiEvent::Delete), None);
    }

    #[test]
    fn paste_drops_newlines() {
        let mut input = SearchInput::default();
        input.handle_event(&TuiEvent::Paste("про\nуспіх".into()));
        assert_eq!(input.text(), "проуспіх");
    }

    #[test]
    fn blank_queries_do_not_submit() {
        let mut input = typed("  ");
        assert_eq!(input.handle_event(&TuiEvent::Enter), None);
        let mut input = typed("успіх");
        assert_eq!(input.handle_event(&TuiEvent::Enter), Some(InputEvent::Submit));
    }

    #[test]
    fn sync_moves_the_cursor_to_the_end() {
        let mut input = SearchInput::default();
        input.sync("вода");
        input.handle_event(&TuiEvent::Char('!'));
        assert_eq!(input.text(), "вода!");
    }

    #[test]
    fn renders_placeholder_then_scrolls_long_text() {
        let mut input = SearchInput {
            placeholder: "Пошук слова...",
            ..SearchInput::default()
        };
        let mut terminal = Terminal::new(TestBackend::new(14, 3)).unwrap();
        terminal.draw(|f| input.render(f, f.area())).unwrap();
        let row: String = (0..14)
            .map(|x| terminal.backend().buffer()[(x, 1)].symbol().to_string())
            .collect();
        assert!(row.contains("Пошук"));

        let mut input = typed("abcdefghijklmnop");
        terminal.draw(|f| input.render(f, f.area())).unwrap();
        let row: String = (0..14)
            .map(|x| terminal.backend().buffer()[(x, 1)].symbol().to_string())
            .collect();
        assert!(row.contains("op"));
        assert!(!row.contains("abc"));
    }
}
