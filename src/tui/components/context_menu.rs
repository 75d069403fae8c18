//! # Context Menu
//!
//! A one-row strip of actions floating over the current selection.
//!
//! ```text
//!  ╭──────────────────────────────────────────────╮
//!  │ Виділити h  Дослідити s  Нотатка n  Скопіювати c │
//!  ╰──────────────────────────────────────────────╯
//! ```
//!
//! Placed below the selection, or above it when the rows below cannot fit
//! the menu plus the bottom navigation. The horizontal centre follows the
//! selection but is clamped so the menu never leaves the screen.

use ratatui::Frame;
use ratatui::layout::{Rect, Size};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::core::action::{Action, MenuItem};
use crate::core::selection::Coordinates;
use crate::tui::component::Component;
use crate::tui::hit::{Hit, HitMap};
use crate::tui::theme::Palette;

pub const MENU_HEIGHT: u16 = 3;
const SCREEN_PADDING: u16 = 1;

fn item_text(item: MenuItem) -> (String, String) {
    (format!(" {}", item.label()), format!(" {} ", item.hotkey()))
}

fn item_width(item: MenuItem) -> u16 {
    let (label, key) = item_text(item);
    u16::try_from(label.width() + key.width()).unwrap_or(u16::MAX)
}

/// Outer size of the menu including borders.
pub fn menu_size() -> Size {
    let inner: u16 = MenuItem::ALL.iter().map(|i| item_width(*i)).sum();
    Size::new(inner + 2, MENU_HEIGHT)
}

/// Where the menu goes for a selection at `coords` on a `screen` whose
/// bottom `nav_height` rows belong to the navigation bar.
pub fn menu_position(coords: Coordinates, screen: Rect, size: Size, nav_height: u16) -> Rect {
    let width = size.width.min(screen.width);
    let min_x = screen.x + SCREEN_PADDING;
    let max_x = (screen.x + screen.width)
        .saturating_sub(SCREEN_PADDING + width)
        .max(min_x);
    let x = coords
        .x
        .saturating_sub(width / 2)
        .clamp(min_x, max_x)
        .min((screen.x + screen.width).saturating_sub(width));

    let screen_bottom = screen.y + screen.height;
    let space_below = screen_bottom.saturating_sub(coords.y);
    let y = if space_below < nav_height + size.height {
        coords.y_top.saturating_sub(size.height).max(screen.y)
    } else {
        coords.y
    };

    Rect::new(x, y, width, size.height).intersection(screen)
}

pub struct ContextMenu<'a> {
    pub coordinates: Coordinates,
    pub nav_height: u16,
    pub palette: &'a Palette,
    pub hits: &'a mut HitMap,
}

impl Component for ContextMenu<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let rect = menu_position(self.coordinates, area, menu_size(), self.nav_height);
        let palette = self.palette;

        let mut spans = Vec::new();
        let mut col = rect.x + 1;
        self.hits.push(rect, Hit::Inert);
        for item in MenuItem::ALL {
            let (label, key) = item_text(item);
            let width = item_width(item);
            self.hits
                .push(Rect::new(col, rect.y + 1, width, 1), Hit::Action(Action::Menu(item)));
            spans.push(Span::styled(label, palette.text()));
            spans.push(Span::styled(key, palette.dim()));
            col = col.saturating_add(width);
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
