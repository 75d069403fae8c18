//! Bottom navigation between the Біблія, Нотатки and Налаштування tabs.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::core::action::Action;
use crate::core::state::NavTab;
use crate::tui::component::Component;
use crate::tui::hit::{Hit, HitMap};
use crate::tui::theme::Palette;

/// Rows taken by the bar: a top border and the labels.
pub const NAV_HEIGHT: u16 = 2;

fn icon(tab: NavTab) -> &'static str {
    match tab {
        NavTab::Bible => "▤",
        NavTab::Study => "✎",
        NavTab::Settings => "⚙",
    }
}

pub struct BottomNav<'a> {
    pub active: NavTab,
    pub palette: &'a Palette,
    pub hits: &'a mut HitMap,
}

impl Component for BottomNav<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let palette = self.palette;
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(palette.border))
            .style(Style::default().bg(palette.bg));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let cells = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(inner);
        for (tab, cell) in NavTab::ALL.into_iter().zip(cells.iter()) {
            let style = if tab == self.active {
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                palette.dim()
            };
            let label = Line::from(vec![
                Span::raw(format!("{} ", icon(tab))),
                Span::raw(tab.label()),
            ])
            .style(style);
            frame.render_widget(Paragraph::new(label).centered(), *cell);
            self.hits.push(*cell, Hit::Action(Action::ChangeNavTab(tab)));
        }
    }
}
