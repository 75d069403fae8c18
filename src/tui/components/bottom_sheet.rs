//! # Bottom Sheet
//!
//! The study panel that slides over the bottom of the screen.
//!
//! ```text
//! ───────────────━━━━━━───────────────   handle (drag / click)
//!  Псалом 1:1                     ‹  ›    title + prev/next
//!         Вірш          Слово             tabs
//!  ─────────────────────────────────────
//!  content (scrolls)
//!
//!        ╭ Відмітити  Нотатка  Поділитись ╮   floating action bar
//! ```
//!
//! Half the screen tall, or nearly all of it when expanded. What is shown
//! comes from core state; the section pill, open commentary, expanded
//! word details and scroll offset are presentation state kept here.

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use tui_scrollview::ScrollViewState;
use unicode_width::UnicodeWidthStr;

use crate::core::action::{Action, Direction};
use crate::core::sheet::SheetTab;
use crate::core::state::App;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::action_bar::{ActionBar, BAR_HEIGHT};
use crate::tui::components::content::{Content, render_scrolled};
use crate::tui::components::verse_study::{VerseSection, VerseStudyPane};
use crate::tui::components::word_study::WordStudyPane;
use crate::tui::event::TuiEvent;
use crate::tui::hit::{Hit, HitMap};
use crate::tui::theme::Palette;

/// Rows above the content: handle, title, tabs, divider.
const HEADER_ROWS: u16 = 4;
const MIN_HEIGHT: u16 = HEADER_ROWS + BAR_HEIGHT + 2;

/// Sheet height on a screen `total` rows tall. Never shorter than the header
/// plus the action bar, never taller than the screen.
pub fn sheet_height(total: u16, expanded: bool) -> u16 {
    let height = if expanded {
        (u32::from(total) * 92 / 100) as u16
    } else {
        total / 2
    };
    height.max(MIN_HEIGHT).min(total)
}

/// What the sheet is showing; the content scrolls back to the top when it changes.
type Shown = (SheetTab, String, VerseSection, Option<usize>);

#[derive(Default)]
pub struct SheetViewState {
    pub scroll: ScrollViewState,
    pub section: VerseSection,
    pub commentary: Option<usize>,
    pub details_expanded: bool,
    shown: Option<Shown>,
}

impl SheetViewState {
    pub fn select_section(&mut self, section: VerseSection) {
        self.section = section;
    }

    pub fn show_commentary(&mut self, index: Option<usize>) {
        self.commentary = index;
    }

    pub fn toggle_details(&mut self) {
        self.details_expanded = !self.details_expanded;
    }

    fn sync(&mut self, shown: Shown) {
        if self.shown.as_ref() == Some(&shown) {
            return;
        }
        let word_changed = self
            .shown
            .as_ref()
            .is_none_or(|(tab, title, ..)| *tab != shown.0 || *title != shown.1);
        if word_changed {
            self.details_expanded = false;
        }
        self.scroll.set_offset(Position { x: 0, y: 0 });
        self.shown = Some(shown);
    }
}

impl EventHandler for SheetViewState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::Up | TuiEvent::ScrollUp(..) => self.scroll.scroll_up(),
            TuiEvent::Down | TuiEvent::ScrollDown(..) => self.scroll.scroll_down(),
            TuiEvent::PageUp => self.scroll.scroll_page_up(),
            TuiEvent::PageDown => self.scroll.scroll_page_down(),
            TuiEvent::Home => self.scroll.scroll_to_top(),
            TuiEvent::Char(c @ '1'..='4') => {
                let index = usize::from(*c as u8 - b'1');
                self.section = VerseSection::ALL[index];
            }
            _ => {}
        }
        None
    }
}

pub struct BottomSheet<'a> {
    pub app: &'a App,
    pub state: &'a mut SheetViewState,
    pub palette: &'a Palette,
    pub hits: &'a mut HitMap,
}

impl BottomSheet<'_> {
    fn render_header(&mut self, frame: &mut Frame, area: Rect) {
        let palette = *self.palette;
        let sheet = &self.app.sheet;

        // Handle
        let handle = "━━━━━━";
        let handle_x = area.x + area.width.saturating_sub(handle.width() as u16) / 2;
        frame.render_widget(
            Paragraph::new(Span::styled(handle, palette.dim())),
            Rect::new(handle_x, area.y, (handle.width() as u16).min(area.width), 1),
        );
        self.hits
            .push(Rect::new(area.x, area.y, area.width, 1), Hit::SheetHandle);

        // Title with prev/next arrows
        let title_row = Rect::new(area.x + 1, area.y + 1, area.width.saturating_sub(2), 1);
        let (can_prev, can_next) = self.app.can_navigate();
        let arrow = |enabled: bool| {
            if enabled {
                palette.heading()
            } else {
                Style::default().fg(palette.border)
            }
        };
        let arrows_x = (title_row.x + title_row.width).saturating_sub(5);
        frame.render_widget(
            Paragraph::new(Span::styled(sheet.title.clone(), palette.heading())),
            Rect::new(
                title_row.x,
                title_row.y,
                arrows_x.saturating_sub(title_row.x + 1),
                1,
            ),
        );
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" ‹ ", arrow(can_prev)),
                Span::raw(" "),
                Span::styled("›", arrow(can_next)),
            ])),
            Rect::new(arrows_x, title_row.y, 5.min(title_row.width), 1),
        );
        if can_prev {
            self.hits.push(
                Rect::new(arrows_x, title_row.y, 3, 1),
                Hit::Action(Action::Navigate(Direction::Prev)),
            );
        }
        if can_next {
            self.hits.push(
                Rect::new(arrows_x + 3, title_row.y, 2, 1),
                Hit::Action(Action::Navigate(Direction::Next)),
            );
        }

        // Tabs
        let half = area.width / 2;
        for (i, tab) in [SheetTab::Verse, SheetTab::Word].into_iter().enumerate() {
            let rect = Rect::new(area.x + half * i as u16, area.y + 2, half, 1);
            let style = if sheet.tab == tab {
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                palette.dim()
            };
            frame.render_widget(
                Paragraph::new(Span::styled(tab.label(), style)).centered(),
                rect,
            );
            self.hits.push(rect, Hit::Action(Action::ChangeSheetTab(tab)));
        }

        frame.render_widget(
            Paragraph::new(Span::styled(
                "─".repeat(usize::from(area.width.saturating_sub(2))),
                Style::default().fg(palette.border),
            )),
            Rect::new(area.x + 1, area.y + 3, area.width.saturating_sub(2), 1),
        );
    }
}

impl Component for BottomSheet<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let palette = *self.palette;
        let app = self.app;
        frame.render_widget(Clear, area);
        frame.render_widget(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(palette.border))
                .style(Style::default().bg(palette.surface).fg(palette.fg)),
            area,
        );
        self.hits.push(area, Hit::Inert);
        if area.height < HEADER_ROWS + 1 {
            return;
        }
        self.render_header(frame, area);

        let content_area = Rect::new(
            area.x + 1,
            area.y + HEADER_ROWS,
            area.width.saturating_sub(2),
            area.height.saturating_sub(HEADER_ROWS + BAR_HEIGHT),
        );

        self.state.sync((
            app.sheet.tab,
            app.sheet.title.clone(),
            self.state.section,
            self.state.commentary,
        ));

        let mut content = Content::new(content_area.width.saturating_sub(1));
        match app.sheet.tab {
            SheetTab::Verse => VerseStudyPane {
                library: &app.library,
                verse_id: app.selection.verse_id(),
                section: self.state.section,
                commentary: self.state.commentary,
                palette: &palette,
            }
            .build(&mut content),
            SheetTab::Word => WordStudyPane {
                library: &app.library,
                key: app.sheet.word_key.as_deref(),
                details_expanded: self.state.details_expanded,
                palette: &palette,
            }
            .build(&mut content),
        }
        render_scrolled(
            frame,
            content_area,
            content,
            &mut self.state.scroll,
            self.hits,
            Style::default().bg(palette.surface).fg(palette.fg),
        );

        let highlighted = app
            .selection
            .highlight_key()
            .is_some_and(|key| app.is_highlighted(key));
        ActionBar {
            highlighted,
            palette: &palette,
            hits: self.hits,
        }
        .render(frame, area);
    }
}
