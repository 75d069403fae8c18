//! # Search Overlay
//!
//! Full-screen search over the psalm.
//!
//! ```text
//!  ‹ Пошук
//!
//!   ⌕ За словом      ✦ Розумний пошук       mode toggle
//!  ╭──────────────────────────────────╮
//!  │ Пошук слова...                  │     SearchInput
//!  ╰──────────────────────────────────╯
//!  Псалом 1:3                        ›     results (scroll)
//!  ...
//! ```
//!
//! Keyword mode filters as you type. Smart mode sends the query to the
//! search provider on Enter; the answer lists the verses it found.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};
use tui_scrollview::ScrollViewState;

use crate::core::action::Action;
use crate::core::search::{SearchMode, match_segments};
use crate::core::state::{AiStatus, App};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::content::{Content, render_scrolled};
use crate::tui::components::search_input::{InputEvent, SearchInput};
use crate::tui::event::TuiEvent;
use crate::tui::hit::{Hit, HitMap};
use crate::tui::theme::Palette;

pub const NOTHING_FOUND: &str = "Нічого не знайдено";

/// What the overlay asks the application to do.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    Query(String),
    Submit,
    ToggleMode,
    Close,
}

#[derive(Default)]
pub struct SearchViewState {
    pub input: SearchInput,
    pub scroll: ScrollViewState,
}

impl EventHandler for SearchViewState {
    type Event = SearchEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::Esc => Some(SearchEvent::Close),
            TuiEvent::Tab | TuiEvent::BackTab => Some(SearchEvent::ToggleMode),
            TuiEvent::Up | TuiEvent::ScrollUp(..) => {
                self.scroll.scroll_up();
                None
            }
            TuiEvent::Down | TuiEvent::ScrollDown(..) => {
                self.scroll.scroll_down();
                None
            }
            TuiEvent::PageUp => {
                self.scroll.scroll_page_up();
                None
            }
            TuiEvent::PageDown => {
                self.scroll.scroll_page_down();
                None
            }
            other => match self.input.handle_event(other)? {
                InputEvent::Changed(query) => {
                    self.scroll.scroll_to_top();
                    Some(SearchEvent::Query(query))
                }
                InputEvent::Submit => Some(SearchEvent::Submit),
            },
        }
    }
}

/// Result list for the current mode and query.
pub fn build_results(app: &App, palette: &Palette, content: &mut Content) {
    match app.search.mode {
        SearchMode::Keyword => {
            let query = app.search.query.as_str();
            if !query.is_empty() && app.search.keyword_results.is_empty() {
                content.blank();
                content.text(NOTHING_FOUND, palette.dim());
                return;
            }
            let mark = Style::default()
                .fg(palette.fg)
                .bg(palette.match_bg)
                .add_modifier(Modifier::BOLD);
            for id in &app.search.keyword_results {
                let Some(verse) = app.psalm().verse(*id) else {
                    continue;
                };
                let spans = match_segments(&verse.text, query)
                    .into_iter()
                    .map(|(text, hit)| {
                        Span::styled(text, if hit { mark } else { palette.text() })
                    })
                    .collect();
                verse_card(app, palette, content, *id, spans);
            }
        }
        SearchMode::Ai => match &app.search.ai {
            AiStatus::Idle => {
                content.blank();
                content.text("Запитайте про ідеї", palette.heading());
                content.text(
                    "Спробуйте: «Де говориться про успіх?», «Що сказано про нечестивих?»",
                    palette.dim(),
                );
            }
            AiStatus::Loading => {
                content.blank();
                content.text("✦ Шукаю відповідь...", palette.link());
            }
            AiStatus::Answered(answer) => {
                content.text(
                    "✦ AI ВІДПОВІДЬ",
                    palette.link().add_modifier(Modifier::BOLD),
                );
                content.text(&answer.explanation, palette.text());
                content.blank();
                content.text("ЗНАЙДЕНІ ВІРШІ", palette.label());
                for id in &answer.verse_ids {
                    let Some(verse) = app.psalm().verse(*id) else {
                        continue;
                    };
                    let spans = vec![Span::styled(verse.text.clone(), palette.text())];
                    verse_card(app, palette, content, *id, spans);
                }
            }
        },
    }
}

fn verse_card(
    app: &App,
    palette: &Palette,
    content: &mut Content,
    id: u32,
    spans: Vec<Span<'static>>,
) {
    let start = content.row();
    content.spans(vec![
        Span::styled(app.psalm().verse_reference(id), palette.label()),
        Span::styled("  ›", palette.dim()),
    ]);
    content.spans(spans);
    content.link_rows(start, Hit::Action(Action::NavigateToVerse(id)));
    content.divider(Style::default().fg(palette.border));
}

pub struct SearchView<'a> {
    pub app: &'a App,
    pub state: &'a mut SearchViewState,
    pub palette: &'a Palette,
    pub hits: &'a mut HitMap,
}

impl Component for SearchView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let palette = *self.palette;
        let app = self.app;
        frame.render_widget(Clear, area);
        frame.render_widget(
            Block::default().style(Style::default().bg(palette.bg).fg(palette.fg)),
            area,
        );
        self.hits.push(area, Hit::Inert);
        if area.height < 7 || area.width < 10 {
            return;
        }

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" ‹ ", palette.heading()),
                Span::styled("Пошук", palette.heading()),
            ])),
            Rect::new(area.x, area.y, area.width, 1),
        );
        self.hits.push(
            Rect::new(area.x, area.y, 3, 1),
            Hit::Action(Action::CloseSearch),
        );

        let half = (area.width - 2) / 2;
        for (i, (mode, icon)) in [(SearchMode::Keyword, "⌕"), (SearchMode::Ai, "✦")]
            .into_iter()
            .enumerate()
        {
            let rect = Rect::new(area.x + 1 + half * i as u16, area.y + 2, half, 1);
            let style = if app.search.mode == mode {
                palette.selected().add_modifier(Modifier::BOLD)
            } else {
                palette.dim()
            };
            frame.render_widget(
                Paragraph::new(Span::raw(format!("{icon} {}", mode.label())))
                    .style(style)
                    .centered(),
                rect,
            );
            self.hits.push(rect, Hit::Action(Action::SetSearchMode(mode)));
        }

        let input_area = Rect::new(area.x + 1, area.y + 3, area.width - 2, 3);
        let input = &mut self.state.input;
        input.sync(&app.search.query);
        input.placeholder = app.search.mode.placeholder();
        input.palette = palette;
        input.render(frame, input_area);
        self.hits.push(input_area, Hit::SearchInput);
        if app.search.mode == SearchMode::Ai {
            let ready = !app.search.query.trim().is_empty() && app.search.ai != AiStatus::Loading;
            let style = if ready {
                palette.selected()
            } else {
                palette.dim()
            };
            let button = Rect::new(input_area.x + input_area.width - 5, input_area.y + 1, 3, 1);
            frame.render_widget(Paragraph::new(Span::styled(" → ", style)), button);
            if ready {
                self.hits.push(button, Hit::Action(Action::SubmitAiSearch));
            }
        }

        let results_area = Rect::new(
            area.x + 1,
            area.y + 7,
            area.width - 2,
            area.height.saturating_sub(7),
        );
        let mut content = Content::new(results_area.width.saturating_sub(1));
        build_results(app, &palette, &mut content);
        render_scrolled(
            frame,
            results_area,
            content,
            &mut self.state.scroll,
            self.hits,
            Style::default().bg(palette.bg).fg(palette.fg),
        );
    }
}
