//! # Reader
//!
//! The psalm text with a verse-number gutter. Tokens are laid out by hand
//! rather than through `Paragraph` wrapping because every interactive token
//! needs a known cell rectangle for clicks and for the context menu anchor.
//!
//! ```text
//!            Книга Перша
//!             Псалом 1
//!
//! ▎ 1  Блаженний муж, який не ходить на
//! ▎    раду нечестивих, ...
//!
//!   2  але в Законі Господнім ...
//! ```
//!
//! Rows are canvas rows; the scroll view maps them to the screen.

use std::collections::HashSet;

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};
use unicode_width::UnicodeWidthStr;

use crate::core::action::Action;
use crate::core::selection::{HighlightKey, Selection};
use crate::core::text::{Psalm, TokenId};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::hit::{Hit, HitMap};
use crate::tui::theme::Palette;

/// Columns reserved for the selection marker and verse number.
pub const GUTTER: u16 = 5;
const HEADER_ROWS: u16 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedToken {
    pub id: TokenId,
    pub text: String,
    pub row: u16,
    pub col: u16,
    pub width: u16,
    pub interactive: bool,
}

impl PlacedToken {
    pub fn area(&self) -> Rect {
        Rect::new(self.col, self.row, self.width, 1)
    }
}

/// Rows `top..bottom` occupied by one verse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerseRows {
    pub id: u32,
    pub top: u16,
    pub bottom: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderLayout {
    pub width: u16,
    pub height: u16,
    pub tokens: Vec<PlacedToken>,
    pub verses: Vec<VerseRows>,
}

fn width_of(text: &str) -> u16 {
    u16::try_from(text.width()).unwrap_or(u16::MAX)
}

impl ReaderLayout {
    /// Greedy word wrap of every verse into `width` columns.
    pub fn build(psalm: &Psalm, width: u16) -> Self {
        let width = width.max(GUTTER + 1);
        let mut tokens = Vec::new();
        let mut verses = Vec::new();
        let mut row = HEADER_ROWS;

        for verse in &psalm.verses {
            let top = row;
            let mut col = GUTTER;
            for (index, token) in verse.tokens.iter().enumerate() {
                let mut text = token.text.as_str();
                if col > GUTTER && col.saturating_add(width_of(text.trim_end())) > width {
                    row += 1;
                    col = GUTTER;
                }
                if col == GUTTER {
                    text = text.trim_start();
                }
                if text.is_empty() {
                    continue;
                }
                let w = width_of(text);
                tokens.push(PlacedToken {
                    id: TokenId::new(verse.id, index),
                    text: text.to_string(),
                    row,
                    col,
                    width: w,
                    interactive: token.is_interactive(),
                });
                col = col.saturating_add(w);
            }
            verses.push(VerseRows {
                id: verse.id,
                top,
                bottom: row + 1,
            });
            // One blank row between verses
            row += 2;
        }

        Self {
            width,
            height: row,
            tokens,
            verses,
        }
    }

    pub fn token(&self, id: TokenId) -> Option<&PlacedToken> {
        self.tokens.iter().find(|t| t.id == id)
    }

    pub fn verse(&self, id: u32) -> Option<VerseRows> {
        self.verses.iter().find(|v| v.id == id).copied()
    }

    /// Canvas rows `top..bottom` covered by the selection.
    pub fn selection_rows(&self, selection: &Selection) -> Option<(u16, u16)> {
        match selection {
            Selection::None => None,
            Selection::Word { id, .. } => self.token(*id).map(|t| (t.row, t.row + 1)),
            Selection::Verse { id, .. } => self.verse(*id).map(|v| (v.top, v.bottom)),
        }
    }

    fn lines(&self, view: &ReaderView<'_>) -> Vec<Line<'static>> {
        let palette = view.palette;
        let mut rows: Vec<Vec<Span<'static>>> = vec![Vec::new(); usize::from(self.height)];
        let mut cursor: Vec<u16> = vec![0; usize::from(self.height)];

        let mut centered = |row: usize, text: &str, style: Style| {
            let pad = self.width.saturating_sub(width_of(text)) / 2;
            rows[row].push(Span::raw(" ".repeat(usize::from(pad))));
            rows[row].push(Span::styled(text.to_string(), style));
        };
        centered(0, &view.psalm.book_heading, palette.label());
        centered(1, &view.psalm.title, palette.heading());

        let selected_verse = (!view.selection.is_none()).then(|| view.selection.verse_id());
        for verse in &self.verses {
            let marker = if selected_verse == Some(verse.id) {
                Span::styled("▎", Style::default().fg(palette.accent))
            } else {
                Span::raw(" ")
            };
            for row in verse.top..verse.bottom {
                let r = usize::from(row);
                rows[r].push(marker.clone());
                let number = if row == verse.top {
                    format!("{:>2}  ", verse.id)
                } else {
                    "    ".to_string()
                };
                rows[r].push(Span::styled(
                    number,
                    palette.dim().add_modifier(Modifier::BOLD),
                ));
                cursor[r] = GUTTER;
            }
        }

        for token in &self.tokens {
            let r = usize::from(token.row);
            if cursor[r] < token.col {
                rows[r].push(Span::raw(" ".repeat(usize::from(token.col - cursor[r]))));
            }
            rows[r].push(Span::styled(token.text.clone(), view.token_style(token)));
            cursor[r] = token.col + token.width;
        }

        rows.into_iter().map(Line::from).collect()
    }
}

/// Scroll offset that puts rows `top..bottom` at the bottom of a band of
/// `band` visible rows, one row of margin below. Elements taller than the
/// band are aligned to its top instead.
pub fn scroll_target(top: u16, bottom: u16, band: u16) -> u16 {
    if bottom.saturating_sub(top) < band {
        (bottom + 1).saturating_sub(band)
    } else {
        top.saturating_sub(1)
    }
}

/// Scroll and layout state, persisted in `TuiState`.
#[derive(Default)]
pub struct ReaderState {
    pub scroll: ScrollViewState,
    layout: Option<ReaderLayout>,
    /// Screen area used by the last frame
    pub viewport: Rect,
}

impl ReaderState {
    pub fn layout(&self) -> Option<&ReaderLayout> {
        self.layout.as_ref()
    }

    fn ensure_layout(&mut self, psalm: &Psalm, width: u16) -> &ReaderLayout {
        if self.layout.as_ref().is_some_and(|l| l.width != width) {
            self.layout = None;
        }
        self.layout.get_or_insert_with(|| ReaderLayout::build(psalm, width))
    }

    /// Screen rectangle of a token as drawn in the last frame, if visible.
    pub fn token_area(&self, id: TokenId) -> Option<Rect> {
        let token = self.layout.as_ref()?.token(id)?;
        let offset = self.scroll.offset().y;
        if token.row < offset || token.row >= offset + self.viewport.height {
            return None;
        }
        Some(Rect::new(
            self.viewport.x + token.col,
            self.viewport.y + token.row - offset,
            token.width,
            1,
        ))
    }

    /// Visible part of a verse's rows in the last frame.
    pub fn verse_area(&self, id: u32) -> Option<Rect> {
        let verse = self.layout.as_ref()?.verse(id)?;
        let offset = self.scroll.offset().y;
        let top = verse.top.max(offset);
        let end = verse.bottom.min(offset + self.viewport.height);
        if top >= end {
            return None;
        }
        Some(Rect::new(
            self.viewport.x,
            self.viewport.y + top - offset,
            self.viewport.width.saturating_sub(1),
            end - top,
        ))
    }

    /// Scroll the least amount that brings a token into view.
    pub fn reveal(&mut self, id: TokenId) {
        let Some(row) = self.layout.as_ref().and_then(|l| l.token(id)).map(|t| t.row) else {
            return;
        };
        let offset = self.scroll.offset().y;
        let height = self.viewport.height.max(1);
        let y = if row < offset {
            row
        } else if row >= offset + height {
            row + 1 - height
        } else {
            return;
        };
        self.scroll.set_offset(Position { x: 0, y });
    }

    /// Scroll so the selection sits just above a band edge `band` rows below
    /// the top of the reader.
    pub fn scroll_to_selection(&mut self, selection: &Selection, band: u16) {
        let Some((top, bottom)) = self
            .layout
            .as_ref()
            .and_then(|l| l.selection_rows(selection))
        else {
            return;
        };
        let y = scroll_target(top, bottom, band);
        self.scroll.set_offset(Position { x: 0, y });
    }
}

impl EventHandler for ReaderState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::Up | TuiEvent::ScrollUp(..) => self.scroll.scroll_up(),
            TuiEvent::Down | TuiEvent::ScrollDown(..) => self.scroll.scroll_down(),
            TuiEvent::PageUp => self.scroll.scroll_page_up(),
            TuiEvent::PageDown => self.scroll.scroll_page_down(),
            TuiEvent::Home => self.scroll.scroll_to_top(),
            _ => {}
        }
        None
    }
}

/// Reader component, created each frame from props.
pub struct ReaderView<'a> {
    pub state: &'a mut ReaderState,
    pub hits: &'a mut HitMap,
    pub psalm: &'a Psalm,
    pub selection: &'a Selection,
    pub highlights: &'a HashSet<HighlightKey>,
    pub palette: &'a Palette,
}

impl ReaderView<'_> {
    fn token_style(&self, token: &PlacedToken) -> Style {
        let palette = self.palette;
        let mut style = palette.text();
        match self.selection {
            Selection::Word { id, .. } if *id == token.id => return palette.selected(),
            Selection::Verse { id, .. } if *id == token.id.verse => {
                style = style.bg(palette.verse_selected);
            }
            _ => {}
        }
        if self.highlights.contains(&HighlightKey::Verse(token.id.verse)) {
            style = style.bg(palette.verse_highlight);
        }
        if token.interactive && self.highlights.contains(&HighlightKey::Token(token.id)) {
            style = style.bg(palette.word_highlight);
        }
        style
    }
}

impl Component for ReaderView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1);
        let layout = self.state.ensure_layout(self.psalm, content_width).clone();
        self.state.viewport = area;

        // Half a screen of padding so the last verses can rise above the sheet
        let canvas_height = layout.height + area.height / 2;
        let max_y = canvas_height.saturating_sub(area.height);
        if self.state.scroll.offset().y > max_y {
            self.state.scroll.set_offset(Position { x: 0, y: max_y });
        }
        let offset_y = self.state.scroll.offset().y;

        let mut scroll_view = ScrollView::new(Size::new(content_width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        scroll_view.render_widget(
            Paragraph::new(layout.lines(self)).style(self.palette.text()),
            Rect::new(0, 0, layout.width, layout.height),
        );
        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll);

        // Background clears, verses select, tokens sit on top
        self.hits.push(area, Hit::Action(Action::ClearSelection));
        for verse in &layout.verses {
            self.hits.push_scrolled(
                area,
                offset_y,
                Rect::new(0, verse.top, layout.width, verse.bottom - verse.top),
                Hit::Verse(verse.id),
            );
        }
        for token in layout.tokens.iter().filter(|t| t.interactive) {
            self.hits
                .push_scrolled(area, offset_y, token.area(), Hit::Token(token.id));
        }
    }
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::core::preferences::Theme;
    use crate::test_support::test_library;

    #[test]
    fn layout_wraps_inside_the_width() {
        let library = test_library();
        let layout = ReaderLayout::build(&library.psalm, 30);
        assert!(
            layout
                .tokens
                .iter()
                .all(|t| t.col >= GUTTER && t.col + t.text.trim_end().width() as u16 <= 30)
        );
        // The first verse needs several rows at this width
        let first = layout.verse(1).expect("verse 1 placed");
        assert_eq!(first.top, HEADER_ROWS);
        assert!(first.bottom - first.top > 1);
    }

    #[test]
    fn verses_are_separated_by_a_blank_row() {
        let library = test_library();
        let layout = ReaderLayout::build(&library.psalm, 40);
        for pair in layout.verses.windows(2) {
            assert_eq!(pair[1].top, pair[0].bottom + 1);
        }
    }

    #[test]
    fn first_token_opens_the_verse() {
        let library = test_library();
        let layout = ReaderLayout::build(&library.psalm, 40);
        let first = layout.token(TokenId::new(1, 0)).expect("placed");
        assert_eq!((first.row, first.col), (HEADER_ROWS, GUTTER));
        assert_eq!(first.text, "Блаженний");
        assert!(first.interactive);
    }

    #[test]
    fn wrapped_lines_do_not_start_with_spaces() {
        let library = test_library();
        let layout = ReaderLayout::build(&library.psalm, 24);
        for token in layout.tokens.iter().filter(|t| t.col == GUTTER) {
            assert!(!token.text.starts_with(' '), "{:?}", token);
        }
    }

    #[test]
    fn scroll_target_aligns_bottom_or_top() {
        // Short element: bottom edge one row above the band end
        assert_eq!(scroll_target(20, 21, 8), 14);
        // Near the top of the text nothing scrolls
        assert_eq!(scroll_target(3, 4, 10), 0);
        // Taller than the band: align its top
        assert_eq!(scroll_target(20, 30, 6), 19);
    }

    #[test]
    fn render_registers_clickable_tokens() {
        let library = test_library();
        let palette = Palette::for_theme(Theme::Dark);
        let mut state = ReaderState::default();
        let mut hits = HitMap::default();
        let highlights = HashSet::new();
        let selection = Selection::None;

        let backend = TestBackend::new(40, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                ReaderView {
                    state: &mut state,
                    hits: &mut hits,
                    psalm: &library.psalm,
                    selection: &selection,
                    highlights: &highlights,
                    palette: &palette,
                }
                .render(f, f.area());
            })
            .unwrap();

        let (area, hit) = hits.at(GUTTER, HEADER_ROWS).expect("first word clickable");
        assert_eq!(hit, &Hit::Token(TokenId::new(1, 0)));
        assert_eq!(area.width, "Блаженний".width() as u16);

        // The gutter selects the whole verse
        assert_eq!(hits.at(1, HEADER_ROWS).map(|(_, h)| h.clone()), Some(Hit::Verse(1)));

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Псалом 1"));
        assert!(text.contains("Блаженний"));
    }

    #[test]
    fn token_area_follows_scroll() {
        let library = test_library();
        let mut state = ReaderState::default();
        state.ensure_layout(&library.psalm, 39);
        state.viewport = Rect::new(0, 1, 40, 10);

        let id = TokenId::new(1, 0);
        assert_eq!(state.token_area(id), Some(Rect::new(GUTTER, 1 + HEADER_ROWS, 9, 1)));

        state.scroll.set_offset(Position { x: 0, y: 2 });
        assert_eq!(state.token_area(id), Some(Rect::new(GUTTER, 1 + HEADER_ROWS - 2, 9, 1)));

        state.scroll.set_offset(Position { x: 0, y: 5 });
        assert_eq!(state.token_area(id), None);
    }
}
