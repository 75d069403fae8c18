//! Frame composition: chrome, the active tab and the overlays in z-order.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Margin, Position, Rect};
use ratatui::style::Style;
use ratatui::widgets::Block;

use crate::core::selection::Selection;
use crate::core::state::{App, NavTab, ViewMode};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::bottom_nav::NAV_HEIGHT;
use crate::tui::components::bottom_sheet::sheet_height;
use crate::tui::components::content::{Content, render_scrolled};
use crate::tui::components::{
    Alert, BottomNav, BottomSheet, ConcordancePane, ContextMenu, ExtendedOriginalPane,
    InductivePane, ReaderView, SearchView, SettingsPane, TopBar,
};
use crate::tui::hit::coordinates_of;
use crate::tui::theme::Palette;

/// Full-page views share one scroll state, reset whenever the page changes.
pub type PageKey = (NavTab, ViewMode);

/// Rows the sheet covers at the bottom of a `screen`.
pub fn sheet_area(screen: Rect, expanded: bool) -> Rect {
    let height = sheet_height(screen.height, expanded);
    Rect::new(
        screen.x,
        screen.y + screen.height - height,
        screen.width,
        height,
    )
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    let palette = Palette::for_theme(app.theme);
    let screen = frame.area();
    tui.hits.clear();
    tui.screen = screen;

    frame.render_widget(Block::default().style(palette.text().bg(palette.bg)), screen);

    use Constraint::{Length, Min};
    let [top_area, main_area, nav_area] =
        Layout::vertical([Length(1), Min(0), Length(NAV_HEIGHT)]).areas(screen);

    TopBar {
        chapter: &app.psalm().title,
        status_message: &app.status_message,
        palette: &palette,
        hits: &mut tui.hits,
    }
    .render(frame, top_area);

    let key: PageKey = (app.nav_tab, app.view.clone());
    match (&app.nav_tab, &app.view) {
        (NavTab::Bible, ViewMode::Reader) => {
            ReaderView {
                state: &mut tui.reader,
                hits: &mut tui.hits,
                psalm: app.psalm(),
                selection: &app.selection,
                highlights: &app.highlights,
                palette: &palette,
            }
            .render(frame, main_area);
        }
        (NavTab::Bible, ViewMode::ExtendedOriginal(verse_id)) => {
            draw_page(frame, main_area, tui, key, &palette, |content| {
                ExtendedOriginalPane {
                    library: &app.library,
                    verse_id: *verse_id,
                    palette: &palette,
                }
                .build(content)
            });
        }
        (NavTab::Bible, ViewMode::Concordance(word)) => {
            draw_page(frame, main_area, tui, key, &palette, |content| {
                ConcordancePane {
                    library: &app.library,
                    key: word,
                    palette: &palette,
                }
                .build(content)
            });
        }
        (NavTab::Study, _) => {
            draw_page(frame, main_area, tui, key, &palette, |content| {
                InductivePane {
                    library: &app.library,
                    palette: &palette,
                }
                .build(content)
            });
        }
        (NavTab::Settings, _) => {
            draw_page(frame, main_area, tui, key, &palette, |content| {
                SettingsPane {
                    theme: app.theme,
                    palette: &palette,
                }
                .build(content)
            });
        }
    }

    BottomNav {
        active: app.nav_tab,
        palette: &palette,
        hits: &mut tui.hits,
    }
    .render(frame, nav_area);

    if app.context_menu_visible()
        && let Some(anchor) = selection_area(tui, &app.selection)
    {
        ContextMenu {
            coordinates: coordinates_of(anchor),
            nav_height: NAV_HEIGHT,
            palette: &palette,
            hits: &mut tui.hits,
        }
        .render(frame, screen);
    }

    if app.sheet.open {
        let rect = sheet_area(screen, app.sheet.expanded);
        tui.sheet_area = rect;
        BottomSheet {
            app,
            state: &mut tui.sheet,
            palette: &palette,
            hits: &mut tui.hits,
        }
        .render(frame, rect);
    } else {
        tui.sheet_area = Rect::default();
    }

    if app.search.open {
        SearchView {
            app,
            state: &mut tui.search,
            palette: &palette,
            hits: &mut tui.hits,
        }
        .render(frame, screen);
    }

    if let Some(message) = &app.alert {
        Alert {
            message,
            palette: &palette,
            hits: &mut tui.hits,
        }
        .render(frame, screen);
    }
}

/// Where the selection is drawn right now, if on screen.
pub fn selection_area(tui: &TuiState, selection: &Selection) -> Option<Rect> {
    match selection {
        Selection::None => None,
        Selection::Word { id, .. } => tui.reader.token_area(*id),
        Selection::Verse { id, .. } => tui.reader.verse_area(*id),
    }
}

fn draw_page(
    frame: &mut Frame,
    area: Rect,
    tui: &mut TuiState,
    key: PageKey,
    palette: &Palette,
    build: impl FnOnce(&mut Content),
) {
    if tui.page_key.as_ref() != Some(&key) {
        tui.page_scroll.set_offset(Position { x: 0, y: 0 });
        tui.page_key = Some(key);
    }
    let inner = area.inner(Margin::new(1, 0));
    let mut content = Content::new(inner.width.saturating_sub(1));
    content.blank();
    build(&mut content);
    render_scrolled(
        frame,
        inner,
        content,
        &mut tui.page_scroll,
        &mut tui.hits,
        Style::default().bg(palette.bg).fg(palette.fg),
    );
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::core::action::{Action, update};
    use crate::core::text::TokenId;
    use crate::test_support::test_app;
    use crate::tui::hit::Hit;

    fn draw(app: &App, tui: &mut TuiState) -> String {
        draw_sized(app, tui, 60, 30)
    }

    fn draw_sized(app: &App, tui: &mut TuiState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn reader_with_chrome() {
        let app = test_app();
        let mut tui = TuiState::default();
        let text = draw(&app, &mut tui);
        assert!(text.contains("Grom"));
        assert!(text.contains("Блаженний"));
        assert!(text.contains("Налаштування"));
        assert_eq!(tui.screen, Rect::new(0, 0, 60, 30));
        assert!(tui.hits.area_of(&Hit::Token(TokenId::new(1, 0))).is_some());
    }

    #[test]
    fn menu_follows_a_visible_selection() {
        let mut app = test_app();
        let mut tui = TuiState::default();
        draw(&app, &mut tui);

        let id = TokenId::new(1, 0);
        let area = tui.reader.token_area(id).expect("first word on screen");
        update(&mut app, Action::SelectWord(id, Some(coordinates_of(area))));
        let text = draw(&app, &mut tui);
        assert!(text.contains("Дослідити"));
    }

    #[test]
    fn sheet_covers_the_lower_half() {
        let mut app = test_app();
        let mut tui = TuiState::default();
        update(&mut app, Action::SelectVerse(1, None));
        update(&mut app, Action::OpenStudy);
        draw(&app, &mut tui);
        assert_eq!(tui.sheet_area, sheet_area(Rect::new(0, 0, 60, 30), false));
        assert_eq!(tui.sheet_area.y, 15);
        // The sheet swallows clicks on the reader beneath it
        assert_eq!(tui.hits.at(0, 25).map(|(_, h)| h.clone()), Some(Hit::Inert));
    }

    #[test]
    fn pages_reset_their_scroll_when_switching() {
        let mut app = test_app();
        let mut tui = TuiState::default();
        update(&mut app, Action::ChangeNavTab(NavTab::Study));
        draw_sized(&app, &mut tui, 40, 12);
        tui.page_scroll.set_offset(Position { x: 0, y: 3 });
        draw_sized(&app, &mut tui, 40, 12);
        assert_eq!(tui.page_scroll.offset().y, 3);

        update(&mut app, Action::ChangeNavTab(NavTab::Settings));
        let text = draw_sized(&app, &mut tui, 40, 12);
        assert_eq!(tui.page_scroll.offset().y, 0);
        assert!(text.contains("ВИГЛЯД"));
    }

    #[test]
    fn alert_sits_on_top() {
        let mut app = test_app();
        app.alert = Some("Помилка AI пошуку: тест".to_string());
        let mut tui = TuiState::default();
        let text = draw(&app, &mut tui);
        assert!(text.contains("Помилка AI пошуку"));
        assert_eq!(
            tui.hits.at(30, 1).map(|(_, h)| h.clone()),
            Some(Hit::Action(Action::DismissAlert))
        );
    }
}
