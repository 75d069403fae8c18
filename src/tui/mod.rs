//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates mouse and keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Routing
//!
//! Every frame rebuilds a `HitMap` of clickable regions. A click resolves to
//! the topmost region under the cursor: most regions carry an `Action` for
//! `core::update`, the rest change presentation state only (sheet section,
//! open commentary, handle drag). Keys go to the topmost layer: alert,
//! search overlay, sheet, then the reader or the current page.
//!
//! ## Redraw Strategy
//!
//! Nothing animates, so the loop sleeps up to 500ms between polls and only
//! redraws after events, background results or the delayed scroll that
//! follows opening the sheet.

mod component;
mod components;
mod event;
mod hit;
mod markdown;
mod theme;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::clipboard::CopyToClipboard;
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use ratatui::layout::Rect;
use tui_scrollview::ScrollViewState;

use crate::core::action::{Action, Direction, Effect, MenuItem, SearchJob, update};
use crate::core::preferences::{Preferences, save_preferences};
use crate::core::search::SearchMode;
use crate::core::sheet::SheetTab;
use crate::core::state::{App, NavTab, ViewMode};
use crate::core::text::TokenId;
use crate::inference::SearchProvider;
use crate::tui::component::EventHandler;
use crate::tui::components::{ReaderState, SearchEvent, SearchViewState, SheetViewState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::hit::{Hit, HitMap, coordinates_of};
use crate::tui::ui::PageKey;

/// Pause between opening the sheet and scrolling the selection above it.
const SCROLL_DELAY: Duration = Duration::from_millis(150);
const IDLE_POLL: Duration = Duration::from_millis(500);

/// TUI-specific presentation state (not part of core business logic)
#[derive(Default)]
pub struct TuiState {
    // Persistent component states
    pub reader: ReaderState,
    pub sheet: SheetViewState,
    pub search: SearchViewState,
    /// Scroll of the full-page views (concordance, original, study, settings)
    pub page_scroll: ScrollViewState,
    pub page_key: Option<PageKey>,
    // Click regions of the last frame
    pub hits: HitMap,
    /// Row where a drag on the sheet handle started
    drag_start: Option<u16>,
    /// When the delayed scroll to the selection is due
    pending_scroll: Option<Instant>,
    pub sheet_area: Rect,
    pub screen: Rect,
}

impl TuiState {
    /// Run the delayed scroll once its deadline passed. Returns true if it ran.
    fn settle_scroll(&mut self, app: &App, now: Instant) -> bool {
        match self.pending_scroll {
            Some(deadline) if now >= deadline => {}
            _ => return false,
        }
        self.pending_scroll = None;
        if !app.sheet.open {
            return false;
        }
        let sheet_top = ui::sheet_area(self.screen, app.sheet.expanded).y;
        let band = sheet_top.saturating_sub(self.reader.viewport.y);
        self.reader.scroll_to_selection(&app.selection, band);
        true
    }

    fn poll_timeout(&self, now: Instant) -> Duration {
        match self.pending_scroll {
            Some(deadline) => deadline.saturating_duration_since(now).min(IDLE_POLL),
            None => IDLE_POLL,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)?;
        info!("Terminal modes enabled (mouse, bracketed paste)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste);
    }
}

pub fn run(mut app: App) -> std::io::Result<()> {
    let mut tui = TuiState::default();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = match TerminalModeGuard::new() {
        Ok(guard) => Some(guard),
        Err(e) => {
            warn!("Mouse capture unavailable: {}", e);
            None
        }
    };

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let mut needs_redraw = true; // Force first frame

    'main: loop {
        if tui.settle_scroll(&app, Instant::now()) {
            needs_redraw = true;
        }

        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        let first_event = poll_event_timeout(tui.poll_timeout(Instant::now()));
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let Some(action) = dispatch(&app, &mut tui, &event) else {
                continue;
            };
            let effect = update(&mut app, action);
            if handle_effect(effect, &app, &mut tui, &tx) {
                break 'main;
            }
        }

        // Handle background task actions (search answers)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut app, action);
            if handle_effect(effect, &app, &mut tui, &tx) {
                break 'main;
            }
        }
    }

    ratatui::restore();
    Ok(())
}

/// Carry out an effect. Returns true when the app should quit.
fn handle_effect(effect: Effect, app: &App, tui: &mut TuiState, tx: &mpsc::Sender<Action>) -> bool {
    match effect {
        Effect::None => {}
        Effect::Quit => return true,
        Effect::ScrollToSelection => {
            tui.pending_scroll = Some(Instant::now() + SCROLL_DELAY);
        }
        Effect::SpawnSearch(job) => match &app.provider {
            Some(provider) => spawn_search(provider.clone(), job, tx.clone()),
            None => warn!("Search {} requested without a provider", job.request_id),
        },
        Effect::SavePreferences => {
            if let Err(e) = save_preferences(&Preferences { theme: app.theme }) {
                warn!("Failed to save preferences: {}", e);
            }
        }
        Effect::CopyToClipboard(text) => {
            if let Err(e) = execute!(stdout(), CopyToClipboard::to_clipboard_from(text)) {
                warn!("Clipboard write failed: {}", e);
            }
        }
    }
    false
}

fn spawn_search(provider: Arc<dyn SearchProvider>, job: SearchJob, tx: mpsc::Sender<Action>) {
    let SearchJob {
        request_id,
        request,
    } = job;
    info!(
        "Spawning AI search {} via {} ({} chars)",
        request_id,
        provider.name(),
        request.query.len()
    );
    tokio::spawn(async move {
        let action = match provider.search(&request).await {
            Ok(answer) => {
                debug!("Search {} found {} verses", request_id, answer.verse_ids.len());
                Action::AiSearchAnswered { request_id, answer }
            }
            Err(e) => {
                warn!("Search {} failed: {}", request_id, e);
                Action::AiSearchFailed {
                    request_id,
                    message: e.to_string(),
                }
            }
        };
        if tx.send(action).is_err() {
            warn!(
                "Failed to send search result {}: receiver dropped",
                request_id
            );
        }
    });
}

/// Translate a terminal event into an action, updating presentation state
/// on the way. Events that only scroll or switch a section return `None`.
fn dispatch(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    if matches!(event, TuiEvent::ForceQuit) {
        return Some(Action::Quit);
    }
    // The alert is modal
    if app.alert.is_some() {
        return match event {
            TuiEvent::Click(..) | TuiEvent::Enter | TuiEvent::Esc => Some(Action::DismissAlert),
            _ => None,
        };
    }

    match event {
        TuiEvent::Click(column, row) => click(tui, *column, *row),
        TuiEvent::RightClick(column, row) => match tui.hits.at(*column, *row) {
            Some((area, Hit::Token(id))) => {
                Some(Action::LongPressWord(*id, Some(coordinates_of(area))))
            }
            _ => None,
        },
        TuiEvent::Drag(..) | TuiEvent::Resize => None,
        TuiEvent::Release(_, row) => {
            let start = tui.drag_start.take()?;
            Some(Action::SheetDragReleased(
                i32::from(*row) - i32::from(start),
            ))
        }
        TuiEvent::ScrollUp(_, row) | TuiEvent::ScrollDown(_, row) => {
            scroll(app, tui, event, *row);
            None
        }
        _ if app.search.open => search_key(app, tui, event),
        _ if app.sheet.open => sheet_key(app, tui, event),
        _ => key(app, tui, event),
    }
}

fn click(tui: &mut TuiState, column: u16, row: u16) -> Option<Action> {
    let (area, hit) = tui
        .hits
        .at(column, row)
        .map(|(area, hit)| (area, hit.clone()))?;
    match hit {
        Hit::Action(action) => Some(action),
        Hit::Token(id) => Some(Action::SelectWord(id, Some(coordinates_of(area)))),
        Hit::Verse(id) => Some(Action::SelectVerse(
            id,
            tui.reader.verse_area(id).map(coordinates_of),
        )),
        Hit::SheetHandle => {
            tui.drag_start = Some(row);
            None
        }
        Hit::Section(section) => {
            tui.sheet.select_section(section);
            None
        }
        Hit::Commentary(index) => {
            tui.sheet.show_commentary(index);
            None
        }
        Hit::ToggleWordDetails => {
            tui.sheet.toggle_details();
            None
        }
        Hit::SearchInput | Hit::Inert => None,
    }
}

/// Wheel events scroll whatever sits under the pointer.
fn scroll(app: &App, tui: &mut TuiState, event: &TuiEvent, row: u16) {
    if app.search.open {
        tui.search.handle_event(event);
    } else if app.sheet.open && row >= tui.sheet_area.y {
        tui.sheet.handle_event(event);
    } else if on_reader(app) {
        tui.reader.handle_event(event);
    } else {
        scroll_page(tui, event);
    }
}

fn on_reader(app: &App) -> bool {
    app.nav_tab == NavTab::Bible && app.view == ViewMode::Reader
}

fn scroll_page(tui: &mut TuiState, event: &TuiEvent) {
    let scroll = &mut tui.page_scroll;
    match event {
        TuiEvent::Up | TuiEvent::ScrollUp(..) => scroll.scroll_up(),
        TuiEvent::Down | TuiEvent::ScrollDown(..) => scroll.scroll_down(),
        TuiEvent::PageUp => scroll.scroll_page_up(),
        TuiEvent::PageDown => scroll.scroll_page_down(),
        TuiEvent::Home => scroll.scroll_to_top(),
        _ => {}
    }
}

fn search_key(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    match tui.search.handle_event(event)? {
        SearchEvent::Query(query) => Some(Action::SetSearchQuery(query)),
        SearchEvent::Submit => {
            (app.search.mode == SearchMode::Ai).then_some(Action::SubmitAiSearch)
        }
        SearchEvent::ToggleMode => Some(Action::SetSearchMode(match app.search.mode {
            SearchMode::Keyword => SearchMode::Ai,
            SearchMode::Ai => SearchMode::Keyword,
        })),
        SearchEvent::Close => Some(Action::CloseSearch),
    }
}

fn sheet_key(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    match event {
        TuiEvent::Esc => Some(Action::CloseSheet),
        TuiEvent::Char('q') => Some(Action::Quit),
        TuiEvent::Char('/') => Some(Action::OpenSearch),
        TuiEvent::Left => Some(Action::Navigate(Direction::Prev)),
        TuiEvent::Right => Some(Action::Navigate(Direction::Next)),
        TuiEvent::Tab | TuiEvent::BackTab => Some(Action::ChangeSheetTab(app.sheet.tab.other())),
        TuiEvent::Enter | TuiEvent::Char('e') => Some(Action::ToggleSheetExpanded),
        TuiEvent::Char('h') => Some(Action::ToggleHighlight),
        TuiEvent::Char('n') => Some(Action::CreateNote),
        TuiEvent::Char('c') => Some(Action::CopySelection),
        TuiEvent::Char('p') => Some(Action::ShareSelection),
        TuiEvent::Char('w') if app.sheet.tab == SheetTab::Word => {
            tui.sheet.toggle_details();
            None
        }
        other => {
            tui.sheet.handle_event(other);
            None
        }
    }
}

fn key(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    if app.context_menu_visible()
        && let TuiEvent::Char(c) = event
        && let Some(item) = MenuItem::ALL.into_iter().find(|i| i.hotkey() == *c)
    {
        return Some(Action::Menu(item));
    }

    match event {
        TuiEvent::Char('q') => Some(Action::Quit),
        TuiEvent::Char('/') => Some(Action::OpenSearch),
        TuiEvent::Char('t') => Some(Action::SetTheme(app.theme.toggled())),
        TuiEvent::Char(c @ '1'..='3') => {
            let index = usize::from(*c as u8 - b'1');
            Some(Action::ChangeNavTab(NavTab::ALL[index]))
        }
        TuiEvent::Esc if app.nav_tab == NavTab::Bible && app.view != ViewMode::Reader => {
            Some(Action::CloseSubview)
        }
        TuiEvent::Esc if !app.selection.is_none() => Some(Action::ClearSelection),
        TuiEvent::Left | TuiEvent::Right if on_reader(app) => {
            let forward = matches!(event, TuiEvent::Right);
            let id = step_word(app, forward)?;
            tui.reader.reveal(id);
            Some(Action::SelectWord(
                id,
                tui.reader.token_area(id).map(coordinates_of),
            ))
        }
        TuiEvent::Enter if on_reader(app) && !app.selection.is_none() => Some(Action::OpenStudy),
        other if on_reader(app) => {
            tui.reader.handle_event(other);
            None
        }
        other => {
            scroll_page(tui, other);
            None
        }
    }
}

/// Next interactive word from the current selection, crossing verses.
/// Without a word selected, starts at the selected verse (or the first one).
fn step_word(app: &App, forward: bool) -> Option<TokenId> {
    let psalm = app.psalm();
    match app.selection.token_id() {
        Some(id) if forward => psalm.next_interactive_across(id),
        Some(id) => psalm.prev_interactive_across(id),
        None => {
            let verse = if app.selection.is_none() {
                psalm.verses.first()?.id
            } else {
                app.selection.verse_id()
            };
            psalm.first_interactive(verse)
        }
    }
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::core::preferences::Theme;
    use crate::core::selection::Selection;
    use crate::test_support::test_app;

    fn draw(app: &App, tui: &mut TuiState) {
        let mut terminal = Terminal::new(TestBackend::new(60, 30)).unwrap();
        terminal.draw(|f| ui::draw_ui(f, app, tui)).unwrap();
    }

    /// Dispatch and apply, the way the event loop does.
    fn send(app: &mut App, tui: &mut TuiState, event: TuiEvent) -> Option<Effect> {
        let action = dispatch(app, tui, &event)?;
        Some(update(app, action))
    }

    #[test]
    fn clicking_a_word_selects_it_with_its_position() {
        let mut app = test_app();
        let mut tui = TuiState::default();
        draw(&app, &mut tui);

        let id = TokenId::new(1, 0);
        let area = tui.reader.token_area(id).expect("on screen");
        send(&mut app, &mut tui, TuiEvent::Click(area.x, area.y));
        assert_eq!(app.selection.token_id(), Some(id));
        assert_eq!(app.selection.coordinates(), Some(coordinates_of(area)));
        assert!(app.context_menu_visible());
    }

    #[test]
    fn right_click_opens_the_word_tab() {
        let mut app = test_app();
        let mut tui = TuiState::default();
        draw(&app, &mut tui);

        let area = tui.reader.token_area(TokenId::new(1, 0)).expect("on screen");
        send(&mut app, &mut tui, TuiEvent::RightClick(area.x, area.y));
        assert!(app.sheet.open);
        assert_eq!(app.sheet.tab, SheetTab::Word);
    }

    #[test]
    fn menu_hotkey_studies_the_selection() {
        let mut app = test_app();
        let mut tui = TuiState::default();
        draw(&app, &mut tui);

        let area = tui.reader.token_area(TokenId::new(1, 0)).expect("on screen");
        send(&mut app, &mut tui, TuiEvent::Click(area.x, area.y));
        let effect = send(&mut app, &mut tui, TuiEvent::Char('s'));
        assert!(app.sheet.open);
        assert_eq!(effect, Some(Effect::ScrollToSelection));
    }

    #[test]
    fn arrow_keys_walk_words_across_verses() {
        let mut app = test_app();
        let mut tui = TuiState::default();
        draw(&app, &mut tui);

        send(&mut app, &mut tui, TuiEvent::Right);
        let first = app.psalm().first_interactive(1).expect("verse 1 has words");
        assert_eq!(app.selection.token_id(), Some(first));
        // Visible word: the menu has somewhere to anchor
        assert!(app.selection.coordinates().is_some());

        let last = app.psalm().last_interactive(1).expect("verse 1 has words");
        app.selection = crate::test_support::word_selection(&app, last);
        send(&mut app, &mut tui, TuiEvent::Right);
        assert_eq!(app.selection.verse_id(), 2);
    }

    #[test]
    fn sheet_arrows_navigate() {
        let mut app = test_app();
        let mut tui = TuiState::default();
        update(&mut app, Action::SelectVerse(1, None));
        update(&mut app, Action::OpenStudy);
        draw(&app, &mut tui);

        send(&mut app, &mut tui, TuiEvent::Right);
        assert_eq!(app.selection.verse_id(), 2);
        assert_eq!(app.sheet.title, "Псалом 1:2");

        send(&mut app, &mut tui, TuiEvent::Esc);
        assert!(!app.sheet.open);
        assert!(app.selection.is_none());
    }

    #[test]
    fn handle_click_without_drag_toggles_expansion() {
        let mut app = test_app();
        let mut tui = TuiState::default();
        update(&mut app, Action::SelectVerse(1, None));
        update(&mut app, Action::OpenStudy);
        draw(&app, &mut tui);

        let handle = tui.sheet_area;
        assert_eq!(send(&mut app, &mut tui, TuiEvent::Click(0, handle.y)), None);
        send(&mut app, &mut tui, TuiEvent::Release(0, handle.y));
        assert!(app.sheet.expanded);
    }

    #[test]
    fn dragging_the_handle_down_closes_the_sheet() {
        let mut app = test_app();
        let mut tui = TuiState::default();
        update(&mut app, Action::SelectVerse(1, None));
        update(&mut app, Action::OpenStudy);
        draw(&app, &mut tui);

        let handle = tui.sheet_area;
        send(&mut app, &mut tui, TuiEvent::Click(0, handle.y));
        send(&mut app, &mut tui, TuiEvent::Release(0, handle.y + 6));
        assert!(!app.sheet.open);
        assert_eq!(app.selection, Selection::None);
    }

    #[test]
    fn typing_in_search_updates_the_query() {
        let mut app = test_app();
        let mut tui = TuiState::default();
        send(&mut app, &mut tui, TuiEvent::Char('/'));
        assert!(app.search.open);

        for c in "рада".chars() {
            send(&mut app, &mut tui, TuiEvent::Char(c));
        }
        assert_eq!(app.search.query, "рада");
        // Keys go to the input, not to the reader
        send(&mut app, &mut tui, TuiEvent::Char('q'));
        assert_eq!(app.search.query, "радаq");

        send(&mut app, &mut tui, TuiEvent::Esc);
        assert!(!app.search.open);
    }

    #[test]
    fn enter_submits_only_in_smart_mode() {
        let mut app = test_app();
        let mut tui = TuiState::default();
        update(&mut app, Action::OpenSearch);
        for c in "успіх".chars() {
            send(&mut app, &mut tui, TuiEvent::Char(c));
        }
        assert_eq!(dispatch(&app, &mut tui, &TuiEvent::Enter), None);

        send(&mut app, &mut tui, TuiEvent::Tab);
        assert_eq!(app.search.mode, SearchMode::Ai);
        assert_eq!(
            dispatch(&app, &mut tui, &TuiEvent::Enter),
            Some(Action::SubmitAiSearch)
        );
    }

    #[test]
    fn alert_swallows_everything_but_dismissal() {
        let mut app = test_app();
        let mut tui = TuiState::default();
        app.alert = Some("Помилка".to_string());
        assert_eq!(dispatch(&app, &mut tui, &TuiEvent::Char('q')), None);
        assert_eq!(
            dispatch(&app, &mut tui, &TuiEvent::Click(3, 3)),
            Some(Action::DismissAlert)
        );
        assert_eq!(dispatch(&app, &mut tui, &TuiEvent::ForceQuit), Some(Action::Quit));
    }

    #[test]
    fn theme_and_tab_keys() {
        let mut app = test_app();
        let mut tui = TuiState::default();
        let effect = send(&mut app, &mut tui, TuiEvent::Char('t'));
        assert_eq!(app.theme, Theme::Light);
        assert_eq!(effect, Some(Effect::SavePreferences));

        send(&mut app, &mut tui, TuiEvent::Char('3'));
        assert_eq!(app.nav_tab, NavTab::Settings);
    }

    #[test]
    fn delayed_scroll_waits_for_its_deadline() {
        let mut app = test_app();
        let mut tui = TuiState::default();
        draw(&app, &mut tui);
        update(&mut app, Action::SelectVerse(6, None));
        update(&mut app, Action::OpenStudy);

        let now = Instant::now();
        tui.pending_scroll = Some(now + SCROLL_DELAY);
        assert!(!tui.settle_scroll(&app, now));
        assert!(tui.poll_timeout(now) <= SCROLL_DELAY);
        assert!(tui.settle_scroll(&app, now + SCROLL_DELAY));
        assert!(tui.pending_scroll.is_none());

        // The last verse now ends above the sheet
        let area = tui.reader.verse_area(6).expect("visible");
        let sheet_top = ui::sheet_area(tui.screen, false).y;
        assert!(area.y + area.height <= sheet_top);
    }
}
