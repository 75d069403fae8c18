//! # Actions
//!
//! Everything that can happen in Psalter becomes an `Action`.
//! User taps a word? That's `Action::SelectWord(id, coords)`.
//! The AI answers? That's `Action::AiSearchAnswered { .. }`.
//!
//! The `update()` function takes the current state and an action,
//! mutates the state, and returns an `Effect` describing any I/O the
//! adapter should perform. No side effects happen here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::debug;

use crate::core::preferences::Theme;
use crate::core::search::{SearchMode, keyword_search};
use crate::core::selection::{Coordinates, Selection};
use crate::core::sheet::{DragOutcome, SheetTab};
use crate::core::state::{AiStatus, App, NavTab, ViewMode};
use crate::core::study::capitalize;
use crate::core::text::TokenId;
use crate::inference::{SearchAnswer, SearchRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

/// Buttons of the context menu floating over a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Highlight,
    Study,
    Note,
    Copy,
}

impl MenuItem {
    pub const ALL: [MenuItem; 4] = [
        MenuItem::Highlight,
        MenuItem::Study,
        MenuItem::Note,
        MenuItem::Copy,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::Highlight => "Виділити",
            MenuItem::Study => "Дослідити",
            MenuItem::Note => "Нотатка",
            MenuItem::Copy => "Скопіювати",
        }
    }

    pub fn hotkey(&self) -> char {
        match self {
            MenuItem::Highlight => 'h',
            MenuItem::Study => 's',
            MenuItem::Note => 'n',
            MenuItem::Copy => 'c',
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Selection
    SelectWord(TokenId, Option<Coordinates>),
    LongPressWord(TokenId, Option<Coordinates>),
    SelectVerse(u32, Option<Coordinates>),
    ClearSelection,

    // Sheet
    OpenStudy,
    CloseSheet,
    ChangeSheetTab(SheetTab),
    Navigate(Direction),
    ToggleSheetExpanded,
    SheetDragReleased(i32),
    OpenWordFromStudy(String),

    // Selection actions
    Menu(MenuItem),
    ToggleHighlight,
    CreateNote,
    CopySelection,
    ShareSelection,

    // Views
    ChangeNavTab(NavTab),
    OpenExtended(u32),
    OpenConcordance(String),
    OpenConcordanceUsage(String),
    CloseSubview,

    // Search
    OpenSearch,
    CloseSearch,
    SetSearchMode(SearchMode),
    SetSearchQuery(String),
    SubmitAiSearch,
    AiSearchAnswered { request_id: u64, answer: SearchAnswer },
    AiSearchFailed { request_id: u64, message: String },
    NavigateToVerse(u32),

    // Misc
    SetTheme(Theme),
    DismissAlert,
    Quit,
}

/// A semantic search the adapter should run in the background.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchJob {
    pub request_id: u64,
    pub request: SearchRequest,
}

/// Side effects requested by `update()`.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    /// Bring the selection into the band above the sheet (after a short delay).
    ScrollToSelection,
    SpawnSearch(SearchJob),
    SavePreferences,
    CopyToClipboard(String),
}

pub const NOTES_PENDING: &str = "Нотатки (в розробці)";

/// Apply an action. Emits `ScrollToSelection` when the sheet is open and
/// either just opened or now shows a different selection.
pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("update: {:?}", action);
    let was_open = app.sheet.open;
    let before = app.selection.highlight_key();

    let effect = apply(app, action);

    let after = app.selection.highlight_key();
    if effect == Effect::None && app.sheet.open && after.is_some() && (!was_open || before != after)
    {
        return Effect::ScrollToSelection;
    }
    effect
}

fn apply(app: &mut App, action: Action) -> Effect {
    match action {
        Action::SelectWord(id, coords) => {
            if select_word(app, id, coords) && app.sheet.open {
                sync_sheet_to_selection(app);
            }
            Effect::None
        }
        Action::LongPressWord(id, coords) => {
            if select_word(app, id, coords) {
                open_word_sheet(app);
            }
            Effect::None
        }
        Action::SelectVerse(id, coords) => {
            if select_verse(app, id, coords) && app.sheet.open {
                sync_sheet_to_selection(app);
            }
            Effect::None
        }
        Action::ClearSelection | Action::CloseSheet => {
            clear_selection(app);
            Effect::None
        }

        Action::OpenStudy => {
            open_study(app);
            Effect::None
        }
        Action::ChangeSheetTab(tab) => {
            change_sheet_tab(app, tab);
            Effect::None
        }
        Action::Navigate(direction) => {
            navigate(app, direction);
            Effect::None
        }
        Action::ToggleSheetExpanded => {
            app.sheet.toggle_expanded();
            Effect::None
        }
        Action::SheetDragReleased(delta) => {
            if app.sheet.release_drag(delta) == DragOutcome::Close {
                clear_selection(app);
            }
            Effect::None
        }
        Action::OpenWordFromStudy(key) => {
            open_word_from_study(app, &key);
            Effect::None
        }

        Action::Menu(item) => match item {
            MenuItem::Study => {
                open_study(app);
                Effect::None
            }
            MenuItem::Highlight => {
                toggle_highlight(app);
                clear_selection(app);
                Effect::None
            }
            MenuItem::Note => {
                app.status_message = NOTES_PENDING.to_string();
                clear_selection(app);
                Effect::None
            }
            MenuItem::Copy => {
                let effect = copy_selection(app);
                clear_selection(app);
                effect
            }
        },
        Action::ToggleHighlight => {
            toggle_highlight(app);
            Effect::None
        }
        Action::CreateNote => {
            app.status_message = NOTES_PENDING.to_string();
            Effect::None
        }
        Action::CopySelection => copy_selection(app),
        Action::ShareSelection => match share_text(app) {
            Some(text) => {
                app.status_message = "Скопійовано для поширення".to_string();
                Effect::CopyToClipboard(text)
            }
            None => Effect::None,
        },

        Action::ChangeNavTab(tab) => {
            app.nav_tab = tab;
            if tab != NavTab::Bible {
                app.sheet.close();
            }
            Effect::None
        }
        Action::OpenExtended(verse_id) => {
            app.sheet.close();
            app.view = ViewMode::ExtendedOriginal(verse_id);
            Effect::None
        }
        Action::OpenConcordance(key) => {
            app.sheet.close();
            app.view = ViewMode::Concordance(key);
            Effect::None
        }
        Action::OpenConcordanceUsage(reference) => {
            match verse_in_this_psalm(&reference)
                .filter(|id| app.psalm().contains_verse(*id))
            {
                Some(verse_id) => navigate_to_verse(app, verse_id),
                None => app.view = ViewMode::Reader,
            }
            Effect::None
        }
        Action::CloseSubview => {
            app.view = ViewMode::Reader;
            Effect::None
        }

        Action::OpenSearch => {
            app.sheet.close();
            app.search.open = true;
            Effect::None
        }
        Action::CloseSearch => {
            app.search.open = false;
            Effect::None
        }
        Action::SetSearchMode(mode) => {
            app.search.mode = mode;
            match mode {
                SearchMode::Keyword => {
                    app.search.keyword_results = keyword_search(app.psalm(), &app.search.query);
                }
                SearchMode::Ai => app.search.keyword_results.clear(),
            }
            Effect::None
        }
        Action::SetSearchQuery(query) => {
            app.search.query = query;
            if app.search.mode == SearchMode::Keyword {
                app.search.keyword_results = keyword_search(app.psalm(), &app.search.query);
            }
            Effect::None
        }
        Action::SubmitAiSearch => submit_ai_search(app),
        Action::AiSearchAnswered { request_id, answer } => {
            if request_id == app.search.latest_request {
                app.search.ai = AiStatus::Answered(answer);
            } else {
                debug!(
                    "Dropping stale AI answer {} (latest {})",
                    request_id, app.search.latest_request
                );
            }
            Effect::None
        }
        Action::AiSearchFailed {
            request_id,
            message,
        } => {
            if request_id == app.search.latest_request {
                app.search.ai = AiStatus::Idle;
                app.alert = Some(format!("Помилка AI пошуку: {message}"));
            }
            Effect::None
        }
        Action::NavigateToVerse(verse_id) => {
            navigate_to_verse(app, verse_id);
            Effect::None
        }

        Action::SetTheme(theme) => {
            if app.theme == theme {
                return Effect::None;
            }
            app.theme = theme;
            Effect::SavePreferences
        }
        Action::DismissAlert => {
            app.alert = None;
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

// ============================================================================
// Selection helpers
// ============================================================================

/// Select an interactive token. Returns false for unknown or plain tokens.
fn select_word(app: &mut App, id: TokenId, coordinates: Option<Coordinates>) -> bool {
    let Some(token) = app.psalm().token(id) else {
        return false;
    };
    if !token.is_interactive() {
        return false;
    }
    app.selection = Selection::Word {
        id,
        text: token.text.clone(),
        anchor_key: token.anchor_key.clone(),
        coordinates,
    };
    true
}

fn select_verse(app: &mut App, id: u32, coordinates: Option<Coordinates>) -> bool {
    let Some(verse) = app.psalm().verse(id) else {
        return false;
    };
    app.selection = Selection::Verse {
        id,
        text: verse.text.clone(),
        coordinates,
    };
    true
}

fn clear_selection(app: &mut App) {
    app.selection = Selection::None;
    app.sheet.close();
}

fn verse_title(app: &App, verse_id: u32) -> String {
    app.psalm().verse_reference(verse_id)
}

/// Sheet title for a word: capitalized anchor, else the trimmed token text.
fn word_title(text: &str, anchor_key: Option<&str>) -> String {
    match anchor_key {
        Some(key) => capitalize(key),
        None => text.trim().to_string(),
    }
}

fn open_word_sheet(app: &mut App) {
    if let Selection::Word {
        text, anchor_key, ..
    } = &app.selection
    {
        let title = word_title(text, anchor_key.as_deref());
        let key = anchor_key.clone();
        app.sheet.open(SheetTab::Word, title);
        app.sheet.word_key = key;
    }
}

fn open_study(app: &mut App) {
    match &app.selection {
        Selection::None => {}
        Selection::Verse { id, .. } => {
            let title = verse_title(app, *id);
            app.sheet.open(SheetTab::Verse, title);
        }
        Selection::Word { .. } => open_word_sheet(app),
    }
}

/// Keep an already open sheet showing the current selection.
fn sync_sheet_to_selection(app: &mut App) {
    match &app.selection {
        Selection::None => {}
        Selection::Verse { id, .. } => {
            app.sheet.tab = SheetTab::Verse;
            app.sheet.title = verse_title(app, *id);
        }
        Selection::Word {
            text, anchor_key, ..
        } => {
            app.sheet.tab = SheetTab::Word;
            app.sheet.title = word_title(text, anchor_key.as_deref());
            app.sheet.word_key = anchor_key.clone();
        }
    }
}

fn open_word_from_study(app: &mut App, key: &str) {
    app.nav_tab = NavTab::Bible;
    app.view = ViewMode::Reader;
    let verse_id = app.selection.verse_id();
    if let Some(id) = app.psalm().find_anchor(verse_id, key) {
        select_word(app, id, None);
    }
    app.sheet.open(SheetTab::Word, capitalize(key));
    app.sheet.word_key = Some(key.to_string());
}

fn change_sheet_tab(app: &mut App, tab: SheetTab) {
    app.sheet.tab = tab;
    match tab {
        SheetTab::Verse => {
            let verse_id = app.selection.verse_id();
            if select_verse(app, verse_id, None) {
                app.sheet.title = verse_title(app, verse_id);
            }
        }
        SheetTab::Word => match &app.selection {
            Selection::Word {
                text, anchor_key, ..
            } => {
                app.sheet.title = word_title(text, anchor_key.as_deref());
                app.sheet.word_key = anchor_key.clone();
            }
            Selection::Verse { id, .. } => {
                if let Some(first) = app.psalm().first_interactive(*id)
                    && select_word(app, first, None)
                {
                    sync_sheet_to_selection(app);
                }
            }
            Selection::None => {}
        },
    }
}

fn navigate(app: &mut App, direction: Direction) {
    match app.sheet.tab {
        SheetTab::Verse => {
            let current = app.selection.verse_id();
            let target = match direction {
                Direction::Next => current + 1,
                Direction::Prev => current.saturating_sub(1),
            };
            if select_verse(app, target, None) {
                app.sheet.title = verse_title(app, target);
            }
        }
        SheetTab::Word => {
            let Some(id) = app.selection.token_id() else {
                return;
            };
            let target = match direction {
                Direction::Next => app.psalm().next_interactive(id),
                Direction::Prev => app.psalm().prev_interactive(id),
            };
            if let Some(target) = target
                && select_word(app, target, None)
            {
                sync_sheet_to_selection(app);
            }
        }
    }
}

fn navigate_to_verse(app: &mut App, verse_id: u32) {
    app.search.open = false;
    app.nav_tab = NavTab::Bible;
    app.view = ViewMode::Reader;
    select_verse(app, verse_id, None);
}

fn toggle_highlight(app: &mut App) {
    let Some(key) = app.selection.highlight_key() else {
        return;
    };
    if app.highlights.remove(&key) {
        app.status_message = "Відмітку знято".to_string();
    } else {
        app.highlights.insert(key);
        app.status_message = "Відмічено".to_string();
    }
}

fn copy_selection(app: &mut App) -> Effect {
    let text = app.selection.text().trim().to_string();
    if text.is_empty() {
        return Effect::None;
    }
    app.status_message = "Скопійовано".to_string();
    Effect::CopyToClipboard(text)
}

/// `"текст" (Псалом 1:3)` for the clipboard.
fn share_text(app: &App) -> Option<String> {
    let reference = match &app.selection {
        Selection::None => return None,
        Selection::Verse { id, .. } => verse_title(app, *id),
        Selection::Word { id, .. } => verse_title(app, id.verse),
    };
    Some(format!("\"{}\" ({})", app.selection.text().trim(), reference))
}

/// Verse number of a usage reference that points back into this psalm
/// (`"Псалми 1:3"` → 3).
fn verse_in_this_psalm(reference: &str) -> Option<u32> {
    let rest = reference
        .strip_prefix("Псалми 1:")
        .or_else(|| reference.strip_prefix("Псалом 1:"))?;
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

fn submit_ai_search(app: &mut App) -> Effect {
    let query = app.search.query.trim().to_string();
    if query.is_empty() {
        return Effect::None;
    }
    if app.provider.is_none() {
        app.alert = Some("Помилка AI пошуку: Server missing API key configuration.".to_string());
        return Effect::None;
    }
    app.search.latest_request += 1;
    app.search.ai = AiStatus::Loading;
    Effect::SpawnSearch(SearchJob {
        request_id: app.search.latest_request,
        request: SearchRequest {
            query,
            context: app.psalm().reading_context(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::selection::HighlightKey;
    use crate::test_support::{test_app, test_app_without_provider};

    const COORDS: Option<Coordinates> = Some(Coordinates { x: 4, y: 3, y_top: 2 });

    #[test]
    fn select_word_records_anchor() {
        let mut app = test_app();
        update(&mut app, Action::SelectWord(TokenId::new(1, 0), COORDS));
        match &app.selection {
            Selection::Word {
                id,
                text,
                anchor_key,
                coordinates,
            } => {
                assert_eq!(*id, TokenId::new(1, 0));
                assert_eq!(text, "Блаженний");
                assert_eq!(anchor_key.as_deref(), Some("блаженний"));
                assert_eq!(*coordinates, COORDS);
            }
            other => panic!("expected word selection, got {:?}", other),
        }
        assert!(!app.sheet.open);
    }

    #[test]
    fn plain_tokens_are_not_selectable() {
        let mut app = test_app();
        // v1-t1 is the space after "Блаженний"
        update(&mut app, Action::SelectWord(TokenId::new(1, 1), COORDS));
        assert!(app.selection.is_none());
    }

    #[test]
    fn long_press_opens_word_sheet() {
        let mut app = test_app();
        let effect = update(&mut app, Action::LongPressWord(TokenId::new(1, 2), COORDS));
        assert!(app.sheet.open);
        assert!(!app.sheet.expanded);
        assert_eq!(app.sheet.tab, SheetTab::Word);
        assert_eq!(app.sheet.title, "Муж");
        assert_eq!(app.sheet.word_key.as_deref(), Some("муж"));
        assert_eq!(effect, Effect::ScrollToSelection);
    }

    #[test]
    fn open_study_for_verse_uses_reference_title() {
        let mut app = test_app();
        update(&mut app, Action::SelectVerse(3, COORDS));
        let effect = update(&mut app, Action::OpenStudy);
        assert!(app.sheet.open);
        assert_eq!(app.sheet.tab, SheetTab::Verse);
        assert_eq!(app.sheet.title, "Псалом 1:3");
        assert_eq!(effect, Effect::ScrollToSelection);
    }

    #[test]
    fn open_study_without_selection_does_nothing() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::OpenStudy), Effect::None);
        assert!(!app.sheet.open);
    }

    #[test]
    fn clear_selection_closes_sheet() {
        let mut app = test_app();
        update(&mut app, Action::LongPressWord(TokenId::new(1, 0), COORDS));
        update(&mut app, Action::ClearSelection);
        assert!(app.selection.is_none());
        assert!(!app.sheet.open);
    }

    #[test]
    fn verse_tab_navigation_moves_between_verses() {
        let mut app = test_app();
        update(&mut app, Action::SelectVerse(1, COORDS));
        update(&mut app, Action::OpenStudy);
        let effect = update(&mut app, Action::Navigate(Direction::Next));
        assert_eq!(app.selection.verse_id(), 2);
        assert_eq!(app.sheet.title, "Псалом 1:2");
        assert_eq!(app.selection.coordinates(), None);
        assert_eq!(effect, Effect::ScrollToSelection);
    }

    #[test]
    fn verse_navigation_stops_at_edges() {
        let mut app = test_app();
        update(&mut app, Action::SelectVerse(1, COORDS));
        update(&mut app, Action::OpenStudy);
        let effect = update(&mut app, Action::Navigate(Direction::Prev));
        assert_eq!(app.selection.verse_id(), 1);
        assert_eq!(effect, Effect::None);
    }

    #[test]
    fn word_navigation_skips_punctuation() {
        let mut app = test_app();
        update(&mut app, Action::LongPressWord(TokenId::new(1, 0), COORDS));
        update(&mut app, Action::Navigate(Direction::Next));
        assert_eq!(app.selection.token_id(), Some(TokenId::new(1, 2)));
        assert_eq!(app.sheet.title, "Муж");
        update(&mut app, Action::Navigate(Direction::Prev));
        assert_eq!(app.selection.token_id(), Some(TokenId::new(1, 0)));
    }

    #[test]
    fn switching_to_verse_tab_selects_the_verse() {
        let mut app = test_app();
        update(&mut app, Action::LongPressWord(TokenId::new(2, 0), COORDS));
        update(&mut app, Action::ChangeSheetTab(SheetTab::Verse));
        assert_eq!(app.sheet.tab, SheetTab::Verse);
        assert_eq!(app.sheet.title, "Псалом 1:2");
        assert!(matches!(app.selection, Selection::Verse { id: 2, .. }));
    }

    #[test]
    fn switching_to_word_tab_picks_first_interactive_token() {
        let mut app = test_app();
        update(&mut app, Action::SelectVerse(1, COORDS));
        update(&mut app, Action::OpenStudy);
        update(&mut app, Action::ChangeSheetTab(SheetTab::Word));
        assert_eq!(app.sheet.tab, SheetTab::Word);
        assert_eq!(app.selection.token_id(), Some(TokenId::new(1, 0)));
        assert_eq!(app.sheet.title, "Блаженний");
    }

    #[test]
    fn open_word_from_study_selects_matching_token() {
        let mut app = test_app();
        update(&mut app, Action::SelectVerse(1, COORDS));
        update(&mut app, Action::OpenStudy);
        update(&mut app, Action::OpenWordFromStudy("нечестивих".to_string()));
        assert_eq!(app.sheet.tab, SheetTab::Word);
        assert_eq!(app.sheet.title, "Нечестивих");
        let id = app.selection.token_id().unwrap();
        assert_eq!(id.verse, 1);
        assert_eq!(
            app.psalm().token(id).unwrap().anchor_key.as_deref(),
            Some("нечестивих")
        );
    }

    #[test]
    fn open_word_from_study_without_token_keeps_selection() {
        let mut app = test_app();
        update(&mut app, Action::SelectVerse(1, COORDS));
        update(&mut app, Action::OpenWordFromStudy("ashar".to_string()));
        assert!(matches!(app.selection, Selection::Verse { id: 1, .. }));
        assert_eq!(app.sheet.word_key.as_deref(), Some("ashar"));
        assert!(app.sheet.open);
    }

    #[test]
    fn drag_down_on_collapsed_sheet_closes_and_clears() {
        let mut app = test_app();
        update(&mut app, Action::LongPressWord(TokenId::new(1, 0), COORDS));
        update(&mut app, Action::SheetDragReleased(4));
        assert!(!app.sheet.open);
        assert!(app.selection.is_none());
    }

    #[test]
    fn extended_and_concordance_close_sheet() {
        let mut app = test_app();
        update(&mut app, Action::LongPressWord(TokenId::new(1, 0), COORDS));
        update(&mut app, Action::OpenConcordance("блаженний".to_string()));
        assert!(!app.sheet.open);
        assert_eq!(app.view, ViewMode::Concordance("блаженний".to_string()));
        update(&mut app, Action::CloseSubview);
        update(&mut app, Action::OpenExtended(2));
        assert_eq!(app.view, ViewMode::ExtendedOriginal(2));
    }

    #[test]
    fn concordance_usage_in_this_psalm_jumps_to_verse() {
        let mut app = test_app();
        update(&mut app, Action::OpenConcordance("блаженний".to_string()));
        update(&mut app, Action::OpenConcordanceUsage("Псалми 1:1".to_string()));
        assert_eq!(app.view, ViewMode::Reader);
        assert!(matches!(app.selection, Selection::Verse { id: 1, .. }));
    }

    #[test]
    fn concordance_usage_elsewhere_just_closes() {
        let mut app = test_app();
        update(&mut app, Action::OpenConcordance("блаженний".to_string()));
        update(&mut app, Action::OpenConcordanceUsage("Псалми 32:1".to_string()));
        assert_eq!(app.view, ViewMode::Reader);
        assert!(app.selection.is_none());
    }

    #[test]
    fn menu_highlight_toggles_and_clears() {
        let mut app = test_app();
        update(&mut app, Action::SelectVerse(4, COORDS));
        update(&mut app, Action::Menu(MenuItem::Highlight));
        assert!(app.is_highlighted(HighlightKey::Verse(4)));
        assert!(app.selection.is_none());
        update(&mut app, Action::SelectVerse(4, COORDS));
        update(&mut app, Action::Menu(MenuItem::Highlight));
        assert!(!app.is_highlighted(HighlightKey::Verse(4)));
    }

    #[test]
    fn floating_bar_highlight_keeps_selection() {
        let mut app = test_app();
        update(&mut app, Action::LongPressWord(TokenId::new(1, 2), COORDS));
        update(&mut app, Action::ToggleHighlight);
        assert!(app.is_highlighted(HighlightKey::Token(TokenId::new(1, 2))));
        assert!(app.sheet.open);
    }

    #[test]
    fn menu_copy_returns_clipboard_effect() {
        let mut app = test_app();
        update(&mut app, Action::SelectWord(TokenId::new(1, 2), COORDS));
        let effect = update(&mut app, Action::Menu(MenuItem::Copy));
        assert_eq!(effect, Effect::CopyToClipboard("муж".to_string()));
        assert!(app.selection.is_none());
    }

    #[test]
    fn share_includes_reference() {
        let mut app = test_app();
        update(&mut app, Action::LongPressWord(TokenId::new(1, 2), COORDS));
        let effect = update(&mut app, Action::ShareSelection);
        assert_eq!(
            effect,
            Effect::CopyToClipboard("\"муж\" (Псалом 1:1)".to_string())
        );
    }

    #[test]
    fn menu_study_opens_sheet() {
        let mut app = test_app();
        update(&mut app, Action::SelectWord(TokenId::new(1, 0), COORDS));
        update(&mut app, Action::Menu(MenuItem::Study));
        assert!(app.sheet.open);
        assert_eq!(app.sheet.tab, SheetTab::Word);
    }

    #[test]
    fn open_search_closes_sheet() {
        let mut app = test_app();
        update(&mut app, Action::LongPressWord(TokenId::new(1, 0), COORDS));
        update(&mut app, Action::OpenSearch);
        assert!(app.search.open);
        assert!(!app.sheet.open);
    }

    #[test]
    fn keyword_query_filters_verses() {
        let mut app = test_app();
        update(&mut app, Action::OpenSearch);
        update(&mut app, Action::SetSearchQuery("нечестив".to_string()));
        assert_eq!(app.search.keyword_results, vec![1, 4, 5, 6]);
        update(&mut app, Action::SetSearchQuery(String::new()));
        assert!(app.search.keyword_results.is_empty());
    }

    #[test]
    fn switching_to_ai_clears_keyword_results() {
        let mut app = test_app();
        update(&mut app, Action::SetSearchQuery("закон".to_string()));
        assert!(!app.search.keyword_results.is_empty());
        update(&mut app, Action::SetSearchMode(SearchMode::Ai));
        assert!(app.search.keyword_results.is_empty());
        update(&mut app, Action::SetSearchMode(SearchMode::Keyword));
        assert!(!app.search.keyword_results.is_empty());
    }

    #[test]
    fn ai_search_spawns_job_with_context() {
        let mut app = test_app();
        update(&mut app, Action::SetSearchMode(SearchMode::Ai));
        update(&mut app, Action::SetSearchQuery("Де успіх?".to_string()));
        let effect = update(&mut app, Action::SubmitAiSearch);
        match effect {
            Effect::SpawnSearch(job) => {
                assert_eq!(job.request_id, 1);
                assert_eq!(job.request.query, "Де успіх?");
                assert!(job.request.context.starts_with("Verse 1: "));
            }
            other => panic!("expected SpawnSearch, got {:?}", other),
        }
        assert_eq!(app.search.ai, AiStatus::Loading);
    }

    #[test]
    fn blank_ai_query_is_ignored() {
        let mut app = test_app();
        update(&mut app, Action::SetSearchMode(SearchMode::Ai));
        update(&mut app, Action::SetSearchQuery("  ".to_string()));
        assert_eq!(update(&mut app, Action::SubmitAiSearch), Effect::None);
        assert_eq!(app.search.ai, AiStatus::Idle);
    }

    #[test]
    fn ai_search_without_provider_alerts() {
        let mut app = test_app_without_provider();
        update(&mut app, Action::SetSearchQuery("питання".to_string()));
        assert_eq!(update(&mut app, Action::SubmitAiSearch), Effect::None);
        assert!(app.alert.as_deref().unwrap().starts_with("Помилка AI пошуку"));
    }

    #[test]
    fn last_request_wins() {
        let mut app = test_app();
        update(&mut app, Action::SetSearchQuery("перше".to_string()));
        update(&mut app, Action::SubmitAiSearch);
        update(&mut app, Action::SetSearchQuery("друге".to_string()));
        update(&mut app, Action::SubmitAiSearch);

        let stale = SearchAnswer {
            explanation: "старе".to_string(),
            verse_ids: vec![1],
        };
        update(
            &mut app,
            Action::AiSearchAnswered {
                request_id: 1,
                answer: stale,
            },
        );
        assert_eq!(app.search.ai, AiStatus::Loading);

        let fresh = SearchAnswer {
            explanation: "нове".to_string(),
            verse_ids: vec![3],
        };
        update(
            &mut app,
            Action::AiSearchAnswered {
                request_id: 2,
                answer: fresh.clone(),
            },
        );
        assert_eq!(app.search.ai, AiStatus::Answered(fresh));
    }

    #[test]
    fn failed_search_raises_alert() {
        let mut app = test_app();
        update(&mut app, Action::SetSearchQuery("питання".to_string()));
        update(&mut app, Action::SubmitAiSearch);
        update(
            &mut app,
            Action::AiSearchFailed {
                request_id: 1,
                message: "Сервер повернув помилку: 502".to_string(),
            },
        );
        assert_eq!(app.search.ai, AiStatus::Idle);
        assert_eq!(
            app.alert.as_deref(),
            Some("Помилка AI пошуку: Сервер повернув помилку: 502")
        );
        update(&mut app, Action::DismissAlert);
        assert!(app.alert.is_none());
    }

    #[test]
    fn navigate_to_verse_from_search() {
        let mut app = test_app();
        update(&mut app, Action::ChangeNavTab(NavTab::Study));
        update(&mut app, Action::OpenSearch);
        update(&mut app, Action::NavigateToVerse(5));
        assert!(!app.search.open);
        assert_eq!(app.nav_tab, NavTab::Bible);
        assert!(matches!(app.selection, Selection::Verse { id: 5, coordinates: None, .. }));
        assert!(!app.context_menu_visible());
    }

    #[test]
    fn theme_change_requests_save() {
        let mut app = test_app();
        assert_eq!(
            update(&mut app, Action::SetTheme(Theme::Light)),
            Effect::SavePreferences
        );
        assert_eq!(update(&mut app, Action::SetTheme(Theme::Light)), Effect::None);
    }

    #[test]
    fn selecting_another_word_while_sheet_open_retitles() {
        let mut app = test_app();
        update(&mut app, Action::LongPressWord(TokenId::new(1, 0), COORDS));
        let effect = update(&mut app, Action::SelectWord(TokenId::new(2, 0), COORDS));
        assert_eq!(app.sheet.title, "Але");
        assert_eq!(effect, Effect::ScrollToSelection);
    }

    #[test]
    fn quit_returns_quit_effect() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }

    #[test]
    fn verse_reference_parsing() {
        assert_eq!(verse_in_this_psalm("Псалми 1:3"), Some(3));
        assert_eq!(verse_in_this_psalm("Псалом 1:6"), Some(6));
        assert_eq!(verse_in_this_psalm("Псалми 11:3"), None);
        assert_eq!(verse_in_this_psalm("Єремія 17:7"), None);
    }
}
