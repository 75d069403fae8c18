//! # Application State
//!
//! Core business state for Psalter. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── library: Arc<Library>                   // psalm + study tables
//! ├── provider: Option<Arc<dyn SearchProvider>> // semantic search backend
//! ├── selection: Selection                    // word / verse / nothing
//! ├── sheet: Sheet                            // bottom study panel
//! ├── nav_tab: NavTab                         // bottom navigation
//! ├── view: ViewMode                          // reader or a full-screen sub-view
//! ├── search: SearchState                     // search overlay
//! ├── highlights: HashSet<HighlightKey>       // session-only marks
//! ├── theme: Theme                            // persisted preference
//! ├── status_message: String                  // top bar text
//! └── alert: Option<String>                   // modal error text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::collections::HashSet;
use std::sync::Arc;

use crate::core::library::Library;
use crate::core::preferences::Theme;
use crate::core::search::SearchMode;
use crate::core::selection::{HighlightKey, Selection};
use crate::core::sheet::{Sheet, SheetTab};
use crate::core::text::Psalm;
use crate::inference::{SearchAnswer, SearchProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavTab {
    #[default]
    Bible,
    Study,
    Settings,
}

impl NavTab {
    pub const ALL: [NavTab; 3] = [NavTab::Bible, NavTab::Study, NavTab::Settings];

    pub fn label(&self) -> &'static str {
        match self {
            NavTab::Bible => "Біблія",
            NavTab::Study => "Нотатки",
            NavTab::Settings => "Налаштування",
        }
    }
}

/// What the Bible tab shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Reader,
    /// Word-by-word Hebrew breakdown of one verse.
    ExtendedOriginal(u32),
    /// Every usage of one dictionary word.
    Concordance(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AiStatus {
    #[default]
    Idle,
    Loading,
    Answered(SearchAnswer),
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub open: bool,
    pub mode: SearchMode,
    pub query: String,
    pub keyword_results: Vec<u32>,
    pub ai: AiStatus,
    /// Id of the most recent AI request; older answers are dropped.
    pub latest_request: u64,
}

pub struct App {
    pub library: Arc<Library>,
    pub provider: Option<Arc<dyn SearchProvider>>,
    pub selection: Selection,
    pub sheet: Sheet,
    pub nav_tab: NavTab,
    pub view: ViewMode,
    pub search: SearchState,
    pub highlights: HashSet<HighlightKey>,
    pub theme: Theme,
    pub status_message: String,
    pub alert: Option<String>,
}

impl App {
    pub fn new(
        library: Arc<Library>,
        provider: Option<Arc<dyn SearchProvider>>,
        theme: Theme,
    ) -> Self {
        Self {
            library,
            provider,
            selection: Selection::None,
            sheet: Sheet::default(),
            nav_tab: NavTab::Bible,
            view: ViewMode::Reader,
            search: SearchState::default(),
            highlights: HashSet::new(),
            theme,
            status_message: String::new(),
            alert: None,
        }
    }

    pub fn psalm(&self) -> &Psalm {
        &self.library.psalm
    }

    pub fn is_highlighted(&self, key: HighlightKey) -> bool {
        self.highlights.contains(&key)
    }

    /// Whether the sheet's prev/next arrows are enabled.
    ///
    /// Verse tab: an adjacent verse exists. Word tab: another interactive
    /// token exists on that side within the same verse.
    pub fn can_navigate(&self) -> (bool, bool) {
        let psalm = self.psalm();
        match self.sheet.tab {
            SheetTab::Verse => {
                let current = self.selection.verse_id();
                (
                    current > 1 && psalm.contains_verse(current - 1),
                    psalm.contains_verse(current + 1),
                )
            }
            SheetTab::Word => match self.selection.token_id() {
                Some(id) => (
                    psalm.has_interactive_before(id),
                    psalm.has_interactive_after(id),
                ),
                None => (false, false),
            },
        }
    }

    /// The floating context menu shows over the reader for a selection that
    /// knows where it is on screen.
    pub fn context_menu_visible(&self) -> bool {
        self.nav_tab == NavTab::Bible
            && self.view == ViewMode::Reader
            && !self.sheet.open
            && !self.search.open
            && self.selection.coordinates().is_some()
    }
}
