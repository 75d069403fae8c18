//! # TUI Components
//!
//! This module contains all UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! Components in this directory follow three patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as struct fields and register
//! their click regions with the frame's `HitMap`:
//! - `TopBar`, `BottomNav`: chrome around every tab
//! - `ContextMenu`, `ActionBar`, `Alert`: floating overlays
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that own presentation state and handle `TuiEvent`s:
//! - `ReaderView` / `ReaderState`: the psalm text with its layout cache
//! - `BottomSheet` / `SheetViewState`: the study panel
//! - `SearchView` / `SearchViewState`: search overlay with its `SearchInput`
//!
//! ### Content Panes
//!
//! Scrollable pages are built line by line into a `Content` and drawn with
//! `content::render_scrolled`. The sheet composes `VerseStudyPane` and
//! `WordStudyPane`; full pages are `ConcordancePane`, `ExtendedOriginalPane`,
//! `InductivePane` and `SettingsPane`.
//!
//! ## Props-Based Data Flow
//!
//! Components read core state through `&App` or plain fields and never
//! mutate it. Clicks resolve to a `Hit`, which the event loop turns into an
//! `Action` for `core::update`.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs               (this file)
//! ├── content.rs           (wrapped lines + link regions, scroll rendering)
//! ├── top_bar.rs           (translation, chapter, status, search)
//! ├── bible_text.rs        (reader layout and rendering)
//! ├── context_menu.rs      (floating selection menu)
//! ├── bottom_sheet.rs      (study panel shell)
//! ├── action_bar.rs        (mark / note / share over the sheet)
//! ├── verse_study.rs       (Вірш tab)
//! ├── word_study.rs        (Слово tab)
//! ├── concordance.rs       (every usage of a word)
//! ├── extended_original.rs (Hebrew breakdown page)
//! ├── search_input.rs      (single-line text field)
//! ├── search_view.rs       (search overlay)
//! ├── inductive.rs         (Нотатки tab)
//! ├── settings.rs          (Налаштування tab)
//! ├── bottom_nav.rs        (tab bar)
//! └── alert.rs             (modal error)
//! ```

pub mod action_bar;
pub mod alert;
pub mod bible_text;
pub mod bottom_nav;
pub mod bottom_sheet;
pub mod concordance;
pub mod content;
pub mod context_menu;
pub mod extended_original;
pub mod inductive;
pub mod search_input;
pub mod search_view;
pub mod settings;
pub mod top_bar;
pub mod verse_study;
pub mod word_study;

pub use action_bar::ActionBar;
pub use alert::Alert;
pub use bible_text::{ReaderState, ReaderView};
pub use bottom_nav::BottomNav;
pub use bottom_sheet::{BottomSheet, SheetViewState};
pub use concordance::ConcordancePane;
pub use context_menu::ContextMenu;
pub use extended_original::ExtendedOriginalPane;
pub use inductive::InductivePane;
pub use search_view::{SearchEvent, SearchView, SearchViewState};
pub use settings::SettingsPane;
pub use top_bar::TopBar;
