//! # Selection
//!
//! What the reader is pointing at: nothing, one word, or one verse.
//! Coordinates are screen cells supplied by the adapter that made the
//! selection; they position the context menu and are absent for
//! selections made programmatically (e.g. jumping from search results).

use crate::core::text::TokenId;

/// Screen position of a selected element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coordinates {
    /// Horizontal centre of the element.
    pub x: u16,
    /// Row just below the element.
    pub y: u16,
    /// Top row of the element.
    pub y_top: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Word {
        id: TokenId,
        text: String,
        anchor_key: Option<String>,
        coordinates: Option<Coordinates>,
    },
    Verse {
        id: u32,
        text: String,
        coordinates: Option<Coordinates>,
    },
}

/// Key into the (session-only) highlight set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightKey {
    Token(TokenId),
    Verse(u32),
}

impl Selection {
    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }

    /// Verse the selection belongs to; verse 1 when nothing is selected.
    pub fn verse_id(&self) -> u32 {
        match self {
            Selection::None => 1,
            Selection::Word { id, .. } => id.verse,
            Selection::Verse { id, .. } => *id,
        }
    }

    pub fn token_id(&self) -> Option<TokenId> {
        match self {
            Selection::Word { id, .. } => Some(*id),
            _ => None,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Selection::None => "",
            Selection::Word { text, .. } | Selection::Verse { text, .. } => text,
        }
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            Selection::None => None,
            Selection::Word { coordinates, .. } | Selection::Verse { coordinates, .. } => {
                *coordinates
            }
        }
    }

    pub fn highlight_key(&self) -> Option<HighlightKey> {
        match self {
            Selection::None => None,
            Selection::Word { id, .. } => Some(HighlightKey::Token(*id)),
            Selection::Verse { id, .. } => Some(HighlightKey::Verse(*id)),
        }
    }
}
