//! # Psalm Text
//!
//! The reading text: verses split into tokens. Tokens that carry an
//! anchor key are *interactive* and link into the word-study dictionary;
//! the rest are whitespace and punctuation.
//!
//! ```text
//! Psalm
//! └── verses: Vec<Verse>
//!     └── tokens: Vec<Token>     "Блаженний" (anchor: блаженний), " ", "муж" ...
//!                                  v1-t0                           v1-t1  v1-t2
//! ```
//!
//! Token ids are positional: `v{verse}-t{index}`. They are never stored in
//! the data files, so an id always points at a real token.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Positional address of a token inside the psalm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId {
    pub verse: u32,
    pub index: usize,
}

impl TokenId {
    pub fn new(verse: u32, index: usize) -> Self {
        Self { verse, index }
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}-t{}", self.verse, self.index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTokenIdError(String);

impl fmt::Display for ParseTokenIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid token id: {:?}", self.0)
    }
}

impl std::error::Error for ParseTokenIdError {}

impl FromStr for TokenId {
    type Err = ParseTokenIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseTokenIdError(s.to_string());
        let rest = s.strip_prefix('v').ok_or_else(err)?;
        let (verse, index) = rest.split_once("-t").ok_or_else(err)?;
        Ok(Self {
            verse: verse.parse().map_err(|_| err())?,
            index: index.parse().map_err(|_| err())?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Token {
    pub text: String,
    #[serde(default)]
    pub anchor_key: Option<String>,
}

impl Token {
    pub fn is_interactive(&self) -> bool {
        self.anchor_key.is_some()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Verse {
    pub id: u32,
    pub book: String,
    pub chapter: u32,
    pub text: String,
    pub tokens: Vec<Token>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Psalm {
    pub title: String,
    pub book_heading: String,
    pub verses: Vec<Verse>,
}

impl Psalm {
    pub fn verse(&self, id: u32) -> Option<&Verse> {
        self.verses.iter().find(|v| v.id == id)
    }

    pub fn contains_verse(&self, id: u32) -> bool {
        self.verse(id).is_some()
    }

    pub fn token(&self, id: TokenId) -> Option<&Token> {
        self.verse(id.verse)?.tokens.get(id.index)
    }

    /// `"Псалом 1:3"` style reference for a verse.
    pub fn verse_reference(&self, id: u32) -> String {
        format!("{}:{}", self.title, id)
    }

    pub fn first_interactive(&self, verse_id: u32) -> Option<TokenId> {
        let verse = self.verse(verse_id)?;
        verse
            .tokens
            .iter()
            .position(Token::is_interactive)
            .map(|index| TokenId::new(verse_id, index))
    }

    pub fn last_interactive(&self, verse_id: u32) -> Option<TokenId> {
        let verse = self.verse(verse_id)?;
        verse
            .tokens
            .iter()
            .rposition(Token::is_interactive)
            .map(|index| TokenId::new(verse_id, index))
    }

    /// Nearest interactive token after `id`, staying inside the same verse.
    pub fn next_interactive(&self, id: TokenId) -> Option<TokenId> {
        let verse = self.verse(id.verse)?;
        verse
            .tokens
            .iter()
            .enumerate()
            .skip(id.index + 1)
            .find(|(_, t)| t.is_interactive())
            .map(|(index, _)| TokenId::new(id.verse, index))
    }

    /// Nearest interactive token before `id`, staying inside the same verse.
    pub fn prev_interactive(&self, id: TokenId) -> Option<TokenId> {
        let verse = self.verse(id.verse)?;
        verse.tokens[..id.index.min(verse.tokens.len())]
            .iter()
            .rposition(Token::is_interactive)
            .map(|index| TokenId::new(id.verse, index))
    }

    pub fn has_interactive_after(&self, id: TokenId) -> bool {
        self.next_interactive(id).is_some()
    }

    pub fn has_interactive_before(&self, id: TokenId) -> bool {
        self.prev_interactive(id).is_some()
    }

    /// Like `next_interactive`, but continues into the following verses.
    pub fn next_interactive_across(&self, id: TokenId) -> Option<TokenId> {
        self.next_interactive(id).or_else(|| {
            self.verses
                .iter()
                .filter(|v| v.id > id.verse)
                .find_map(|v| self.first_interactive(v.id))
        })
    }

    /// Like `prev_interactive`, but continues into the preceding verses.
    pub fn prev_interactive_across(&self, id: TokenId) -> Option<TokenId> {
        self.prev_interactive(id).or_else(|| {
            self.verses
                .iter()
                .rev()
                .filter(|v| v.id < id.verse)
                .find_map(|v| self.last_interactive(v.id))
        })
    }

    /// First token in a verse whose anchor key equals `key`.
    pub fn find_anchor(&self, verse_id: u32, key: &str) -> Option<TokenId> {
        let verse = self.verse(verse_id)?;
        verse
            .tokens
            .iter()
            .position(|t| t.anchor_key.as_deref() == Some(key))
            .map(|index| TokenId::new(verse_id, index))
    }

    /// Verse listing handed to the semantic search prompt.
    pub fn reading_context(&self) -> String {
        self.verses
            .iter()
            .map(|v| format!("Verse {}: {}", v.id, v.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
