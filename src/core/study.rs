//! # Study Records
//!
//! Typed records behind the study panels, plus the small text helpers the
//! panels share (key normalization, inflection highlighting, reference
//! titles). The records deserialize straight from the bundled JSON.

use serde::Deserialize;
use std::collections::HashMap;

// ============================================================================
// Word Study
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    #[serde(rename = "ref")]
    pub reference: String,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Origin {
    pub strongs: String,
    pub transliteration: String,
    pub original: String,
}

/// Dictionary entry for one anchor key.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordStudy {
    pub strongs: Option<String>,
    pub original: Option<String>,
    pub transliteration: Option<String>,
    pub pronunciation: Option<String>,
    pub part_of_speech: String,
    #[serde(default)]
    pub semantic_range: Vec<String>,
    pub definition: Option<String>,
    pub not_definition: Option<String>,
    #[serde(default)]
    pub usages: Vec<Usage>,
    pub typical_construction: Option<String>,
    pub origin: Option<Origin>,
    #[serde(default)]
    pub is_functional: bool,
}

/// Number of usages shown inline before "Усі вживання" links to the concordance.
pub const INLINE_USAGE_LIMIT: usize = 3;

impl WordStudy {
    pub fn inline_usages(&self) -> &[Usage] {
        &self.usages[..self.usages.len().min(INLINE_USAGE_LIMIT)]
    }
}

// ============================================================================
// Verse Study
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Translation {
    pub name: String,
    pub text: String,
}

/// One Hebrew word of a verse with its gloss.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginalToken {
    pub original: String,
    pub transliteration: String,
    pub strongs: String,
    pub gloss: String,
    pub morphology: Option<String>,
    pub ref_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseStudy {
    pub verse_id: u32,
    #[serde(default)]
    pub parallels: Vec<String>,
    #[serde(default)]
    pub translations: Vec<Translation>,
    #[serde(default)]
    pub original_tokens: Vec<OriginalToken>,
}

// ============================================================================
// Commentaries
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CommentarySection {
    pub id: String,
    #[serde(default)]
    pub verses: Vec<u32>,
    pub content_md: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Commentary {
    pub author: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub preview: Option<String>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub sections: Vec<CommentarySection>,
}

/// Separator placed between the introduction and the verse section.
pub const SECTION_SEPARATOR: &str = "\n\n---\n\n";

impl Commentary {
    /// Markdown shown for a verse: the introduction (verse 1 only) followed by
    /// the section covering the verse. Falls back to the plain body.
    pub fn text_for_verse(&self, verse_id: u32) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if verse_id == 1
            && let Some(intro) = self.sections.iter().find(|s| s.id == "intro")
        {
            parts.push(&intro.content_md);
        }
        if let Some(section) = self.sections.iter().find(|s| s.verses.contains(&verse_id)) {
            parts.push(&section.content_md);
        }
        if parts.is_empty() {
            return self.body.clone();
        }
        parts.join(SECTION_SEPARATOR)
    }

    /// `"Title • Subtitle"` line under the author's name.
    pub fn byline(&self) -> String {
        match &self.subtitle {
            Some(sub) if !sub.is_empty() => format!("{} • {}", self.title, sub),
            _ => self.title.clone(),
        }
    }
}

// ============================================================================
// Inductive Study
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordInsight {
    pub word: String,
    pub original: String,
    pub text: String,
    pub ref_key: Option<String>,
}

/// Observation → interpretation → application worksheet for the psalm.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InductiveStudy {
    #[serde(default)]
    pub observation_points: Vec<String>,
    #[serde(default)]
    pub word_insights: Vec<WordInsight>,
    #[serde(default)]
    pub interpretation_points: Vec<String>,
    #[serde(default)]
    pub application_questions: Vec<String>,
    #[serde(default)]
    pub group_questions: Vec<String>,
}

// ============================================================================
// Cross References
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseCrossReferences {
    #[serde(default)]
    pub cross_references: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrossReferenceIndex {
    #[serde(default)]
    pub verses: HashMap<String, VerseCrossReferences>,
}

/// Ukrainian text fetched for an English reference.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedReference {
    pub reference: String,
    pub full_text: String,
}

/// A parallel passage ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossReference {
    pub reference: String,
    pub title: String,
    pub text: String,
}

// ============================================================================
// Text helpers
// ============================================================================

const UK_BOOK_NAMES: &[(&str, &str)] = &[
    ("Genesis", "Буття"),
    ("Joshua", "Ісуса Навина"),
    ("Leviticus", "Левит"),
    ("Deuteronomy", "Повторення Закону"),
    ("Job", "Йов"),
    ("Psalm", "Псалми"),
    ("Psalms", "Псалми"),
    ("Proverbs", "Приповісті"),
    ("Isaiah", "Ісая"),
    ("Jeremiah", "Єремія"),
    ("Ezekiel", "Єзекіїль"),
    ("Daniel", "Даниїл"),
    ("Hosea", "Осія"),
    ("Malachi", "Малахії"),
    ("Matthew", "Матвія"),
    ("Luke", "Луки"),
    ("John", "Івана"),
    ("Romans", "Римлян"),
    ("1 Corinthians", "1 Коринтян"),
    ("2 Corinthians", "2 Коринтян"),
    ("Galatians", "Галатів"),
    ("Ephesians", "Ефесян"),
    ("Colossians", "Колоссян"),
    ("2 Thessalonians", "2 Солунян"),
    ("1 Timothy", "1 Тимофію"),
    ("2 Timothy", "2 Тимофію"),
    ("1 Peter", "1 Петра"),
    ("James", "Якова"),
    ("1 John", "1 Івана"),
    ("Revelation", "Об'явлення"),
];

/// Lowercase and drop everything that is not a letter.
pub fn normalize_word(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Uppercase the first character.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Apostrophes belong to Ukrainian words (`в'яне`, `м’який`).
fn is_word_char(c: char) -> bool {
    c.is_alphabetic() || c == '\'' || c == '’'
}

/// Lowercase letters and apostrophes, with `’` folded to `'`.
fn fold_word(word: &str) -> String {
    word.chars()
        .filter(|c| is_word_char(*c))
        .flat_map(char::to_lowercase)
        .map(|c| if c == '’' { '\'' } else { c })
        .collect()
}

/// Stem to highlight for a dictionary key. Unlike [`normalize_word`] it keeps
/// apostrophes so it lines up with the words [`highlight_segments`] sees.
pub fn highlight_stem(key: &str) -> String {
    fold_word(key)
}

/// Prefix used to spot inflected forms of a stem: stems longer than four
/// letters keep their first `ceil(0.75 * len)` letters.
pub fn highlight_root(stem: &str) -> Option<String> {
    let chars: Vec<char> = stem.to_lowercase().chars().collect();
    let len = chars.len();
    if len < 2 {
        return None;
    }
    let keep = if len > 4 { (len * 3).div_ceil(4) } else { len };
    Some(chars[..keep].iter().collect())
}

/// Split `text` into `(fragment, highlighted)` runs. A run is highlighted
/// when it is a word that starts with the stem's root.
pub fn highlight_segments(text: &str, stem: &str) -> Vec<(String, bool)> {
    let Some(root) = highlight_root(&fold_word(stem)) else {
        return vec![(text.to_string(), false)];
    };

    let mut segments: Vec<(String, bool)> = Vec::new();
    let mut push = |fragment: String, hit: bool| {
        if fragment.is_empty() {
            return;
        }
        match segments.last_mut() {
            Some((last, last_hit)) if *last_hit == hit => last.push_str(&fragment),
            _ => segments.push((fragment, hit)),
        }
    };

    let mut word = String::new();
    let mut gap = String::new();
    for c in text.chars() {
        if is_word_char(c) {
            if !gap.is_empty() {
                push(std::mem::take(&mut gap), false);
            }
            word.push(c);
        } else {
            if !word.is_empty() {
                let w = std::mem::take(&mut word);
                let hit = fold_word(&w).starts_with(&root);
                push(w, hit);
            }
            gap.push(c);
        }
    }
    if !word.is_empty() {
        let hit = fold_word(&word).starts_with(&root);
        push(word, hit);
    }
    if !gap.is_empty() {
        push(gap, false);
    }
    segments
}

/// Remove inline `<mark>` tags from usage examples.
pub fn strip_markup(text: &str) -> String {
    text.replace("<mark>", "").replace("</mark>", "")
}

/// `"Jeremiah 17:7-8"` → `"Єремія 17:7-8"`. Unknown books pass through.
pub fn translate_reference_title(reference: &str) -> String {
    let Some((book, rest)) = split_reference(reference) else {
        return reference.to_string();
    };
    let translated = UK_BOOK_NAMES
        .iter()
        .find(|(en, _)| *en == book)
        .map(|(_, uk)| *uk)
        .unwrap_or(book);
    format!("{translated} {rest}")
}

/// Split `"1 John 3:2"` into `("1 John", "3:2")`.
fn split_reference(reference: &str) -> Option<(&str, &str)> {
    let reference = reference.trim();
    // Optional leading book number ("1 ", "2")
    let mut book_end = 0;
    let bytes = reference.as_bytes();
    if bytes.first().is_some_and(u8::is_ascii_digit) {
        book_end = 1;
        if bytes.get(1) == Some(&b' ') {
            book_end = 2;
        }
    }
    let letters = reference[book_end..]
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(reference.len() - book_end);
    if letters == 0 {
        return None;
    }
    let book = &reference[..book_end + letters];
    let rest = reference[book_end + letters..].trim_start();
    if rest.is_empty() || rest.len() == reference[book_end + letters..].len() {
        return None;
    }
    Some((book, rest))
}

/// Drop standalone verse numbers (`"12"`, `"12."`) and collapse whitespace.
pub fn strip_verse_numbers(text: &str) -> String {
    text.split_whitespace()
        .filter(|word| {
            let digits = word.strip_suffix('.').unwrap_or(word);
            digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit())
        })
        .collect::<Vec<_>>()
        .join(" ")
}
