//! # Library
//!
//! All static content in one place: the psalm text and every lookup table
//! the study panels read from.
//!
//! ```text
//! data/
//! ├── psalm.json                 verses + tokens
//! ├── word_study.json            anchor key → WordStudy
//! ├── verse_study.json           verse id → VerseStudy
//! ├── commentaries.json          [Commentary]
//! ├── inductive_study.json       "1" → InductiveStudy
//! ├── cross_references.json      verse id → English references
//! ├── cross_references_uk.json   English reference → Ukrainian text
//! └── parallel_verses.json       Ukrainian reference → fallback text
//! ```
//!
//! The files are compiled into the binary; `Library::from_dir` loads the
//! same file names from disk so the content can be swapped without a
//! rebuild.

use log::{debug, info};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::core::study::{
    Commentary, CrossReference, CrossReferenceIndex, InductiveStudy, TranslatedReference, Usage,
    VerseStudy, WordStudy, normalize_word, strip_markup, strip_verse_numbers,
    translate_reference_title,
};
use crate::core::text::Psalm;

pub const PSALM_FILE: &str = "psalm.json";
pub const WORD_STUDY_FILE: &str = "word_study.json";
pub const VERSE_STUDY_FILE: &str = "verse_study.json";
pub const COMMENTARIES_FILE: &str = "commentaries.json";
pub const INDUCTIVE_FILE: &str = "inductive_study.json";
pub const CROSS_REFERENCES_FILE: &str = "cross_references.json";
pub const CROSS_REFERENCES_UK_FILE: &str = "cross_references_uk.json";
pub const PARALLEL_VERSES_FILE: &str = "parallel_verses.json";

/// Shown for a parallel passage that has no text in either table.
pub const MISSING_VERSE_TEXT: &str = "Текст вірша...";

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum LibraryError {
    Io {
        file: String,
        source: std::io::Error,
    },
    Parse {
        file: String,
        source: serde_json::Error,
    },
}

impl fmt::Display for LibraryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::Io { file, source } => write!(f, "cannot read {file}: {source}"),
            LibraryError::Parse { file, source } => write!(f, "cannot parse {file}: {source}"),
        }
    }
}

impl std::error::Error for LibraryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LibraryError::Io { source, .. } => Some(source),
            LibraryError::Parse { source, .. } => Some(source),
        }
    }
}

// ============================================================================
// Library
// ============================================================================

pub struct Library {
    pub psalm: Psalm,
    words: HashMap<String, WordStudy>,
    verses: HashMap<String, VerseStudy>,
    commentaries: Vec<Commentary>,
    inductive: HashMap<String, InductiveStudy>,
    cross_references: CrossReferenceIndex,
    translated_references: HashMap<String, TranslatedReference>,
    parallel_texts: HashMap<String, String>,
}

fn parse<T: DeserializeOwned>(file: &str, contents: &str) -> Result<T, LibraryError> {
    serde_json::from_str(contents).map_err(|source| LibraryError::Parse {
        file: file.to_string(),
        source,
    })
}

impl Library {
    /// Content bundled into the binary.
    pub fn embedded() -> Result<Self, LibraryError> {
        let lib = Self {
            psalm: parse(PSALM_FILE, include_str!("../../data/psalm.json"))?,
            words: parse(WORD_STUDY_FILE, include_str!("../../data/word_study.json"))?,
            verses: parse(VERSE_STUDY_FILE, include_str!("../../data/verse_study.json"))?,
            commentaries: parse(COMMENTARIES_FILE, include_str!("../../data/commentaries.json"))?,
            inductive: parse(INDUCTIVE_FILE, include_str!("../../data/inductive_study.json"))?,
            cross_references: parse(
                CROSS_REFERENCES_FILE,
                include_str!("../../data/cross_references.json"),
            )?,
            translated_references: parse(
                CROSS_REFERENCES_UK_FILE,
                include_str!("../../data/cross_references_uk.json"),
            )?,
            parallel_texts: parse(
                PARALLEL_VERSES_FILE,
                include_str!("../../data/parallel_verses.json"),
            )?,
        };
        debug!(
            "Embedded library: {} verses, {} dictionary entries",
            lib.psalm.verses.len(),
            lib.words.len()
        );
        Ok(lib)
    }

    /// Load the same set of files from a directory.
    pub fn from_dir(dir: &Path) -> Result<Self, LibraryError> {
        let read = |file: &str| {
            fs::read_to_string(dir.join(file)).map_err(|source| LibraryError::Io {
                file: file.to_string(),
                source,
            })
        };
        let lib = Self {
            psalm: parse(PSALM_FILE, &read(PSALM_FILE)?)?,
            words: parse(WORD_STUDY_FILE, &read(WORD_STUDY_FILE)?)?,
            verses: parse(VERSE_STUDY_FILE, &read(VERSE_STUDY_FILE)?)?,
            commentaries: parse(COMMENTARIES_FILE, &read(COMMENTARIES_FILE)?)?,
            inductive: parse(INDUCTIVE_FILE, &read(INDUCTIVE_FILE)?)?,
            cross_references: parse(CROSS_REFERENCES_FILE, &read(CROSS_REFERENCES_FILE)?)?,
            translated_references: parse(
                CROSS_REFERENCES_UK_FILE,
                &read(CROSS_REFERENCES_UK_FILE)?,
            )?,
            parallel_texts: parse(PARALLEL_VERSES_FILE, &read(PARALLEL_VERSES_FILE)?)?,
        };
        info!("Loaded library from {}", dir.display());
        Ok(lib)
    }

    /// Dictionary entry for a word. Tries the lowercase key first so keys
    /// with apostrophes ("в'яне") still resolve, then the letters-only form.
    pub fn word_study(&self, key: &str) -> Option<&WordStudy> {
        let lower = key.trim().to_lowercase();
        self.words
            .get(&lower)
            .or_else(|| self.words.get(&normalize_word(&lower)))
    }

    pub fn verse_study(&self, verse_id: u32) -> Option<&VerseStudy> {
        self.verses.get(&verse_id.to_string())
    }

    pub fn commentaries(&self) -> &[Commentary] {
        &self.commentaries
    }

    pub fn commentary_text(&self, index: usize, verse_id: u32) -> Option<String> {
        self.commentaries
            .get(index)
            .map(|c| c.text_for_verse(verse_id))
    }

    /// The psalm's inductive worksheet.
    pub fn inductive_study(&self) -> Option<&InductiveStudy> {
        self.inductive.get("1")
    }

    /// Parallel passages for a verse. English references win when present;
    /// otherwise the verse study's Ukrainian parallels are used.
    pub fn cross_references(&self, verse_id: u32) -> Vec<CrossReference> {
        let references: Vec<String> = match self.cross_references.verses.get(&verse_id.to_string()) {
            Some(entry) => entry.cross_references.clone(),
            None => self
                .verse_study(verse_id)
                .map(|v| v.parallels.clone())
                .unwrap_or_default(),
        };

        references
            .into_iter()
            .map(|reference| {
                let raw = self
                    .translated_references
                    .get(&reference)
                    .map(|t| t.full_text.as_str())
                    .or_else(|| self.parallel_texts.get(&reference).map(String::as_str))
                    .unwrap_or(MISSING_VERSE_TEXT);
                CrossReference {
                    title: translate_reference_title(&reference),
                    text: strip_verse_numbers(raw),
                    reference,
                }
            })
            .collect()
    }

    /// Every recorded usage of a word, markup removed.
    pub fn concordance(&self, key: &str) -> Vec<Usage> {
        self.word_study(key)
            .map(|w| {
                w.usages
                    .iter()
                    .map(|u| Usage {
                        reference: u.reference.clone(),
                        text: strip_markup(&u.text),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
