//! # Keyword Search
//!
//! Case-insensitive substring filter over the psalm. A verse matches when
//! its text, or the text of any of its tokens, contains the query.

use crate::core::text::Psalm;

/// Search flavour picked in the search overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    #[default]
    Keyword,
    Ai,
}

impl SearchMode {
    pub fn label(&self) -> &'static str {
        match self {
            SearchMode::Keyword => "За словом",
            SearchMode::Ai => "Розумний пошук",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            SearchMode::Keyword => "Пошук слова...",
            SearchMode::Ai => "Запитайте про ідею...",
        }
    }
}

/// Verse ids matching `query`. Blank queries match nothing.
pub fn keyword_search(psalm: &Psalm, query: &str) -> Vec<u32> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    psalm
        .verses
        .iter()
        .filter(|v| {
            v.text.to_lowercase().contains(&needle)
                || v.tokens
                    .iter()
                    .any(|t| t.text.to_lowercase().contains(&needle))
        })
        .map(|v| v.id)
        .collect()
}

/// Split `text` into `(fragment, is_match)` runs for every case-insensitive
/// occurrence of `query`.
pub fn match_segments(text: &str, query: &str) -> Vec<(String, bool)> {
    if query.is_empty() {
        return vec![(text.to_string(), false)];
    }
    let needle: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();
    let chars: Vec<char> = text.chars().collect();
    // A char may lowercase to several; `starts[i]` is where chars[i] begins in `folded`
    let mut folded: Vec<char> = Vec::new();
    let mut starts: Vec<usize> = Vec::with_capacity(chars.len() + 1);
    for c in &chars {
        starts.push(folded.len());
        folded.extend(c.to_lowercase());
    }
    starts.push(folded.len());

    let mut segments = Vec::new();
    let mut plain = String::new();
    let mut i = 0;
    while i < chars.len() {
        let from = starts[i];
        let end = starts.binary_search(&(from + needle.len())).ok();
        match end {
            Some(j) if folded[from..].starts_with(&needle) => {
                if !plain.is_empty() {
                    segments.push((std::mem::take(&mut plain), false));
                }
                segments.push((chars[i..j].iter().collect(), true));
                i = j;
            }
            _ => {
                plain.push(chars[i]);
                i += 1;
            }
        }
    }
    if !plain.is_empty() {
        segments.push((plain, false));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::library::Library;

    fn psalm() -> Psalm {
        Library::embedded().unwrap().psalm
    }

    #[test]
    fn blank_query_finds_nothing() {
        assert!(keyword_search(&psalm(), "   ").is_empty());
    }

    #[test]
    fn query_is_case_insensitive() {
        let hits = keyword_search(&psalm(), "ЗАКОН");
        assert!(hits.contains(&2));
    }

    #[test]
    fn unmatched_query_is_empty() {
        assert!(keyword_search(&psalm(), "zzzz").is_empty());
    }

    #[test]
    fn segments_preserve_original_case() {
        let segments = match_segments("Закон Господній, і про Закон його", "закон");
        assert_eq!(
            segments,
            vec![
                ("Закон".to_string(), true),
                (" Господній, і про ".to_string(), false),
                ("Закон".to_string(), true),
                (" його".to_string(), false),
            ]
        );
    }

    #[test]
    fn segments_fold_multi_char_lowercase() {
        // 'İ' lowercases to 'i' plus a combining dot
        assert_eq!(
            match_segments("İstanbul", "İST"),
            vec![("İst".to_string(), true), ("anbul".to_string(), false)]
        );
        // Never split a source char
        assert_eq!(
            match_segments("İs", "i"),
            vec![("İs".to_string(), false)]
        );
    }

    #[test]
    fn segments_without_match_are_plain() {
        assert_eq!(
            match_segments("дерево", "вода"),
            vec![("дерево".to_string(), false)]
        );
    }
}
