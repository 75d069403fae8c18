//! # Cross-Reference Scraper
//!
//! Builds the Ukrainian text table for the English cross references by
//! downloading chapters of the Ohienko translation from allbible.info.
//!
//! ```text
//! cross_references.json ──► parse "Book C:V-V" ──► group by slug/chapter
//!                                                        │
//!              cross_references_uk.json ◄── extract ◄── GET {base}/{slug}/{chapter}/
//! ```
//!
//! Chapters are fetched one at a time with a short pause in between. A
//! chapter that fails to download is logged and skipped.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use log::{debug, info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::ToolError;
use crate::core::study::CrossReferenceIndex;

pub const DEFAULT_BASE_URL: &str = "https://allbible.info/bible/ogienko";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const CHAPTER_PAUSE: Duration = Duration::from_millis(200);
const MIN_VERSE_CHARS: usize = 5;

/// English book name → allbible.info slug.
const BOOK_SLUGS: &[(&str, &str)] = &[
    ("Genesis", "ge"),
    ("Joshua", "jos"),
    ("Leviticus", "le"),
    ("Deuteronomy", "de"),
    ("Job", "job"),
    ("Psalm", "ps"),
    ("Psalms", "ps"),
    ("Proverbs", "pr"),
    ("Isaiah", "isa"),
    ("Jeremiah", "jer"),
    ("Ezekiel", "eze"),
    ("Daniel", "da"),
    ("Hosea", "ho"),
    ("Malachi", "mal"),
    ("Matthew", "mt"),
    ("Luke", "lu"),
    ("John", "joh"),
    ("Romans", "ro"),
    ("1 Corinthians", "1co"),
    ("2 Corinthians", "2co"),
    ("Galatians", "ga"),
    ("Ephesians", "eph"),
    ("Colossians", "col"),
    ("2 Thessalonians", "2th"),
    ("1 Timothy", "1ti"),
    ("2 Timothy", "2ti"),
    ("1 Peter", "1pe"),
    ("James", "jas"),
    ("1 John", "1jo"),
    ("Revelation", "re"),
];

static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d?\s?[A-Za-z]+)\s+(\d+):(\d+)(?:-(\d+))?$").expect("valid reference regex")
});
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));
static NUMERIC_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#\d+;").expect("valid entity regex"));

/// A parsed `Book C:V` or `Book C:V-V` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRef {
    pub book: String,
    pub chapter: u32,
    pub start_verse: u32,
    pub end_verse: u32,
}

pub fn parse_ref(reference: &str) -> Option<ParsedRef> {
    let caps = REFERENCE.captures(reference)?;
    let start_verse = caps[3].parse().ok()?;
    Some(ParsedRef {
        book: caps[1].trim().to_string(),
        chapter: caps[2].parse().ok()?,
        start_verse,
        end_verse: match caps.get(4) {
            Some(end) => end.as_str().parse().ok()?,
            None => start_verse,
        },
    })
}

pub fn book_slug(book: &str) -> Option<&'static str> {
    BOOK_SLUGS
        .iter()
        .find(|(name, _)| *name == book)
        .map(|(_, slug)| *slug)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedVerse {
    pub verse: u32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedReference {
    pub reference: String,
    pub verses: Vec<ScrapedVerse>,
    pub full_text: String,
}

impl ScrapedReference {
    fn new(reference: &str, verses: Vec<ScrapedVerse>) -> Self {
        let full_text = verses
            .iter()
            .map(|v| format!("{}. {}", v.verse, v.text))
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            reference: reference.to_string(),
            verses,
            full_text,
        }
    }
}

/// Group references by `{slug}/{chapter}` so every chapter is fetched once.
/// Unparseable references and unknown books are dropped.
pub fn group_by_chapter<'a>(
    references: impl IntoIterator<Item = &'a str>,
) -> BTreeMap<String, Vec<(String, ParsedRef)>> {
    let mut groups: BTreeMap<String, Vec<(String, ParsedRef)>> = BTreeMap::new();
    for reference in references {
        let Some(parsed) = parse_ref(reference) else {
            debug!("Skipping unparseable reference {:?}", reference);
            continue;
        };
        let Some(slug) = book_slug(&parsed.book) else {
            debug!("No slug for book {:?}", parsed.book);
            continue;
        };
        groups
            .entry(format!("{}/{}", slug, parsed.chapter))
            .or_default()
            .push((reference.to_string(), parsed));
    }
    groups
}

/// Every distinct reference in the index, sorted.
pub fn all_references(index: &CrossReferenceIndex) -> BTreeSet<&str> {
    index
        .verses
        .values()
        .flat_map(|v| v.cross_references.iter().map(String::as_str))
        .collect()
}

// ============================================================================
// HTML extraction
// ============================================================================

/// How a page marks verse numbers, and which tag starts the next verse.
struct Marker {
    open: &'static str,
    next: &'static str,
}

const MARKERS: [Marker; 3] = [
    Marker {
        open: r"<sup[^>]*>\s*{v}\s*</sup>",
        next: "<sup",
    },
    Marker {
        open: r"<b>\s*{v}\s*</b>",
        next: "<b>",
    },
    Marker {
        open: r">\s*{v}\s*</span>",
        next: "<span",
    },
];

fn verse_text_after(html: &str, marker: &Marker, verse: u32) -> Option<String> {
    let pattern = format!("(?i){}", marker.open.replace("{v}", &verse.to_string()));
    let start = Regex::new(&pattern).ok()?.find(html)?.end();
    let rest = &html[start..];

    let stop = Regex::new(&format!(
        "(?i){}|</p|</div|<br",
        regex::escape(marker.next)
    ))
    .ok()?;
    let end = stop.find(rest).map_or(rest.len(), |m| m.start());

    let text = clean_html(&rest[..end]);
    (text.chars().count() > MIN_VERSE_CHARS).then_some(text)
}

/// Strip tags, decode the common entities and drop numeric ones.
pub fn clean_html(fragment: &str) -> String {
    let text = TAG.replace_all(fragment, "");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">");
    NUMERIC_ENTITY.replace_all(&text, "").trim().to_string()
}

/// Verse texts `start..=end` found in a chapter page. Verses that cannot be
/// located are left out.
pub fn extract_verses(html: &str, start: u32, end: u32) -> Vec<ScrapedVerse> {
    (start..=end)
        .filter_map(|verse| {
            MARKERS
                .iter()
                .find_map(|marker| verse_text_after(html, marker, verse))
                .map(|text| ScrapedVerse { verse, text })
        })
        .collect()
}

/// Last resort for pages without markup around verse numbers: the number
/// followed by a run of Cyrillic prose.
fn extract_plain(html: &str, verse: u32) -> Option<String> {
    let pattern = format!(r"(?m){verse}[.\s]+[А-Яа-яіїєґІЇЄҐ'’.,;:!?\s-]+");
    let found = Regex::new(&pattern).ok()?.find(html)?;
    let text = found.as_str().trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn scrape_reference(html: &str, reference: &str, parsed: &ParsedRef) -> Option<ScrapedReference> {
    let verses = extract_verses(html, parsed.start_verse, parsed.end_verse);
    if !verses.is_empty() {
        return Some(ScrapedReference::new(reference, verses));
    }
    let text = extract_plain(html, parsed.start_verse)?;
    Some(ScrapedReference {
        reference: reference.to_string(),
        verses: vec![ScrapedVerse {
            verse: parsed.start_verse,
            text: text.clone(),
        }],
        full_text: text,
    })
}

// ============================================================================
// Fetching
// ============================================================================

pub struct Scraper {
    client: reqwest::Client,
    base_url: String,
    pause: Duration,
}

impl Scraper {
    pub fn new(base_url: &str) -> Result<Self, ToolError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            pause: CHAPTER_PAUSE,
        })
    }

    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Download one chapter page. The site serves windows-1251.
    pub async fn fetch_chapter(&self, chapter_key: &str) -> Result<String, ToolError> {
        let url = format!("{}/{}/", self.base_url, chapter_key);
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::Status {
                url,
                status: status.as_u16(),
            });
        }
        Ok(response.text_with_charset("windows-1251").await?)
    }

    /// Fetch every chapter the references need and extract their texts.
    pub async fn scrape<'a>(
        &self,
        references: impl IntoIterator<Item = &'a str>,
    ) -> BTreeMap<String, ScrapedReference> {
        let groups = group_by_chapter(references);
        let total = groups.len();
        let mut results = BTreeMap::new();

        for (i, (chapter_key, refs)) in groups.into_iter().enumerate() {
            info!("[{}/{}] {}", i + 1, total, chapter_key);
            match self.fetch_chapter(&chapter_key).await {
                Ok(html) => {
                    for (reference, parsed) in refs {
                        match scrape_reference(&html, &reference, &parsed) {
                            Some(entry) => {
                                results.insert(reference, entry);
                            }
                            None => warn!("No text found for {}", reference),
                        }
                    }
                }
                Err(e) => warn!("Skipping {}: {}", chapter_key, e),
            }
            if i + 1 < total {
                tokio::time::sleep(self.pause).await;
            }
        }
        results
    }
}

/// `psalter fetch-refs`: read the English index, scrape, write the table.
/// Returns the number of references written.
pub async fn run(input: &Path, output: &Path, base_url: &str) -> Result<usize, ToolError> {
    let raw = std::fs::read_to_string(input).map_err(|source| ToolError::Io {
        path: input.to_path_buf(),
        source,
    })?;
    let index: CrossReferenceIndex = serde_json::from_str(&raw)?;
    let references = all_references(&index);
    info!("{} unique references", references.len());

    let results = Scraper::new(base_url)?.scrape(references).await;

    let json = serde_json::to_string_pretty(&results)?;
    std::fs::write(output, json).map_err(|source| ToolError::Io {
        path: output.to_path_buf(),
        source,
    })?;
    info!("Wrote {} references to {}", results.len(), output.display());
    Ok(results.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_and_range_references() {
        assert_eq!(
            parse_ref("Jeremiah 17:7-8"),
            Some(ParsedRef {
                book: "Jeremiah".to_string(),
                chapter: 17,
                start_verse: 7,
                end_verse: 8,
            })
        );
        let single = parse_ref("1 John 2:6").unwrap();
        assert_eq!(single.book, "1 John");
        assert_eq!((single.start_verse, single.end_verse), (6, 6));
        assert_eq!(parse_ref("Psalm 1"), None);
        assert_eq!(parse_ref("Song of Songs 1:1"), None);
    }

    #[test]
    fn groups_by_chapter_and_drops_unknown_books() {
        let groups = group_by_chapter([
            "Psalm 92:12-14",
            "Psalms 92:7",
            "Jeremiah 17:8",
            "Tobit 1:1",
        ]);
        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["jer/17", "ps/92"]);
        assert_eq!(groups["ps/92"].len(), 2);
    }

    #[test]
    fn extracts_sup_marked_verses() {
        let html = "<p><sup>7</sup> Благословенний той муж, що на Господа надію кладе! \
                    <sup>8</sup> І буде він, як дерево, над водою посаджене</p>";
        let verses = extract_verses(html, 7, 8);
        assert_eq!(verses.len(), 2);
        assert_eq!(
            verses[0].text,
            "Благословенний той муж, що на Господа надію кладе!"
        );
        assert_eq!(verses[1].verse, 8);
    }

    #[test]
    fn extracts_bold_and_span_markers() {
        let bold = "<div><b>3</b>Щасливі вбогі духом&nbsp;&quot;так&quot;</div>";
        assert_eq!(
            extract_verses(bold, 3, 3)[0].text,
            "Щасливі вбогі духом \"так\""
        );
        let span = "<span class=\"v\">12</span>Праведний буде цвісти, мов пальма<span>13</span>";
        assert_eq!(extract_verses(span, 12, 12)[0].text, "Праведний буде цвісти, мов пальма");
    }

    #[test]
    fn short_fragments_are_ignored() {
        assert!(extract_verses("<sup>1</sup>Амінь<sup>2</sup>", 1, 1).is_empty());
    }

    #[test]
    fn cleans_tags_and_entities() {
        assert_eq!(clean_html(" <i>Слово</i>&#8212;&amp;&lt;&gt; "), "Слово&<>");
    }

    #[test]
    fn full_text_numbers_each_verse() {
        let entry = ScrapedReference::new(
            "Psalm 92:12-13",
            vec![
                ScrapedVerse { verse: 12, text: "Праведний".to_string() },
                ScrapedVerse { verse: 13, text: "Посаджені".to_string() },
            ],
        );
        assert_eq!(entry.full_text, "12. Праведний 13. Посаджені");
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("fullText").is_some());
    }

    #[test]
    fn plain_fallback_takes_cyrillic_run() {
        let html = "5 Бо Господь знає дорогу 6 інше";
        assert_eq!(extract_plain(html, 5).as_deref(), Some("5 Бо Господь знає дорогу"));
    }
}
