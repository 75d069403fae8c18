//! # Word Study Pane
//!
//! Sheet content for the Слово tab: the dictionary entry behind the
//! selected word.
//!
//! ```text
//! НОМЕРИ СТРОНГА        835 (esher')  אֶשֶׁר
//! СЕМАНТИЧНИЙ ДІАПАЗОН  щастя • блаженство • ...
//! ЛЕКСИЧНІ ДАНІ         rows, then [ Детальніше ] for construction/origin
//! ЛЕКСИЧНИЙ ІНСАЙТ      Означає / Не означає
//! ВЖИВАННЯ СЛОВА        first three usages, [ Усі вживання › ]
//! ```

use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use crate::core::action::Action;
use crate::core::library::Library;
use crate::core::study::{WordStudy, highlight_segments, highlight_stem, strip_markup};
use crate::tui::components::content::Content;
use crate::tui::components::verse_study::MISSING_INFO;
use crate::tui::hit::Hit;
use crate::tui::theme::Palette;

pub const NO_ENTRY: &str = "Для цього слова ще немає детального розбору.";

pub struct WordStudyPane<'a> {
    pub library: &'a Library,
    /// Dictionary key of the word on display
    pub key: Option<&'a str>,
    pub details_expanded: bool,
    pub palette: &'a Palette,
}

impl WordStudyPane<'_> {
    pub fn build(&self, content: &mut Content) {
        let palette = self.palette;
        let entry = self
            .key
            .and_then(|key| self.library.word_study(key).map(|w| (key, w)));
        let Some((key, word)) = entry else {
            content.blank();
            content.text(MISSING_INFO, palette.heading());
            content.text(NO_ENTRY, palette.dim());
            return;
        };

        if word.is_functional {
            content.text("Службове слово", palette.dim().add_modifier(Modifier::ITALIC));
            content.blank();
        }

        if let Some(strongs) = &word.strongs {
            section(content, palette, "Номери Стронга");
            let mut spans = vec![Span::styled(strongs.clone(), palette.heading())];
            if let Some(original) = &word.original {
                spans.push(Span::raw("   "));
                spans.push(Span::styled(original.clone(), palette.text()));
            }
            content.spans(spans);
            content.blank();
        }

        if !word.semantic_range.is_empty() {
            section(content, palette, "Семантичний діапазон");
            content.text(&word.semantic_range.join(" • "), palette.text());
            content.blank();
        }

        self.build_lexical(content, word);

        if word.definition.is_some() || word.not_definition.is_some() {
            section(content, palette, "Лексичний інсайт");
            if let Some(definition) = &word.definition {
                content.text("Означає:", palette.heading());
                content.text(definition, palette.text());
            }
            if let Some(not_definition) = &word.not_definition {
                content.text("Не означає:", palette.heading());
                content.text(not_definition, palette.text());
            }
            content.blank();
        }

        if !word.usages.is_empty() {
            section(content, palette, "Вживання слова");
            let stem = highlight_stem(key);
            let mark = Style::default().fg(palette.fg).bg(palette.verse_selected);
            for usage in word.inline_usages() {
                content.text(&usage.reference, palette.dim());
                let spans = highlight_segments(&strip_markup(&usage.text), &stem)
                    .into_iter()
                    .map(|(text, hit)| {
                        if hit {
                            Span::styled(text, mark)
                        } else {
                            Span::styled(text, palette.text())
                        }
                    })
                    .collect();
                content.spans(spans);
                content.blank();
            }
            content.buttons(vec![(
                "Усі вживання ›".to_string(),
                palette.link().add_modifier(Modifier::BOLD),
                Hit::Action(Action::OpenConcordance(key.to_string())),
            )]);
        }
    }

    fn build_lexical(&self, content: &mut Content, word: &WordStudy) {
        let palette = self.palette;
        section(content, palette, "Лексичні дані");

        let row = |content: &mut Content, label: &str, value: &str| {
            content.spans(vec![
                Span::styled(format!("{label}: "), palette.dim()),
                Span::styled(value.to_string(), palette.text()),
            ]);
        };
        if let Some(original) = &word.original {
            row(content, "Оригінальне слово", original);
        }
        row(content, "Частина мови", &word.part_of_speech);
        if let Some(transliteration) = &word.transliteration {
            row(content, "Транслітерація", transliteration);
        }
        if let Some(pronunciation) = &word.pronunciation {
            row(content, "Вимова", pronunciation);
        }

        if word.typical_construction.is_none() && word.origin.is_none() {
            content.blank();
            return;
        }

        if self.details_expanded {
            if let Some(construction) = &word.typical_construction {
                row(content, "Типова конструкція", construction.trim());
            }
            if let Some(origin) = &word.origin {
                let start = content.row();
                content.spans(vec![
                    Span::styled("Походження слова: ", palette.dim()),
                    Span::styled(
                        format!("{} ({})", origin.strongs, origin.transliteration),
                        palette.link().add_modifier(Modifier::UNDERLINED),
                    ),
                    Span::raw(" "),
                    Span::styled(origin.original.clone(), palette.text()),
                ]);
                content.link_rows(
                    start,
                    Hit::Action(Action::OpenWordFromStudy(origin.transliteration.clone())),
                );
            }
        }
        let label = if self.details_expanded {
            "Згорнути"
        } else {
            "Детальніше"
        };
        content.buttons(vec![(
            label.to_string(),
            palette.link().add_modifier(Modifier::BOLD),
            Hit::ToggleWordDetails,
        )]);
        content.blank();
    }
}

fn section(content: &mut Content, palette: &Palette, title: &str) {
    content.text(&title.to_uppercase(), palette.label());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::preferences::Theme;
    use crate::test_support::test_library;

    fn plain(content: &Content) -> Vec<String> {
        content
            .lines()
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    fn build(key: Option<&str>, details_expanded: bool) -> Content {
        let library = test_library();
        let palette = Palette::for_theme(Theme::Light);
        let mut content = Content::new(60);
        WordStudyPane {
            library: &library,
            key,
            details_expanded,
            palette: &palette,
        }
        .build(&mut content);
        content
    }

    #[test]
    fn missing_entry() {
        let lines = plain(&build(Some("немаєтакого"), false));
        assert!(lines.contains(&MISSING_INFO.to_string()));
        assert!(lines.contains(&NO_ENTRY.to_string()));

        let lines = plain(&build(None, false));
        assert!(lines.contains(&MISSING_INFO.to_string()));
    }

    #[test]
    fn sections_in_order() {
        let lines = plain(&build(Some("блаженний"), false));
        let position = |title: &str| {
            lines
                .iter()
                .position(|l| l == &title.to_uppercase())
                .unwrap_or_else(|| panic!("{title} missing"))
        };
        assert!(position("Номери Стронга") < position("Семантичний діапазон"));
        assert!(position("Семантичний діапазон") < position("Лексичні дані"));
        assert!(position("Лексичні дані") < position("Лексичний інсайт"));
        assert!(position("Лексичний інсайт") < position("Вживання слова"));
        assert!(lines.iter().any(|l| l == "щастя • блаженство • успішний рух вперед"));
    }

    #[test]
    fn details_toggle_reveals_origin() {
        let collapsed = build(Some("блаженний"), false);
        assert!(!plain(&collapsed).iter().any(|l| l.starts_with("Походження слова")));
        assert!(plain(&collapsed).iter().any(|l| l.contains("Детальніше")));

        let expanded = build(Some("блаженний"), true);
        assert!(plain(&expanded).iter().any(|l| l.starts_with("Походження слова")));
        assert!(plain(&expanded).iter().any(|l| l.contains("Згорнути")));
        assert!(
            expanded
                .links()
                .iter()
                .any(|(_, h)| *h == Hit::Action(Action::OpenWordFromStudy("ashar".into())))
        );
    }

    #[test]
    fn shows_three_usages_and_links_the_concordance() {
        let content = build(Some("блаженний"), false);
        let lines = plain(&content);
        let references = lines.iter().filter(|l| l.starts_with("Псалми ")).count();
        assert_eq!(references, 3);
        assert!(!lines.iter().any(|l| l.contains("<mark>")));
        assert!(
            content
                .links()
                .iter()
                .any(|(_, h)| *h == Hit::Action(Action::OpenConcordance("блаженний".into())))
        );
    }

    #[test]
    fn usages_highlight_inflected_forms() {
        let content = build(Some("блаженний"), false);
        let highlighted: Vec<&str> = content
            .lines()
            .iter()
            .flat_map(|l| l.spans.iter())
            .filter(|s| s.style.bg.is_some())
            .map(|s| s.content.as_ref())
            .collect();
        assert!(highlighted.iter().any(|s| s.starts_with("Блаженний")));
    }

    #[test]
    fn functional_words_are_marked() {
        let lines = plain(&build(Some("не"), false));
        assert_eq!(lines[0], "Службове слово");
    }
}
