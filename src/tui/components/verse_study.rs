//! # Verse Study Pane
//!
//! Sheet content for the Вірш tab. Four sections behind a row of pills:
//!
//! ```text
//!  Паралельні   Переклади   Оригінал   Коментарі
//!  ─────────────────────────────────────────────
//!  Єремія 17:7-8
//!  Благословенний той муж, що надіється на Господа...
//! ```
//!
//! The commentary section is a list of authors; picking one shows that
//! author's markdown for the verse with a back row on top.

use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use crate::core::action::Action;
use crate::core::library::Library;
use crate::core::study::OriginalToken;
use crate::tui::components::content::Content;
use crate::tui::hit::Hit;
use crate::tui::markdown;
use crate::tui::theme::Palette;

pub const MISSING_INFO: &str = "Інформація відсутня";
pub const NO_BREAKDOWN: &str = "Детального розбору ще немає.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerseSection {
    #[default]
    Parallels,
    Translations,
    Original,
    Commentary,
}

impl VerseSection {
    pub const ALL: [VerseSection; 4] = [
        VerseSection::Parallels,
        VerseSection::Translations,
        VerseSection::Original,
        VerseSection::Commentary,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            VerseSection::Parallels => "Паралельні",
            VerseSection::Translations => "Переклади",
            VerseSection::Original => "Оригінал",
            VerseSection::Commentary => "Коментарі",
        }
    }
}

/// Props for one verse pane.
pub struct VerseStudyPane<'a> {
    pub library: &'a Library,
    pub verse_id: u32,
    pub section: VerseSection,
    /// Open commentary, `None` shows the list
    pub commentary: Option<usize>,
    pub palette: &'a Palette,
}

impl VerseStudyPane<'_> {
    pub fn build(&self, content: &mut Content) {
        let palette = self.palette;
        let Some(study) = self.library.verse_study(self.verse_id) else {
            content.blank();
            content.text(MISSING_INFO, palette.dim());
            return;
        };

        content.buttons(
            VerseSection::ALL
                .iter()
                .map(|s| {
                    let style = if *s == self.section {
                        palette.selected()
                    } else {
                        palette.dim().add_modifier(Modifier::BOLD)
                    };
                    (s.label().to_string(), style, Hit::Section(*s))
                })
                .collect(),
        );
        content.blank();

        match self.section {
            VerseSection::Parallels => {
                let references = self.library.cross_references(self.verse_id);
                if references.is_empty() {
                    content.text(MISSING_INFO, palette.dim());
                }
                for reference in references {
                    content.text(&reference.title, palette.label());
                    content.text(&reference.text, palette.text());
                    content.blank();
                }
            }
            VerseSection::Translations => {
                if study.translations.is_empty() {
                    content.text(MISSING_INFO, palette.dim());
                }
                for translation in &study.translations {
                    content.text(&translation.name, palette.label());
                    content.text(&translation.text, palette.text());
                    content.blank();
                }
            }
            VerseSection::Original => self.build_original(content),
            VerseSection::Commentary => self.build_commentary(content),
        }
    }

    fn build_original(&self, content: &mut Content) {
        let palette = self.palette;
        let tokens = self
            .library
            .verse_study(self.verse_id)
            .map(|s| s.original_tokens.as_slice())
            .unwrap_or_default();
        if tokens.is_empty() {
            content.text(MISSING_INFO, palette.dim());
            return;
        }

        token_cards(self.library, tokens, palette, content);

        content.buttons(vec![(
            "Розгорнутий вигляд ›".to_string(),
            palette.link().add_modifier(Modifier::BOLD),
            Hit::Action(Action::OpenExtended(self.verse_id)),
        )]);
    }

    fn build_commentary(&self, content: &mut Content) {
        let palette = self.palette;
        let commentaries = self.library.commentaries();
        if commentaries.is_empty() {
            content.text(MISSING_INFO, palette.dim());
            return;
        }

        match self.commentary.filter(|i| *i < commentaries.len()) {
            None => {
                for (index, commentary) in commentaries.iter().enumerate() {
                    let start = content.row();
                    content.spans(vec![
                        Span::styled(commentary.author.clone(), palette.heading()),
                        Span::styled("  ›", palette.dim()),
                    ]);
                    content.text(&commentary.byline(), palette.dim());
                    content.link_rows(start, Hit::Commentary(Some(index)));
                    content.divider(Style::default().fg(palette.border));
                }
            }
            Some(index) => {
                let commentary = &commentaries[index];
                let start = content.row();
                content.spans(vec![
                    Span::styled("‹ ", palette.dim()),
                    Span::styled(commentary.author.clone(), palette.heading()),
                ]);
                content.text(&commentary.byline(), palette.dim());
                content.link_rows(start, Hit::Commentary(None));
                content.blank();

                let text = self
                    .library
                    .commentary_text(index, self.verse_id)
                    .unwrap_or_default();
                content.markdown(markdown::render(&text, palette));
            }
        }
    }
}

/// One card per Hebrew token: form, transliteration, morphology, Strong's
/// number, gloss and the dictionary definition when there is one. Cards
/// with a dictionary key open the word study.
pub fn token_cards(
    library: &Library,
    tokens: &[OriginalToken],
    palette: &Palette,
    content: &mut Content,
) {
    for token in tokens {
        let start = content.row();
        content.spans(vec![
            Span::styled(token.original.clone(), palette.heading()),
            Span::raw("  "),
            Span::styled(
                token.transliteration.clone(),
                palette.dim().add_modifier(Modifier::ITALIC),
            ),
        ]);
        if let Some(morphology) = &token.morphology {
            content.text(morphology, palette.dim());
        }
        content.text(&format!("Стронга {}", token.strongs), palette.link());
        content.text(&token.gloss, palette.text().add_modifier(Modifier::BOLD));

        let definition = token
            .ref_key
            .as_deref()
            .and_then(|key| library.word_study(key))
            .and_then(|w| w.definition.as_deref());
        match definition {
            Some(definition) => content.text(definition, palette.dim()),
            None => content.text(NO_BREAKDOWN, palette.dim().add_modifier(Modifier::ITALIC)),
        }
        if let Some(key) = &token.ref_key {
            content.link_rows(start, Hit::Action(Action::OpenWordFromStudy(key.clone())));
        }
        content.blank();
    }
}
