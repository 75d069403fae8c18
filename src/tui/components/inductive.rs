//! # Inductive Study
//!
//! The Нотатки tab: an observation → interpretation → application worksheet
//! for the whole psalm, laid out as a column of cards.

use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use crate::core::action::Action;
use crate::core::library::Library;
use crate::tui::components::content::Content;
use crate::tui::components::verse_study::MISSING_INFO;
use crate::tui::hit::Hit;
use crate::tui::theme::Palette;

/// Word the "Переглянути слова" button opens when no insight names one.
const DEFAULT_WORD: &str = "блаженний";

pub struct InductivePane<'a> {
    pub library: &'a Library,
    pub palette: &'a Palette,
}

impl InductivePane<'_> {
    pub fn build(&self, content: &mut Content) {
        let palette = self.palette;
        let Some(study) = self.library.inductive_study() else {
            content.blank();
            content.text(MISSING_INFO, palette.dim());
            return;
        };

        content.text(
            &format!("{} — Індуктивне вивчення", self.library.psalm.title),
            palette.heading(),
        );
        content.text("Observation · Interpretation · Application", palette.dim());
        content.blank();

        self.card_title(content, "⌕", "Observation — Що я бачу?");
        self.bullets(content, "•", &study.observation_points);
        content.text("Фокус: факти, повтори, структура", self.focus());
        content.blank();

        if !study.word_insights.is_empty() {
            self.card_title(content, "▤", "Спостереження зі слів");
            for insight in &study.word_insights {
                content.spans(vec![
                    Span::styled("• ", palette.dim()),
                    Span::styled(insight.word.clone(), palette.heading()),
                    Span::raw(" "),
                    Span::styled(insight.original.clone(), palette.dim()),
                    Span::styled(format!(" — {}", insight.text), palette.text()),
                ]);
            }
            let key = study.word_insights[0]
                .ref_key
                .clone()
                .unwrap_or_else(|| DEFAULT_WORD.to_string());
            content.buttons(vec![(
                "Переглянути слова →".to_string(),
                palette.link().add_modifier(Modifier::BOLD),
                Hit::Action(Action::OpenWordFromStudy(key)),
            )]);
            content.blank();
        }

        self.card_title(content, "✧", "Interpretation — Що це означає?");
        for point in &study.interpretation_points {
            content.text(point, palette.text());
            content.blank();
        }
        content.text("Фокус: авторський намір і богословська логіка", self.focus());
        content.blank();

        self.card_title(content, "✎", "Application — Як це стосується мене?");
        self.bullets(content, "?", &study.application_questions);
        content.buttons(vec![(
            "Додати нотатку".to_string(),
            palette.selected(),
            Hit::Action(Action::CreateNote),
        )]);
        content.blank();

        self.card_title(content, "☷", "Для домашньої групи");
        self.bullets(content, "•", &study.group_questions);
    }

    fn card_title(&self, content: &mut Content, icon: &str, title: &str) {
        content.divider(Style::default().fg(self.palette.border));
        content.spans(vec![
            Span::styled(format!("{icon} "), self.palette.link()),
            Span::styled(title.to_string(), self.palette.heading()),
        ]);
        content.blank();
    }

    fn bullets(&self, content: &mut Content, marker: &str, items: &[String]) {
        for item in items {
            content.spans(vec![
                Span::styled(format!("{marker} "), self.palette.link()),
                Span::styled(item.clone(), self.palette.text()),
            ]);
        }
        content.blank();
    }

    fn focus(&self) -> Style {
        self.palette.dim().add_modifier(Modifier::ITALIC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::preferences::Theme;
    use crate::test_support::test_library;

    fn build() -> Content {
        let library = test_library();
        let palette = Palette::for_theme(Theme::Light);
        let mut content = Content::new(70);
        InductivePane {
            library: &library,
            palette: &palette,
        }
        .build(&mut content);
        content
    }

    fn plain(content: &Content) -> Vec<String> {
        content
            .lines()
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn cards_in_order() {
        let lines = plain(&build());
        assert_eq!(lines[0], "Псалом 1 — Індуктивне вивчення");
        let position = |title: &str| {
            lines
                .iter()
                .position(|l| l.ends_with(title))
                .unwrap_or_else(|| panic!("{title} missing"))
        };
        assert!(position("Observation — Що я бачу?") < position("Interpretation — Що це означає?"));
        assert!(
            position("Interpretation — Що це означає?")
                < position("Application — Як це стосується мене?")
        );
        assert!(position("Application — Як це стосується мене?") < position("Для домашньої групи"));
        assert!(lines.contains(&"Фокус: факти, повтори, структура".to_string()));
    }

    #[test]
    fn word_button_opens_the_first_insight() {
        let library = test_library();
        let study = library.inductive_study().expect("bundled worksheet");
        let expected = study
            .word_insights
            .first()
            .and_then(|w| w.ref_key.clone())
            .unwrap_or_else(|| DEFAULT_WORD.to_string());

        let content = build();
        assert!(
            content
                .links()
                .iter()
                .any(|(_, h)| *h == Hit::Action(Action::OpenWordFromStudy(expected.clone())))
        );
        assert!(
            content
                .links()
                .iter()
                .any(|(_, h)| *h == Hit::Action(Action::CreateNote))
        );
    }
}
