//! Симфонія: every recorded usage of one dictionary word.

use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use crate::core::action::Action;
use crate::core::library::Library;
use crate::core::study::{highlight_segments, highlight_stem};
use crate::tui::components::content::Content;
use crate::tui::components::verse_study::MISSING_INFO;
use crate::tui::hit::Hit;
use crate::tui::theme::Palette;

pub struct ConcordancePane<'a> {
    pub library: &'a Library,
    pub key: &'a str,
    pub palette: &'a Palette,
}

impl ConcordancePane<'_> {
    pub fn build(&self, content: &mut Content) {
        let palette = self.palette;
        content.back_header(
            "Симфонія",
            Some(&format!("Всі вживання слова \"{}\"", self.key)),
            Hit::Action(Action::CloseSubview),
            palette,
        );

        let usages = self.library.concordance(self.key);
        if usages.is_empty() {
            content.text(MISSING_INFO, palette.dim());
            return;
        }

        content.text(
            &format!("ЗНАЙДЕНО {} ВІРШІВ", usages.len()),
            palette.label(),
        );
        content.blank();

        let stem = highlight_stem(self.key);
        let mark = Style::default()
            .fg(palette.fg)
            .bg(palette.verse_selected)
            .add_modifier(Modifier::BOLD);
        for usage in usages {
            let start = content.row();
            content.text(&usage.reference, palette.label());
            let spans = highlight_segments(&usage.text, &stem)
                .into_iter()
                .map(|(text, hit)| Span::styled(text, if hit { mark } else { palette.text() }))
                .collect();
            content.spans(spans);
            content.link_rows(
                start,
                Hit::Action(Action::OpenConcordanceUsage(usage.reference.clone())),
            );
            content.divider(Style::default().fg(palette.border));
        }
    }
}
