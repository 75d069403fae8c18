//! The Налаштування tab.

use ratatui::style::Modifier;
use ratatui::text::Span;

use crate::core::action::Action;
use crate::core::preferences::Theme;
use crate::tui::components::content::Content;
use crate::tui::hit::Hit;
use crate::tui::theme::Palette;

pub struct SettingsPane<'a> {
    pub theme: Theme,
    pub palette: &'a Palette,
}

impl SettingsPane<'_> {
    pub fn build(&self, content: &mut Content) {
        let palette = self.palette;
        content.text("Налаштування", palette.heading());
        content.blank();
        content.text("ВИГЛЯД", palette.label());

        let icon = match self.theme {
            Theme::Light => "☀",
            Theme::Dark => "☾",
        };
        content.spans(vec![
            Span::styled(format!("{icon} "), palette.link()),
            Span::styled("Тема", palette.heading()),
            Span::styled(format!("  {}", self.theme.label()), palette.dim()),
        ]);
        content.buttons(
            [Theme::Light, Theme::Dark]
                .into_iter()
                .map(|theme| {
                    let style = if theme == self.theme {
                        palette.selected().add_modifier(Modifier::BOLD)
                    } else {
                        palette.dim()
                    };
                    (
                        theme.label().to_string(),
                        style,
                        Hit::Action(Action::SetTheme(theme)),
                    )
                })
                .collect(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_themes_are_offered_and_current_is_named() {
        let palette = Palette::for_theme(Theme::Dark);
        let mut content = Content::new(40);
        SettingsPane {
            theme: Theme::Dark,
            palette: &palette,
        }
        .build(&mut content);

        let row: String = content.lines()[3]
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert!(row.ends_with(Theme::Dark.label()));
        let hits: Vec<&Hit> = content.links().iter().map(|(_, h)| h).collect();
        assert_eq!(
            hits,
            vec![
                &Hit::Action(Action::SetTheme(Theme::Light)),
                &Hit::Action(Action::SetTheme(Theme::Dark)),
            ]
        );
    }
}
