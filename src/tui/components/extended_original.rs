//! Word-by-word Hebrew breakdown of one verse, as a full page.

use crate::core::action::Action;
use crate::core::library::Library;
use crate::tui::components::content::Content;
use crate::tui::components::verse_study::{MISSING_INFO, token_cards};
use crate::tui::hit::Hit;
use crate::tui::theme::Palette;

pub struct ExtendedOriginalPane<'a> {
    pub library: &'a Library,
    pub verse_id: u32,
    pub palette: &'a Palette,
}

impl ExtendedOriginalPane<'_> {
    pub fn build(&self, content: &mut Content) {
        let title = format!(
            "{} — оригінал",
            self.library.psalm.verse_reference(self.verse_id)
        );
        content.back_header(&title, None, Hit::Action(Action::CloseSubview), self.palette);

        let tokens = self
            .library
            .verse_study(self.verse_id)
            .map(|s| s.original_tokens.as_slice())
            .unwrap_or_default();
        if tokens.is_empty() {
            content.text(MISSING_INFO, self.palette.dim());
            return;
        }
        token_cards(self.library, tokens, self.palette, content);
    }
}
