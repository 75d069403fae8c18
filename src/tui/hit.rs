//! # Click Regions
//!
//! Components register the screen rectangles they drew along with what a
//! click there means. The event loop resolves mouse events against the map
//! built by the last frame. Later registrations sit on top of earlier ones,
//! so overlays (sheet, menu, alert) are registered after the reader.

use ratatui::layout::{Position, Rect};

use crate::core::action::Action;
use crate::core::selection::Coordinates;
use crate::core::text::TokenId;
use crate::tui::components::verse_study::VerseSection;

#[derive(Debug, Clone, PartialEq)]
pub enum Hit {
    /// Dispatch straight to `core::update`
    Action(Action),
    /// A word in the reader; left click selects, right click long-presses
    Token(TokenId),
    Verse(u32),
    /// Drag zone at the top of the sheet
    SheetHandle,
    Section(VerseSection),
    /// Open a commentary (`Some`) or go back to the list (`None`)
    Commentary(Option<usize>),
    ToggleWordDetails,
    SearchInput,
    /// Swallows the click so nothing underneath reacts
    Inert,
}

#[derive(Debug, Default)]
pub struct HitMap {
    regions: Vec<(Rect, Hit)>,
}

impl HitMap {
    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn push(&mut self, area: Rect, hit: Hit) {
        if area.width > 0 && area.height > 0 {
            self.regions.push((area, hit));
        }
    }

    /// Register a rectangle given in scroll-canvas coordinates. Only the part
    /// inside `viewport` is kept.
    pub fn push_scrolled(&mut self, viewport: Rect, offset_y: u16, canvas: Rect, hit: Hit) {
        let top = canvas.y.max(offset_y);
        let bottom = (canvas.y + canvas.height).min(offset_y + viewport.height);
        if top >= bottom || canvas.x >= viewport.width {
            return;
        }
        let width = canvas.width.min(viewport.width - canvas.x);
        self.push(
            Rect::new(
                viewport.x + canvas.x,
                viewport.y + (top - offset_y),
                width,
                bottom - top,
            ),
            hit,
        );
    }

    /// Topmost region under the cell.
    pub fn at(&self, column: u16, row: u16) -> Option<(Rect, &Hit)> {
        self.regions
            .iter()
            .rev()
            .find(|(area, _)| area.contains(Position::new(column, row)))
            .map(|(area, hit)| (*area, hit))
    }

    /// Screen rectangle of the first region carrying `hit`.
    pub fn area_of(&self, hit: &Hit) -> Option<Rect> {
        self.regions
            .iter()
            .find(|(_, h)| h == hit)
            .map(|(area, _)| *area)
    }
}

/// Menu anchor for an element drawn at `area`.
pub fn coordinates_of(area: Rect) -> Coordinates {
    Coordinates {
        x: area.x + area.width / 2,
        y: area.y + area.height,
        y_top: area.y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_regions_win() {
        let mut hits = HitMap::default();
        hits.push(Rect::new(0, 0, 10, 10), Hit::Verse(1));
        hits.push(Rect::new(2, 2, 3, 1), Hit::Token(TokenId::new(1, 0)));

        assert_eq!(hits.at(3, 2).map(|(_, h)| h.clone()), Some(Hit::Token(TokenId::new(1, 0))));
        assert_eq!(hits.at(0, 0).map(|(_, h)| h.clone()), Some(Hit::Verse(1)));
        assert!(hits.at(20, 20).is_none());
    }

    #[test]
    fn scrolled_regions_are_clipped() {
        let mut hits = HitMap::default();
        let viewport = Rect::new(0, 5, 40, 10);

        // Rows 8..12 of the canvas with the view scrolled to row 10
        hits.push_scrolled(viewport, 10, Rect::new(2, 8, 6, 4), Hit::Verse(2));
        let (area, _) = hits.at(3, 5).expect("visible part registered");
        assert_eq!(area, Rect::new(2, 5, 6, 2));

        // Entirely above the viewport
        hits.push_scrolled(viewport, 10, Rect::new(0, 0, 6, 3), Hit::Verse(1));
        assert!(hits.area_of(&Hit::Verse(1)).is_none());
    }

    #[test]
    fn coordinates_point_below_the_element() {
        let coords = coordinates_of(Rect::new(10, 4, 6, 1));
        assert_eq!(coords, Coordinates { x: 13, y: 5, y_top: 4 });
    }
}
