//! # Bottom Sheet
//!
//! The sliding study panel. It is either closed, half height, or expanded
//! to nearly the full screen. Dragging its handle resizes it; a drag that
//! barely moves counts as a tap.
//!
//! ```text
//!   drag delta (rows)   collapsed            expanded
//!   ─────────────────   ─────────────────    ───────────────
//!        0              expand               collapse
//!     ±1                (no change)          (no change)
//!     <= -2 (up)        expand               stay expanded
//!     >= +2 (down)      close                collapse
//! ```

/// Rows a drag has to travel before it counts as a swipe.
pub const SWIPE_THRESHOLD: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SheetTab {
    #[default]
    Verse,
    Word,
}

impl SheetTab {
    pub fn label(&self) -> &'static str {
        match self {
            SheetTab::Verse => "Вірш",
            SheetTab::Word => "Слово",
        }
    }

    pub fn other(&self) -> SheetTab {
        match self {
            SheetTab::Verse => SheetTab::Word,
            SheetTab::Word => SheetTab::Verse,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    Expand,
    Collapse,
    Close,
    Unchanged,
}

#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub open: bool,
    pub expanded: bool,
    pub tab: SheetTab,
    pub title: String,
    /// Dictionary key the Word tab displays. Usually the selected token's
    /// anchor, but a study link can point at a word with no token in view.
    pub word_key: Option<String>,
}

impl Sheet {
    /// Open at half height on the given tab.
    pub fn open(&mut self, tab: SheetTab, title: String) {
        self.open = true;
        self.expanded = false;
        self.tab = tab;
        self.title = title;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.expanded = false;
    }

    pub fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
    }

    /// Apply a finished handle drag. `delta` is end row minus start row.
    pub fn release_drag(&mut self, delta: i32) -> DragOutcome {
        let outcome = drag_outcome(self.expanded, delta);
        match outcome {
            DragOutcome::Expand => self.expanded = true,
            DragOutcome::Collapse => self.expanded = false,
            DragOutcome::Close => self.close(),
            DragOutcome::Unchanged => {}
        }
        outcome
    }
}

/// Decide what a handle drag does without touching state.
pub fn drag_outcome(expanded: bool, delta: i32) -> DragOutcome {
    if delta == 0 {
        if expanded {
            DragOutcome::Collapse
        } else {
            DragOutcome::Expand
        }
    } else if delta <= -SWIPE_THRESHOLD {
        DragOutcome::Expand
    } else if delta >= SWIPE_THRESHOLD {
        if expanded {
            DragOutcome::Collapse
        } else {
            DragOutcome::Close
        }
    } else {
        DragOutcome::Unchanged
    }
}
