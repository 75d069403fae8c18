//! # Scrollable Content
//!
//! Study panes are built line by line into a `Content`, which wraps text to
//! the pane width and remembers which rows are clickable. Rendering puts the
//! lines in a `ScrollView` and registers the visible links with the hit map.
//!
//! ```text
//! build(&mut Content)  ──►  lines + links (canvas rows)
//!                                 │
//! render_scrolled()  ──►  ScrollView + HitMap::push_scrolled
//! ```

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Paragraph;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};
use unicode_width::UnicodeWidthStr;

use crate::tui::hit::{Hit, HitMap};
use crate::tui::theme::Palette;

pub struct Content {
    width: u16,
    lines: Vec<Line<'static>>,
    links: Vec<(Rect, Hit)>,
}

impl Content {
    pub fn new(width: u16) -> Self {
        Self {
            width: width.max(1),
            lines: Vec::new(),
            links: Vec::new(),
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    /// Index of the next line to be written.
    pub fn row(&self) -> u16 {
        u16::try_from(self.lines.len()).unwrap_or(u16::MAX)
    }

    pub fn lines(&self) -> &[Line<'static>] {
        &self.lines
    }

    pub fn links(&self) -> &[(Rect, Hit)] {
        &self.links
    }

    pub fn blank(&mut self) {
        self.lines.push(Line::default());
    }

    /// One line, no wrapping.
    pub fn line(&mut self, line: impl Into<Line<'static>>) {
        self.lines.push(line.into());
    }

    /// Single-style text wrapped at word boundaries.
    pub fn text(&mut self, text: &str, style: Style) {
        for line in textwrap::wrap(text, usize::from(self.width)) {
            self.lines.push(Line::from(Span::styled(line.into_owned(), style)));
        }
    }

    /// Mixed-style text wrapped at word boundaries.
    pub fn spans(&mut self, spans: Vec<Span<'static>>) {
        let lines = flow(spans, self.width);
        if lines.is_empty() {
            self.blank();
        }
        self.lines.extend(lines);
    }

    /// Rendered markdown, each line re-flowed to the pane width.
    pub fn markdown(&mut self, text: Text<'static>) {
        for line in text.lines {
            if line.spans.is_empty() {
                self.blank();
            } else {
                self.spans(line.spans);
            }
        }
    }

    /// Make every row written since `start` clickable.
    pub fn link_rows(&mut self, start: u16, hit: Hit) {
        let end = self.row();
        if end > start {
            self.links
                .push((Rect::new(0, start, self.width, end - start), hit));
        }
    }

    /// A full-width rule.
    pub fn divider(&mut self, style: Style) {
        self.lines.push(Line::from(Span::styled(
            "─".repeat(usize::from(self.width)),
            style,
        )));
    }

    /// Page header: `‹ title` plus optional subtitle, linked to `back`, then a rule.
    pub fn back_header(&mut self, title: &str, subtitle: Option<&str>, back: Hit, palette: &Palette) {
        let start = self.row();
        self.spans(vec![
            Span::styled("‹ ", palette.heading()),
            Span::styled(title.to_string(), palette.heading()),
        ]);
        if let Some(subtitle) = subtitle {
            self.text(subtitle, palette.dim());
        }
        self.link_rows(start, back);
        self.divider(Style::default().fg(palette.border));
        self.blank();
    }

    /// A row of `[ label ]` buttons. Each gets its own click region.
    pub fn buttons(&mut self, items: Vec<(String, Style, Hit)>) {
        let row = self.row();
        let mut spans = Vec::new();
        let mut col: u16 = 0;
        for (label, style, hit) in items {
            let text = format!(" {label} ");
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            if col > 0 {
                spans.push(Span::raw(" "));
                col += 1;
            }
            self.links.push((Rect::new(col, row, width, 1), hit));
            spans.push(Span::styled(text, style));
            col = col.saturating_add(width);
        }
        self.lines.push(Line::from(spans));
    }
}

/// Greedy word wrap over styled spans. Words keep their span's style;
/// `\n` forces a break and words wider than the line are split.
pub fn flow(spans: Vec<Span<'static>>, width: u16) -> Vec<Line<'static>> {
    let width = usize::from(width.max(1));
    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut used = 0usize;

    for span in spans {
        let style = span.style;
        for piece in pieces(&span.content) {
            if piece == "\n" {
                lines.push(Line::from(std::mem::take(&mut current)));
                used = 0;
                continue;
            }

            if used > 0 && used + piece.trim_end().width() > width {
                lines.push(Line::from(std::mem::take(&mut current)));
                used = 0;
            }
            let mut text = if used == 0 { piece.trim_start() } else { piece };
            if text.is_empty() {
                continue;
            }

            while used == 0 && text.trim_end().width() > width {
                let split = split_at_width(text, width);
                lines.push(Line::from(Span::styled(text[..split].to_string(), style)));
                text = &text[split..];
            }
            used += text.width();
            current.push(Span::styled(text.to_string(), style));
        }
    }

    if !current.is_empty() {
        lines.push(Line::from(current));
    }
    lines
}

/// Split into "word + trailing spaces" pieces, with `\n` as its own piece.
fn pieces(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_space = false;
    for (i, c) in text.char_indices() {
        if c == '\n' {
            if start < i {
                out.push(&text[start..i]);
            }
            out.push("\n");
            start = i + c.len_utf8();
            in_space = false;
        } else if c.is_whitespace() {
            in_space = true;
        } else if in_space {
            out.push(&text[start..i]);
            start = i;
            in_space = false;
        }
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
    out
}

/// Byte index of the longest prefix that fits in `width` columns (at least one char).
fn split_at_width(text: &str, width: usize) -> usize {
    let mut used = 0;
    for (i, c) in text.char_indices() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width && i > 0 {
            return i;
        }
        used += w;
    }
    text.len()
}

/// Draw `content` into `area` through a scroll view and register its visible
/// links. `content` must have been built for `area.width - 1` columns.
pub fn render_scrolled(
    frame: &mut Frame,
    area: Rect,
    content: Content,
    scroll: &mut ScrollViewState,
    hits: &mut HitMap,
    style: Style,
) {
    let width = content.width;
    let height = content.row().max(1);

    let max_y = height.saturating_sub(area.height);
    let offset = scroll.offset();
    if offset.y > max_y {
        scroll.set_offset(Position { x: 0, y: max_y });
    }
    let offset_y = scroll.offset().y;

    let mut scroll_view = ScrollView::new(Size::new(width, height))
        .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
        .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
    let Content { lines, links, .. } = content;
    scroll_view.render_widget(
        Paragraph::new(lines).style(style),
        Rect::new(0, 0, width, height),
    );
    frame.render_stateful_widget(scroll_view, area, scroll);

    for (rect, hit) in links {
        hits.push_scrolled(area, offset_y, rect, hit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn flow_wraps_at_word_boundaries() {
        let lines = flow(vec![Span::raw("Блаженний муж, який не ходить")], 15);
        assert_eq!(
            plain(&lines),
            vec!["Блаженний муж, ", "який не ходить"]
        );
    }

    #[test]
    fn flow_keeps_styles_across_breaks() {
        let bold = Style::default().add_modifier(ratatui::style::Modifier::BOLD);
        let lines = flow(
            vec![Span::raw("один два "), Span::styled("три чотири", bold)],
            9,
        );
        assert_eq!(plain(&lines), vec!["один два ", "три ", "чотири"]);
        assert_eq!(lines[2].spans[0].style, bold);
    }

    #[test]
    fn flow_splits_long_words_and_newlines() {
        let lines = flow(vec![Span::raw("abcdefgh\nij")], 3);
        assert_eq!(plain(&lines), vec!["abc", "def", "gh", "ij"]);
    }

    #[test]
    fn buttons_register_their_columns() {
        let mut content = Content::new(40);
        content.blank();
        content.buttons(vec![
            ("Вірш".to_string(), Style::default(), Hit::Inert),
            ("Слово".to_string(), Style::default(), Hit::ToggleWordDetails),
        ]);
        assert_eq!(content.links()[0].0, Rect::new(0, 1, 6, 1));
        assert_eq!(content.links()[1].0, Rect::new(7, 1, 7, 1));
        assert_eq!(plain(content.lines())[1], " Вірш   Слово ");
    }

    #[test]
    fn link_rows_cover_written_lines() {
        let mut content = Content::new(10);
        let start = content.row();
        content.text("one two three four", Style::default());
        content.link_rows(start, Hit::Inert);
        assert_eq!(content.links()[0].0, Rect::new(0, 0, 10, 2));
    }
}
