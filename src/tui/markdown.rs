//! Markdown → ratatui `Text` renderer for commentaries.
//!
//! Converts `pulldown_cmark` events into styled `Line`/`Span` values.
//! Handles headings, bold, italic, rules, lists, blockquotes and links.
//! Commentaries mark their own sub-headings with bold text ("**Вірш 1**",
//! "**I. Вступ**"); such a bold run becomes a muted heading line of its own.

use std::sync::LazyLock;

use pulldown_cmark::{CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use regex::Regex;

use crate::tui::theme::Palette;

static HEADING_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(вірш|вірші|стих|стихи|аргумент|вступ|заголовок|композиція|псалом)(\s|$)")
        .expect("valid heading regex")
});

static ROMAN_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[IVX]+\.\s").expect("valid numeral regex"));

/// Whether a bold run reads as a section heading.
pub fn is_strong_heading(text: &str) -> bool {
    HEADING_WORD.is_match(text) || ROMAN_HEADING.is_match(text)
}

/// Parse markdown into styled `Text`. Returns owned text so callers aren't
/// tied to the input lifetime.
pub fn render(content: &str, palette: &Palette) -> Text<'static> {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);

    let mut w = Writer::new(*palette);
    for event in Parser::new_ext(content, opts) {
        w.handle(event);
    }
    w.text
}

// ── Writer ──────────────────────────────────────────────────────────────────

struct Writer {
    text: Text<'static>,
    palette: Palette,
    /// Inline style stack. Styles compose via `patch` so nested bold+italic works.
    styles: Vec<Style>,
    /// Per-line prefix spans (blockquote `│`).
    line_prefixes: Vec<Span<'static>>,
    /// List nesting: None = unordered, Some(n) = ordered at index n.
    list_indices: Vec<Option<u64>>,
    /// Text collected inside `**...**`, emitted when the run closes.
    strong: Option<String>,
    in_code_block: bool,
    link_url: Option<String>,
    /// Whether the next block element should be preceded by a blank line.
    needs_newline: bool,
}

impl Writer {
    fn new(palette: Palette) -> Self {
        Self {
            text: Text::default(),
            palette,
            styles: vec![],
            line_prefixes: vec![],
            list_indices: vec![],
            strong: None,
            in_code_block: false,
            link_url: None,
            needs_newline: false,
        }
    }

    fn style(&self) -> Style {
        self.styles
            .last()
            .copied()
            .unwrap_or_else(|| self.palette.text())
    }

    fn push_style(&mut self, overlay: Style) {
        self.styles.push(self.style().patch(overlay));
    }

    fn pop_style(&mut self) {
        self.styles.pop();
    }

    fn push_line(&mut self, line: Line<'static>) {
        let mut out = line;
        for pfx in self.line_prefixes.iter().rev().cloned() {
            out.spans.insert(0, pfx);
        }
        self.text.lines.push(out);
    }

    fn push_span(&mut self, span: Span<'static>) {
        if let Some(line) = self.text.lines.last_mut() {
            line.push_span(span);
        } else {
            self.push_line(Line::from(vec![span]));
        }
    }

    fn blank_line_if_needed(&mut self) {
        if self.needs_newline {
            self.push_line(Line::default());
            self.needs_newline = false;
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(tag) => self.close(tag),
            Event::Text(t) | Event::Code(t) => self.text(t),
            Event::SoftBreak => self.text(CowStr::Borrowed(" ")),
            Event::HardBreak => self.push_line(Line::default()),
            Event::Rule => {
                self.blank_line_if_needed();
                self.push_line(Line::from(Span::styled(
                    "─".repeat(24),
                    Style::default().fg(self.palette.border),
                )));
                self.needs_newline = true;
            }
            _ => {}
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.blank_line_if_needed();
                self.push_line(Line::default());
            }
            Tag::Heading { level, .. } => {
                self.blank_line_if_needed();
                self.push_line(Line::default());
                self.push_style(heading_style(&self.palette, level));
            }
            Tag::BlockQuote(_) => {
                self.blank_line_if_needed();
                self.line_prefixes.push(Span::styled(
                    "│ ",
                    Style::default().fg(self.palette.border),
                ));
                self.push_style(Style::default().fg(self.palette.muted).add_modifier(Modifier::ITALIC));
            }
            Tag::CodeBlock(_) => {
                self.blank_line_if_needed();
                self.in_code_block = true;
            }
            Tag::List(start) => {
                if self.list_indices.is_empty() {
                    self.blank_line_if_needed();
                }
                self.list_indices.push(start);
            }
            Tag::Item => {
                self.push_line(Line::default());
                let indent = "  ".repeat(self.list_indices.len().saturating_sub(1));
                if let Some(idx) = self.list_indices.last_mut() {
                    let marker = match idx {
                        None => format!("{indent}• "),
                        Some(n) => {
                            let s = format!("{indent}{n}. ");
                            *n += 1;
                            s
                        }
                    };
                    let style = self.palette.dim();
                    self.push_span(Span::styled(marker, style));
                }
            }
            Tag::Emphasis => self.push_style(
                Style::default()
                    .fg(self.palette.muted)
                    .add_modifier(Modifier::ITALIC),
            ),
            Tag::Strong => self.strong = Some(String::new()),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { dest_url, .. } => {
                self.link_url = Some(dest_url.to_string());
                self.push_style(self.palette.link().add_modifier(Modifier::UNDERLINED));
            }
            _ => {}
        }
    }

    fn close(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.needs_newline = true,
            TagEnd::Heading(_) => {
                self.pop_style();
                self.needs_newline = true;
            }
            TagEnd::BlockQuote(_) => {
                self.line_prefixes.pop();
                self.pop_style();
                self.needs_newline = true;
            }
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                self.needs_newline = true;
            }
            TagEnd::List(_) => {
                self.list_indices.pop();
                self.needs_newline = true;
            }
            TagEnd::Strong => self.close_strong(),
            TagEnd::Emphasis | TagEnd::Strikethrough => self.pop_style(),
            TagEnd::Link => {
                self.pop_style();
                if let Some(url) = self.link_url.take() {
                    let style = self.palette.dim();
                    self.push_span(Span::styled(format!(" ({url})"), style));
                }
            }
            _ => {}
        }
    }

    fn close_strong(&mut self) {
        let Some(run) = self.strong.take() else {
            return;
        };
        if is_strong_heading(&run) {
            // Own block: break out of the paragraph line it started in
            let line_is_empty = self
                .text
                .lines
                .last()
                .is_none_or(|l| l.spans.iter().all(|s| s.content.trim().is_empty()));
            if !line_is_empty {
                self.push_line(Line::default());
            }
            self.push_span(Span::styled(run, self.palette.label()));
            self.push_line(Line::default());
        } else {
            let style = self.style().add_modifier(Modifier::BOLD);
            self.push_span(Span::styled(run, style));
        }
    }

    fn text(&mut self, cow: CowStr<'_>) {
        // ratatui renders \t as zero-width
        let text = cow.replace('\t', "    ");

        if let Some(run) = self.strong.as_mut() {
            run.push_str(&text);
            return;
        }

        if self.in_code_block {
            let style = self.palette.dim();
            for line in text.lines() {
                self.push_line(Line::from(Span::styled(line.to_owned(), style)));
            }
            return;
        }

        let at_line_start = self.text.lines.last().is_none_or(|l| l.spans.is_empty());
        let text = if at_line_start {
            text.trim_start().to_string()
        } else {
            text
        };
        let style = self.style();
        self.push_span(Span::styled(text, style));
    }
}

fn heading_style(palette: &Palette, level: HeadingLevel) -> Style {
    match level {
        HeadingLevel::H1 | HeadingLevel::H2 => palette.heading(),
        _ => palette.label(),
    }
}
