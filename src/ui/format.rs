//! Markdown to styled lines for message bubbles.
//!
//! egui has no HTML view, so bubbles are drawn from pulldown-cmark events
//! directly: each block (paragraph, heading, list item, quote line, code
//! line) becomes a `StyledLine` of `TextSpan`s. Raw HTML is dropped, the
//! same way the sanitizer drops tags outside its allow-list.

use eframe::egui::{self, Color32};
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

use crate::ui::theme::ChatTheme;

const BODY_SIZE: f32 = 14.0;
const INDENT_WIDTH: f32 = 16.0;

/// A run of text sharing one style
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextSpan {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub strike: bool,
    pub code: bool,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Paragraph,
    Heading(u8),
    Bullet { depth: usize },
    Numbered { depth: usize, number: u64 },
    /// Further lines of a list item after a line break
    Continuation { depth: usize },
    Quote,
    CodeBlock,
    Rule,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyledLine {
    pub kind: LineKind,
    pub spans: Vec<TextSpan>,
}

impl StyledLine {
    fn new(kind: LineKind) -> Self {
        Self {
            kind,
            spans: Vec::new(),
        }
    }

    /// Concatenated span text, without list or quote markers.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

#[derive(Default)]
struct LineBuilder {
    lines: Vec<StyledLine>,
    current: Option<StyledLine>,
    /// `None` for bullet lists, `Some(next number)` for ordered ones
    lists: Vec<Option<u64>>,
    quote_depth: usize,
    bold: usize,
    italic: usize,
    strike: usize,
    link: Option<String>,
    in_code_block: bool,
}

impl LineBuilder {
    fn flush(&mut self) {
        if let Some(line) = self.current.take() {
            if !line.spans.is_empty() || line.kind == LineKind::Rule {
                self.lines.push(line);
            }
        }
    }

    fn begin(&mut self, kind: LineKind) {
        self.flush();
        self.current = Some(StyledLine::new(kind));
    }

    /// Kind for a line that is not opened by its own block tag.
    fn context_kind(&self) -> LineKind {
        if !self.lists.is_empty() {
            LineKind::Continuation {
                depth: self.lists.len() - 1,
            }
        } else if self.quote_depth > 0 {
            LineKind::Quote
        } else {
            LineKind::Paragraph
        }
    }

    fn push_span(&mut self, text: &str, code: bool) {
        let span = TextSpan {
            text: text.to_string(),
            bold: self.bold > 0,
            italic: self.italic > 0,
            strike: self.strike > 0,
            code,
            link: self.link.clone(),
        };
        if self.current.is_none() {
            self.current = Some(StyledLine::new(self.context_kind()));
        }
        if let Some(line) = self.current.as_mut() {
            line.spans.push(span);
        }
    }

    fn push_code_block_text(&mut self, text: &str) {
        for code_line in text.lines() {
            self.begin(LineKind::CodeBlock);
            self.push_span(code_line, true);
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                // A loose list item already opened its line
                let reuse = matches!(&self.current, Some(line) if line.spans.is_empty());
                if !reuse {
                    let kind = self.context_kind();
                    self.begin(kind);
                }
            }
            Tag::Heading { level, .. } => self.begin(LineKind::Heading(level as u8)),
            Tag::BlockQuote { .. } => self.quote_depth += 1,
            Tag::CodeBlock { .. } => {
                self.flush();
                self.in_code_block = true;
            }
            Tag::List(first) => {
                self.flush();
                self.lists.push(first);
            }
            Tag::Item => {
                let depth = self.lists.len().saturating_sub(1);
                let kind = match self.lists.last_mut() {
                    Some(Some(number)) => {
                        let kind = LineKind::Numbered {
                            depth,
                            number: *number,
                        };
                        *number += 1;
                        kind
                    }
                    _ => LineKind::Bullet { depth },
                };
                self.begin(kind);
            }
            Tag::TableHead | Tag::TableRow => self.begin(LineKind::Paragraph),
            Tag::TableCell => {
                if matches!(&self.current, Some(line) if !line.spans.is_empty()) {
                    self.push_span(" | ", false);
                }
            }
            Tag::Strong => self.bold += 1,
            Tag::Emphasis => self.italic += 1,
            Tag::Strikethrough => self.strike += 1,
            Tag::Link { dest_url, .. } => self.link = Some(dest_url.to_string()),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph
            | TagEnd::Heading { .. }
            | TagEnd::Item
            | TagEnd::TableHead
            | TagEnd::TableRow => self.flush(),
            TagEnd::BlockQuote { .. } => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            TagEnd::CodeBlock => {
                self.flush();
                self.in_code_block = false;
            }
            TagEnd::List { .. } => {
                self.flush();
                self.lists.pop();
            }
            TagEnd::Strong => self.bold = self.bold.saturating_sub(1),
            TagEnd::Emphasis => self.italic = self.italic.saturating_sub(1),
            TagEnd::Strikethrough => self.strike = self.strike.saturating_sub(1),
            TagEnd::Link => self.link = None,
            _ => {}
        }
    }
}

/// Parse markdown into display lines. Single newlines break lines, matching
/// the HTML renderer.
pub fn parse_markdown_lines(text: &str) -> Vec<StyledLine> {
    let options =
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let mut builder = LineBuilder::default();

    for event in Parser::new_ext(text, options) {
        match event {
            Event::Start(tag) => builder.start(tag),
            Event::End(tag) => builder.end(tag),
            Event::Text(t) if builder.in_code_block => builder.push_code_block_text(&t),
            Event::Text(t) => builder.push_span(&t, false),
            Event::Code(t) => builder.push_span(&t, true),
            Event::SoftBreak | Event::HardBreak => {
                let kind = builder.context_kind();
                builder.begin(kind);
            }
            Event::TaskListMarker(done) => {
                builder.push_span(if done { "☑ " } else { "☐ " }, false);
            }
            Event::Rule => {
                builder.begin(LineKind::Rule);
                builder.flush();
            }
            _ => {}
        }
    }

    builder.flush();
    builder.lines
}

fn heading_size(level: u8) -> f32 {
    match level {
        1 => 20.0,
        2 => 18.0,
        3 => 16.0,
        _ => 15.0,
    }
}

fn span_text(span: &TextSpan, size: f32, color: Color32, heading: bool) -> egui::RichText {
    let mut rich = egui::RichText::new(&span.text).size(size).color(color);
    if span.bold || heading {
        rich = rich.strong();
    }
    if span.italic {
        rich = rich.italics();
    }
    if span.strike {
        rich = rich.strikethrough();
    }
    if span.code {
        rich = rich.code();
    }
    rich
}

/// Render markdown text as styled lines
pub fn render_markdown_text(ui: &mut egui::Ui, text: &str, theme: &ChatTheme) {
    for line in parse_markdown_lines(text) {
        if line.kind == LineKind::Rule {
            ui.separator();
            continue;
        }

        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing.x = 0.0;

            let mut size = BODY_SIZE;
            let mut color = theme.text_primary;
            let mut heading = false;
            match line.kind {
                LineKind::Heading(level) => {
                    size = heading_size(level);
                    heading = true;
                }
                LineKind::Bullet { depth } => {
                    ui.add_space(depth as f32 * INDENT_WIDTH);
                    ui.label(egui::RichText::new("• ").size(size).color(theme.text_secondary));
                }
                LineKind::Numbered { depth, number } => {
                    ui.add_space(depth as f32 * INDENT_WIDTH);
                    ui.label(
                        egui::RichText::new(format!("{}. ", number))
                            .size(size)
                            .color(theme.text_secondary),
                    );
                }
                LineKind::Continuation { depth } => {
                    ui.add_space((depth + 1) as f32 * INDENT_WIDTH);
                }
                LineKind::Quote => {
                    ui.label(egui::RichText::new("▎ ").size(size).color(theme.accent));
                    color = theme.text_secondary;
                }
                _ => {}
            }

            for span in &line.spans {
                let rich = span_text(span, size, color, heading);
                match &span.link {
                    Some(url) => {
                        ui.hyperlink_to(rich.color(theme.accent), url);
                    }
                    None => {
                        ui.label(rich);
                    }
                }
            }
        });
    }
}
