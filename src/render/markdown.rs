use colored::Colorize;
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use unicode_width::UnicodeWidthStr;

use super::{MarkdownRenderer, RenderError};

/// Event-driven Markdown-to-ANSI converter. Soft-wraps paragraph text at
/// the request width; long lines wrap rather than getting clipped.
#[derive(Debug, Default)]
pub struct MarkdownConverter;

impl MarkdownConverter {
    pub fn new() -> Self {
        Self
    }
}

impl MarkdownRenderer for MarkdownConverter {
    fn render(&self, text: &str, width: usize) -> Result<String, RenderError> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        let mut writer = AnsiWriter::new(width);
        for event in Parser::new_ext(text, options) {
            writer.handle(event);
        }
        Ok(writer.finish())
    }
}

/// A pre-styled word plus the display width of its unstyled text, the
/// unit the line-flow algorithm works in.
struct Word {
    text: String,
    width: usize,
}

struct AnsiWriter {
    out: String,
    width: usize,
    words: Vec<Word>,
    bold: usize,
    italic: usize,
    strike: usize,
    heading: Option<HeadingLevel>,
    quote_depth: usize,
    list_stack: Vec<Option<u64>>,
    item_prefix: Option<String>,
    in_code_block: bool,
    code_buf: String,
    link_dest: Option<String>,
}

impl AnsiWriter {
    fn new(width: usize) -> Self {
        Self {
            out: String::new(),
            width: width.max(20),
            words: Vec::new(),
            bold: 0,
            italic: 0,
            strike: 0,
            heading: None,
            quote_depth: 0,
            list_stack: Vec::new(),
            item_prefix: None,
            in_code_block: false,
            code_buf: String::new(),
            link_dest: None,
        }
    }

    fn handle(&mut self, event: Event) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                let width = code.width();
                self.words.push(Word {
                    text: code.yellow().to_string(),
                    width,
                });
            }
            Event::SoftBreak => {}
            Event::HardBreak => self.flush_words(),
            Event::Rule => {
                self.flush_words();
                let rule = "─".repeat(self.width.min(80));
                self.out.push_str(&rule.dimmed().to_string());
                self.out.push('\n');
                self.ensure_blank_line();
            }
            Event::TaskListMarker(done) => {
                let marker = if done { "[x]" } else { "[ ]" };
                self.words.push(Word {
                    text: marker.to_string(),
                    width: 3,
                });
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                let trimmed = html.trim();
                if !trimmed.is_empty() {
                    let width = trimmed.width();
                    self.words.push(Word {
                        text: trimmed.dimmed().to_string(),
                        width,
                    });
                }
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag) {
        match tag {
            Tag::Paragraph => {}
            Tag::Heading { level, .. } => {
                self.flush_words();
                self.heading = Some(level);
            }
            Tag::BlockQuote(_) => {
                self.flush_paragraph();
                self.quote_depth += 1;
            }
            // Fence language is ignored; code blocks inside Markdown
            // render monochrome.
            Tag::CodeBlock(_) => {
                self.flush_paragraph();
                self.in_code_block = true;
            }
            Tag::List(start) => {
                self.flush_words();
                self.list_stack.push(start);
            }
            Tag::Item => {
                self.flush_words();
                let marker = match self.list_stack.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.item_prefix = Some(marker);
            }
            Tag::Emphasis => self.italic += 1,
            Tag::Strong => self.bold += 1,
            Tag::Strikethrough => self.strike += 1,
            Tag::Link { dest_url, .. } => self.link_dest = Some(dest_url.to_string()),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.flush_paragraph(),
            TagEnd::Heading(level) => self.emit_heading(level),
            TagEnd::BlockQuote(_) => {
                self.flush_paragraph();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            TagEnd::CodeBlock => self.emit_code_block(),
            TagEnd::List(_) => {
                self.flush_words();
                self.list_stack.pop();
                if self.list_stack.is_empty() {
                    self.ensure_blank_line();
                }
            }
            TagEnd::Item => self.flush_words(),
            TagEnd::Emphasis => self.italic = self.italic.saturating_sub(1),
            TagEnd::Strong => self.bold = self.bold.saturating_sub(1),
            TagEnd::Strikethrough => self.strike = self.strike.saturating_sub(1),
            TagEnd::Link => {
                if let Some(dest) = self.link_dest.take() {
                    let width = dest.width() + 2;
                    self.words.push(Word {
                        text: format!("<{dest}>").dimmed().to_string(),
                        width,
                    });
                }
            }
            TagEnd::HtmlBlock => self.flush_paragraph(),
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_code_block {
            self.code_buf.push_str(text);
            return;
        }
        // Heading words stay unstyled; the whole line is styled at once
        // when the heading ends.
        let plain = self.heading.is_some();
        for token in text.split_whitespace() {
            let width = token.width();
            let styled = if plain {
                token.to_string()
            } else {
                self.style(token)
            };
            self.words.push(Word {
                text: styled,
                width,
            });
        }
    }

    fn style(&self, token: &str) -> String {
        let mut styled = token.normal();
        if self.bold > 0 {
            styled = styled.bold();
        }
        if self.italic > 0 {
            styled = styled.italic();
        }
        if self.strike > 0 {
            styled = styled.strikethrough();
        }
        styled.to_string()
    }

    fn emit_heading(&mut self, level: HeadingLevel) {
        let words = std::mem::take(&mut self.words);
        let text = words
            .into_iter()
            .map(|w| w.text)
            .collect::<Vec<_>>()
            .join(" ");
        let styled = match level {
            HeadingLevel::H1 => text.as_str().bold().underline(),
            HeadingLevel::H2 => text.as_str().bold().cyan(),
            HeadingLevel::H3 => text.as_str().bold().blue(),
            _ => text.as_str().bold(),
        };
        self.out.push_str(&styled.to_string());
        self.out.push('\n');
        self.ensure_blank_line();
        self.heading = None;
    }

    fn emit_code_block(&mut self) {
        let buf = std::mem::take(&mut self.code_buf);
        for line in buf.lines() {
            self.out.push_str("    ");
            self.out.push_str(&line.cyan().to_string());
            self.out.push('\n');
        }
        self.in_code_block = false;
        self.ensure_blank_line();
    }

    /// Flow the buffered words onto lines no wider than the render width,
    /// honoring the quote prefix, list indentation, and a hanging indent
    /// under the item marker.
    fn flush_words(&mut self) {
        if self.words.is_empty() {
            self.item_prefix = None;
            return;
        }

        let quote = "> ".repeat(self.quote_depth);
        let mut first_prefix = quote.clone();
        let mut cont_prefix = quote;
        if !self.list_stack.is_empty() {
            let indent = "  ".repeat(self.list_stack.len() - 1);
            first_prefix.push_str(&indent);
            cont_prefix.push_str(&indent);
        }
        if let Some(marker) = self.item_prefix.take() {
            cont_prefix.push_str(&" ".repeat(marker.width()));
            first_prefix.push_str(&marker);
        }

        let avail = self.width.saturating_sub(cont_prefix.width()).max(10);
        let words = std::mem::take(&mut self.words);

        let mut prefix = first_prefix;
        let mut line = String::new();
        let mut line_width = 0usize;
        for word in words {
            let sep = usize::from(!line.is_empty());
            if !line.is_empty() && line_width + sep + word.width > avail {
                self.out.push_str(&prefix);
                self.out.push_str(&line);
                self.out.push('\n');
                prefix = cont_prefix.clone();
                line.clear();
                line_width = 0;
            }
            if !line.is_empty() {
                line.push(' ');
                line_width += 1;
            }
            line.push_str(&word.text);
            line_width += word.width;
        }
        if !line.is_empty() {
            self.out.push_str(&prefix);
            self.out.push_str(&line);
            self.out.push('\n');
        }
    }

    fn flush_paragraph(&mut self) {
        self.flush_words();
        self.ensure_blank_line();
    }

    fn ensure_blank_line(&mut self) {
        if self.out.is_empty() || self.out.ends_with("\n\n") {
            return;
        }
        if !self.out.ends_with('\n') {
            self.out.push('\n');
        }
        self.out.push('\n');
    }

    fn finish(mut self) -> String {
        self.flush_words();
        while self.out.ends_with("\n\n") {
            self.out.pop();
        }
        self.out
    }
}
