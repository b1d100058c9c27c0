pub mod highlight;
pub mod markdown;

pub use highlight::SyntectHighlighter;
pub use markdown::MarkdownConverter;

use log::warn;
use thiserror::Error;
use unicode_width::UnicodeWidthStr;

use crate::classifier::Verdict;

/// Floor for every computed render width.
pub const MIN_WIDTH: usize = 80;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("markdown rendering failed: {0}")]
    Markdown(String),
    #[error("syntax highlighting failed: {0}")]
    Highlight(String),
}

/// Renders Markdown source to ANSI-formatted terminal text.
pub trait MarkdownRenderer {
    fn render(&self, text: &str, width: usize) -> Result<String, RenderError>;
}

/// Renders code to ANSI-highlighted terminal text. An empty hint selects
/// a plain-text grammar rather than failing.
pub trait SyntaxHighlighter {
    fn render(&self, text: &str, hint: &str, width: usize) -> Result<String, RenderError>;
}

/// One classify-and-render pass: the full content, its verdict, and the
/// display width to render at. Constructed once, consumed by the
/// dispatcher, discarded after.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub content: String,
    pub verdict: Verdict,
    pub width: usize,
}

impl RenderRequest {
    pub fn new(content: String, verdict: Verdict, width: usize) -> Self {
        Self {
            content,
            verdict,
            width: width.max(1),
        }
    }
}

/// Rendering outcome. `fell_back` records that a collaborator failed and
/// the original content was passed through verbatim instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedOutput {
    pub text: String,
    pub fell_back: bool,
}

/// Routes a render request to the collaborator its verdict names.
/// Rendering failure is never fatal here: every error is absorbed into
/// verbatim passthrough of the original content.
pub struct Dispatcher<M, H> {
    markdown: M,
    highlighter: H,
}

impl<M: MarkdownRenderer, H: SyntaxHighlighter> Dispatcher<M, H> {
    pub fn new(markdown: M, highlighter: H) -> Self {
        Self {
            markdown,
            highlighter,
        }
    }

    pub fn render(&self, request: &RenderRequest) -> FormattedOutput {
        let attempt = match &request.verdict {
            Verdict::Markdown => self.markdown.render(&request.content, request.width),
            Verdict::Code { hint } if !hint.is_empty() => {
                self.highlighter.render(&request.content, hint, request.width)
            }
            // The guaranteed fallback path: no hint means no formatting.
            Verdict::Code { .. } | Verdict::PlainText => {
                return FormattedOutput {
                    text: request.content.clone(),
                    fell_back: false,
                };
            }
        };

        match attempt {
            Ok(text) => FormattedOutput {
                text,
                fell_back: false,
            },
            Err(err) => {
                warn!("{err}; falling back to verbatim output");
                FormattedOutput {
                    text: request.content.clone(),
                    fell_back: true,
                }
            }
        }
    }
}

/// Width for highlighted code: one column wider than the longest line so
/// the highlighter never truncates and the pager can scroll horizontally.
pub fn content_width(content: &str) -> usize {
    let longest = content
        .lines()
        .map(UnicodeWidthStr::width)
        .max()
        .unwrap_or(0);
    (longest + 1).max(MIN_WIDTH)
}

/// Width for Markdown soft wrapping: the terminal's column count when one
/// is attached, floored at [`MIN_WIDTH`].
pub fn terminal_width() -> usize {
    crossterm::terminal::size()
        .map(|(cols, _)| cols as usize)
        .unwrap_or(MIN_WIDTH)
        .max(MIN_WIDTH)
}

/// Default width for a request whose caller gave no override.
pub fn default_width(content: &str, verdict: &Verdict) -> usize {
    match verdict {
        Verdict::Markdown => terminal_width(),
        _ => content_width(content),
    }
}
