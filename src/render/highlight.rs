use once_cell::sync::Lazy;
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::{as_24_bit_terminal_escaped, LinesWithEndings};

use super::{RenderError, SyntaxHighlighter};

pub const DEFAULT_THEME: &str = "base16-ocean.dark";

// Syntax and theme definitions are expensive to load; share them across
// calls. Read-only after construction.
static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

/// Syntax highlighter over syntect's bundled grammars, emitting 24-bit
/// ANSI escape sequences.
#[derive(Debug, Clone)]
pub struct SyntectHighlighter {
    theme: String,
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new(DEFAULT_THEME)
    }
}

impl SyntectHighlighter {
    pub fn new(theme: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
        }
    }
}

/// Resolve a hint (language name or file extension) to a grammar. An
/// unknown or empty hint selects the plain-text grammar, never an error.
fn lookup_syntax(hint: &str) -> &'static SyntaxReference {
    if hint.is_empty() {
        return SYNTAX_SET.find_syntax_plain_text();
    }
    SYNTAX_SET
        .find_syntax_by_token(hint)
        .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text())
}

impl SyntaxHighlighter for SyntectHighlighter {
    // Width is advisory: syntect never truncates, so lines keep their
    // full length and the pager scrolls horizontally.
    fn render(&self, text: &str, hint: &str, _width: usize) -> Result<String, RenderError> {
        let theme = THEME_SET
            .themes
            .get(&self.theme)
            .ok_or_else(|| RenderError::Highlight(format!("unknown theme: {}", self.theme)))?;

        let syntax = lookup_syntax(hint);
        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut out = String::with_capacity(text.len() * 2);
        for line in LinesWithEndings::from(text) {
            let regions = highlighter
                .highlight_line(line, &SYNTAX_SET)
                .map_err(|e| RenderError::Highlight(e.to_string()))?;
            out.push_str(&as_24_bit_terminal_escaped(&regions, false));
        }
        out.push_str("\x1b[0m");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::SyntaxHighlighter;

    #[test]
    fn test_known_hint_emits_escapes() {
        let highlighter = SyntectHighlighter::default();
        let out = highlighter.render("{\"a\": 1}\n", "json", 80).unwrap();
        assert!(out.contains("\x1b[38;2;"));
        assert!(out.contains('a'));
    }

    #[test]
    fn test_unknown_hint_falls_back_to_plain_text() {
        let highlighter = SyntectHighlighter::default();
        let out = highlighter
            .render("hello world\n", "no-such-language", 80)
            .unwrap();
        assert!(out.contains("hello world"));
    }

    #[test]
    fn test_empty_hint_is_not_an_error() {
        let highlighter = SyntectHighlighter::default();
        assert!(highlighter.render("plain\n", "", 80).is_ok());
    }

    #[test]
    fn test_unknown_theme_is_an_error() {
        let highlighter = SyntectHighlighter::new("no-such-theme");
        assert!(highlighter.render("x\n", "json", 80).is_err());
    }

    #[test]
    fn test_highlighting_is_deterministic() {
        let highlighter = SyntectHighlighter::default();
        let text = "name: test\nversion: 1.0\n";
        let first = highlighter.render(text, "yaml", 80).unwrap();
        let second = highlighter.render(text, "yaml", 80).unwrap();
        assert_eq!(first, second);
    }
}
