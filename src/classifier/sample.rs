use std::path::Path;

/// Number of leading lines inspected during classification.
pub const LEADING_LINES: usize = 20;

/// The subject under classification: a snapshot of the fields the
/// detection rules look at. Built once per invocation and never mutated.
#[derive(Debug, Clone)]
pub struct ContentSample {
    filename: Option<String>,
    extension: String,
    leading_lines: Vec<String>,
    is_empty: bool,
}

impl ContentSample {
    /// Build a sample from raw content and an optional source path.
    /// Stream input has no path; extension and filename stay empty.
    pub fn new(content: &str, path: Option<&Path>) -> Self {
        let filename = path
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned());

        let extension = path
            .and_then(|p| p.extension())
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let leading_lines = content
            .lines()
            .take(LEADING_LINES)
            .map(str::to_string)
            .collect();

        Self {
            filename,
            extension,
            leading_lines,
            is_empty: content.trim().is_empty(),
        }
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Lowercased extension without the leading dot, empty when absent.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn leading_lines(&self) -> &[String] {
        &self.leading_lines
    }

    /// True for empty or whitespace-only content.
    pub fn is_empty(&self) -> bool {
        self.is_empty
    }

    /// Extension usable as a highlighter hint: present and not purely
    /// numeric (backup file suffixes like `.1` carry no format signal).
    pub fn extension_hint(&self) -> Option<&str> {
        if self.extension.is_empty() || self.extension.chars().all(|c| c.is_ascii_digit()) {
            None
        } else {
            Some(&self.extension)
        }
    }
}
