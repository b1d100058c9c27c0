use once_cell::sync::Lazy;
use regex::Regex;

use super::sample::ContentSample;

/// The classifier's output: which rendering strategy applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Render through the Markdown formatter.
    Markdown,
    /// Syntax-highlight with `hint` as the language token. An empty hint
    /// means "unknown format" and is passed through verbatim downstream.
    Code { hint: String },
    /// No signal at all; verbatim passthrough.
    PlainText,
}

impl Verdict {
    pub fn code(hint: &str) -> Self {
        Verdict::Code {
            hint: hint.to_string(),
        }
    }
}

/// First-line rules, evaluated in fixed priority order against the
/// trimmed first leading line. A rule returning None falls through to
/// the next one.
type FirstLineRule = fn(&str) -> Option<&'static str>;

static FIRST_LINE_RULES: &[FirstLineRule] = &[
    yaml_document_marker,
    json_structural_marker,
    shebang_interpreter,
    xml_declaration,
];

/// Shebang interpreter markers, substring-matched in order against the
/// text after `#!`. `/sh` also covers dash and busybox sh.
const SHEBANG_HINTS: &[(&str, &str)] = &[
    ("python", "python"),
    ("bash", "bash"),
    ("/sh", "bash"),
    ("node", "javascript"),
    ("ruby", "ruby"),
    ("perl", "perl"),
];

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

static YAML_KEY_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+:").unwrap());

fn yaml_document_marker(line: &str) -> Option<&'static str> {
    if line == "---" || line.starts_with("%YAML") {
        Some("yaml")
    } else {
        None
    }
}

fn json_structural_marker(line: &str) -> Option<&'static str> {
    if line.starts_with('{') || line.starts_with('[') {
        Some("json")
    } else {
        None
    }
}

fn shebang_interpreter(line: &str) -> Option<&'static str> {
    let interpreter = line.strip_prefix("#!")?;
    SHEBANG_HINTS
        .iter()
        .find(|(marker, _)| interpreter.contains(marker))
        .map(|(_, hint)| *hint)
}

fn xml_declaration(line: &str) -> Option<&'static str> {
    if line.starts_with("<?xml") || line.starts_with("<!DOCTYPE") {
        Some("xml")
    } else {
        None
    }
}

/// Scan the leading lines for a bare `key: value` shape, skipping any
/// number of blank and `#`-comment lines first. Shebang lines are not
/// comments for this purpose; hitting one ends the scan. Only the first
/// qualifying line is tested.
fn yaml_key_scan(lines: &[String]) -> bool {
    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with('#') && !trimmed.starts_with("#!") {
            continue;
        }
        return YAML_KEY_REGEX.is_match(trimmed);
    }
    false
}

/// Classify a sample. Total: every input produces exactly one verdict.
///
/// Priority order is deliberate: the force flag beats the extension,
/// the extension beats content sniffing, and first-line markers beat
/// the comment-skipping YAML scan.
pub fn classify(sample: &ContentSample, force_markdown: bool) -> Verdict {
    if force_markdown {
        return Verdict::Markdown;
    }

    if MARKDOWN_EXTENSIONS.contains(&sample.extension()) {
        return Verdict::Markdown;
    }

    if sample.is_empty() {
        return Verdict::code("");
    }

    if let Some(first) = sample.leading_lines().first() {
        let first = first.trim();
        for rule in FIRST_LINE_RULES {
            if let Some(hint) = rule(first) {
                return Verdict::code(hint);
            }
        }
    }

    if yaml_key_scan(sample.leading_lines()) {
        return Verdict::code("yaml");
    }

    match sample.extension_hint() {
        Some(ext) => Verdict::code(ext),
        None => Verdict::PlainText,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn classify_content(content: &str) -> Verdict {
        classify(&ContentSample::new(content, None), false)
    }

    fn classify_named(content: &str, name: &str) -> Verdict {
        classify(&ContentSample::new(content, Some(Path::new(name))), false)
    }

    #[test]
    fn test_force_markdown_overrides_everything() {
        let sample = ContentSample::new("{\"a\": 1}", Some(Path::new("data.json")));
        assert_eq!(classify(&sample, true), Verdict::Markdown);

        let sample = ContentSample::new("", None);
        assert_eq!(classify(&sample, true), Verdict::Markdown);
    }

    #[test]
    fn test_markdown_extension() {
        assert_eq!(classify_named("anything", "notes.md"), Verdict::Markdown);
        assert_eq!(classify_named("anything", "notes.markdown"), Verdict::Markdown);
    }

    #[test]
    fn test_markdown_extension_case_insensitive() {
        assert_eq!(classify_named("anything", "FILE.MD"), Verdict::Markdown);
        assert_eq!(classify_named("anything", "Test.Md"), Verdict::Markdown);
        assert_eq!(classify_named("anything", "TEST.MARKDOWN"), Verdict::Markdown);
    }

    #[test]
    fn test_empty_content() {
        assert_eq!(classify_content(""), Verdict::code(""));
        assert_eq!(classify_content("   \n\n   "), Verdict::code(""));
    }

    #[test]
    fn test_yaml_document_start() {
        assert_eq!(classify_content("---\nname: test\n"), Verdict::code("yaml"));
        assert_eq!(
            classify_content("%YAML 1.2\n---\nname: test"),
            Verdict::code("yaml")
        );
    }

    #[test]
    fn test_yaml_document_start_beats_later_json() {
        // First-line priority: later lines looking like JSON do not matter.
        assert_eq!(classify_content("---\n{\"a\": 1}\n"), Verdict::code("yaml"));
    }

    #[test]
    fn test_json_markers() {
        assert_eq!(classify_content("{\"key\": \"value\"}"), Verdict::code("json"));
        assert_eq!(classify_content("  {\"key\": \"value\"}"), Verdict::code("json"));
        assert_eq!(classify_content("[1, 2, 3]"), Verdict::code("json"));
        assert_eq!(classify_content("  [1, 2, 3]"), Verdict::code("json"));
    }

    #[test]
    fn test_json_content_beats_extension() {
        assert_eq!(classify_named("{\"a\": 1}", "data.txt"), Verdict::code("json"));
    }

    #[test]
    fn test_python_shebang() {
        assert_eq!(
            classify_content("#!/usr/bin/env python3\nprint('hi')"),
            Verdict::code("python")
        );
        assert_eq!(
            classify_content("#!/usr/bin/python\nprint('hi')"),
            Verdict::code("python")
        );
    }

    #[test]
    fn test_shell_shebangs() {
        assert_eq!(classify_content("#!/bin/bash\necho hi"), Verdict::code("bash"));
        assert_eq!(
            classify_content("#!/usr/bin/env bash\necho hi"),
            Verdict::code("bash")
        );
        assert_eq!(classify_content("#!/bin/sh\necho hi"), Verdict::code("bash"));
    }

    #[test]
    fn test_node_ruby_perl_shebangs() {
        assert_eq!(
            classify_content("#!/usr/bin/env node\nconsole.log('hi')"),
            Verdict::code("javascript")
        );
        assert_eq!(
            classify_content("#!/usr/bin/env ruby\nputs 'hi'"),
            Verdict::code("ruby")
        );
        assert_eq!(
            classify_content("#!/usr/bin/perl\nprint 'hi'"),
            Verdict::code("perl")
        );
    }

    #[test]
    fn test_unrecognized_shebang_falls_through() {
        // The shebang line is not a skippable comment, so the YAML scan
        // stops on it immediately and the sample stays unclassified.
        assert_eq!(
            classify_content("#!/usr/bin/env fish\necho hi"),
            Verdict::PlainText
        );
    }

    #[test]
    fn test_xml_markers() {
        assert_eq!(
            classify_content("<?xml version=\"1.0\"?>\n<root/>"),
            Verdict::code("xml")
        );
        assert_eq!(classify_content("<!DOCTYPE html>\n<html>"), Verdict::code("xml"));
    }

    #[test]
    fn test_yaml_key_value() {
        assert_eq!(
            classify_content("name: test\nversion: 1.0\n"),
            Verdict::code("yaml")
        );
    }

    #[test]
    fn test_yaml_after_comment_header() {
        let content =
            "#\n# This is a comment header\n# More comments\n#\n\nname: test-config\nversion: 1.0\n";
        assert_eq!(classify_content(content), Verdict::code("yaml"));
    }

    #[test]
    fn test_first_non_comment_line_without_colon_stops_scan() {
        let content = "# comment\n\njust text\nname: value\n";
        assert_eq!(classify_content(content), Verdict::PlainText);
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(classify_content("Just some plain text"), Verdict::PlainText);
    }

    #[test]
    fn test_extension_fallback_hint() {
        assert_eq!(classify_named("print(1 + 2)", "script.py"), Verdict::code("py"));
        assert_eq!(classify_named("plain words here", "notes.TXT"), Verdict::code("txt"));
    }

    #[test]
    fn test_numeric_extension_yields_plain_text() {
        assert_eq!(classify_named("groff source", "mdview.1"), Verdict::PlainText);
    }
}
