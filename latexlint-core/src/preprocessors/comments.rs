use regex::Regex;
use std::sync::LazyLock;

use super::preprocessor::DocumentPreprocessor;
use crate::types::SourceDocument;

/// A `%` at line start or after any character other than a backslash.
static COMMENT_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^\\])%").expect("comment pattern is valid"));

/// Removes LaTeX `%` comments and surrounding whitespace from every line.
#[derive(Debug, Clone, Default)]
pub struct CommentStripper;

impl CommentStripper {
    pub fn new() -> Self {
        Self
    }

    pub fn strip_line(line: &str) -> String {
        let line = line.trim();
        match COMMENT_START.find(line) {
            // The match ends just past the unescaped `%`
            Some(m) => line[..m.end() - 1].trim_end().to_string(),
            None => line.to_string(),
        }
    }
}

impl DocumentPreprocessor for CommentStripper {
    fn process(&self, mut document: SourceDocument) -> SourceDocument {
        for line in &mut document.lines {
            *line = Self::strip_line(line);
        }
        document
    }

    fn name(&self) -> &str {
        "CommentStripper"
    }
}
