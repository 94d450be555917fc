use serde::{Deserialize, Serialize};

/// Position of a rule inside its [`RuleSet`](crate::rules::RuleSet).
/// Used as the rule's identity when deduplicating violations.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct RuleId(pub usize);

// ===== DOCUMENT TYPES =====

/// One LaTeX source file, already split into lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Name shown in reports (the path as it was discovered)
    pub name: String,
    /// Lines in source order; reported 1-indexed
    pub lines: Vec<String>,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            name: name.into(),
            lines,
        }
    }

    /// Build a document from raw text, one entry per line.
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        Self::new(name, text.lines().map(str::to_string).collect())
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

// ===== VIOLATION TYPES =====

/// A rule match resolved to a physical line of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub file: String,
    /// 1-indexed physical line the match is attributed to
    pub line: usize,
    /// Text around the match, line breaks collapsed to spaces
    pub snippet: String,
    #[serde(skip)]
    pub rule: RuleId,
    /// User-supplied reasoning, verbatim
    pub reasoning: String,
}
