// Preprocessor abstraction for document cleanup
//
// This module defines the boundary between reading a document (file -> lines)
// and scanning it (lines -> violations). Every preprocessor rewrites the
// whole line sequence of one document, so state that spans lines (such as
// the math-mode toggle) lives inside a single call and never leaks into the
// next document.

use crate::types::SourceDocument;

/// Preprocessor trait - rewrites a document's lines before scanning
///
/// Preprocessors run in sequence, once per document, in the order the
/// processor holds them:
/// 1. Comment stripping (raw source -> text without `%` comments)
/// 2. Math stripping (text -> text without `$...$` spans)
pub trait DocumentPreprocessor {
    /// Rewrite the document's lines. Line count and order are preserved.
    fn process(&self, document: SourceDocument) -> SourceDocument;

    /// Get preprocessor name for debugging/logging
    fn name(&self) -> &str;
}
