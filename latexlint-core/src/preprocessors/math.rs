use super::preprocessor::DocumentPreprocessor;
use crate::types::SourceDocument;

/// Delimiter that toggles literal-math mode.
pub const MATH_DELIMITER: char = '$';

/// Drops everything between `$` delimiters, including the delimiters.
///
/// The toggle is threaded through the document's lines in order, so a span
/// opened on one line and closed on a later one removes the text in between.
/// It always starts off at the top of a document.
#[derive(Debug, Clone, Default)]
pub struct MathStripper;

impl MathStripper {
    pub fn new() -> Self {
        Self
    }

    /// Strip one line given the math state at its start. Returns the kept
    /// text and the state at its end.
    pub fn strip_line(line: &str, in_math: bool) -> (String, bool) {
        line.chars()
            .fold((String::with_capacity(line.len()), in_math), |(mut kept, in_math), c| {
                if c == MATH_DELIMITER {
                    (kept, !in_math)
                } else {
                    if !in_math {
                        kept.push(c);
                    }
                    (kept, in_math)
                }
            })
    }

    /// Strip a whole line sequence, starting outside math mode.
    pub fn strip_lines(lines: &[String]) -> Vec<String> {
        lines
            .iter()
            .scan(false, |in_math, line| {
                let (kept, still_in_math) = Self::strip_line(line, *in_math);
                *in_math = still_in_math;
                Some(kept)
            })
            .collect()
    }
}

impl DocumentPreprocessor for MathStripper {
    fn process(&self, document: SourceDocument) -> SourceDocument {
        let lines = Self::strip_lines(&document.lines);
        SourceDocument { lines, ..document }
    }

    fn name(&self) -> &str {
        "MathStripper"
    }
}
