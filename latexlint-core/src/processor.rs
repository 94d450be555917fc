use crate::config::LintConfig;
use crate::error::LintResult;
use crate::preprocessors::{CommandStripper, CommentStripper, DocumentPreprocessor, MathStripper};
use crate::report::{DocumentReport, LintReport, ViolationTracker};
use crate::rules::{CompiledRules, RuleSet};
use crate::types::{SourceDocument, Violation};
use std::ops::Range;

/// Separator placed between a line and its lookahead inside a window.
pub const LINE_BREAK: char = '\n';

/// Scans documents against a compiled rule set.
///
/// Each line is tested together with the line after it, so a pattern can
/// match across a line break. A match is attributed to the line its start
/// falls on.
pub struct LintProcessor {
    rules: RuleSet,
    commands: CommandStripper,
    preprocessors: Vec<Box<dyn DocumentPreprocessor>>,
    context_chars: usize,
}

impl LintProcessor {
    /// Create a processor with the default preprocessing pipeline
    /// (comments, then math).
    ///
    /// Fails when `rules` holds no user rules or an ignored command name
    /// does not compile.
    pub fn new(rules: RuleSet, ignored_commands: &[String], config: &LintConfig) -> LintResult<Self> {
        rules.ensure_user_rules()?;
        let commands =
            CommandStripper::with_builtins(ignored_commands, &config.builtin_ignored_commands)?;
        tracing::debug!("Ignored command pattern: {}", commands.pattern());

        Ok(Self {
            rules,
            commands,
            preprocessors: vec![Box::new(CommentStripper::new()), Box::new(MathStripper::new())],
            context_chars: config.context_chars,
        })
    }

    /// Create a processor from the output of the rule compiler. Diagnostics
    /// are expected to have been reported by the caller already.
    pub fn from_compiled(compiled: CompiledRules, config: &LintConfig) -> LintResult<Self> {
        Self::new(compiled.rules, &compiled.ignored_commands, config)
    }

    /// Replace the preprocessing pipeline.
    pub fn with_preprocessors(mut self, preprocessors: Vec<Box<dyn DocumentPreprocessor>>) -> Self {
        self.preprocessors = preprocessors;
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Lint every document, keeping their order.
    pub fn lint_documents<I>(&self, documents: I) -> LintReport
    where
        I: IntoIterator<Item = SourceDocument>,
    {
        let documents: Vec<DocumentReport> = documents
            .into_iter()
            .map(|document| self.lint_document(document))
            .collect();
        LintReport { documents }
    }

    /// Preprocess and scan a single document.
    pub fn lint_document(&self, document: SourceDocument) -> DocumentReport {
        let document = self
            .preprocessors
            .iter()
            .fold(document, |document, preprocessor| {
                tracing::trace!("Applying {} to {}", preprocessor.name(), document.name);
                preprocessor.process(document)
            });

        let violations = self.scan_lines(&document.name, &document.lines);
        tracing::info!(
            "{}: {} lines, {} violations",
            document.name,
            document.line_count(),
            violations.len()
        );

        DocumentReport {
            line_count: document.line_count(),
            name: document.name,
            violations,
        }
    }

    /// Scan already-preprocessed lines. Violations come out with lines
    /// ascending, and each (line, rule) pair at most once.
    pub fn scan_lines(&self, file: &str, lines: &[String]) -> Vec<Violation> {
        let mut tracker = ViolationTracker::new();
        let mut violations = Vec::new();

        for (index, line) in lines.iter().enumerate() {
            let first = self.commands.strip(line);
            if first.is_empty() {
                continue;
            }
            let second = match lines.get(index + 1) {
                Some(next) => self.commands.strip(&format!("{LINE_BREAK}{}", next.trim())),
                None => String::new(),
            };
            let window = first + &second;

            let mut found = self.scan_window(file, index, &window);
            // Lookahead matches belong to the next line; keep rule order per line
            found.sort_by_key(|violation| violation.line);

            for violation in found {
                if tracker.record(violation.line, violation.rule) {
                    violations.push(violation);
                } else {
                    tracing::trace!(
                        "Skipping repeated {:?} on {}:{}",
                        violation.rule,
                        file,
                        violation.line
                    );
                }
            }
        }

        violations
    }

    /// Test the window built for line `index` (0-based) against every rule.
    fn scan_window(&self, file: &str, index: usize, window: &str) -> Vec<Violation> {
        let line_break = window.find(LINE_BREAK).unwrap_or(window.len());

        self.rules
            .test_window(window)
            .into_iter()
            .map(|(rule, span)| {
                let on_first_line = span.start < line_break;
                let line = if on_first_line { index + 1 } else { index + 2 };
                Violation {
                    file: file.to_string(),
                    line,
                    snippet: snippet(window, span, line_break, on_first_line, self.context_chars),
                    rule: rule.id,
                    reasoning: rule.reasoning().to_string(),
                }
            })
            .collect()
    }
}

/// Context around `span`: up to `context` characters on each side. Matches
/// on the first line never pull in text past the line break beyond the
/// match itself.
fn snippet(
    window: &str,
    span: Range<usize>,
    line_break: usize,
    on_first_line: bool,
    context: usize,
) -> String {
    let start = chars_before(window, span.start, context);
    let mut end = chars_after(window, span.end, context);
    if on_first_line {
        end = end.min(line_break.max(span.end));
    }
    window[start..end].trim().replace(LINE_BREAK, " ")
}

/// Byte offset `count` characters before `from`, clamped to the start.
fn chars_before(text: &str, from: usize, count: usize) -> usize {
    text[..from]
        .char_indices()
        .rev()
        .take(count)
        .last()
        .map_or(from, |(offset, _)| offset)
}

/// Byte offset `count` characters after `from`, clamped to the end.
fn chars_after(text: &str, from: usize, count: usize) -> usize {
    text[from..]
        .char_indices()
        .nth(count)
        .map_or(text.len(), |(offset, _)| from + offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CategoryTable;
    use crate::rules::RuleCompiler;
    use crate::types::RuleId;
    use pretty_assertions::assert_eq;

    fn processor(declarations: &[&str]) -> LintProcessor {
        let config = LintConfig::default();
        let compiled = RuleCompiler::new(&CategoryTable::default()).compile(declarations);
        LintProcessor::from_compiled(compiled, &config).unwrap()
    }

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn test_requires_user_rules() {
        let config = LintConfig::default();
        let compiled = RuleCompiler::from_config(&config).compile(["# nothing here"]);
        assert!(matches!(
            LintProcessor::from_compiled(compiled, &config),
            Err(crate::error::LintError::NoRules)
        ));
    }

    #[test]
    fn test_single_violation_with_snippet() {
        let processor = processor(&["teh % Spelling: Common misspelling of 'the'"]);
        let violations = processor.scan_lines("a.tex", &lines(&["I saw teh dog."]));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line, 1);
        assert_eq!(violations[0].snippet, "saw teh dog.");
        assert_eq!(violations[0].reasoning, "Spelling: Common misspelling of 'the'");
    }

    #[test]
    fn test_match_before_break_belongs_to_current_line() {
        let processor = processor(&["foo % Phrasing: no foo"]);
        let violations = processor.scan_lines("a.tex", &lines(&["a foo here", "nothing"]));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line, 1);
        assert_eq!(violations[0].snippet, "a foo here");
    }

    #[test]
    fn test_match_after_break_belongs_to_next_line() {
        let processor = processor(&["foo % Phrasing: no foo"]);
        let violations = processor.scan_lines("a.tex", &lines(&["nothing here", "a foo"]));
        // Found once by the lookahead of line 1 and again on line 2's own window
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line, 2);
        // Context before the match reaches back across the line break
        assert_eq!(violations[0].snippet, "re a foo");
    }

    #[test]
    fn test_sentence_across_line_break() {
        let processor = processor(&["foo % Phrasing: no foo"]);
        let violations =
            processor.scan_lines("a.tex", &lines(&["The sentence ends here.", "and continues"]));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, RuleId(0));
        assert_eq!(violations[0].line, 1);
        // Context after the match stops at the line break
        assert_eq!(violations[0].snippet, "here. a");
    }

    #[test]
    fn test_repeated_pair_reported_once() {
        let processor = processor(&["foo % Phrasing: no foo"]);
        let violations =
            processor.scan_lines("a.tex", &lines(&["x", "foo one", "y", "foo two"]));
        let found: Vec<usize> = violations.iter().map(|v| v.line).collect();
        assert_eq!(found, vec![2, 4]);
    }

    #[test]
    fn test_only_first_match_per_window_and_rule() {
        let processor = processor(&["foo % Phrasing: no foo"]);
        let violations = processor.scan_lines("a.tex", &lines(&["foo and foo"]));
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn test_lines_ascending_within_window() {
        let processor = processor(&["bar % Phrasing: no bar", "foo % Phrasing: no foo"]);
        let violations = processor.scan_lines("a.tex", &lines(&["foo", "bar"]));
        let found: Vec<(usize, RuleId)> = violations.iter().map(|v| (v.line, v.rule)).collect();
        assert_eq!(found, vec![(1, RuleId(2)), (2, RuleId(1))]);
    }

    #[test]
    fn test_empty_and_command_only_lines_skipped() {
        let processor = processor(&["figure % Phrasing: say Figure"]);
        let violations = processor.scan_lines(
            "a.tex",
            &lines(&["", r"\label{figure}", r"\begin{figure}"]),
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_ignored_commands_hide_their_arguments() {
        let processor = processor(&["emph % ignoredCommand", "teh % Spelling: typo"]);
        let violations = processor.scan_lines("a.tex", &lines(&[r"An \emph{teh} here"]));
        assert!(violations.is_empty());
    }

    #[test]
    fn test_lint_document_strips_math_and_comments() {
        let processor = processor(&["teh % Spelling: typo"]);
        let document = SourceDocument::from_text(
            "a.tex",
            "Let $teh = 1$ hold. % teh in a comment\n$\nteh\n$\nThen teh end.",
        );
        let report = processor.lint_document(document);
        assert_eq!(report.line_count, 5);
        let found: Vec<usize> = report.violations.iter().map(|v| v.line).collect();
        assert_eq!(found, vec![5]);
    }

    #[test]
    fn test_snippet_context_is_character_based() {
        let processor = processor(&["teh % Spelling: typo"]);
        let violations = processor.scan_lines("a.tex", &lines(&["ééééééé teh ààààààà"]));
        assert_eq!(violations[0].snippet, "éééé teh àààà");
    }

    #[test]
    fn test_chars_helpers_clamp() {
        assert_eq!(chars_before("abc", 1, 5), 0);
        assert_eq!(chars_before("abc", 0, 5), 0);
        assert_eq!(chars_after("abc", 2, 5), 3);
        assert_eq!(chars_after("abcdefgh", 1, 5), 6);
    }
}
