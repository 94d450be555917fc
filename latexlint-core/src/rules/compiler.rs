use crate::config::{CategoryTable, LintConfig};
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::collections::HashMap;

use super::engine::{FancyRegexMatcher, Matcher, RegexMatcher, RuleSet};
use crate::types::RuleId;

/// Reasoning token that turns a declaration into an ignored command.
pub const IGNORED_COMMAND: &str = "ignoredCommand";

/// Why a declaration line was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    /// No `%` separator between pattern and reasoning
    Malformed,
    /// The pattern (or command name) is not a valid regex
    InvalidPattern(String),
}

/// A recoverable problem found while compiling rule declarations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleDiagnostic {
    pub line: String,
    pub kind: DiagnosticKind,
}

impl std::fmt::Display for RuleDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            DiagnosticKind::Malformed => {
                write!(f, "The following line is malformed: {}", self.line)
            }
            DiagnosticKind::InvalidPattern(reason) => {
                write!(f, "The following line has an invalid pattern: {} ({reason})", self.line)
            }
        }
    }
}

/// Output of [`RuleCompiler::compile`].
#[derive(Debug)]
pub struct CompiledRules {
    pub rules: RuleSet,
    /// User-declared command names, in declaration order
    pub ignored_commands: Vec<String>,
    pub diagnostics: Vec<RuleDiagnostic>,
}

/// Turns `pattern % Category: reasoning` declarations into a [`RuleSet`].
pub struct RuleCompiler<'a> {
    categories: &'a CategoryTable,
}

impl<'a> RuleCompiler<'a> {
    pub fn new(categories: &'a CategoryTable) -> Self {
        Self { categories }
    }

    pub fn from_config(config: &'a LintConfig) -> Self {
        Self::new(&config.category_policies)
    }

    pub fn compile<I, S>(&self, declarations: I) -> CompiledRules
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules = RuleSet::new();
        let mut ignored_commands = Vec::new();
        let mut diagnostics = Vec::new();
        // (final pattern, case sensitivity) -> rule already holding it
        let mut seen: HashMap<(String, bool), RuleId> = HashMap::new();

        for raw in declarations {
            let line = raw.as_ref().trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((pattern, reasoning)) = line.split_once('%') else {
                tracing::debug!("Malformed rule line: {line}");
                diagnostics.push(RuleDiagnostic {
                    line: line.to_string(),
                    kind: DiagnosticKind::Malformed,
                });
                continue;
            };
            let pattern = pattern.trim().replace('$', r"\b");
            let reasoning = reasoning.trim();

            if reasoning == IGNORED_COMMAND {
                match Regex::new(&format!("(?:{pattern})")) {
                    Ok(_) => ignored_commands.push(pattern),
                    Err(e) => {
                        tracing::debug!("Skipping ignored command {pattern}: {e}");
                        diagnostics.push(RuleDiagnostic {
                            line: line.to_string(),
                            kind: DiagnosticKind::InvalidPattern(e.to_string()),
                        });
                    }
                }
                continue;
            }

            let category = category_of(reasoning);
            let policy = self.categories.policy_for(category);
            let wrapper = if policy.word_boundary { r"\b" } else { "" };
            let source = format!("{wrapper}{}{wrapper}", pattern.replace(' ', r"\s+"));

            let matcher = match build_matcher(&source, policy.case_sensitive) {
                Ok(matcher) => matcher,
                Err(e) => {
                    tracing::debug!("Skipping rule {line}: {e}");
                    diagnostics.push(RuleDiagnostic {
                        line: line.to_string(),
                        kind: DiagnosticKind::InvalidPattern(e.to_string()),
                    });
                    continue;
                }
            };

            let key = (source, policy.case_sensitive);
            if let Some(&existing) = seen.get(&key) {
                tracing::debug!("Rule {} redeclared, keeping latest reasoning", key.0);
                rules.set_reasoning(existing, reasoning);
                continue;
            }

            let id = rules.push(matcher, reasoning);
            seen.insert(key, id);
        }

        tracing::debug!(
            "Compiled {} rules, {} ignored commands, {} diagnostics",
            rules.user_rule_count(),
            ignored_commands.len(),
            diagnostics.len()
        );

        CompiledRules {
            rules,
            ignored_commands,
            diagnostics,
        }
    }
}

/// Category token of a reasoning string: the text before the first `:`.
pub fn category_of(reasoning: &str) -> &str {
    reasoning.split(':').next().unwrap_or_default().trim()
}

/// Compile with the linear-time engine, falling back to the backtracking one
/// for look-around and backreferences.
fn build_matcher(
    source: &str,
    case_sensitive: bool,
) -> Result<Box<dyn Matcher>, fancy_regex::Error> {
    match build_regex(source, case_sensitive) {
        Ok(regex) => Ok(Box::new(RegexMatcher::new(regex, case_sensitive))),
        Err(e) => {
            tracing::debug!("Using backtracking engine for {source}: {e}");
            let matcher = FancyRegexMatcher::build(source, case_sensitive)?;
            Ok(Box::new(matcher))
        }
    }
}

fn build_regex(source: &str, case_sensitive: bool) -> Result<Regex, regex::Error> {
    RegexBuilder::new(source)
        .multi_line(true)
        .unicode(true)
        .case_insensitive(!case_sensitive)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CategoryPolicy;
    use crate::rules::engine::CompiledRule;

    fn compile(lines: &[&str]) -> CompiledRules {
        let table = CategoryTable::default();
        RuleCompiler::new(&table).compile(lines)
    }

    fn user_rule(compiled: &CompiledRules, index: usize) -> &CompiledRule {
        compiled.rules.get(RuleId(index + 1)).unwrap()
    }

    #[test]
    fn test_skips_blank_lines_and_comments() {
        let compiled = compile(&["", "   ", "# a comment", "#teh % Spelling: commented out"]);
        assert_eq!(compiled.rules.user_rule_count(), 0);
        assert!(compiled.diagnostics.is_empty());
    }

    #[test]
    fn test_malformed_line_is_reported_and_skipped() {
        let compiled = compile(&["no separator here", "teh % Spelling: typo"]);
        assert_eq!(compiled.rules.user_rule_count(), 1);
        assert_eq!(
            compiled.diagnostics,
            vec![RuleDiagnostic {
                line: "no separator here".to_string(),
                kind: DiagnosticKind::Malformed,
            }]
        );
        assert_eq!(
            compiled.diagnostics[0].to_string(),
            "The following line is malformed: no separator here"
        );
    }

    #[test]
    fn test_unknown_category_gets_word_boundaries_and_ignores_case() {
        let compiled = compile(&["foo bar % Style: avoid foo bar"]);
        let rule = user_rule(&compiled, 0);
        assert_eq!(rule.pattern(), r"\bfoo\s+bar\b");
        assert!(rule.find("FOO   Bar").is_some());
        assert!(rule.find("foobar").is_none());
        assert!(rule.find("xfoo bar").is_none());
    }

    #[test]
    fn test_reasoning_without_category_uses_fallback() {
        let compiled = compile(&["utilize % just say use"]);
        let rule = user_rule(&compiled, 0);
        assert_eq!(rule.pattern(), r"\butilize\b");
        assert!(rule.find("We Utilize it").is_some());
        assert_eq!(rule.reasoning(), "just say use");
    }

    #[test]
    fn test_capitalization_category_is_case_sensitive() {
        let compiled = compile(&["latex % Capitalization: Write LaTeX"]);
        let rule = user_rule(&compiled, 0);
        assert!(rule.find("we use latex here").is_some());
        assert!(rule.find("we use LaTeX here").is_none());
    }

    #[test]
    fn test_dollar_becomes_word_boundary() {
        let compiled = compile(&["$in order to$ % Phrasing: just say to"]);
        let rule = user_rule(&compiled, 0);
        assert_eq!(rule.pattern(), r"\b\bin\s+order\s+to\b\b");
        assert!(rule.find("in order to win").is_some());
    }

    #[test]
    fn test_look_around_rules_compile() {
        let compiled = compile(&[
            "data (?!set) % Phrasing: data is plural",
            "teh % Spelling: typo",
        ]);
        assert!(compiled.diagnostics.is_empty());
        assert_eq!(compiled.rules.user_rule_count(), 2);

        let rule = user_rule(&compiled, 0);
        assert_eq!(rule.pattern(), r"\bdata\s+(?!set)\b");
        assert!(rule.find("the Data are in").is_some());
        assert!(rule.find("the data set is").is_none());
    }

    #[test]
    fn test_backreference_rule_compiles() {
        let compiled = compile(&[r"(\w+) \1 % Phrasing: repeated word"]);
        assert!(compiled.diagnostics.is_empty());
        let rule = user_rule(&compiled, 0);
        assert_eq!(rule.find("and the the cat"), Some(4..11));
        assert!(rule.find("and the cat").is_none());
    }

    #[test]
    fn test_config_policy_without_boundary() {
        let mut table = CategoryTable::default();
        table.categories.insert(
            "Spacing".to_string(),
            CategoryPolicy {
                word_boundary: false,
                case_sensitive: false,
            },
        );
        let compiled = RuleCompiler::new(&table).compile(["word , % Spacing: no space before comma"]);
        let rule = compiled.rules.get(RuleId(1)).unwrap();
        assert_eq!(rule.pattern(), r"word\s+,");
        assert!(rule.find("a keyword , next").is_some());
    }

    #[test]
    fn test_split_on_first_percent_only() {
        let compiled = compile(&["percent % Spelling: use \\% for 50% literal"]);
        assert_eq!(
            user_rule(&compiled, 0).reasoning(),
            "Spelling: use \\% for 50% literal"
        );
    }

    #[test]
    fn test_ignored_commands_are_collected_verbatim() {
        let compiled = compile(&["emph % ignoredCommand", "Eqref % ignoredCommand"]);
        assert_eq!(compiled.ignored_commands, vec!["emph", "Eqref"]);
        assert_eq!(compiled.rules.user_rule_count(), 0);
    }

    #[test]
    fn test_invalid_pattern_is_diagnostic() {
        let compiled = compile(&["(unclosed % Phrasing: broken", "ok % Phrasing: fine"]);
        assert_eq!(compiled.rules.user_rule_count(), 1);
        assert!(matches!(
            compiled.diagnostics[0].kind,
            DiagnosticKind::InvalidPattern(_)
        ));
    }

    #[test]
    fn test_duplicate_declaration_keeps_first_slot_and_last_reasoning() {
        let compiled = compile(&[
            "teh % Spelling: first",
            "recieve % Spelling: i before e",
            "teh % Spelling: second",
        ]);
        assert_eq!(compiled.rules.user_rule_count(), 2);
        assert_eq!(user_rule(&compiled, 0).pattern(), r"\bteh\b");
        assert_eq!(user_rule(&compiled, 0).reasoning(), "Spelling: second");
        assert_eq!(user_rule(&compiled, 1).pattern(), r"\brecieve\b");
    }

    #[test]
    fn test_category_of() {
        assert_eq!(category_of("Spelling: typo"), "Spelling");
        assert_eq!(category_of(" Phrasing :x"), "Phrasing");
        assert_eq!(category_of("no colon"), "no colon");
    }
}
