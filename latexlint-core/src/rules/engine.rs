use crate::error::LintError;
use crate::types::RuleId;
use regex::Regex;
use std::ops::Range;

use super::builtin::SentenceCapitalizationMatcher;

/// A compiled matcher. Implementations hold no per-call state, so one matcher
/// is shared across every window of every document.
pub trait Matcher: Send + Sync {
    /// Byte span of the first match in `window`, if any.
    fn find(&self, window: &str) -> Option<Range<usize>>;

    /// Source of the underlying pattern, for logs and duplicate detection.
    fn pattern(&self) -> &str;
}

/// Matcher backed by a single regex.
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    regex: Regex,
    case_sensitive: bool,
}

impl RegexMatcher {
    pub fn new(regex: Regex, case_sensitive: bool) -> Self {
        Self {
            regex,
            case_sensitive,
        }
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}

impl Matcher for RegexMatcher {
    fn find(&self, window: &str) -> Option<Range<usize>> {
        self.regex.find(window).map(|m| m.range())
    }

    fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

/// Matcher backed by a backtracking regex. Only used for patterns the
/// linear-time engine rejects, such as look-around and backreferences.
#[derive(Debug, Clone)]
pub struct FancyRegexMatcher {
    regex: fancy_regex::Regex,
    source: String,
}

impl FancyRegexMatcher {
    /// Compile `source` with multi-line anchors, ignoring case unless
    /// `case_sensitive` is set.
    pub fn build(source: &str, case_sensitive: bool) -> Result<Self, fancy_regex::Error> {
        let flags = if case_sensitive { "(?m)" } else { "(?mi)" };
        let regex = fancy_regex::Regex::new(&format!("{flags}{source}"))?;
        Ok(Self {
            regex,
            source: source.to_string(),
        })
    }
}

impl Matcher for FancyRegexMatcher {
    fn find(&self, window: &str) -> Option<Range<usize>> {
        match self.regex.find(window) {
            Ok(found) => found.map(|m| m.start()..m.end()),
            // Backtrack limit exceeded
            Err(e) => {
                tracing::warn!("⚠️  Giving up on pattern {}: {e}", self.source);
                None
            }
        }
    }

    fn pattern(&self) -> &str {
        &self.source
    }
}

/// A matcher paired with the reasoning shown when it fires.
pub struct CompiledRule {
    pub id: RuleId,
    matcher: Box<dyn Matcher>,
    reasoning: String,
}

impl CompiledRule {
    pub fn new(id: RuleId, matcher: Box<dyn Matcher>, reasoning: impl Into<String>) -> Self {
        Self {
            id,
            matcher,
            reasoning: reasoning.into(),
        }
    }

    pub fn find(&self, window: &str) -> Option<Range<usize>> {
        self.matcher.find(window)
    }

    pub fn pattern(&self) -> &str {
        self.matcher.pattern()
    }

    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }
}

impl std::fmt::Debug for CompiledRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledRule")
            .field("id", &self.id)
            .field("pattern", &self.pattern())
            .field("reasoning", &self.reasoning)
            .finish()
    }
}

/// Ordered, immutable collection of compiled rules. The built-in rules always
/// come first; user rules follow in declaration order.
#[derive(Debug)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
    builtin_count: usize,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleSet {
    /// A rule set holding only the built-in rules.
    pub fn new() -> Self {
        let rules = vec![CompiledRule::new(
            RuleId(0),
            Box::new(SentenceCapitalizationMatcher::new()),
            SentenceCapitalizationMatcher::REASONING,
        )];
        let builtin_count = rules.len();
        Self {
            rules,
            builtin_count,
        }
    }

    /// Append a user rule and return its id.
    pub fn push(&mut self, matcher: Box<dyn Matcher>, reasoning: impl Into<String>) -> RuleId {
        let id = RuleId(self.rules.len());
        self.rules.push(CompiledRule::new(id, matcher, reasoning));
        id
    }

    /// Replace the reasoning of an existing rule. Returns false for unknown ids.
    pub fn set_reasoning(&mut self, id: RuleId, reasoning: impl Into<String>) -> bool {
        match self.rules.get_mut(id.0) {
            Some(rule) => {
                rule.reasoning = reasoning.into();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: RuleId) -> Option<&CompiledRule> {
        self.rules.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of rules that came from user declarations.
    pub fn user_rule_count(&self) -> usize {
        self.rules.len() - self.builtin_count
    }

    /// Fails with [`LintError::NoRules`] when no user rule was compiled.
    pub fn ensure_user_rules(&self) -> Result<(), LintError> {
        if self.user_rule_count() == 0 {
            return Err(LintError::NoRules);
        }
        Ok(())
    }

    /// Every rule that fires on `window`, in rule order, with its match span.
    pub fn test_window<'a>(&'a self, window: &str) -> Vec<(&'a CompiledRule, Range<usize>)> {
        self.rules
            .iter()
            .filter_map(|rule| rule.find(window).map(|span| (rule, span)))
            .collect()
    }
}
