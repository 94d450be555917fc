use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

use super::engine::Matcher;

/// A period, whitespace, then a lowercase letter.
static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.\s+[a-z]").expect("sentence break pattern is valid"));

/// Flags a sentence that starts with a lowercase letter.
///
/// The regex crate has no lookbehind, so the abbreviation exclusions are
/// applied to the text in front of each candidate instead: a candidate whose
/// period directly follows one of [`Self::ABBREVIATIONS`] is skipped and the
/// search moves on to the next one.
#[derive(Debug, Clone, Default)]
pub struct SentenceCapitalizationMatcher;

impl SentenceCapitalizationMatcher {
    pub const REASONING: &'static str = "Capitalization: Sentences start with capital letters";

    /// Latin abbreviations that legitimately end in a period mid-sentence.
    pub const ABBREVIATIONS: [&'static str; 4] = ["etc", "seq", "al", "etal"];

    pub fn new() -> Self {
        Self
    }

    fn is_abbreviation(prefix: &str) -> bool {
        Self::ABBREVIATIONS
            .iter()
            .any(|abbreviation| prefix.ends_with(abbreviation))
    }
}

impl Matcher for SentenceCapitalizationMatcher {
    fn find(&self, window: &str) -> Option<Range<usize>> {
        SENTENCE_BREAK
            .find_iter(window)
            .find(|m| !Self::is_abbreviation(&window[..m.start()]))
            .map(|m| m.range())
    }

    fn pattern(&self) -> &str {
        r"(?<!(etc|seq))(?<!(al))(?<!(etal))\.\s+[a-z]"
    }
}
