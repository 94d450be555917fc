use regex::Regex;
use std::sync::LazyLock;

use crate::error::{LintError, LintResult};

/// Whitespace directly followed by punctuation ("French" spacing).
static SPACED_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s[.?!,;:]").expect("spacing pattern is valid"));

/// Tildes/whitespace left in front of punctuation once a command is erased.
static DANGLING_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[~\s]+([.?!,;:])").expect("dangling space pattern is valid"));

/// Erases `\name[option]{argument}` invocations of ignored commands.
#[derive(Debug, Clone)]
pub struct CommandStripper {
    commands: Regex,
}

impl CommandStripper {
    /// Build the stripper from command-name regex fragments. Names are
    /// matched case-sensitively; arguments may not contain nested braces.
    pub fn new<S: AsRef<str>>(names: &[S]) -> LintResult<Self> {
        let alternation = names
            .iter()
            .map(|name| name.as_ref())
            .collect::<Vec<&str>>()
            .join("|");
        let pattern = format!(r"\\(?:{alternation})(\[[^\]]*\])?\{{[^{{}}]*\}}");
        let commands = Regex::new(&pattern).map_err(|source| LintError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;
        Ok(Self { commands })
    }

    /// Stripper for user-declared commands followed by the built-in list.
    pub fn with_builtins<S: AsRef<str>>(user: &[S], builtins: &[String]) -> LintResult<Self> {
        let names: Vec<&str> = user
            .iter()
            .map(|name| name.as_ref())
            .chain(builtins.iter().map(String::as_str))
            .collect();
        Self::new(&names)
    }

    pub fn pattern(&self) -> &str {
        self.commands.as_str()
    }

    /// Erase ignored commands from `text`.
    ///
    /// When the incoming `text` never puts whitespace before punctuation,
    /// spacing left dangling in front of punctuation by the erasure is
    /// collapsed too (`word~\cite{x}.` becomes `word.`). Text that already
    /// uses spaced punctuation is left as erased.
    pub fn strip(&self, text: &str) -> String {
        let clear_of_french_spacing = !SPACED_PUNCTUATION.is_match(text);
        let erased = self.commands.replace_all(text, "");
        if !erased.is_empty() && clear_of_french_spacing {
            DANGLING_SPACE.replace_all(&erased, "$1").into_owned()
        } else {
            erased.into_owned()
        }
    }
}
