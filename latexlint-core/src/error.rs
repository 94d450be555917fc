use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised by the linting core.
///
/// Recoverable problems with individual rule declarations are not errors;
/// they are collected as [`RuleDiagnostic`](crate::rules::RuleDiagnostic)s.
#[derive(Debug, Error)]
pub enum LintError {
    /// The rule set contains nothing but the built-in rules.
    #[error("Define some rules before using")]
    NoRules,

    /// A pattern assembled by the engine failed to compile.
    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type LintResult<T> = std::result::Result<T, LintError>;
