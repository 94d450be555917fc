// LaTeX Lint Core Library
//
// Compiles user-authored rule sets into matchers and scans LaTeX sources
// for text that breaks them. Main interface for turning rule declarations
// plus documents into an ordered violation report.

pub mod config;
pub mod error;
pub mod preprocessors;
pub mod processor;
pub mod report;
pub mod rules;
pub mod sources;
pub mod types;

// Re-export main types and functions for easy use
pub use config::{CategoryPolicy, CategoryTable, LintConfig};
pub use error::{LintError, LintResult};
pub use processor::LintProcessor;
pub use report::{DocumentReport, LintReport, ReportFormat};
pub use rules::{CompiledRules, RuleCompiler, RuleDiagnostic, RuleSet};
pub use types::*;
