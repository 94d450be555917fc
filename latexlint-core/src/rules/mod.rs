// Main rules module - delegates to semantic sub-modules
// - engine.rs: Matcher trait, CompiledRule and the ordered RuleSet
// - builtin.rs: rules that exist regardless of user declarations
// - compiler.rs: turns rule-set declarations into a RuleSet

pub mod builtin;
pub mod compiler;
pub mod engine;

pub use builtin::SentenceCapitalizationMatcher;
pub use compiler::{CompiledRules, DiagnosticKind, RuleCompiler, RuleDiagnostic};
pub use engine::{CompiledRule, Matcher, RegexMatcher, RuleSet};
