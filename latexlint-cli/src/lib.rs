// All matching logic is in latexlint-core
// This CLI acts as a thin wrapper around the core library

// CLI-specific modules
pub mod app;
pub mod logging;

// Re-export core types for convenience
pub use latexlint_core::*;

// Re-export CLI entry points
pub use app::{run, Cli};
pub use logging::init_tracing;
