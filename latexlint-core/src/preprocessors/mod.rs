//! Document Preprocessors
//!
//! This module removes text that would otherwise produce false positives
//! before any rule sees it.
//!
//! ## Architecture
//!
//! ```text
//! SourceDocument (raw lines)
//!     ↓
//! [CommentStripper]   once per document
//!     ↓
//! [MathStripper]      once per document, toggle carried across lines
//!     ↓
//! SourceDocument (clean lines)
//!     ↓
//! [CommandStripper]   per scanned window half
//!     ↓
//! Line-window scanner
//! ```

pub mod commands;
pub mod comments;
pub mod math;
pub mod preprocessor;

// Re-export main types
pub use commands::CommandStripper;
pub use comments::CommentStripper;
pub use math::MathStripper;
pub use preprocessor::DocumentPreprocessor;
