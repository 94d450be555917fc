use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_context_chars() -> usize {
    5 // characters kept on each side of a match in report snippets
}

fn default_rules_dir_name() -> String {
    ".latex-rules".to_string()
}

fn default_ignored_commands() -> Vec<String> {
    vec![
        "begin".to_string(),
        "bibliography".to_string(),
        "cite".to_string(),
        "documentclass".to_string(),
        "end".to_string(),
        "figure".to_string(),
        "includegraphics".to_string(),
        "input".to_string(),
        "label".to_string(),
        "newcommand".to_string(),
        "table".to_string(),
        "texttt".to_string(),
        "todo".to_string(),
        r"(auto)?ref".to_string(),
    ]
}

fn default_categories() -> BTreeMap<String, CategoryPolicy> {
    let mut categories = BTreeMap::new();
    categories.insert(
        "Capitalization".to_string(),
        CategoryPolicy {
            word_boundary: true,
            case_sensitive: true,
        },
    );
    categories.insert("Phrasing".to_string(), CategoryPolicy::default());
    categories.insert("Spelling".to_string(), CategoryPolicy::default());
    categories
}

/// Matching policy attached to a rule category (the token before the first
/// `:` of a rule's reasoning).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPolicy {
    /// Wrap the rule pattern in `\b` on both sides
    #[serde(default = "default_true")]
    pub word_boundary: bool,
    /// Match letter case exactly
    #[serde(default)]
    pub case_sensitive: bool,
}

impl Default for CategoryPolicy {
    /// Policy for categories missing from the table: word boundaries, any case.
    fn default() -> Self {
        Self {
            word_boundary: true,
            case_sensitive: false,
        }
    }
}

/// Finite category → policy table handed to the rule compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTable {
    #[serde(default = "default_categories")]
    pub categories: BTreeMap<String, CategoryPolicy>,
    /// Policy used for categories that are not listed
    #[serde(default)]
    pub fallback: CategoryPolicy,
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            fallback: CategoryPolicy::default(),
        }
    }
}

impl CategoryTable {
    pub fn policy_for(&self, category: &str) -> CategoryPolicy {
        self.categories
            .get(category)
            .copied()
            .unwrap_or(self.fallback)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintConfig {
    /// Boundary/case policy per rule category
    #[serde(default)]
    pub category_policies: CategoryTable,
    /// Commands always erased before scanning, in addition to user-declared ones
    #[serde(default = "default_ignored_commands")]
    pub builtin_ignored_commands: Vec<String>,
    /// Characters of context on each side of a match in report snippets
    #[serde(default = "default_context_chars")]
    pub context_chars: usize,
    /// Rule-set directory looked up under the home directory when none is given
    #[serde(default = "default_rules_dir_name")]
    pub rules_dir_name: String,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            category_policies: CategoryTable::default(),
            builtin_ignored_commands: default_ignored_commands(),
            context_chars: default_context_chars(),
            rules_dir_name: default_rules_dir_name(),
        }
    }
}

impl LintConfig {
    /// Load config from a YAML file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: LintConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load config with fallback to default
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|e| {
                tracing::warn!("⚠️  Failed to load config from {p} ({e}), using defaults");
                Self::default()
            }),
            None => Self::default(),
        }
    }
}
