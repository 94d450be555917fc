//! Violation deduplication and report rendering.

use crate::types::{RuleId, Violation};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Remembers which rules were already reported on each line of one document.
#[derive(Debug, Default)]
pub struct ViolationTracker {
    reported: BTreeMap<usize, BTreeSet<RuleId>>,
}

impl ViolationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `rule` on `line`. Returns false if the pair was already recorded.
    pub fn record(&mut self, line: usize, rule: RuleId) -> bool {
        self.reported.entry(line).or_default().insert(rule)
    }

    pub fn contains(&self, line: usize, rule: RuleId) -> bool {
        self.reported
            .get(&line)
            .is_some_and(|rules| rules.contains(&rule))
    }
}

/// Violations of a single document, lines ascending.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub name: String,
    pub line_count: usize,
    pub violations: Vec<Violation>,
}

impl DocumentReport {
    /// Render every violation as `file:LINE:(snippet) - reasoning`.
    pub fn to_lines(&self) -> Vec<String> {
        let width = line_number_width(self.line_count);
        self.violations
            .iter()
            .map(|violation| format_violation(violation, width))
            .collect()
    }
}

/// Violations of every document, in discovery order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LintReport {
    pub documents: Vec<DocumentReport>,
}

impl LintReport {
    pub fn violation_count(&self) -> usize {
        self.documents.iter().map(|doc| doc.violations.len()).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.violation_count() == 0
    }

    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        self.documents.iter().flat_map(|doc| doc.violations.iter())
    }

    pub fn to_lines(&self) -> Vec<String> {
        self.documents.iter().flat_map(DocumentReport::to_lines).collect()
    }

    /// JSON array of `{file, line, snippet, reasoning}` objects.
    pub fn to_json(&self) -> Result<String> {
        let violations: Vec<&Violation> = self.violations().collect();
        Ok(serde_json::to_string_pretty(&violations)?)
    }

    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Text => Ok(self.to_lines().join("\n")),
            ReportFormat::Json => self.to_json(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown report format '{other}' (expected text or json)")),
        }
    }
}

/// Digits needed for the largest line number of a `line_count`-line file.
pub fn line_number_width(line_count: usize) -> usize {
    line_count.max(1).to_string().len()
}

pub fn format_violation(violation: &Violation, width: usize) -> String {
    format!(
        "{}:{:0width$}:({}) - {}",
        violation.file, violation.line, violation.snippet, violation.reasoning
    )
}
