//! Rule definition types: one candidate recommendation per rule.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::ConditionClause;

/// Language code → template string, in file order.
pub type LocalizedText = IndexMap<String, String>;

/// A declarative condition set plus localized text templates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleDefinition {
    pub id: String,
    /// Higher values are evaluated first.
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub severity: Severity,
    /// Implicitly AND-combined, evaluated left to right.
    #[serde(default)]
    pub conditions: Vec<ConditionClause>,
    #[serde(default)]
    pub title: LocalizedText,
    #[serde(default)]
    pub reason: LocalizedText,
    /// Payload field paths the rule refers to (informational only).
    #[serde(default)]
    pub data_refs: Vec<String>,
}

/// Severity carried from rule definition to emitted action.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
