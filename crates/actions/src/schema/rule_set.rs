//! Top-level rule source document: selection limits, fallback pool and rules.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::RuleDefinition;

/// Rule ids force-included, in order, when too few rules pass naturally.
pub const DEFAULT_FALLBACK_POOL: &[&str] = &[
    "ACT_TECH_HYGIENE",
    "ACT_INDEX_COVERAGE",
    "ACT_INTERNAL_LINKS",
    "ACT_CONTENT_REFRESH",
    "ACT_SCHEMA_CHECK",
];

/// Parsed action rule file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleSet {
    #[serde(default)]
    pub limits: Limits,
    #[serde(default = "default_fallback_pool")]
    pub fallback_pool: Vec<String>,
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
}

fn default_fallback_pool() -> Vec<String> {
    DEFAULT_FALLBACK_POOL.iter().map(|s| s.to_string()).collect()
}

/// Bounds on the number of emitted actions.
///
/// Unrecognized keys under `limits` are ignored when parsing; see
/// [`unknown_limit_keys`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Limits {
    #[serde(default = "default_min_actions")]
    pub min_actions: usize,
    #[serde(default = "default_max_actions")]
    pub max_actions: usize,
}

/// Keys recognized under `limits`.
pub const LIMIT_KEYS: &[&str] = &["min_actions", "max_actions"];

/// Keys under the document's `limits` mapping that [`Limits`] does not read.
pub fn unknown_limit_keys(document: &serde_yaml::Value) -> Vec<String> {
    let Some(limits) = document.get("limits").and_then(serde_yaml::Value::as_mapping) else {
        return Vec::new();
    };
    limits
        .keys()
        .map(|key| match key.as_str() {
            Some(name) => name.to_string(),
            None => format!("{key:?}"),
        })
        .filter(|name| !LIMIT_KEYS.contains(&name.as_str()))
        .collect()
}

fn default_min_actions() -> usize {
    5
}

fn default_max_actions() -> usize {
    8
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            min_actions: default_min_actions(),
            max_actions: default_max_actions(),
        }
    }
}

impl Limits {
    pub fn new(min_actions: usize, max_actions: usize) -> Self {
        Self { min_actions, max_actions }
    }
}

impl RuleSet {
    /// Build a rule set with the default fallback pool.
    pub fn new(limits: Limits, rules: Vec<RuleDefinition>) -> Self {
        Self {
            limits,
            fallback_pool: default_fallback_pool(),
            rules,
        }
    }

    pub fn with_fallback_pool<I, S>(mut self, pool: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fallback_pool = pool.into_iter().map(Into::into).collect();
        self
    }

    /// Rules ordered by descending priority; ties keep file order.
    pub fn by_priority(&self) -> Vec<&RuleDefinition> {
        let mut ordered: Vec<&RuleDefinition> = self.rules.iter().collect();
        ordered.sort_by(|a, b| b.priority.cmp(&a.priority));
        ordered
    }

    /// Ids that occur more than once, each reported once, in file order.
    pub fn duplicate_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut duplicates = Vec::new();
        for rule in &self.rules {
            if !seen.insert(rule.id.as_str()) && reported.insert(rule.id.as_str()) {
                duplicates.push(rule.id.as_str());
            }
        }
        duplicates
    }

    /// Fallback pool ids that have no rule in this set.
    pub fn unresolved_fallback_ids(&self) -> Vec<&str> {
        self.fallback_pool
            .iter()
            .filter(|id| !self.rules.iter().any(|r| &r.id == *id))
            .map(String::as_str)
            .collect()
    }
}
