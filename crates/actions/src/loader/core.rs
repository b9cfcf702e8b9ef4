//! [`RuleSource`]: parse and structurally validate an action rule file.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::schema::{unknown_limit_keys, RuleSet};

use super::error::{Result, RuleError};

/// Loads [`RuleSet`]s from YAML.
///
/// Either the whole source loads or an error is returned; a partial rule
/// set is never handed out.
pub struct RuleSource;

impl RuleSource {
    /// Parse and validate a rule file from disk.
    pub fn load_file(path: &Path) -> Result<RuleSet> {
        let contents = fs::read_to_string(path)?;
        let set = Self::from_yaml_str(&contents)?;
        info!(
            path = %path.display(),
            rules = set.rules.len(),
            min_actions = set.limits.min_actions,
            max_actions = set.limits.max_actions,
            "loaded action rules"
        );
        Ok(set)
    }

    /// Parse and validate a rule file from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<RuleSet> {
        let document: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        let set: RuleSet = serde_yaml::from_str(yaml)?;
        Self::check_structure(&set)?;
        Self::log_soft_issues(&set, &document);
        Ok(set)
    }

    fn check_structure(set: &RuleSet) -> Result<()> {
        if let Some(pos) = set.rules.iter().position(|r| r.id.trim().is_empty()) {
            return Err(RuleError::Validation(format!(
                "rules[{pos}].id must not be empty"
            )));
        }
        if set.limits.min_actions > set.limits.max_actions {
            return Err(RuleError::Validation(format!(
                "limits.min_actions ({}) exceeds limits.max_actions ({})",
                set.limits.min_actions, set.limits.max_actions
            )));
        }
        Ok(())
    }

    fn log_soft_issues(set: &RuleSet, document: &serde_yaml::Value) {
        for key in unknown_limit_keys(document) {
            warn!(key = %key, "unknown key under limits; ignored");
        }
        for id in set.duplicate_ids() {
            warn!(rule_id = %id, "duplicate rule id; only the first passing occurrence is emitted");
        }
        for rule in &set.rules {
            for clause in rule.conditions.iter().filter(|c| !c.op.is_known()) {
                warn!(rule_id = %rule.id, op = %clause.op, "unknown operator; clause will always fail");
            }
        }
        for id in set.unresolved_fallback_ids() {
            warn!(rule_id = %id, "fallback pool id has no matching rule");
        }
    }
}
