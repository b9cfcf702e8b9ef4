//! Rule-set linting with structured errors and suggestions.
//!
//! The loader only rejects sources the engine cannot run at all. This module
//! goes further and flags rules that would load but silently never fire or
//! render badly: unknown operators, clauses missing their operands, templates
//! that do not compile. Returns a [`ValidationResult`] with errors (fix before
//! shipping the rule file) and warnings (advisory).

mod fuzzy;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::render::ActionRenderer;
use crate::schema::{unknown_limit_keys, LocalizedText, Operator, RuleDefinition, RuleSet, LIMIT_KEYS};

// ── Result types ────────────────────────────────────────────────────

/// Overall validation outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

/// A blocking validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// JSON-path-like location, e.g. `"rules[2].conditions[0].op"`.
    pub path: String,
    pub message: String,
    /// Optional "Did you mean …?" suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// A non-blocking advisory warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationResult {
    fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: None,
        });
    }

    fn error_with_suggestion(
        &mut self,
        path: impl Into<String>,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: Some(suggestion.into()),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationWarning {
            path: path.into(),
            message: message.into(),
        });
    }
}

// ── Public API ──────────────────────────────────────────────────────

/// Lint a loaded [`RuleSet`]. `default_language` is the language every rule
/// is expected to carry a title for.
pub fn validate_rule_set(set: &RuleSet, default_language: &str) -> ValidationResult {
    let mut result = ValidationResult::new();
    let renderer = ActionRenderer::new(default_language);

    check_limits(set, &mut result);

    let mut seen = HashSet::new();
    for (i, rule) in set.rules.iter().enumerate() {
        let path = format!("rules[{i}]");
        if rule.id.trim().is_empty() {
            result.error(format!("{path}.id"), "rule id must not be empty");
        } else if !seen.insert(rule.id.as_str()) {
            result.warn(
                format!("{path}.id"),
                format!("duplicate rule id '{}'; later occurrences are never emitted", rule.id),
            );
        }
        check_conditions(rule, &path, &mut result);
        check_templates(&rule.title, &format!("{path}.title"), &renderer, &mut result);
        check_templates(&rule.reason, &format!("{path}.reason"), &renderer, &mut result);
        if renderer.select_template(&rule.title, default_language).is_none() {
            result.warn(
                format!("{path}.title"),
                format!("no '{default_language}' title; action renders with an empty title"),
            );
        }
    }

    for (i, id) in set.fallback_pool.iter().enumerate() {
        if !set.rules.iter().any(|r| &r.id == id) {
            result.warn(
                format!("fallback_pool[{i}]"),
                format!("fallback id '{id}' has no matching rule and will be skipped"),
            );
        }
    }

    result
}

/// Parse raw YAML and lint it. Parse errors come back in the same shape.
///
/// Also flags keys under `limits` that are ignored when loading.
pub fn validate_yaml(yaml: &str, default_language: &str) -> ValidationResult {
    match serde_yaml::from_str::<RuleSet>(yaml) {
        Ok(set) => {
            let mut result = validate_rule_set(&set, default_language);
            if let Ok(document) = serde_yaml::from_str::<serde_yaml::Value>(yaml) {
                for key in unknown_limit_keys(&document) {
                    result.warn(
                        format!("limits.{key}"),
                        format!("unknown key; expected one of {}", LIMIT_KEYS.join(", ")),
                    );
                }
            }
            result
        }
        Err(e) => {
            let mut result = ValidationResult::new();
            result.error("", format!("YAML parse error: {e}"));
            result
        }
    }
}

// ── Checks ──────────────────────────────────────────────────────────

fn check_limits(set: &RuleSet, result: &mut ValidationResult) {
    let limits = set.limits;
    if limits.min_actions > limits.max_actions {
        result.error(
            "limits",
            format!(
                "min_actions ({}) exceeds max_actions ({})",
                limits.min_actions, limits.max_actions
            ),
        );
    }
    if limits.max_actions == 0 {
        result.warn("limits.max_actions", "max_actions is 0; no action will ever be emitted");
    }
}

fn check_conditions(rule: &RuleDefinition, path: &str, result: &mut ValidationResult) {
    for (j, clause) in rule.conditions.iter().enumerate() {
        let clause_path = format!("{path}.conditions[{j}]");

        if let Operator::Unknown(name) = &clause.op {
            let message = if name.is_empty() {
                "missing operator".to_string()
            } else {
                format!("unknown operator '{name}'")
            };
            match fuzzy::fuzzy_match(name, Operator::KNOWN) {
                Some(suggestion) if !name.is_empty() => result.error_with_suggestion(
                    format!("{clause_path}.op"),
                    message,
                    format!("Did you mean '{suggestion}'?"),
                ),
                _ => result.error(format!("{clause_path}.op"), message),
            }
            continue;
        }

        if clause.field.as_deref().map_or(true, str::is_empty) {
            result.error(
                format!("{clause_path}.field"),
                format!("operator '{}' needs a field", clause.op),
            );
        }
        if clause.op.uses_threshold() && clause.threshold_key.is_none() {
            result.error(
                format!("{clause_path}.threshold_key"),
                format!("operator '{}' needs a threshold_key", clause.op),
            );
        }
        if clause.op.requires_value() && clause.value.is_none() {
            result.error(
                format!("{clause_path}.value"),
                format!("operator '{}' needs a value", clause.op),
            );
        }
        if clause.op.requires_value() && clause.value.as_ref().is_some_and(|v| !v.is_number()) {
            result.error(
                format!("{clause_path}.value"),
                format!("operator '{}' compares numbers; value is not numeric", clause.op),
            );
        }
    }
}

fn check_templates(
    text: &LocalizedText,
    path: &str,
    renderer: &ActionRenderer,
    result: &mut ValidationResult,
) {
    for (lang, template) in text {
        if let Err(e) = renderer.validate(template) {
            result.error(format!("{path}.{lang}"), e.to_string());
        }
    }
}
