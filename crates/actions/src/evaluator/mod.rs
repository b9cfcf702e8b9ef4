//! Condition evaluator: strict left-to-right AND over a rule's clauses.
//!
//! Each clause resolves its payload field and optional project threshold,
//! then dispatches on its [`Operator`]. Evaluation stops at the first failing
//! clause, so the returned details only cover clauses actually evaluated.
//! Nothing in here returns an error: malformed clauses simply fail.

mod operators;
mod path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::project::Thresholds;
use crate::schema::{ConditionClause, Operator};

pub use path::resolve_field;

/// Justification recorded for a rule whose clauses all passed.
pub const CONDITIONS_MET: &str = "conditions met";

/// Evaluation record for one clause.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClauseOutcome {
    pub field: Option<String>,
    pub op: Operator,
    pub value: Option<Value>,
    pub threshold_key: Option<String>,
    /// Resolved payload value (`null` when absent).
    pub current: Option<Value>,
    /// Resolved project threshold (`null` when absent or not referenced).
    pub threshold: Option<f64>,
    pub passed: bool,
}

/// Result of evaluating a full clause list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionOutcome {
    pub passed: bool,
    pub details: Vec<ClauseOutcome>,
}

impl ConditionOutcome {
    /// Human-readable reason for the outcome.
    ///
    /// Failures name the operator and field of the first failing clause.
    pub fn justification(&self) -> String {
        if self.passed {
            return CONDITIONS_MET.to_string();
        }
        match self.details.iter().find(|d| !d.passed) {
            Some(failed) => format!(
                "condition failed: {} {}",
                failed.op,
                failed.field.as_deref().unwrap_or_default()
            ),
            None => "conditions not met".to_string(),
        }
    }
}

/// Evaluate `clauses` against `payload` and the project `thresholds`.
///
/// An empty clause list passes.
pub fn evaluate_conditions(
    clauses: &[ConditionClause],
    payload: &Value,
    thresholds: &Thresholds,
) -> ConditionOutcome {
    let mut details = Vec::with_capacity(clauses.len());

    for clause in clauses {
        let outcome = evaluate_clause(clause, payload, thresholds);
        let passed = outcome.passed;
        details.push(outcome);
        if !passed {
            return ConditionOutcome {
                passed: false,
                details,
            };
        }
    }

    ConditionOutcome {
        passed: true,
        details,
    }
}

fn evaluate_clause(clause: &ConditionClause, payload: &Value, thresholds: &Thresholds) -> ClauseOutcome {
    let current = clause
        .field
        .as_deref()
        .and_then(|field| resolve_field(payload, field));
    let threshold = clause
        .threshold_key
        .as_ref()
        .and_then(|key| thresholds.get(key).copied());

    let passed = operators::check(&clause.op, current, clause.value.as_ref(), threshold);

    ClauseOutcome {
        field: clause.field.clone(),
        op: clause.op.clone(),
        value: clause.value.clone(),
        threshold_key: clause.threshold_key.clone(),
        current: current.cloned(),
        threshold,
        passed,
    }
}
