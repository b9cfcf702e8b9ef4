//! Per-rule evaluation trace for audit and debugging.
//!
//! Every rule considered by the selector (priority pass and fallback pass)
//! leaves exactly one [`TraceEntry`]. Entries are appended in emission order
//! and never modified afterwards, so two runs over the same inputs produce
//! identical traces that can be diffed field by field.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::evaluator::ClauseOutcome;
use crate::schema::{ConditionClause, Severity};

pub const DUPLICATE_RULE_ID: &str = "duplicate rule_id";
pub const MAX_ACTIONS_REACHED: &str = "max_actions reached";
pub const FALLBACK_MIN_ACTIONS: &str = "fallback_min_actions";

/// Selection pass that produced a trace entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TracePhase {
    Priority,
    Fallback,
}

impl TracePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            TracePhase::Priority => "priority",
            TracePhase::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for TracePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit record of one rule's evaluation and inclusion decision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TraceEntry {
    pub rule_id: String,
    pub action_id: String,
    pub phase: TracePhase,
    pub priority: i64,
    /// Title rendered in the report language, whether or not the rule was included.
    pub title: String,
    pub severity_final: Severity,
    pub included: bool,
    pub eval_result: bool,
    /// Clause list as loaded from the rule source.
    pub conditions: Vec<ConditionClause>,
    /// Per-clause outcomes, up to and including the first failure.
    pub values: Vec<ClauseOutcome>,
    pub justification: String,
}

/// Write-once accumulator for trace entries.
#[derive(Debug, Default)]
pub struct TraceRecorder {
    entries: Vec<TraceEntry>,
}

impl TraceRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: TraceEntry) {
        tracing::debug!(
            rule_id = %entry.rule_id,
            phase = ?entry.phase,
            eval_result = entry.eval_result,
            included = entry.included,
            justification = %entry.justification,
            "rule evaluated"
        );
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn finish(self) -> Vec<TraceEntry> {
        self.entries
    }
}

/// One decision that differs between two traces.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TraceDiff {
    pub rule_id: String,
    pub phase: TracePhase,
    /// Position among entries with the same rule id and phase.
    pub occurrence: usize,
    pub before: Option<TraceDecision>,
    pub after: Option<TraceDecision>,
}

/// The decision-relevant part of a trace entry.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TraceDecision {
    pub eval_result: bool,
    pub included: bool,
    pub justification: String,
}

impl From<&TraceEntry> for TraceDecision {
    fn from(entry: &TraceEntry) -> Self {
        Self {
            eval_result: entry.eval_result,
            included: entry.included,
            justification: entry.justification.clone(),
        }
    }
}

/// Compare two traces by (rule id, phase, occurrence) and report changed decisions.
///
/// Results are ordered by rule id, then phase, then occurrence.
pub fn diff_traces(before: &[TraceEntry], after: &[TraceEntry]) -> Vec<TraceDiff> {
    type Key = (String, TracePhase, usize);

    fn index(entries: &[TraceEntry]) -> BTreeMap<Key, TraceDecision> {
        let mut counts: BTreeMap<(String, TracePhase), usize> = BTreeMap::new();
        let mut out = BTreeMap::new();
        for entry in entries {
            let n = counts.entry((entry.rule_id.clone(), entry.phase)).or_insert(0);
            out.insert((entry.rule_id.clone(), entry.phase, *n), TraceDecision::from(entry));
            *n += 1;
        }
        out
    }

    let before = index(before);
    let mut after = index(after);
    let mut diffs = Vec::new();

    for (key, old) in before {
        let new = after.remove(&key);
        if new.as_ref() != Some(&old) {
            diffs.push(TraceDiff {
                rule_id: key.0,
                phase: key.1,
                occurrence: key.2,
                before: Some(old),
                after: new,
            });
        }
    }
    for (key, new) in after {
        diffs.push(TraceDiff {
            rule_id: key.0,
            phase: key.1,
            occurrence: key.2,
            before: None,
            after: Some(new),
        });
    }

    diffs.sort_by(|a, b| (&a.rule_id, a.phase, a.occurrence).cmp(&(&b.rule_id, b.phase, b.occurrence)));
    diffs
}
