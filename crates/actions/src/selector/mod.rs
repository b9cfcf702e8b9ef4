//! Action selector: priority pass, dedup, quotas and minimum-fill fallback.
//!
//! Rules are evaluated in descending priority (ties keep file order). A
//! passing rule is included unless its id was already emitted or the
//! `max_actions` quota is full. When fewer than `min_actions` rules were
//! included, ids from the rule set's fallback pool are force-included in pool
//! order. Every decision lands in the trace: first all priority-pass entries,
//! then all fallback entries.
//!
//! The selector performs no I/O and never mutates its inputs; identical inputs
//! give identical actions and trace.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::evaluator::{evaluate_conditions, ConditionOutcome, CONDITIONS_MET};
use crate::project::Project;
use crate::render::{ActionRenderer, RenderedText};
use crate::schema::{RuleDefinition, RuleSet, Severity};
use crate::trace::{
    TraceEntry, TracePhase, TraceRecorder, DUPLICATE_RULE_ID, FALLBACK_MIN_ACTIONS,
    MAX_ACTIONS_REACHED,
};

/// A recommended action as embedded in the report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Action {
    pub id: String,
    pub title: String,
    pub reason: String,
    pub severity: Severity,
    pub data_refs: Vec<String>,
}

/// Output of one selection run.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Language the action texts were rendered in.
    pub language: String,
    pub actions: Vec<Action>,
    pub trace: Vec<TraceEntry>,
}

/// Counters derived from a selection, for logs and run metadata.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct SelectionSummary {
    /// Rules evaluated in the priority pass.
    pub evaluated: usize,
    /// Priority-pass rules whose conditions held.
    pub passed: usize,
    /// Actions emitted.
    pub included: usize,
    /// Actions force-included by the fallback pass.
    pub fallback: usize,
}

impl Selection {
    pub fn action_ids(&self) -> Vec<&str> {
        self.actions.iter().map(|a| a.id.as_str()).collect()
    }

    pub fn summary(&self) -> SelectionSummary {
        let priority = self.trace.iter().filter(|e| e.phase == TracePhase::Priority);
        SelectionSummary {
            evaluated: priority.clone().count(),
            passed: priority.filter(|e| e.eval_result).count(),
            included: self.actions.len(),
            fallback: self
                .trace
                .iter()
                .filter(|e| e.phase == TracePhase::Fallback)
                .count(),
        }
    }

    pub fn actions_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.actions)
    }

    pub fn trace_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.trace)
    }
}

/// Language requested by `meta.report_language`, or `default` when absent or empty.
pub fn report_language(payload: &Value, default: &str) -> String {
    payload
        .pointer("/meta/report_language")
        .and_then(Value::as_str)
        .filter(|lang| !lang.is_empty())
        .unwrap_or(default)
        .to_string()
}

/// Selects and renders actions from a loaded [`RuleSet`].
pub struct ActionSelector<'a> {
    rules: &'a RuleSet,
    renderer: ActionRenderer,
}

impl<'a> ActionSelector<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self::with_renderer(rules, ActionRenderer::default())
    }

    pub fn with_renderer(rules: &'a RuleSet, renderer: ActionRenderer) -> Self {
        Self { rules, renderer }
    }

    pub fn renderer(&self) -> &ActionRenderer {
        &self.renderer
    }

    /// Select actions in the language named by the payload's `meta.report_language`.
    pub fn select_for_payload(&self, payload: &Value, project: &Project) -> Selection {
        let language = report_language(payload, self.renderer.default_language());
        self.select(payload, project, &language)
    }

    /// Run the priority pass and the fallback pass, returning actions and trace.
    pub fn select(&self, payload: &Value, project: &Project, language: &str) -> Selection {
        let limits = self.rules.limits;
        let ordered = self.rules.by_priority();

        let mut actions: Vec<Action> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut recorder = TraceRecorder::new();

        for rule in &ordered {
            let outcome = evaluate_conditions(&rule.conditions, payload, &project.thresholds);

            let justification = if !outcome.passed {
                Some(outcome.justification())
            } else if seen.contains(rule.id.as_str()) {
                Some(DUPLICATE_RULE_ID.to_string())
            } else if actions.len() >= limits.max_actions {
                Some(MAX_ACTIONS_REACHED.to_string())
            } else {
                None
            };

            let entry = match justification {
                Some(justification) => {
                    let title = self.renderer.render_title(rule, payload, language);
                    trace_entry(rule, TracePhase::Priority, title, false, outcome, justification)
                }
                None => {
                    let text = self.renderer.render(rule, payload, language);
                    let title = text.title.clone();
                    actions.push(to_action(rule, text));
                    seen.insert(rule.id.as_str());
                    trace_entry(rule, TracePhase::Priority, title, true, outcome, CONDITIONS_MET.to_string())
                }
            };
            recorder.record(entry);
        }

        if actions.len() < limits.min_actions {
            for id in &self.rules.fallback_pool {
                if actions.len() >= limits.min_actions || actions.len() >= limits.max_actions {
                    break;
                }
                if seen.contains(id.as_str()) {
                    continue;
                }
                let Some(rule) = ordered.iter().find(|r| &r.id == id) else {
                    debug!(rule_id = %id, "fallback id has no rule; skipping");
                    continue;
                };

                let text = self.renderer.render(rule, payload, language);
                let title = text.title.clone();
                actions.push(to_action(rule, text));
                seen.insert(rule.id.as_str());

                let forced = ConditionOutcome {
                    passed: true,
                    details: Vec::new(),
                };
                recorder.record(trace_entry(
                    rule,
                    TracePhase::Fallback,
                    title,
                    true,
                    forced,
                    FALLBACK_MIN_ACTIONS.to_string(),
                ));
            }
        }

        actions.truncate(limits.max_actions);

        let selection = Selection {
            language: language.to_string(),
            actions,
            trace: recorder.finish(),
        };
        let summary = selection.summary();
        info!(
            language,
            evaluated = summary.evaluated,
            passed = summary.passed,
            included = summary.included,
            fallback = summary.fallback,
            "action selection complete"
        );
        selection
    }
}

fn to_action(rule: &RuleDefinition, text: RenderedText) -> Action {
    Action {
        id: rule.id.clone(),
        title: text.title,
        reason: text.reason,
        severity: rule.severity,
        data_refs: rule.data_refs.clone(),
    }
}

fn trace_entry(
    rule: &RuleDefinition,
    phase: TracePhase,
    title: String,
    included: bool,
    outcome: ConditionOutcome,
    justification: String,
) -> TraceEntry {
    TraceEntry {
        rule_id: rule.id.clone(),
        action_id: rule.id.clone(),
        phase,
        priority: rule.priority,
        title,
        severity_final: rule.severity,
        included,
        eval_result: outcome.passed,
        conditions: rule.conditions.clone(),
        values: outcome.details,
        justification,
    }
}
