//! Rule-driven action selection for SEO performance reports.
//!
//! This crate provides:
//! - YAML rule source with limits and a configurable fallback pool
//! - Condition evaluation against a computed metrics payload
//! - Priority-ordered selection with dedup, quotas and minimum-fill fallback
//! - Localized title/reason rendering through a restricted minijinja environment
//! - A serializable per-rule evaluation trace

pub mod evaluator;
pub mod loader;
pub mod project;
pub mod render;
pub mod schema;
pub mod selector;
pub mod trace;
pub mod validation;

pub use evaluator::{evaluate_conditions, ClauseOutcome, ConditionOutcome};
pub use loader::{RuleError, RuleSource};
pub use project::Project;
pub use render::{ActionRenderer, RenderedText};
pub use schema::{ConditionClause, Limits, Operator, RuleDefinition, RuleSet, Severity};
pub use selector::{report_language, Action, ActionSelector, Selection, SelectionSummary};
pub use trace::{TraceEntry, TracePhase, TraceRecorder};
