//! YAML rule-source schema types with serde deserialization.
//!
//! Defines the type hierarchy for an action rule file:
//! - `RuleSet`: top-level document (limits, fallback pool, rules)
//! - `RuleDefinition`: one candidate recommendation with localized templates
//! - `ConditionClause` / `Operator`: atomic tests AND-combined per rule

mod condition;
mod rule;
mod rule_set;

pub use condition::*;
pub use rule::*;
pub use rule_set::*;

#[cfg(test)]
mod tests;
