//! Condition clause and operator types.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single atomic test within a rule's condition list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConditionClause {
    /// Dot-delimited path into the payload, e.g. `kpis.gsc.clicks`.
    #[serde(default)]
    pub field: Option<String>,
    #[serde(rename = "op", alias = "operator", default = "missing_operator")]
    pub op: Operator,
    /// Literal operand for comparison operators.
    #[serde(default)]
    pub value: Option<Value>,
    /// Key into the project's threshold table.
    #[serde(default)]
    pub threshold_key: Option<String>,
}

fn missing_operator() -> Operator {
    Operator::Unknown(String::new())
}

/// Comparison operators available to condition clauses.
///
/// Names that are not recognized, and operators that are not a string at
/// all, are kept as [`Operator::Unknown`] so the rule still loads and the
/// clause evaluates to false.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
#[serde(into = "String")]
pub enum Operator {
    Exists,
    Neq,
    Lt,
    Gt,
    Gte,
    Lte,
    LenGt,
    LteNegThreshold,
    GtePosThreshold,
    Unknown(String),
}

impl Operator {
    /// Every recognized operator name, in documentation order.
    pub const KNOWN: &'static [&'static str] = &[
        "exists",
        "neq",
        "lt",
        "gt",
        "gte",
        "lte",
        "len_gt",
        "lte_neg_threshold",
        "gte_pos_threshold",
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Operator::Exists => "exists",
            Operator::Neq => "neq",
            Operator::Lt => "lt",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lte => "lte",
            Operator::LenGt => "len_gt",
            Operator::LteNegThreshold => "lte_neg_threshold",
            Operator::GtePosThreshold => "gte_pos_threshold",
            Operator::Unknown(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Operator::Unknown(_))
    }

    /// Operators that compare against `threshold_key` instead of `value`.
    pub fn uses_threshold(&self) -> bool {
        matches!(self, Operator::LteNegThreshold | Operator::GtePosThreshold)
    }

    /// Operators that need a `value` literal to ever pass.
    pub fn requires_value(&self) -> bool {
        matches!(
            self,
            Operator::Lt | Operator::Gt | Operator::Gte | Operator::Lte | Operator::LenGt
        )
    }
}

impl From<String> for Operator {
    fn from(name: String) -> Self {
        match name.as_str() {
            "exists" => Operator::Exists,
            "neq" => Operator::Neq,
            "lt" => Operator::Lt,
            "gt" => Operator::Gt,
            "gte" => Operator::Gte,
            "lte" => Operator::Lte,
            "len_gt" => Operator::LenGt,
            "lte_neg_threshold" => Operator::LteNegThreshold,
            "gte_pos_threshold" => Operator::GtePosThreshold,
            _ => Operator::Unknown(name),
        }
    }
}

impl<'de> Deserialize<'de> for Operator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(name) => Operator::from(name),
            Value::Null => Operator::Unknown(String::new()),
            other => Operator::Unknown(other.to_string()),
        })
    }
}

impl From<&str> for Operator {
    fn from(name: &str) -> Self {
        Operator::from(name.to_string())
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        match op {
            Operator::Unknown(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
