//! Per-operator clause checks.
//!
//! Each check receives the resolved payload value, the clause literal and
//! the resolved threshold. Missing operands make a check fail; none of them
//! can panic.

use serde_json::Value;

use crate::schema::Operator;

/// Dispatch one operator against its resolved operands.
pub(super) fn check(
    op: &Operator,
    current: Option<&Value>,
    literal: Option<&Value>,
    threshold: Option<f64>,
) -> bool {
    match op {
        Operator::Exists => current.is_some(),
        Operator::Neq => !loose_eq(current, literal),
        Operator::Lt => compare(current, literal, |c, v| c < v),
        Operator::Gt => compare(current, literal, |c, v| c > v),
        Operator::Gte => compare(current, literal, |c, v| c >= v),
        Operator::Lte => compare(current, literal, |c, v| c <= v),
        Operator::LenGt => len_gt(current, literal),
        Operator::LteNegThreshold => against_threshold(current, threshold, |c, t| c <= -t),
        Operator::GtePosThreshold => against_threshold(current, threshold, |c, t| c >= t),
        Operator::Unknown(_) => false,
    }
}

/// Equality that treats `100` and `100.0` as the same number.
fn loose_eq(current: Option<&Value>, literal: Option<&Value>) -> bool {
    match (current, literal) {
        (None, None) => true,
        (Some(Value::Number(a)), Some(Value::Number(b))) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => a == b,
        },
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn compare(current: Option<&Value>, literal: Option<&Value>, pred: fn(f64, f64) -> bool) -> bool {
    match (current.and_then(Value::as_f64), literal.and_then(Value::as_f64)) {
        (Some(c), Some(v)) => pred(c, v),
        _ => false,
    }
}

fn len_gt(current: Option<&Value>, literal: Option<&Value>) -> bool {
    let (Some(items), Some(min)) = (current.and_then(Value::as_array), literal.and_then(Value::as_f64))
    else {
        return false;
    };
    (items.len() as f64) > min
}

fn against_threshold(current: Option<&Value>, threshold: Option<f64>, pred: fn(f64, f64) -> bool) -> bool {
    match (current.and_then(Value::as_f64), threshold) {
        (Some(c), Some(t)) => pred(c, t),
        _ => false,
    }
}
