//! Attribute condition evaluation.
//!
//! A condition compares one attribute of a subject map against a literal
//! value. Evaluation is pure and fail-closed: malformed pairings (non-numeric
//! operand for `gt`/`lt`, non-list value for `in`) evaluate to `false` rather
//! than erroring, and [`Condition::validate`] surfaces them at rule-load time
//! so they never reach a live rule set silently.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use sentra_core::{DomainError, DomainResult};

/// Comparison operator of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionOperator {
    Eq,
    Neq,
    In,
    Gt,
    Lt,
}

/// Literal value a condition compares against.
///
/// A tagged union rather than raw JSON so the operator/value pairing can be
/// checked once, at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Bool(bool),
    Num(f64),
    Str(String),
    List(Vec<ConditionValue>),
}

/// A single attribute condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub operator: ConditionOperator,
    pub value: ConditionValue,
}

impl Condition {
    pub fn new(
        field: impl Into<String>,
        operator: ConditionOperator,
        value: ConditionValue,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Check the operator/value pairing.
    ///
    /// Runtime evaluation stays fail-closed either way; this exists so a
    /// malformed rule is rejected when installed instead of silently denying
    /// everything forever.
    pub fn validate(&self) -> DomainResult<()> {
        match (self.operator, &self.value) {
            (ConditionOperator::Gt | ConditionOperator::Lt, ConditionValue::Num(_)) => Ok(()),
            (ConditionOperator::Gt | ConditionOperator::Lt, _) => Err(DomainError::validation(
                format!("'{}': gt/lt require a numeric value", self.field),
            )),
            (ConditionOperator::In, ConditionValue::List(_)) => Ok(()),
            (ConditionOperator::In, _) => Err(DomainError::validation(format!(
                "'{}': in requires a list value",
                self.field
            ))),
            (ConditionOperator::Eq | ConditionOperator::Neq, _) => Ok(()),
        }
    }
}

/// Strict equality between a subject attribute and a condition literal.
///
/// Types must match exactly; numbers compare by numeric value. Lists compare
/// element-wise.
fn value_matches(attr: &Value, literal: &ConditionValue) -> bool {
    match (attr, literal) {
        (Value::Bool(a), ConditionValue::Bool(b)) => a == b,
        (Value::Number(a), ConditionValue::Num(b)) => a.as_f64().is_some_and(|a| a == *b),
        (Value::String(a), ConditionValue::Str(b)) => a == b,
        (Value::Array(a), ConditionValue::List(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| value_matches(x, y))
        }
        _ => false,
    }
}

/// Evaluate one condition against a subject attribute map.
///
/// Pure, never panics. A missing field fails `eq` and satisfies `neq`.
pub fn evaluate_condition(subject: &Map<String, Value>, condition: &Condition) -> bool {
    let attr = subject.get(&condition.field);

    match condition.operator {
        ConditionOperator::Eq => attr.is_some_and(|a| value_matches(a, &condition.value)),
        ConditionOperator::Neq => !attr.is_some_and(|a| value_matches(a, &condition.value)),
        ConditionOperator::In => match (&condition.value, attr) {
            (ConditionValue::List(items), Some(a)) => {
                items.iter().any(|item| value_matches(a, item))
            }
            _ => false,
        },
        ConditionOperator::Gt => match (&condition.value, attr.and_then(Value::as_f64)) {
            (ConditionValue::Num(limit), Some(a)) => a > *limit,
            _ => false,
        },
        ConditionOperator::Lt => match (&condition.value, attr.and_then(Value::as_f64)) {
            (ConditionValue::Num(limit), Some(a)) => a < *limit,
            _ => false,
        },
    }
}
