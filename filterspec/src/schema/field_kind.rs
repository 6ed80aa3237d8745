use std::fmt::Display;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::{is_scalar, DATE_LAYOUT};
use crate::operator::Operator;

/// Kind of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    /// Integer epoch values, or RFC 3339 / `YYYY-MM-DD` strings
    Timestamp,
    Array,
}

impl FieldKind {
    /// Returns `true` when `operator` makes sense on a field of this kind,
    /// regardless of what the schema permits.
    pub fn supports(&self, operator: Operator) -> bool {
        match operator {
            Operator::Eq
            | Operator::Ne
            | Operator::In
            | Operator::Nin
            | Operator::Exists
            | Operator::Type => true,
            Operator::Gt | Operator::Gte | Operator::Lt | Operator::Lte => matches!(
                self,
                FieldKind::String | FieldKind::Number | FieldKind::Timestamp
            ),
            Operator::Regex => *self == FieldKind::String,
            Operator::All | Operator::ElemMatch | Operator::Size => *self == FieldKind::Array,
            Operator::And | Operator::Or | Operator::Not | Operator::Nor => false,
        }
    }

    /// Returns `true` when `value` is a scalar this kind can be compared with.
    /// Array fields accept any scalar, matched against their elements.
    pub fn accepts_scalar(&self, value: &Value) -> bool {
        match (self, value) {
            (FieldKind::String, Value::String(_)) => true,
            (FieldKind::Number, Value::Number(_)) => true,
            (FieldKind::Boolean, Value::Bool(_)) => true,
            (FieldKind::Timestamp, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (FieldKind::Timestamp, Value::String(s)) => is_timestamp(s),
            (FieldKind::Array, v) => is_scalar(v),
            _ => false,
        }
    }
}

fn is_timestamp(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok() || NaiveDate::parse_from_str(s, DATE_LAYOUT).is_ok()
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldKind::String => write!(f, "string"),
            FieldKind::Number => write!(f, "number"),
            FieldKind::Boolean => write!(f, "boolean"),
            FieldKind::Timestamp => write!(f, "timestamp"),
            FieldKind::Array => write!(f, "array"),
        }
    }
}
