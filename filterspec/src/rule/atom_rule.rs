use std::fmt::Display;

use serde_json::Value;

use crate::operator::Operator;

use super::Rule;

/// The right-hand side of an [`AtomRule`].
///
/// `$elemMatch` carries a whole rule tree that is applied to each element of
/// an array field; every other operator carries a literal.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleValue {
    Literal(Value),
    Rule(Box<Rule>),
}

impl RuleValue {
    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            RuleValue::Literal(value) => Some(value),
            RuleValue::Rule(_) => None,
        }
    }

    pub fn as_rule(&self) -> Option<&Rule> {
        match self {
            RuleValue::Literal(_) => None,
            RuleValue::Rule(rule) => Some(rule),
        }
    }
}

impl From<Value> for RuleValue {
    fn from(value: Value) -> Self {
        RuleValue::Literal(value)
    }
}

impl From<Rule> for RuleValue {
    fn from(rule: Rule) -> Self {
        RuleValue::Rule(Box::new(rule))
    }
}

impl Display for RuleValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleValue::Literal(Value::String(s)) => write!(f, "{}", s),
            RuleValue::Literal(value) => write!(f, "{}", value),
            RuleValue::Rule(rule) => write!(f, "{}", rule),
        }
    }
}

/// A single condition `{field, operator, value}`.
///
/// The operator is kept as the raw input token. Parsing only checks the
/// shape of the document; whether the token is a known operator, and whether
/// the value fits it, is decided by the validator so that an unknown token is
/// reported as such rather than as a malformed tree.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRule {
    field: String,
    operator: String,
    value: RuleValue,
}

impl AtomRule {
    pub fn new(field: &str, operator: &str, value: RuleValue) -> Self {
        AtomRule {
            field: field.to_string(),
            operator: operator.to_string(),
            value,
        }
    }

    #[inline]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The operator token exactly as it appeared in the input.
    #[inline]
    pub fn operator_token(&self) -> &str {
        &self.operator
    }

    /// The registry entry of the operator token, if there is one.
    #[inline]
    pub fn operator(&self) -> Option<Operator> {
        Operator::from_token(&self.operator)
    }

    #[inline]
    pub fn value(&self) -> &RuleValue {
        &self.value
    }

    /// Nested rule of an `$elemMatch` atom.
    pub fn nested_rule(&self) -> Option<&Rule> {
        self.value.as_rule()
    }
}

impl Display for AtomRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self.operator() {
            Some(Operator::Eq) => "==",
            Some(Operator::Ne) => "!=",
            Some(Operator::Gt) => ">",
            Some(Operator::Gte) => ">=",
            Some(Operator::Lt) => "<",
            Some(Operator::Lte) => "<=",
            Some(Operator::Regex) => "=~",
            Some(Operator::In) => "in",
            Some(Operator::Nin) => "not in",
            Some(Operator::ElemMatch) => return write!(f, "({} elemMatch {})", self.field, self.value),
            _ => self.operator.as_str(),
        };
        write!(f, "({} {} {})", self.field, symbol, self.value)
    }
}
