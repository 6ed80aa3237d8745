use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorKind, FilterError};
use crate::operator::Operator;

use super::Rule;

/// Boolean condition of a [`CombinedRule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Condition {
    And,
    Or,
    Not,
    /// None of the children match
    Nor,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::And => "AND",
            Condition::Or => "OR",
            Condition::Not => "NOT",
            Condition::Nor => "NOR",
        }
    }

    /// The registry operator this condition compiles to.
    pub fn operator(&self) -> Operator {
        match self {
            Condition::And => Operator::And,
            Condition::Or => Operator::Or,
            Condition::Not => Operator::Not,
            Condition::Nor => Operator::Nor,
        }
    }
}

impl FromStr for Condition {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AND" => Ok(Condition::And),
            "OR" => Ok(Condition::Or),
            "NOT" => Ok(Condition::Not),
            "NOR" => Ok(Condition::Nor),
            _ => Err(FilterError::new(
                &format!("unknown condition '{}', expected one of AND, OR, NOT, NOR", s),
                ErrorKind::MalformedTree,
            )),
        }
    }
}

impl Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A boolean combination of child rules.
///
/// Construction does not enforce the child count; an empty `AND` or a `NOT`
/// with two children is representable so that the validator can report it
/// with a path.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedRule {
    condition: Condition,
    rules: Vec<Rule>,
}

impl CombinedRule {
    pub fn new(condition: Condition, rules: Vec<Rule>) -> Self {
        CombinedRule { condition, rules }
    }

    #[inline]
    pub fn condition(&self) -> Condition {
        self.condition
    }

    #[inline]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub(crate) fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }
}

impl Display for CombinedRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let separator = match self.condition {
            Condition::And => " && ",
            Condition::Or => " || ",
            Condition::Not => return match self.rules.as_slice() {
                [single] => write!(f, "(not {})", single),
                rules => write!(f, "(not {})", join(rules, " && ")),
            },
            Condition::Nor => return write!(f, "(nor {})", join(&self.rules, ", ")),
        };
        write!(f, "({})", join(&self.rules, separator))
    }
}

fn join(rules: &[Rule], separator: &str) -> String {
    let mut joined = String::with_capacity(rules.len() * 16);
    for (i, rule) in rules.iter().enumerate() {
        joined.push_str(&rule.to_string());
        if i < rules.len() - 1 {
            joined.push_str(separator);
        }
    }
    joined
}
