use std::fmt::Display;
use std::str::FromStr;

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::common::{CONDITION_KEY, FIELD_KEY, FIELD_SEPARATOR, OPERATOR_KEY, RULES_KEY, VALUE_KEY};
use crate::errors::FilterError;

use super::{parse_root, parse_rule_tree, AtomRule, CombinedRule, Condition, RuleValue};

/// A node of a rule tree: either a single condition or a boolean
/// combination of child rules.
///
/// A `Rule` is built per request from untrusted input (see
/// [`parse_rule_tree`](super::parse_rule_tree)) or with the fluent builders
/// in [`fluent`](super::fluent), then validated and compiled. It is never
/// mutated once handed to the validator.
///
/// # Examples
///
/// ```rust
/// use filterspec::rule::{field, Rule};
///
/// let rule = field("status").eq("running").and(field("cpu").gt(80));
/// assert_eq!(rule.depth(), 2);
/// assert_eq!(rule.atom_count(), 2);
/// assert_eq!(rule.to_string(), "((status == running) && (cpu > 80))");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Atom(AtomRule),
    Combined(CombinedRule),
}

impl Rule {
    #[inline]
    pub fn is_atom(&self) -> bool {
        matches!(self, Rule::Atom(_))
    }

    pub fn as_atom(&self) -> Option<&AtomRule> {
        match self {
            Rule::Atom(atom) => Some(atom),
            Rule::Combined(_) => None,
        }
    }

    pub fn as_combined(&self) -> Option<&CombinedRule> {
        match self {
            Rule::Atom(_) => None,
            Rule::Combined(combined) => Some(combined),
        }
    }

    /// Height of the tree. An atom has depth 1, every combinator and every
    /// `$elemMatch` adds one level.
    pub fn depth(&self) -> usize {
        match self {
            Rule::Atom(atom) => match atom.nested_rule() {
                Some(nested) => 1 + nested.depth(),
                None => 1,
            },
            Rule::Combined(combined) => {
                1 + combined.rules().iter().map(Rule::depth).max().unwrap_or(0)
            }
        }
    }

    /// Number of atoms in the tree, including the atoms inside `$elemMatch`.
    pub fn atom_count(&self) -> usize {
        match self {
            Rule::Atom(atom) => match atom.nested_rule() {
                Some(nested) => 1 + nested.atom_count(),
                None => 1,
            },
            Rule::Combined(combined) => combined.rules().iter().map(Rule::atom_count).sum(),
        }
    }

    /// Every field referenced by the tree, in first-seen order and without
    /// duplicates. Fields inside `$elemMatch` are reported as `parent.child`.
    pub fn fields(&self) -> Vec<String> {
        let mut fields = Vec::new();
        self.collect_fields(None, &mut fields);
        fields
    }

    fn collect_fields(&self, prefix: Option<&str>, fields: &mut Vec<String>) {
        match self {
            Rule::Atom(atom) => {
                let name = match prefix {
                    Some(prefix) => format!("{}{}{}", prefix, FIELD_SEPARATOR, atom.field()),
                    None => atom.field().to_string(),
                };
                if !fields.contains(&name) {
                    fields.push(name.clone());
                }
                if let Some(nested) = atom.nested_rule() {
                    nested.collect_fields(Some(&name), fields);
                }
            }
            Rule::Combined(combined) => {
                for rule in combined.rules() {
                    rule.collect_fields(prefix, fields);
                }
            }
        }
    }

    /// Evaluates `matcher` over the atoms following the boolean structure of
    /// the tree: AND needs all children, OR any, NOT negates its child and
    /// NOR needs none. `$elemMatch` atoms are handed to the matcher whole.
    pub fn matches<F>(&self, matcher: &F) -> bool
    where
        F: Fn(&AtomRule) -> bool,
    {
        match self {
            Rule::Atom(atom) => matcher(atom),
            Rule::Combined(combined) => {
                let mut children = combined.rules().iter();
                match combined.condition() {
                    Condition::And => children.all(|r| r.matches(matcher)),
                    Condition::Or => children.any(|r| r.matches(matcher)),
                    Condition::Not => !children.all(|r| r.matches(matcher)),
                    Condition::Nor => !children.any(|r| r.matches(matcher)),
                }
            }
        }
    }

    /// Returns `true` when `matcher` holds for at least one atom of the tree,
    /// ignoring the boolean structure. Sub-rules of `$elemMatch` are not
    /// visited; their fields are relative to the array element.
    pub fn matches_any<F>(&self, matcher: &F) -> bool
    where
        F: Fn(&AtomRule) -> bool,
    {
        match self {
            Rule::Atom(atom) => matcher(atom),
            Rule::Combined(combined) => combined.rules().iter().any(|r| r.matches_any(matcher)),
        }
    }

    /// Combines this rule with another using AND. An existing AND on the left
    /// is extended instead of nested.
    pub fn and(self, other: Rule) -> Rule {
        self.combine(Condition::And, other)
    }

    /// Combines this rule with another using OR. An existing OR on the left
    /// is extended instead of nested.
    pub fn or(self, other: Rule) -> Rule {
        self.combine(Condition::Or, other)
    }

    /// Negates this rule.
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Rule {
        Rule::Combined(CombinedRule::new(Condition::Not, vec![self]))
    }

    fn combine(self, condition: Condition, other: Rule) -> Rule {
        match self {
            Rule::Combined(mut combined) if combined.condition() == condition => {
                combined.push(other);
                Rule::Combined(combined)
            }
            rule => Rule::Combined(CombinedRule::new(condition, vec![rule, other])),
        }
    }
}

impl From<AtomRule> for Rule {
    fn from(atom: AtomRule) -> Self {
        Rule::Atom(atom)
    }
}

impl From<CombinedRule> for Rule {
    fn from(combined: CombinedRule) -> Self {
        Rule::Combined(combined)
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::Atom(atom) => write!(f, "{}", atom),
            Rule::Combined(combined) => write!(f, "{}", combined),
        }
    }
}

impl FromStr for Rule {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_rule_tree(s)
    }
}

/// Writes the rule back in its input shape.
impl Serialize for Rule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Rule::Atom(atom) => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry(FIELD_KEY, atom.field())?;
                map.serialize_entry(OPERATOR_KEY, atom.operator_token())?;
                match atom.value() {
                    RuleValue::Literal(value) => map.serialize_entry(VALUE_KEY, value)?,
                    RuleValue::Rule(rule) => map.serialize_entry(VALUE_KEY, rule.as_ref())?,
                }
                map.end()
            }
            Rule::Combined(combined) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry(CONDITION_KEY, &combined.condition())?;
                map.serialize_entry(RULES_KEY, combined.rules())?;
                map.end()
            }
        }
    }
}

/// Reads a rule through the same strict parser as [`parse_rule_tree`].
impl<'de> Deserialize<'de> for Rule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        parse_root(&value).map_err(|e| D::Error::custom(e.to_string()))
    }
}
