use serde_json::Value;

use crate::operator::Operator;

use super::{AtomRule, CombinedRule, Condition, Rule, RuleValue};

/// Creates a fluent rule builder for the specified field name.
///
/// # Arguments
///
/// * `field_name` - The name of the field the rule applies to
///
/// # Returns
///
/// A `FluentRule` builder for constructing atoms on that field
pub fn field(field_name: &str) -> FluentRule {
    FluentRule {
        field_name: field_name.to_string(),
    }
}

/// A fluent builder for atoms on a single field.
///
/// Every method consumes the builder and returns a [`Rule::Atom`]. The
/// builder does not validate anything; rules built this way go through the
/// same validator as parsed ones.
pub struct FluentRule {
    field_name: String,
}

impl FluentRule {
    fn atom(self, operator: Operator, value: RuleValue) -> Rule {
        Rule::Atom(AtomRule::new(&self.field_name, operator.token(), value))
    }

    fn literal<T: Into<Value>>(self, operator: Operator, value: T) -> Rule {
        self.atom(operator, RuleValue::Literal(value.into()))
    }

    fn list<T, I>(self, operator: Operator, values: I) -> Rule
    where
        T: Into<Value>,
        I: IntoIterator<Item = T>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.literal(operator, Value::Array(values))
    }

    /// Matches when the field equals `value`.
    #[inline]
    pub fn eq<T: Into<Value>>(self, value: T) -> Rule {
        self.literal(Operator::Eq, value)
    }

    /// Matches when the field differs from `value`.
    #[inline]
    pub fn ne<T: Into<Value>>(self, value: T) -> Rule {
        self.literal(Operator::Ne, value)
    }

    /// Matches when the field is greater than `value`.
    #[inline]
    pub fn gt<T: Into<Value>>(self, value: T) -> Rule {
        self.literal(Operator::Gt, value)
    }

    /// Matches when the field is greater than or equal to `value`.
    #[inline]
    pub fn gte<T: Into<Value>>(self, value: T) -> Rule {
        self.literal(Operator::Gte, value)
    }

    /// Matches when the field is less than `value`.
    #[inline]
    pub fn lt<T: Into<Value>>(self, value: T) -> Rule {
        self.literal(Operator::Lt, value)
    }

    /// Matches when the field is less than or equal to `value`.
    #[inline]
    pub fn lte<T: Into<Value>>(self, value: T) -> Rule {
        self.literal(Operator::Lte, value)
    }

    /// Matches when the field equals any of `values`.
    ///
    /// # Arguments
    ///
    /// * `values` - The candidate values
    pub fn in_list<T, I>(self, values: I) -> Rule
    where
        T: Into<Value>,
        I: IntoIterator<Item = T>,
    {
        self.list(Operator::In, values)
    }

    /// Matches when the field equals none of `values`.
    pub fn not_in<T, I>(self, values: I) -> Rule
    where
        T: Into<Value>,
        I: IntoIterator<Item = T>,
    {
        self.list(Operator::Nin, values)
    }

    /// Matches when the field matches the regular expression `pattern`.
    #[inline]
    pub fn regex(self, pattern: &str) -> Rule {
        self.literal(Operator::Regex, pattern)
    }

    /// Matches on the presence (`true`) or absence (`false`) of the field.
    #[inline]
    pub fn exists(self, exists: bool) -> Rule {
        self.literal(Operator::Exists, exists)
    }

    /// Matches when the field holds a value of the given BSON type alias.
    #[inline]
    pub fn of_type(self, alias: &str) -> Rule {
        self.literal(Operator::Type, alias)
    }

    /// Matches array fields holding every one of `values`.
    pub fn all<T, I>(self, values: I) -> Rule
    where
        T: Into<Value>,
        I: IntoIterator<Item = T>,
    {
        self.list(Operator::All, values)
    }

    /// Matches array fields with exactly `size` elements.
    #[inline]
    pub fn size(self, size: u64) -> Rule {
        self.literal(Operator::Size, size)
    }

    /// Matches array fields with at least one element satisfying `rule`.
    ///
    /// # Arguments
    ///
    /// * `rule` - A rule over the fields of a single array element
    #[inline]
    pub fn elem_match(self, rule: Rule) -> Rule {
        self.atom(Operator::ElemMatch, RuleValue::Rule(Box::new(rule)))
    }
}

/// Combines rules with AND.
pub fn and(rules: Vec<Rule>) -> Rule {
    Rule::Combined(CombinedRule::new(Condition::And, rules))
}

/// Combines rules with OR.
pub fn or(rules: Vec<Rule>) -> Rule {
    Rule::Combined(CombinedRule::new(Condition::Or, rules))
}

/// Negates a rule.
pub fn not(rule: Rule) -> Rule {
    Rule::Combined(CombinedRule::new(Condition::Not, vec![rule]))
}

/// Matches when none of `rules` match.
pub fn nor(rules: Vec<Rule>) -> Rule {
    Rule::Combined(CombinedRule::new(Condition::Nor, rules))
}
