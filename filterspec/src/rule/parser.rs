use serde_json::{Map, Value};

use crate::common::{
    json_type_name, ATOM_RULE_KEYS, COMBINED_RULE_KEYS, CONDITION_KEY, FIELD_KEY, OPERATOR_KEY,
    RULES_KEY, VALUE_KEY,
};
use crate::errors::{ErrorKind, FilterError, FilterResult};
use crate::operator::Operator;

use super::{AtomRule, CombinedRule, Condition, PathSegment, Rule, RulePath, RuleValue};

/// Parses a raw JSON payload into a rule tree.
///
/// Only the shape is checked here: each object must be exactly one of the
/// two rule shapes, with no missing and no unknown keys. Operator tokens,
/// fields and values are checked later by the validator.
///
/// # Errors
///
/// * `MalformedTree` when the payload is not JSON or a node has the wrong shape
/// * `EmptyRuleSet` when the payload is `{}` or `null`
///
/// # Examples
///
/// ```rust
/// use filterspec::rule::parse_rule_tree;
///
/// let rule = parse_rule_tree(r#"{
///     "condition": "AND",
///     "rules": [
///         {"field": "status", "operator": "$eq", "value": "running"},
///         {"field": "cpu.load", "operator": "$gt", "value": 80}
///     ]
/// }"#).unwrap();
/// assert_eq!(rule.atom_count(), 2);
/// ```
pub fn parse_rule_tree(raw: &str) -> FilterResult<Rule> {
    let value: Value = serde_json::from_str(raw)?;
    parse_root(&value)
}

/// Parses an already decoded JSON document into a rule tree.
pub fn parse_root(value: &Value) -> FilterResult<Rule> {
    match value {
        Value::Null => Err(empty_root()),
        Value::Object(map) if map.is_empty() => Err(empty_root()),
        _ => parse_rule(value, &RulePath::root()),
    }
}

fn empty_root() -> FilterError {
    FilterError::new("rule tree is empty", ErrorKind::EmptyRuleSet).with_path(RulePath::root())
}

/// Parses one node. `path` locates the node for error reporting.
pub(crate) fn parse_rule(value: &Value, path: &RulePath) -> FilterResult<Rule> {
    let map = match value {
        Value::Object(map) => map,
        other => {
            return Err(malformed(
                &format!("expected a rule object, found {}", json_type_name(other)),
                path,
            ))
        }
    };

    let is_combined = map.contains_key(CONDITION_KEY);
    let is_atom = map.contains_key(FIELD_KEY);
    match (is_combined, is_atom) {
        (true, true) => Err(malformed(
            "a rule can not have both 'condition' and 'field'",
            path,
        )),
        (true, false) => parse_combined(map, path),
        (false, true) => parse_atom(map, path),
        (false, false) => Err(malformed(
            "a rule needs either 'condition' and 'rules' or 'field', 'operator' and 'value'",
            path,
        )),
    }
}

fn parse_combined(map: &Map<String, Value>, path: &RulePath) -> FilterResult<Rule> {
    check_keys(map, &COMBINED_RULE_KEYS, path)?;

    let condition = match map.get(CONDITION_KEY) {
        Some(Value::String(condition)) => condition
            .parse::<Condition>()
            .map_err(|e| e.with_path(path.child(PathSegment::Condition)))?,
        Some(other) => {
            return Err(malformed(
                &format!("condition must be a string, found {}", json_type_name(other)),
                &path.child(PathSegment::Condition),
            ))
        }
        None => return Err(malformed("missing 'condition'", path)),
    };

    let children = match map.get(RULES_KEY) {
        Some(Value::Array(children)) => children,
        Some(other) => {
            return Err(malformed(
                &format!("rules must be an array, found {}", json_type_name(other)),
                path,
            ))
        }
        None => return Err(malformed("missing 'rules'", path)),
    };

    let mut rules = Vec::with_capacity(children.len());
    for (index, child) in children.iter().enumerate() {
        rules.push(parse_rule(child, &path.child(PathSegment::Rules(index)))?);
    }
    Ok(Rule::Combined(CombinedRule::new(condition, rules)))
}

fn parse_atom(map: &Map<String, Value>, path: &RulePath) -> FilterResult<Rule> {
    check_keys(map, &ATOM_RULE_KEYS, path)?;

    let field = match map.get(FIELD_KEY) {
        Some(Value::String(field)) if !field.is_empty() => field,
        Some(Value::String(_)) => {
            return Err(malformed("field can not be empty", &path.child(PathSegment::Field)))
        }
        Some(other) => {
            return Err(malformed(
                &format!("field must be a string, found {}", json_type_name(other)),
                &path.child(PathSegment::Field),
            ))
        }
        None => return Err(malformed("missing 'field'", path)),
    };

    let operator = match map.get(OPERATOR_KEY) {
        Some(Value::String(operator)) => operator,
        Some(other) => {
            return Err(malformed(
                &format!("operator must be a string, found {}", json_type_name(other)),
                &path.child(PathSegment::Operator),
            ))
        }
        None => return Err(malformed("missing 'operator'", path)),
    };

    let value = match map.get(VALUE_KEY) {
        Some(value) => value,
        None => return Err(malformed("missing 'value'", path)),
    };

    let value = match (Operator::from_token(operator), value) {
        (Some(Operator::ElemMatch), Value::Object(nested)) => {
            let value_path = path.child(PathSegment::Value);
            if nested.is_empty() {
                return Err(FilterError::new(
                    "$elemMatch needs a non-empty rule",
                    ErrorKind::EmptyRuleSet,
                )
                .with_path(value_path));
            }
            RuleValue::Rule(Box::new(parse_rule(value, &value_path)?))
        }
        // anything else is checked against the arity contract by the validator
        (_, value) => RuleValue::Literal(value.clone()),
    };

    Ok(Rule::Atom(AtomRule::new(field, operator, value)))
}

fn check_keys(map: &Map<String, Value>, allowed: &[&str], path: &RulePath) -> FilterResult<()> {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(malformed(&format!("unexpected key '{}'", key), path));
        }
    }
    Ok(())
}

fn malformed(message: &str, path: &RulePath) -> FilterError {
    FilterError::new(message, ErrorKind::MalformedTree).with_path(path.clone())
}
