//! Translation of validated rule trees into native filter documents.
//!
//! | rule                         | native filter                           |
//! |------------------------------|-----------------------------------------|
//! | atom `{f, $eq, v}`           | `{key(f): v}`                           |
//! | atom `{f, $op, v}`           | `{key(f): {$op: v}}`                    |
//! | atom `{f, $elemMatch, r}`    | `{key(f): {$elemMatch: compile(r)}}`    |
//! | `AND` / `OR` / `NOR`         | `{$and: [..]}` / `{$or: [..]}` / `{$nor: [..]}` |
//! | `NOT`                        | `{$not: compile(child)}`                |
//!
//! `key(f)` is the storage key of the field: literal names have their dots
//! escaped, nested paths keep them. Children stay in input order.

use std::fmt::Display;
use std::ops::Deref;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::errors::{ErrorKind, FilterError, FilterResult};
use crate::operator::Operator;
use crate::rule::{AtomRule, CombinedRule, Condition, Rule, RuleValue};
use crate::schema::SchemaProvider;

/// A filter document in the storage engine's query language.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NativeFilter(Map<String, Value>);

impl NativeFilter {
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl Deref for NativeFilter {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Serialize for NativeFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl Display for NativeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let json = serde_json::to_string(&self.0).map_err(|_| std::fmt::Error)?;
        write!(f, "{}", json)
    }
}

impl From<NativeFilter> for Value {
    fn from(filter: NativeFilter) -> Self {
        filter.into_value()
    }
}

/// Compiles a validated rule into a native filter.
///
/// The rule must have passed [`validate`](crate::validator::validate) against
/// the same schema. Input the validator would have rejected fails with
/// `InternalError`; it is never passed through.
///
/// # Examples
///
/// ```rust
/// use filterspec::compiler::compile;
/// use filterspec::rule::field;
/// use filterspec::schema::{FieldKind, FieldSchema, FieldSpec};
///
/// let schema = FieldSchema::builder()
///     .field("status", FieldSpec::new(FieldKind::String))
///     .build()
///     .unwrap();
///
/// let filter = compile(&field("status").eq("stopped").not(), &schema).unwrap();
/// assert_eq!(filter.to_string(), r#"{"$not":{"status":"stopped"}}"#);
/// ```
pub fn compile(rule: &Rule, schema: &dyn SchemaProvider) -> FilterResult<NativeFilter> {
    compile_rule(rule, schema).map(NativeFilter)
}

fn compile_rule(rule: &Rule, schema: &dyn SchemaProvider) -> FilterResult<Map<String, Value>> {
    match rule {
        Rule::Atom(atom) => compile_atom(atom, schema),
        Rule::Combined(combined) => compile_combined(combined, schema),
    }
}

fn compile_atom(atom: &AtomRule, schema: &dyn SchemaProvider) -> FilterResult<Map<String, Value>> {
    let operator = match atom.operator() {
        Some(operator) if !operator.is_combinator() => operator,
        _ => {
            return Err(contract_violation(&format!(
                "operator {} reached the compiler",
                atom.operator_token()
            )))
        }
    };
    let spec = match schema.lookup(atom.field()) {
        Some(spec) => spec,
        None => {
            return Err(contract_violation(&format!(
                "field '{}' reached the compiler without a schema entry",
                atom.field()
            )))
        }
    };

    let condition = match (operator, atom.value()) {
        (Operator::Eq, RuleValue::Literal(value)) => value.clone(),
        (Operator::ElemMatch, RuleValue::Rule(nested)) => {
            let nested = compile_rule(nested, spec.element_schema())?;
            single(operator.native_token(), Value::Object(nested))
        }
        (Operator::ElemMatch, RuleValue::Literal(_)) | (_, RuleValue::Rule(_)) => {
            return Err(contract_violation(&format!(
                "value of {} on '{}' does not fit the operator",
                operator,
                atom.field()
            )))
        }
        (_, RuleValue::Literal(value)) => single(operator.native_token(), value.clone()),
    };

    let mut filter = Map::with_capacity(1);
    filter.insert(spec.storage_key(atom.field()), condition);
    Ok(filter)
}

fn compile_combined(
    combined: &CombinedRule,
    schema: &dyn SchemaProvider,
) -> FilterResult<Map<String, Value>> {
    let rules = combined.rules();
    let condition = combined.condition();
    let token = condition.operator().native_token();

    if condition == Condition::Not {
        return match rules {
            [child] => {
                let child = compile_rule(child, schema)?;
                Ok(object(token, Value::Object(child)))
            }
            _ => Err(contract_violation(&format!(
                "NOT with {} rules reached the compiler",
                rules.len()
            ))),
        };
    }

    if rules.is_empty() {
        return Err(contract_violation(&format!(
            "empty {} reached the compiler",
            condition
        )));
    }
    let mut children = Vec::with_capacity(rules.len());
    for rule in rules {
        children.push(Value::Object(compile_rule(rule, schema)?));
    }
    Ok(object(token, Value::Array(children)))
}

fn object(key: &str, value: Value) -> Map<String, Value> {
    let mut map = Map::with_capacity(1);
    map.insert(key.to_string(), value);
    map
}

fn single(key: &str, value: Value) -> Value {
    Value::Object(object(key, value))
}

fn contract_violation(message: &str) -> FilterError {
    log::error!("Compiler contract violated: {}", message);
    FilterError::new(message, ErrorKind::InternalError)
}
