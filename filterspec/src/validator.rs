//! Rule tree validation.
//!
//! The validator walks the tree once, pre-order and left to right, and stops
//! at the first problem. It checks, for every node:
//!
//! 1. the node is not deeper than `max_depth` (`TooDeep`)
//! 2. combinators have children, `NOT` exactly one (`EmptyRuleSet`,
//!    `MalformedTree`), and no more children than `max_or_rules` (`OR`,
//!    `NOR`) or `max_and_rules` (`AND`) allow (`TooManyConditions`)
//! 3. the running atom count stays within `max_conditions` (`TooManyConditions`)
//! 4. the atom's operator is a registry operator (`UnknownOperator`)
//! 5. the field is in the schema and permits the operator (`FieldNotAllowed`)
//! 6. the operator suits the field kind and the value fits the operator
//!    (`TypeMismatch`)
//!
//! `$elemMatch` sub-rules are checked against the element schema of the
//! array field, one level deeper, and their atoms count toward the limit.

use fancy_regex::Regex;
use serde_json::Value;

use crate::common::{as_non_negative_integer, has_uniform_type, is_scalar, json_type_name};
use crate::config::Limits;
use crate::errors::{ErrorKind, FilterError, FilterResult};
use crate::operator::{is_known_type, Operator, ValueShape};
use crate::rule::{AtomRule, CombinedRule, Condition, PathSegment, Rule, RulePath, RuleValue};
use crate::schema::{FieldKind, FieldSpec, SchemaProvider};

/// Validates `rule` against `schema` and `limits`.
///
/// # Examples
///
/// ```rust
/// use filterspec::config::Limits;
/// use filterspec::errors::ErrorKind;
/// use filterspec::rule::field;
/// use filterspec::schema::{FieldKind, FieldSchema, FieldSpec};
/// use filterspec::validator::validate;
///
/// let schema = FieldSchema::builder()
///     .field("age", FieldSpec::new(FieldKind::Number))
///     .build()
///     .unwrap();
///
/// assert!(validate(&field("age").gt(30), &schema, &Limits::default()).is_ok());
///
/// let err = validate(&field("age").eq("thirty"), &schema, &Limits::default()).unwrap_err();
/// assert_eq!(err.kind(), &ErrorKind::TypeMismatch);
/// ```
pub fn validate(rule: &Rule, schema: &dyn SchemaProvider, limits: &Limits) -> FilterResult<()> {
    Validator::new(limits).validate(rule, schema)
}

/// Per-call validation state. Not shared between calls.
pub struct Validator<'a> {
    limits: &'a Limits,
    conditions: usize,
}

impl<'a> Validator<'a> {
    pub fn new(limits: &'a Limits) -> Self {
        Validator {
            limits,
            conditions: 0,
        }
    }

    pub fn validate(mut self, rule: &Rule, schema: &dyn SchemaProvider) -> FilterResult<()> {
        self.visit(rule, schema, &RulePath::root(), 1)
    }

    fn visit(
        &mut self,
        rule: &Rule,
        schema: &dyn SchemaProvider,
        path: &RulePath,
        depth: usize,
    ) -> FilterResult<()> {
        if depth > self.limits.max_depth {
            return Err(error(
                &format!("max depth {} exceeded", self.limits.max_depth),
                ErrorKind::TooDeep,
                path.clone(),
            ));
        }

        match rule {
            Rule::Combined(combined) => self.visit_combined(combined, schema, path, depth),
            Rule::Atom(atom) => {
                self.conditions += 1;
                if self.conditions > self.limits.max_conditions {
                    return Err(error(
                        &format!("max {} conditions exceeded", self.limits.max_conditions),
                        ErrorKind::TooManyConditions,
                        path.clone(),
                    ));
                }
                self.visit_atom(atom, schema, path, depth)
            }
        }
    }

    fn visit_combined(
        &mut self,
        combined: &CombinedRule,
        schema: &dyn SchemaProvider,
        path: &RulePath,
        depth: usize,
    ) -> FilterResult<()> {
        let rules = combined.rules();
        let condition = combined.condition();

        if rules.is_empty() {
            return Err(error(
                &format!("{} rules can not be empty", condition),
                ErrorKind::EmptyRuleSet,
                path.clone(),
            ));
        }
        if condition == Condition::Not && rules.len() > 1 {
            return Err(error(
                &format!("NOT takes exactly one rule, found {}", rules.len()),
                ErrorKind::MalformedTree,
                path.clone(),
            ));
        }
        let max_rules = match condition {
            Condition::And => self.limits.max_and_rules,
            Condition::Or | Condition::Nor => self.limits.max_or_rules,
            Condition::Not => 0,
        };
        if max_rules > 0 && rules.len() > max_rules {
            return Err(error(
                &format!("{} takes at most {} rules, found {}", condition, max_rules, rules.len()),
                ErrorKind::TooManyConditions,
                path.clone(),
            ));
        }

        for (index, child) in rules.iter().enumerate() {
            self.visit(child, schema, &path.child(PathSegment::Rules(index)), depth + 1)?;
        }
        Ok(())
    }

    fn visit_atom(
        &mut self,
        atom: &AtomRule,
        schema: &dyn SchemaProvider,
        path: &RulePath,
        depth: usize,
    ) -> FilterResult<()> {
        let operator = match atom.operator() {
            Some(operator) if !operator.is_combinator() => operator,
            _ => {
                return Err(error(
                    &format!("unsupported operator: {}", atom.operator_token()),
                    ErrorKind::UnknownOperator,
                    path.child(PathSegment::Operator),
                ))
            }
        };

        let spec = match schema.lookup(atom.field()) {
            Some(spec) if !atom.field().is_empty() => spec,
            _ => {
                return Err(error(
                    &format!("field '{}' is not allowed", atom.field()),
                    ErrorKind::FieldNotAllowed,
                    path.child(PathSegment::Field),
                ))
            }
        };
        if !spec.permits(operator) {
            return Err(error(
                &format!("operator {} is not allowed on field '{}'", operator, atom.field()),
                ErrorKind::FieldNotAllowed,
                path.child(PathSegment::Operator),
            ));
        }
        if !spec.kind().supports(operator) {
            return Err(error(
                &format!("operator {} does not apply to {} field '{}'", operator, spec.kind(), atom.field()),
                ErrorKind::TypeMismatch,
                path.child(PathSegment::Operator),
            ));
        }

        let value_path = path.child(PathSegment::Value);
        match (operator, atom.value()) {
            (Operator::ElemMatch, RuleValue::Rule(nested)) => {
                self.visit(nested, spec.element_schema(), &value_path, depth + 1)
            }
            (Operator::ElemMatch, RuleValue::Literal(value)) => Err(error(
                &format!("$elemMatch expects a nested rule, found {}", json_type_name(value)),
                ErrorKind::TypeMismatch,
                value_path,
            )),
            (_, RuleValue::Rule(_)) => Err(error(
                &format!("{} expects a literal value, found a rule", operator),
                ErrorKind::TypeMismatch,
                value_path,
            )),
            (_, RuleValue::Literal(value)) => self
                .check_literal(operator, spec, value)
                .map_err(|e| e.with_path(value_path)),
        }
    }

    fn check_literal(&self, operator: Operator, spec: &FieldSpec, value: &Value) -> FilterResult<()> {
        let kind = spec.kind();
        match operator.shape() {
            ValueShape::Scalar => match operator {
                Operator::Eq | Operator::Ne => match value {
                    Value::Null => Ok(()),
                    Value::Array(_) if kind == FieldKind::Array => {
                        self.check_list(operator, spec, value)
                    }
                    v if kind.accepts_scalar(v) => Ok(()),
                    v => Err(mismatch(operator, &format!("a {} value", kind), v)),
                },
                Operator::Regex => match value {
                    Value::String(pattern) => {
                        Regex::new(pattern)?;
                        Ok(())
                    }
                    v => Err(mismatch(operator, "a pattern string", v)),
                },
                Operator::Type => {
                    if is_known_type(value) {
                        Ok(())
                    } else {
                        Err(mismatch(operator, "a known type alias or code", value))
                    }
                }
                _ => {
                    if kind.accepts_scalar(value) {
                        Ok(())
                    } else {
                        Err(mismatch(operator, &format!("a {} value", kind), value))
                    }
                }
            },
            ValueShape::List => self.check_list(operator, spec, value),
            ValueShape::Boolean => match value {
                Value::Bool(_) => Ok(()),
                v => Err(mismatch(operator, "a boolean", v)),
            },
            ValueShape::NonNegativeInteger => match as_non_negative_integer(value) {
                Some(_) => Ok(()),
                None => Err(mismatch(operator, "a non-negative integer", value)),
            },
            ValueShape::NestedRule | ValueShape::Rules => {
                Err(mismatch(operator, &operator.shape().to_string(), value))
            }
        }
    }

    fn check_list(&self, operator: Operator, spec: &FieldSpec, value: &Value) -> FilterResult<()> {
        let items = match value {
            Value::Array(items) => items,
            v => return Err(mismatch(operator, "a list", v)),
        };

        let max = self.limits.max_list_elements;
        if items.len() > max {
            return Err(FilterError::new(
                &format!("{} takes at most {} values, found {}", operator, max, items.len()),
                ErrorKind::TypeMismatch,
            ));
        }
        if items.len() * 5 > max * 4 {
            log::warn!("{} list with {} values is close to the limit of {}", operator, items.len(), max);
        }

        let kind = spec.kind();
        for item in items {
            if !is_scalar(item) || !kind.accepts_scalar(item) {
                return Err(FilterError::new(
                    &format!(
                        "{} expects a list of {} values, found an element of type {}",
                        operator,
                        kind,
                        json_type_name(item)
                    ),
                    ErrorKind::TypeMismatch,
                ));
            }
        }
        if self.limits.require_uniform_lists && !has_uniform_type(items) {
            return Err(FilterError::new(
                &format!("{} list elements must all have the same type", operator),
                ErrorKind::TypeMismatch,
            ));
        }
        Ok(())
    }
}

fn error(message: &str, kind: ErrorKind, path: RulePath) -> FilterError {
    FilterError::new(message, kind).with_path(path)
}

fn mismatch(operator: Operator, expected: &str, found: &Value) -> FilterError {
    FilterError::new(
        &format!("{} expects {}, found {}", operator, expected, json_type_name(found)),
        ErrorKind::TypeMismatch,
    )
}
