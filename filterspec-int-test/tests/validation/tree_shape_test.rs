//! Structural checks: combinator arity, node shapes and operator tokens.

use filterspec::errors::ErrorKind;
use filterspec::rule::{and, field, not, or, AtomRule, CombinedRule, Condition, Rule};
use filterspec_int_test::test_util::{assert_kind, cleanup, create_test_context, run_test};
use serde_json::json;

#[test]
fn test_not_takes_exactly_one_rule() {
    run_test(
        create_test_context,
        |ctx| {
            let compiler = ctx.compiler();
            compiler.validate(&not(field("age").gt(1)))?;

            let two = Rule::Combined(CombinedRule::new(
                Condition::Not,
                vec![field("age").gt(1), field("age").lt(9)],
            ));
            assert_kind(compiler.validate(&two), ErrorKind::MalformedTree);

            let none = Rule::Combined(CombinedRule::new(Condition::Not, vec![]));
            assert_kind(compiler.validate(&none), ErrorKind::EmptyRuleSet);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_empty_combinators() {
    run_test(
        create_test_context,
        |ctx| {
            let compiler = ctx.compiler();
            for condition in ["AND", "OR", "NOR", "NOT"] {
                let raw = format!(r#"{{"condition": "{}", "rules": []}}"#, condition);
                assert_kind(compiler.compile_json(&raw), ErrorKind::EmptyRuleSet);
            }

            let nested_empty = and(vec![field("age").gt(1), or(vec![])]);
            let err = assert_kind(compiler.validate(&nested_empty), ErrorKind::EmptyRuleSet);
            assert_eq!(err.path().map(|p| p.to_string()), Some("rules[1]".to_string()));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_operator_tokens_are_closed() {
    run_test(
        create_test_context,
        |ctx| {
            let compiler = ctx.compiler();
            for token in ["$where", "$expr", "$text", "gt", "$GT", "", "$and", "$not"] {
                let rule = Rule::Atom(AtomRule::new("age", token, json!(1).into()));
                let err = assert_kind(compiler.validate(&rule), ErrorKind::UnknownOperator);
                assert_eq!(err.path().map(|p| p.to_string()), Some("operator".to_string()));
            }
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_malformed_nodes() {
    run_test(
        create_test_context,
        |ctx| {
            let compiler = ctx.compiler();
            let cases = [
                r#"[]"#,
                r#""age""#,
                r#"{"condition": "AND", "field": "age", "rules": []}"#,
                r#"{"condition": "AND"}"#,
                r#"{"condition": "AND", "rules": {}}"#,
                r#"{"condition": "and", "rules": [{"field": "age", "operator": "$gt", "value": 1}]}"#,
                r#"{"field": "age", "value": 1}"#,
                r#"{"field": 7, "operator": "$gt", "value": 1}"#,
                r#"{"field": "age", "operator": "$gt", "value": 1, "extra": true}"#,
                r#"{"condition": "OR", "rules": [{}]}"#,
                r#"{"condition": "OR", "rules": [5]}"#,
            ];
            for raw in cases {
                assert_kind(compiler.parse(raw), ErrorKind::MalformedTree);
            }
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_elem_match_with_empty_rule() {
    run_test(
        create_test_context,
        |ctx| {
            let raw = r#"{"field": "ports", "operator": "$elemMatch", "value": {}}"#;
            assert_kind(ctx.compiler().compile_json(raw), ErrorKind::EmptyRuleSet);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_first_problem_wins() {
    run_test(
        create_test_context,
        |ctx| {
            let rule = and(vec![
                field("age").gt(1),
                Rule::Atom(AtomRule::new("age", "$where", json!(1).into())),
                field("ghost").eq(1),
            ]);
            let err = assert_kind(ctx.compiler().validate(&rule), ErrorKind::UnknownOperator);
            assert_eq!(err.path().map(|p| p.to_string()), Some("rules[1].operator".to_string()));
            Ok(())
        },
        cleanup,
    )
}
