//! Field and value checks, run against the monitoring schema.

use chrono::{Duration, Utc};
use filterspec::errors::ErrorKind;
use filterspec::rule::{field, AtomRule, Rule};
use filterspec_int_test::test_util::{assert_kind, cleanup, create_test_context, run_test};
use serde_json::json;

fn raw_atom(field: &str, operator: &str, value: serde_json::Value) -> Rule {
    Rule::Atom(AtomRule::new(field, operator, value.into()))
}

#[test]
fn test_unknown_field_is_rejected_for_every_operator() {
    run_test(
        create_test_context,
        |ctx| {
            let compiler = ctx.compiler();
            let rules = [
                field("ghost").eq(1),
                field("ghost").ne(1),
                field("ghost").gt(1),
                field("ghost").gte(1),
                field("ghost").lt(1),
                field("ghost").lte(1),
                field("ghost").in_list([1, 2]),
                field("ghost").not_in([1, 2]),
                field("ghost").regex("^a"),
                field("ghost").exists(true),
                field("ghost").of_type("string"),
                field("ghost").all([1]),
                field("ghost").size(1),
                field("ghost").elem_match(field("number").eq(1)),
            ];

            for rule in rules {
                let err = assert_kind(compiler.validate(&rule), ErrorKind::FieldNotAllowed);
                assert_eq!(err.path().map(|p| p.to_string()), Some("field".to_string()), "{}", rule);
            }
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_field_names_are_matched_exactly() {
    run_test(
        create_test_context,
        |ctx| {
            let compiler = ctx.compiler();
            assert_kind(compiler.validate(&field("Status").eq("running")), ErrorKind::FieldNotAllowed);
            assert_kind(compiler.validate(&field("cpu").gt(1)), ErrorKind::FieldNotAllowed);
            assert_kind(compiler.validate(&field("").eq(1)), ErrorKind::FieldNotAllowed);
            compiler.validate(&field("cpu.load").gt(1))?;
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_operator_outside_allowed_set() {
    run_test(
        create_test_context,
        |ctx| {
            let compiler = ctx.compiler();
            compiler.validate(&field("name").eq("web-1"))?;
            compiler.validate(&field("name").regex("^web-"))?;
            assert_kind(compiler.validate(&field("name").ne("web-1")), ErrorKind::FieldNotAllowed);
            assert_kind(compiler.validate(&field("name").in_list(["a"])), ErrorKind::FieldNotAllowed);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_operator_unsuitable_for_kind() {
    run_test(
        create_test_context,
        |ctx| {
            let compiler = ctx.compiler();
            assert_kind(compiler.validate(&field("active").gt(true)), ErrorKind::TypeMismatch);
            assert_kind(compiler.validate(&field("age").size(2)), ErrorKind::TypeMismatch);
            assert_kind(compiler.validate(&field("status").all(["a"])), ErrorKind::TypeMismatch);
            assert_kind(compiler.validate(&field("age").regex("1")), ErrorKind::TypeMismatch);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_value_shapes() {
    run_test(
        create_test_context,
        |ctx| {
            let compiler = ctx.compiler();
            let rejected = [
                raw_atom("age", "$in", json!(5)),
                raw_atom("age", "$in", json!([null])),
                raw_atom("age", "$gt", json!([1, 2])),
                raw_atom("age", "$eq", json!({"a": 1})),
                raw_atom("age", "$eq", json!("thirty")),
                raw_atom("tags", "$size", json!(-1)),
                raw_atom("tags", "$size", json!(1.5)),
                raw_atom("active", "$exists", json!("yes")),
                raw_atom("age", "$type", json!("float")),
                raw_atom("age", "$type", json!(99)),
                raw_atom("name", "$regex", json!(7)),
                raw_atom("created", "$gt", json!("2024-13-01")),
                raw_atom("ports", "$elemMatch", json!(5)),
            ];

            for rule in rejected {
                let err = assert_kind(compiler.validate(&rule), ErrorKind::TypeMismatch);
                assert_eq!(err.path().map(|p| p.to_string()), Some("value".to_string()), "{}", rule);
            }

            let accepted = [
                raw_atom("age", "$eq", json!(null)),
                raw_atom("age", "$in", json!([])),
                raw_atom("age", "$type", json!(16)),
                raw_atom("name", "$regex", json!("^(?!tmp)")),
                raw_atom("name", "$regex", json!(r"(a)\1")),
                raw_atom("tags", "$size", json!(0)),
                raw_atom("tags", "$eq", json!("web")),
                raw_atom("tags", "$eq", json!(["web", "db"])),
                raw_atom("created", "$gte", json!(1_700_000_000)),
                raw_atom("created", "$lt", json!("2024-05-01T10:00:00Z")),
                raw_atom("created", "$gte", json!((Utc::now() - Duration::days(7)).to_rfc3339())),
                raw_atom("created", "$lte", json!(Utc::now().format("%Y-%m-%d").to_string())),
            ];
            for rule in accepted {
                compiler.validate(&rule)?;
            }
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_elem_match_uses_element_schema() {
    run_test(
        create_test_context,
        |ctx| {
            let compiler = ctx.compiler();
            compiler.validate(&field("ports").elem_match(field("proto").eq("udp")))?;

            let err = assert_kind(
                compiler.validate(&field("ports").elem_match(field("status").eq("running"))),
                ErrorKind::FieldNotAllowed,
            );
            assert_eq!(err.path().map(|p| p.to_string()), Some("value.field".to_string()));

            // tags has no element schema
            assert_kind(
                compiler.validate(&field("tags").elem_match(field("number").eq(1))),
                ErrorKind::FieldNotAllowed,
            );
            Ok(())
        },
        cleanup,
    )
}
