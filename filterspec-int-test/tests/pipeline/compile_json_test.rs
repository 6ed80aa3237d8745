//! End-to-end tests of the raw JSON pipeline: parse, validate and compile.

use filterspec::errors::ErrorKind;
use filterspec_int_test::test_util::{assert_kind, cleanup, create_test_context, run_test};
use serde_json::json;

// ============================================================================
// COMPILED OUTPUT
// ============================================================================

#[test]
fn test_literal_dotted_field_is_escaped() {
    run_test(
        create_test_context,
        |ctx| {
            let filter = ctx.compiler().compile_json(
                r#"{
                    "condition": "AND",
                    "rules": [
                        {"field": "status", "operator": "$eq", "value": "running"},
                        {"field": "cpu.load", "operator": "$gt", "value": 80}
                    ]
                }"#,
            )?;

            assert_eq!(
                filter.into_value(),
                json!({"$and": [{"status": "running"}, {"cpu\\u002eload": {"$gt": 80}}]})
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_nested_field_keeps_its_separators() {
    run_test(
        create_test_context,
        |ctx| {
            let filter = ctx
                .compiler()
                .compile_json(r#"{"field": "mem.used", "operator": "$lte", "value": 2048}"#)?;

            assert_eq!(filter.to_string(), r#"{"mem.used":{"$lte":2048}}"#);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_not_wraps_its_only_child() {
    run_test(
        create_test_context,
        |ctx| {
            let filter = ctx.compiler().compile_json(
                r#"{"condition": "NOT", "rules": [{"field": "status", "operator": "$eq", "value": "stopped"}]}"#,
            )?;

            assert_eq!(filter.to_string(), r#"{"$not":{"status":"stopped"}}"#);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_or_and_nor_keep_child_order() {
    run_test(
        create_test_context,
        |ctx| {
            let filter = ctx.compiler().compile_json(
                r#"{
                    "condition": "OR",
                    "rules": [
                        {"field": "age", "operator": "$lt", "value": 18},
                        {"condition": "NOR", "rules": [
                            {"field": "status", "operator": "$in", "value": ["failed", "stopped"]},
                            {"field": "active", "operator": "$exists", "value": false}
                        ]}
                    ]
                }"#,
            )?;

            assert_eq!(
                filter.into_value(),
                json!({"$or": [
                    {"age": {"$lt": 18}},
                    {"$nor": [
                        {"status": {"$in": ["failed", "stopped"]}},
                        {"active": {"$exists": false}}
                    ]}
                ]})
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_elem_match_compiles_against_element_schema() {
    run_test(
        create_test_context,
        |ctx| {
            let filter = ctx.compiler().compile_json(
                r#"{
                    "field": "ports",
                    "operator": "$elemMatch",
                    "value": {
                        "condition": "AND",
                        "rules": [
                            {"field": "number", "operator": "$eq", "value": 443},
                            {"field": "proto", "operator": "$eq", "value": "tcp"}
                        ]
                    }
                }"#,
            )?;

            assert_eq!(
                filter.into_value(),
                json!({"ports": {"$elemMatch": {"$and": [{"number": 443}, {"proto": "tcp"}]}}})
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_array_and_misc_operators() {
    run_test(
        create_test_context,
        |ctx| {
            let compiler = ctx.compiler();
            let cases = [
                (
                    r#"{"field": "tags", "operator": "$all", "value": ["web", "edge"]}"#,
                    json!({"tags": {"$all": ["web", "edge"]}}),
                ),
                (
                    r#"{"field": "tags", "operator": "$size", "value": 2}"#,
                    json!({"tags": {"$size": 2}}),
                ),
                (
                    r#"{"field": "name", "operator": "$regex", "value": "^web-[0-9]+$"}"#,
                    json!({"name": {"$regex": "^web-[0-9]+$"}}),
                ),
                (
                    r#"{"field": "created", "operator": "$gte", "value": "2024-01-31"}"#,
                    json!({"created": {"$gte": "2024-01-31"}}),
                ),
                (
                    r#"{"field": "age", "operator": "$type", "value": "number"}"#,
                    json!({"age": {"$type": "number"}}),
                ),
                (
                    r#"{"field": "status", "operator": "$nin", "value": ["failed"]}"#,
                    json!({"status": {"$nin": ["failed"]}}),
                ),
            ];

            for (raw, expected) in cases {
                assert_eq!(compiler.compile_json(raw)?.into_value(), expected, "{}", raw);
            }
            Ok(())
        },
        cleanup,
    )
}

// ============================================================================
// REJECTED INPUT
// ============================================================================

#[test]
fn test_rejections_by_kind() {
    run_test(
        create_test_context,
        |ctx| {
            let compiler = ctx.compiler();
            let cases = [
                ("not json", ErrorKind::MalformedTree),
                ("null", ErrorKind::EmptyRuleSet),
                ("{}", ErrorKind::EmptyRuleSet),
                (r#"{"condition": "AND", "rules": []}"#, ErrorKind::EmptyRuleSet),
                (r#"{"condition": "XOR", "rules": []}"#, ErrorKind::MalformedTree),
                (r#"{"field": "age", "operator": "$gt"}"#, ErrorKind::MalformedTree),
                (r#"{"field": "age", "operator": "$where", "value": 1}"#, ErrorKind::UnknownOperator),
                (r#"{"field": "ghost", "operator": "$eq", "value": 1}"#, ErrorKind::FieldNotAllowed),
                (r#"{"field": "age", "operator": "$in", "value": 5}"#, ErrorKind::TypeMismatch),
                (r#"{"field": "tags", "operator": "$size", "value": -1}"#, ErrorKind::TypeMismatch),
                (r#"{"field": "name", "operator": "$regex", "value": "(["}"#, ErrorKind::TypeMismatch),
                (r#"{"field": "created", "operator": "$lt", "value": "yesterday"}"#, ErrorKind::TypeMismatch),
            ];

            for (raw, kind) in cases {
                let err = assert_kind(compiler.compile_json(raw), kind);
                assert!(err.kind().is_user_error(), "{}", raw);
            }
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_rejection_points_at_offending_node() {
    run_test(
        create_test_context,
        |ctx| {
            let result = ctx.compiler().compile_json(
                r#"{
                    "condition": "AND",
                    "rules": [
                        {"field": "status", "operator": "$eq", "value": "running"},
                        {"field": "ghost", "operator": "$eq", "value": 1}
                    ]
                }"#,
            );

            let err = assert_kind(result, ErrorKind::FieldNotAllowed);
            assert_eq!(err.path().map(|p| p.to_string()), Some("rules[1].field".to_string()));
            assert!(err.to_string().starts_with("rules[1].field: "));
            Ok(())
        },
        cleanup,
    )
}
