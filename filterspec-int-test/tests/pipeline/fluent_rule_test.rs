//! Rules built in code go through the same validation and compilation as
//! rules received as JSON.

use filterspec::rule::{and, field, nor, not, or, parse_rule_tree, Rule};
use filterspec_int_test::test_util::{cleanup, create_test_context, run_test};
use serde_json::json;

fn sample() -> Rule {
    and(vec![
        field("status").in_list(["running", "paused"]),
        or(vec![field("cpu.load").gte(75.5), field("mem.used").gt(4096)]),
        not(field("tags").all(["canary"])),
        field("ports").elem_match(field("number").eq(22).and(field("proto").eq("tcp"))),
    ])
}

#[test]
fn test_fluent_rule_compiles_like_its_json() {
    run_test(
        create_test_context,
        |ctx| {
            let compiler = ctx.compiler();
            let rule = sample();
            let raw = serde_json::to_string(&rule).expect("rule serializes");

            let from_rule = compiler.compile(&rule)?;
            let from_json = compiler.compile_json(&raw)?;
            assert_eq!(from_rule, from_json);
            assert_eq!(parse_rule_tree(&raw)?, rule);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_fluent_rule_shape() {
    let rule = sample();
    assert_eq!(rule.depth(), 4);
    assert_eq!(rule.atom_count(), 7);
    assert_eq!(
        rule.fields(),
        vec!["status", "cpu.load", "mem.used", "tags", "ports", "ports.number", "ports.proto"]
    );
}

#[test]
fn test_rule_display_is_readable() {
    let rule = field("status")
        .eq("running")
        .and(field("cpu.load").gt(80))
        .and(field("name").regex("^web"));
    assert_eq!(
        rule.to_string(),
        "((status == running) && (cpu.load > 80) && (name =~ ^web))"
    );
    assert_eq!(
        nor(vec![field("age").lt(18), field("active").eq(false)]).to_string(),
        "(nor (age < 18), (active == false))"
    );
}

#[test]
fn test_rule_evaluation_helpers() {
    let rule = sample();
    assert!(rule.matches_any(&|atom| atom.field() == "tags"));
    assert!(!rule.matches_any(&|atom| atom.field() == "number"));

    let high_load = or(vec![field("cpu.load").gt(90), field("mem.used").gt(8192)]);
    assert!(high_load.matches(&|atom| atom.field() == "mem.used"));
    assert!(!not(high_load).matches(&|atom| atom.field() == "mem.used"));
}

#[test]
fn test_compiled_filter_is_plain_json() {
    run_test(
        create_test_context,
        |ctx| {
            let filter = ctx.compiler().compile(&field("active").exists(true).not())?;
            let value: serde_json::Value = filter.into();
            assert_eq!(value, json!({"$not": {"active": {"$exists": true}}}));
            Ok(())
        },
        cleanup,
    )
}
