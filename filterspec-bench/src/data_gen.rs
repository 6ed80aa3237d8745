//! Data generators for benchmarks

use filterspec::operator::Operator;
use filterspec::rule::{and, field, nor, not, or, Rule};
use filterspec::schema::{FieldKind, FieldSchema, FieldSpec};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::{Map, Value};

const STATUSES: [&str; 4] = ["running", "stopped", "paused", "failed"];
const TAGS: [&str; 5] = ["web", "db", "cache", "batch", "edge"];

/// Deterministic generator so runs are comparable.
pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(0x5eed)
}

/// Schema of a fleet of monitored hosts, covering every field kind and both
/// literal and nested dotted names.
pub fn bench_schema() -> FieldSchema {
    let ports = FieldSchema::builder()
        .field("number", FieldSpec::new(FieldKind::Number))
        .field("proto", FieldSpec::new(FieldKind::String))
        .build()
        .unwrap_or_default();

    FieldSchema::builder()
        .field("status", FieldSpec::new(FieldKind::String))
        .field("region", FieldSpec::new(FieldKind::String))
        .field("cpu.load", FieldSpec::new(FieldKind::Number))
        .field("mem.used", FieldSpec::new(FieldKind::Number).nested())
        .field("created", FieldSpec::new(FieldKind::Timestamp))
        .field("active", FieldSpec::new(FieldKind::Boolean).with_operators([Operator::Eq, Operator::Exists]))
        .field("tags", FieldSpec::new(FieldKind::Array))
        .field("ports", FieldSpec::new(FieldKind::Array).with_elements(ports))
        .build()
        .unwrap_or_default()
}

/// Generate a single random atom valid against [`bench_schema`]
pub fn generate_atom<R: Rng>(rng: &mut R) -> Rule {
    match rng.gen_range(0..10) {
        0 => field("status").eq(*STATUSES.choose(rng).unwrap_or(&"running")),
        1 => field("status").in_list(STATUSES.choose_multiple(rng, 2).copied()),
        2 => field("cpu.load").gt(rng.gen_range(0.0..100.0)),
        3 => field("mem.used").lte(rng.gen_range(0..64_000)),
        4 => field("created").gte(format!("2024-{:02}-{:02}", rng.gen_range(1..13), rng.gen_range(1..29))),
        5 => field("tags").all(TAGS.choose_multiple(rng, 2).copied()),
        6 => field("tags").size(rng.gen_range(0..5)),
        7 => field("active").exists(rng.gen_bool(0.5)),
        8 => field("region").regex("^eu-(west|central)-[0-9]$"),
        _ => field("status").ne(*STATUSES.choose(rng).unwrap_or(&"failed")),
    }
}

/// Generate a random rule tree with exactly `atoms` atoms and at most
/// `max_depth` levels. `max_depth` must be at least 2 when `atoms > 1`.
pub fn generate_rule<R: Rng>(rng: &mut R, atoms: usize, max_depth: usize) -> Rule {
    if atoms <= 1 {
        return generate_atom(rng);
    }
    if max_depth <= 2 {
        let children = (0..atoms).map(|_| generate_atom(rng)).collect();
        return random_combinator(rng, children);
    }

    let groups = rng.gen_range(2..=atoms.min(4));
    let mut remaining = atoms;
    let mut children = Vec::with_capacity(groups);
    for i in 0..groups {
        let size = if i == groups - 1 {
            remaining
        } else {
            let max_size = remaining - (groups - i - 1);
            rng.gen_range(1..=max_size.min(remaining / 2 + 1))
        };
        remaining -= size;
        let child = generate_rule(rng, size, max_depth - 1);
        // a NOT level costs depth, so only wrap single atoms
        if size == 1 && rng.gen_bool(0.2) {
            children.push(not(child));
        } else {
            children.push(child);
        }
    }
    random_combinator(rng, children)
}

fn random_combinator<R: Rng>(rng: &mut R, children: Vec<Rule>) -> Rule {
    match rng.gen_range(0..3) {
        0 => and(children),
        1 => or(children),
        _ => nor(children),
    }
}

/// Generate a rule with an `$elemMatch` on the ports array
pub fn generate_elem_match_rule(port: u16) -> Rule {
    field("ports").elem_match(field("number").eq(port).and(field("proto").eq("tcp")))
}

/// Generate the JSON payload of a random rule tree
pub fn generate_rule_json<R: Rng>(rng: &mut R, atoms: usize, max_depth: usize) -> String {
    let rule = generate_rule(rng, atoms, max_depth);
    serde_json::to_string(&rule).unwrap_or_default()
}

/// Generate field names, about half of them with dots in them
pub fn generate_field_names<R: Rng>(rng: &mut R, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let segments = if rng.gen_bool(0.5) { rng.gen_range(2..5) } else { 1 };
            (0..segments)
                .map(|s| format!("{}{}", TAGS.choose(rng).unwrap_or(&"key"), i + s))
                .collect::<Vec<_>>()
                .join(".")
        })
        .collect()
}

/// Generate a document with dotted keys, nested `depth` levels deep
pub fn generate_document<R: Rng>(rng: &mut R, keys: usize, depth: usize) -> Value {
    let mut map = Map::new();
    for name in generate_field_names(rng, keys) {
        let value = if depth > 1 && rng.gen_bool(0.3) {
            generate_document(rng, (keys / 2).max(1), depth - 1)
        } else {
            Value::from(rng.gen_range(0..1_000))
        };
        map.insert(name, value);
    }
    Value::Object(map)
}
