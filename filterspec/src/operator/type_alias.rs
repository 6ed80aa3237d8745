use serde_json::Value;

/// BSON type aliases accepted by `$type`, with their numeric codes.
/// `number` has no code of its own.
pub const TYPE_ALIASES: [(&str, Option<i64>); 21] = [
    ("double", Some(1)),
    ("string", Some(2)),
    ("object", Some(3)),
    ("array", Some(4)),
    ("binData", Some(5)),
    ("undefined", Some(6)),
    ("objectId", Some(7)),
    ("bool", Some(8)),
    ("date", Some(9)),
    ("null", Some(10)),
    ("regex", Some(11)),
    ("dbPointer", Some(12)),
    ("javascript", Some(13)),
    ("symbol", Some(14)),
    ("int", Some(16)),
    ("timestamp", Some(17)),
    ("long", Some(18)),
    ("decimal", Some(19)),
    ("minKey", Some(-1)),
    ("maxKey", Some(127)),
    ("number", None),
];

/// Returns `true` when `value` names a known BSON type, either by alias or
/// by numeric code.
pub fn is_known_type(value: &Value) -> bool {
    match value {
        Value::String(alias) => TYPE_ALIASES.iter().any(|(name, _)| name == alias),
        Value::Number(number) => match number.as_i64() {
            Some(code) => TYPE_ALIASES.iter().any(|(_, c)| *c == Some(code)),
            None => false,
        },
        _ => false,
    }
}
