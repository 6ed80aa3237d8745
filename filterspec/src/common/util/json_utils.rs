use serde_json::Value;

/// Returns the JSON type name of a value, used in error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A scalar is a string, number or boolean. `null` is not a scalar.
#[inline]
pub fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::Bool(_) | Value::Number(_) | Value::String(_))
}

/// Returns the value as a non-negative integer. Floats are rejected even
/// when they have no fractional part.
#[inline]
pub fn as_non_negative_integer(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64(),
        _ => None,
    }
}

/// Returns `true` when every element has the same JSON type.
pub fn has_uniform_type(values: &[Value]) -> bool {
    match values.split_first() {
        Some((first, rest)) => {
            let expected = json_type_name(first);
            rest.iter().all(|v| json_type_name(v) == expected)
        }
        None => true,
    }
}
