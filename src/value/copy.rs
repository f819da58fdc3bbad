use super::Value;

/// Copy policy applied when a value is boxed and on every unwrap.
///
/// Arrays and objects get fresh top-level storage; their entries are cloned
/// as values, so nested containers stay shared with the original. Everything
/// else is passed through.
pub fn copy_for(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.shallow_copy()),
        Value::Object(entries) => Value::Object(entries.shallow_copy()),
        Value::Undefined
        | Value::Null
        | Value::Bool(_)
        | Value::Number(_)
        | Value::String(_)
        | Value::Function(_)
        | Value::Boxed(_) => value.clone(),
    }
}
