use serde_json::{Map, Number};

use super::Value;

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::array(items.into_iter().map(Value::from)),
            serde_json::Value::Object(entries) => {
                Value::object(entries.into_iter().map(|(k, v)| (k, Value::from(v))))
            }
        }
    }
}

/// Exports a value as JSON. Boxes export their fully unwrapped content;
/// `undefined`, functions, `None` and non-finite numbers become `null`.
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Undefined | Value::Null | Value::Function(_) => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => number_to_json(*n),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Array(items) => serde_json::Value::Array(items.borrow().iter().map(to_json).collect()),
        Value::Object(entries) => {
            let mut map = Map::new();
            for (k, v) in entries.borrow().iter() {
                map.insert(k.clone(), to_json(v));
            }
            serde_json::Value::Object(map)
        }
        Value::Boxed(boxed) if boxed.is_none() => serde_json::Value::Null,
        Value::Boxed(boxed) => to_json(&boxed.value_of()),
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        serde_json::Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
    }
}
