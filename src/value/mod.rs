//! Dynamic value model.
//!
//! Arrays and objects are [`Shared`] handles: cloning a [`Value`] aliases
//! them, and only the copy policy in [`copy`] detaches storage.

pub mod copy;
#[cfg(feature = "serde")]
pub mod json;
pub mod shared;

use std::{collections::BTreeMap, fmt, rc::Rc};

pub use copy::copy_for;
pub use shared::Shared;

use crate::boxing::boxed::BoxedValue;

pub type Array = Shared<Vec<Value>>;
pub type Object = Shared<BTreeMap<String, Value>>;

/// Unary native function, usable as an unwrap transform.
#[derive(Clone)]
pub struct NativeFn(Rc<dyn Fn(Value) -> Value>);

impl NativeFn {
    pub fn new(f: impl Fn(Value) -> Value + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, value: Value) -> Value {
        (self.0)(value)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFn")
    }
}

#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Array),
    Object(Object),
    Function(NativeFn),
    Boxed(BoxedValue),
}

impl Value {
    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(Shared::new(items.into_iter().collect()))
    }

    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Object(Shared::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    pub fn function(f: impl Fn(Value) -> Value + 'static) -> Self {
        Value::Function(NativeFn::new(f))
    }

    /// Runtime type name, used as the declared type of untyped boxes and in
    /// error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
            Value::Boxed(_) => "boxType",
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Arrays and objects, the values the copy policy detaches.
    pub fn is_structured(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_boxed(&self) -> Option<&BoxedValue> {
        match self {
            Value::Boxed(boxed) => Some(boxed),
            _ => None,
        }
    }

    /// Identity comparison. Primitives compare by value since they have no
    /// identity of their own.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Boxed(a), Value::Boxed(b)) => a.ptr_eq(b),
            _ => self == other,
        }
    }
}

/// Structural equality. Comparing two distinct arrays or objects that
/// contain themselves does not terminate; use [`Value::ptr_eq`] for those.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Boxed(a), Value::Boxed(b)) => a == b,
            _ => false,
        }
    }
}

fn fmt_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_nan() {
        write!(f, "NaN")
    } else if n.is_infinite() {
        write!(f, "{}", if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n == 0.0 {
        write!(f, "0")
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        write!(f, "{:.0}", n)
    } else {
        write!(f, "{}", n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_joined(f, &mut Vec::new())
    }
}

impl Value {
    /// `open` holds the arrays being printed further up; meeting one of them
    /// again prints an empty string, so self-containing arrays terminate.
    fn fmt_joined(&self, f: &mut fmt::Formatter<'_>, open: &mut Vec<Array>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => fmt_number(*n, f),
            Value::String(s) => write!(f, "{}", s),
            Value::Array(items) => {
                if open.iter().any(|seen| seen.ptr_eq(items)) {
                    return Ok(());
                }
                open.push(items.clone());
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    // holes and nulls print as empty strings inside arrays
                    if !matches!(item, Value::Undefined | Value::Null) {
                        item.fmt_joined(f, open)?;
                    }
                }
                open.pop();
                Ok(())
            }
            Value::Object(_) => write!(f, "[object Object]"),
            Value::Function(_) => write!(f, "function"),
            Value::Boxed(boxed) => write!(f, "{}", boxed),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}

impl From<NativeFn> for Value {
    fn from(f: NativeFn) -> Self {
        Value::Function(f)
    }
}

impl From<BoxedValue> for Value {
    fn from(boxed: BoxedValue) -> Self {
        Value::Boxed(boxed)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Undefined, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names() {
        assert_eq!(Value::Undefined.type_name(), "undefined");
        assert_eq!(Value::from(99.5).type_name(), "number");
        assert_eq!(Value::from("foo").type_name(), "string");
        assert_eq!(Value::array([]).type_name(), "array");
        assert_eq!(Value::object::<&str>([]).type_name(), "object");
        assert_eq!(Value::function(|v| v).type_name(), "function");
    }

    #[test]
    fn numbers_display_like_a_script_runtime() {
        assert_eq!(Value::from(99).to_string(), "99");
        assert_eq!(Value::from(99.5).to_string(), "99.5");
        assert_eq!(Value::from(-0.0).to_string(), "0");
        assert_eq!(Value::from(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::from(f64::NEG_INFINITY).to_string(), "-Infinity");
    }

    #[test]
    fn containers_display() {
        let arr = Value::array([Value::from(1), Value::Null, Value::from("x")]);
        assert_eq!(arr.to_string(), "1,,x");
        assert_eq!(
            Value::object([("a", Value::from(1))]).to_string(),
            "[object Object]"
        );
    }

    #[test]
    fn self_containing_arrays_display_once() {
        let arr = Value::array([Value::from(1)]);
        if let Some(items) = arr.as_array() {
            items.borrow_mut().push(arr.clone());
        }
        assert_eq!(arr.to_string(), "1,");

        let outer = Value::array([arr.clone(), Value::from(2)]);
        assert_eq!(outer.to_string(), "1,,2");

        // break the cycle so the storage is freed
        if let Some(items) = arr.as_array() {
            items.borrow_mut().clear();
        }
    }

    #[test]
    fn equality_is_structural_and_identity_is_separate() {
        let a = Value::array([Value::from(1)]);
        let b = Value::array([Value::from(1)]);
        assert_eq!(a, b);
        assert!(!a.ptr_eq(&b));
        assert!(a.ptr_eq(&a.clone()));
    }

    #[test]
    fn option_none_is_undefined() {
        assert_eq!(Value::from(None::<i32>), Value::Undefined);
        assert_eq!(Value::from(Some(5)), Value::from(5));
    }
}
