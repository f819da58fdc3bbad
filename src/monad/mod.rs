//! `None`, `Just`, `Maybe`, `Either` and `some`, built on plain boxes.
//!
//! `Maybe` and `Either` decide at construction: their content is `Just` of
//! the value when it satisfies the descriptor, the fallback otherwise. Since
//! the default unwrap is unbounded, calling them yields the inner value
//! directly (or `None` for a `Maybe` that missed).

use crate::{
    boxing::boxed::{BoxKind, BoxedValue},
    error::BoxResult,
    types::{TypeExpr, TypeSystem},
    value::{copy_for, Value},
};

pub fn none() -> BoxedValue {
    BoxedValue::none()
}

/// Boxes anything, `undefined` included, without validation.
pub fn just(value: impl Into<Value>) -> BoxedValue {
    let value = value.into();
    BoxedValue::from_parts(
        BoxKind::Just,
        value.type_name().to_string(),
        None,
        copy_for(&value),
    )
}

/// `undefined` becomes `None`, a box becomes its fully unwrapped content,
/// anything else is returned as is.
pub fn some(value: impl Into<Value>) -> Value {
    match value.into() {
        Value::Undefined => Value::Boxed(none()),
        Value::Boxed(boxed) => boxed.value_of(),
        other => other,
    }
}

/// Constructor shared by `Maybe` and `Either`; they only differ in kind and
/// fallback.
#[derive(Clone, Debug)]
pub struct Fallback {
    kind: BoxKind,
    expr: TypeExpr,
    fallback: BoxedValue,
    types: TypeSystem,
}

impl Fallback {
    fn new(kind: BoxKind, types: &TypeSystem, descriptor: &str, fallback: BoxedValue) -> BoxResult<Self> {
        let expr = TypeExpr::parse(descriptor)?;
        types.validate(&expr)?;
        Ok(Self {
            kind,
            expr,
            fallback,
            types: types.clone(),
        })
    }

    pub fn kind(&self) -> &BoxKind {
        &self.kind
    }

    pub fn fallback(&self) -> &BoxedValue {
        &self.fallback
    }

    pub fn build(&self, value: impl Into<Value>) -> BoxResult<BoxedValue> {
        let value = value.into();
        let (content, variant_tag) = if self.types.satisfies(&self.expr, &value)? {
            let tag = self.types.resolve_variant(&self.expr, &value)?;
            (just(value), tag.map(|t| t.to_string()))
        } else {
            (self.fallback.clone(), None)
        };
        Ok(BoxedValue::from_parts(
            self.kind.clone(),
            self.expr.to_string(),
            variant_tag,
            Value::Boxed(content),
        ))
    }
}

pub fn maybe(types: &TypeSystem, descriptor: &str) -> BoxResult<Fallback> {
    Fallback::new(BoxKind::Maybe, types, descriptor, none())
}

pub fn either(types: &TypeSystem, descriptor: &str, default: impl Into<Value>) -> BoxResult<Fallback> {
    Fallback::new(BoxKind::Either, types, descriptor, just(default))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_a_singleton() {
        assert_eq!(none(), none());
        assert_eq!(none().value_of(), Value::Boxed(none()));
        assert_eq!(none().to_string(), "None");
    }

    #[test]
    fn just_wraps_anything() {
        assert_eq!(just(99).value_of(), Value::from(99));
        assert_eq!(just("foo").to_string(), "[Just string](foo)");
        assert_eq!(just("bar").value_of(), Value::from("bar"));
        assert_eq!(just(Value::Undefined).to_string(), "[Just undefined](undefined)");
    }

    #[test]
    fn some_normalizes() {
        assert_eq!(some(5), Value::from(5));
        assert_eq!(some(Value::Undefined), Value::Boxed(none()));
        assert_eq!(some(just(just(7))), Value::from(7));
        assert_eq!(some(none()), Value::Boxed(none()));
    }

    #[test]
    fn maybe_resolves_at_construction() {
        let types = TypeSystem::new();
        let maybe_int = maybe(&types, "int").unwrap();

        let hit = maybe_int.build(5).unwrap();
        assert_eq!(hit.value_of(), Value::from(5));
        assert_eq!(hit.to_string(), "[Maybe int](5)");
        assert!(types.check("Maybe<int>", &hit.clone().into()).unwrap());

        let miss = maybe_int.build(Value::Undefined).unwrap();
        assert_eq!(miss.value_of(), Value::Boxed(none()));
        assert_eq!(miss.to_string(), "[Maybe int](None)");
        assert!(types.check("Maybe<int>", &miss.into()).unwrap());
    }

    #[test]
    fn either_falls_back_to_the_default() {
        let types = TypeSystem::new();
        let either_int = either(&types, "int", 1).unwrap();

        assert_eq!(either_int.build(10).unwrap().value_of(), Value::from(10));

        let miss = either_int.build(false).unwrap();
        assert_eq!(miss.value_of(), Value::from(1));
        assert!(types.check("Either<int>", &miss.clone().into()).unwrap());
        assert!(!types.check("Either<string>", &miss.into()).unwrap());
    }

    #[test]
    fn variant_descriptors_tag_matches_only() {
        let types = TypeSystem::new();
        let either_text = either(&types, "variant<string, int>", "none").unwrap();

        let hit = either_text.build(3).unwrap();
        assert_eq!(hit.variant_tag(), Some("int"));
        assert_eq!(hit.to_string(), "[Either int](3)");

        let miss = either_text.build(true).unwrap();
        assert_eq!(miss.variant_tag(), None);
        assert_eq!(miss.to_string(), "[Either variant<string, int>](none)");
    }
}
