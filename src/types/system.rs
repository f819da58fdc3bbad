use std::{fmt::Debug, rc::Rc};

use log::{debug, warn};

use crate::{
    boxing::boxed::{BoxKind, BoxedValue},
    error::{BoxError, BoxResult},
    types::expr::TypeExpr,
    value::{Shared, Value},
    HashMap,
};

/// Names answered directly by [`TypeSystem::satisfies`]. They cannot be
/// registered as subtypes.
pub const BUILTIN_TYPES: &[&str] = &[
    "*",
    "any",
    "undefined",
    "null",
    "boolean",
    "number",
    "int",
    "string",
    "array",
    "object",
    "function",
    "variant",
    "composite",
    "not",
    "boxType",
];

/// Parent of every box kind.
pub const BOX_TYPE: &str = "boxType";

/// Box kinds installed by [`TypeSystem::new`], reserved like the built-ins.
pub const MONADIC_KINDS: &[&str] = &["None", "Just", "Maybe", "Either"];

/// Subtype check, called only once the value already satisfies the parent.
/// Receives the descriptor arguments (`X` in `Name<X>`) and the type system
/// so it can check them recursively.
pub type SubtypePredicate = Rc<dyn Fn(&Value, &[TypeExpr], &TypeSystem) -> BoxResult<bool>>;

pub fn subtype_predicate(
    f: impl Fn(&Value, &[TypeExpr], &TypeSystem) -> BoxResult<bool> + 'static,
) -> SubtypePredicate {
    Rc::new(f)
}

#[derive(Clone)]
struct Subtype {
    parent: String,
    predicate: SubtypePredicate,
}

/// Type predicate service: answers whether a value satisfies a descriptor,
/// holds named subtypes and resolves variant alternatives.
///
/// Clones share the same subtype table.
#[derive(Clone)]
pub struct TypeSystem {
    subtypes: Shared<HashMap<String, Subtype>>,
}

impl TypeSystem {
    /// A type system knowing the built-in names and the monadic box kinds
    /// `None`, `Just`, `Maybe` and `Either`.
    pub fn new() -> Self {
        let types = Self {
            subtypes: Shared::new(HashMap::default()),
        };
        types.install(BOX_TYPE, "None", subtype_predicate(|value, _, _| {
            Ok(kind_of(value) == Some(&BoxKind::None))
        }));
        types.install(BOX_TYPE, "Just", subtype_predicate(|value, args, types| {
            content_matches(value, &BoxKind::Just, args, types)
        }));
        types.install(BOX_TYPE, "Maybe", subtype_predicate(|value, args, types| {
            if let Some(Value::Boxed(content)) = content_of(value, &BoxKind::Maybe) {
                if content.is_none() {
                    return Ok(true);
                }
            }
            content_matches(value, &BoxKind::Maybe, args, types)
        }));
        types.install(BOX_TYPE, "Either", subtype_predicate(|value, args, types| {
            content_matches(value, &BoxKind::Either, args, types)
        }));
        types
    }

    pub fn is_builtin(name: &str) -> bool {
        BUILTIN_TYPES.contains(&name)
    }

    /// Built-in names and the monadic kinds; none of them can be registered.
    pub fn is_reserved(name: &str) -> bool {
        Self::is_builtin(name) || MONADIC_KINDS.contains(&name)
    }

    pub fn is_known(&self, name: &str) -> bool {
        Self::is_builtin(name) || self.subtypes.borrow().contains_key(name)
    }

    /// Registers `name` as a subtype of `parent`. A second registration of
    /// the same name replaces the first.
    pub fn register_subtype(
        &self,
        parent: &str,
        name: &str,
        predicate: SubtypePredicate,
    ) -> BoxResult<()> {
        if Self::is_reserved(name) {
            return Err(BoxError::ReservedName(name.to_string()));
        }
        if !self.is_known(parent) {
            return Err(BoxError::UnknownType(parent.to_string()));
        }
        debug!("Registering subtype {} of {}", name, parent);
        self.install(parent, name, predicate);
        Ok(())
    }

    fn install(&self, parent: &str, name: &str, predicate: SubtypePredicate) {
        let previous = self.subtypes.borrow_mut().insert(
            name.to_string(),
            Subtype {
                parent: parent.to_string(),
                predicate,
            },
        );
        if previous.is_some() {
            debug!("Subtype {} replaced", name);
        }
    }

    /// Fails with `UnknownType` on the first name the system does not know.
    pub fn validate(&self, expr: &TypeExpr) -> BoxResult<()> {
        if !self.is_known(&expr.name) {
            return Err(BoxError::UnknownType(expr.name.clone()));
        }
        expr.args.iter().try_for_each(|arg| self.validate(arg))
    }

    pub fn satisfies(&self, expr: &TypeExpr, value: &Value) -> BoxResult<bool> {
        let satisfied = match expr.name.as_str() {
            "*" | "any" => true,
            "undefined" => matches!(value, Value::Undefined),
            "null" => matches!(value, Value::Null),
            "boolean" => matches!(value, Value::Bool(_)),
            "number" => matches!(value, Value::Number(_)),
            "int" => matches!(value, Value::Number(n) if n.is_finite() && n.fract() == 0.0),
            "string" => matches!(value, Value::String(_)),
            "object" => matches!(value, Value::Object(_)),
            // boxes are callable, so they count as functions
            "function" => matches!(value, Value::Function(_) | Value::Boxed(_)),
            "boxType" => matches!(value, Value::Boxed(_)),
            "array" => match (value, expr.args.first()) {
                (Value::Array(_), None) => true,
                (Value::Array(items), Some(element)) => {
                    let items = items.borrow().clone();
                    for item in &items {
                        if !self.satisfies(element, item)? {
                            return Ok(false);
                        }
                    }
                    true
                }
                _ => false,
            },
            "variant" => self.resolve_alternative(&expr.args, value)?.is_some(),
            "composite" => {
                for arg in &expr.args {
                    if !self.satisfies(arg, value)? {
                        return Ok(false);
                    }
                }
                true
            }
            "not" => !self.satisfies(single_arg(expr)?, value)?,
            name => return self.satisfies_subtype(name, &expr.args, value),
        };
        Ok(satisfied)
    }

    fn satisfies_subtype(&self, name: &str, args: &[TypeExpr], value: &Value) -> BoxResult<bool> {
        // the predicate may consult the table again, so release it first
        let subtype = self.subtypes.borrow().get(name).cloned();
        let Some(subtype) = subtype else {
            return Err(BoxError::UnknownType(name.to_string()));
        };
        if !self.satisfies(&TypeExpr::new(&subtype.parent), value)? {
            return Ok(false);
        }
        (subtype.predicate)(value, args, self)
    }

    /// For a `variant<...>` descriptor, the first declared alternative the
    /// value satisfies. `None` for other descriptors or when nothing matches.
    pub fn resolve_variant(&self, expr: &TypeExpr, value: &Value) -> BoxResult<Option<TypeExpr>> {
        if !expr.is_variant() {
            return Ok(None);
        }
        Ok(self.resolve_alternative(&expr.args, value)?.cloned())
    }

    fn resolve_alternative<'a>(
        &self,
        alternatives: &'a [TypeExpr],
        value: &Value,
    ) -> BoxResult<Option<&'a TypeExpr>> {
        for alternative in alternatives {
            if self.satisfies(alternative, value)? {
                return Ok(Some(alternative));
            }
        }
        Ok(None)
    }

    /// One-shot check against a descriptor string.
    pub fn check(&self, descriptor: &str, value: &Value) -> BoxResult<bool> {
        self.satisfies(&TypeExpr::parse(descriptor)?, value)
    }

    /// Parses and validates `descriptor` once, returning a reusable predicate.
    pub fn is_type_of(&self, descriptor: &str) -> BoxResult<TypePredicate> {
        let expr = TypeExpr::parse(descriptor)?;
        self.validate(&expr)?;
        Ok(TypePredicate {
            expr,
            types: self.clone(),
        })
    }
}

impl Default for TypeSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for TypeSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let subtypes = self.subtypes.borrow();
        let mut names: Vec<_> = subtypes
            .iter()
            .map(|(name, subtype)| format!("{} <: {}", name, subtype.parent))
            .collect();
        names.sort();
        f.debug_struct("TypeSystem").field("subtypes", &names).finish()
    }
}

/// Predicate produced by [`TypeSystem::is_type_of`].
#[derive(Clone, Debug)]
pub struct TypePredicate {
    expr: TypeExpr,
    types: TypeSystem,
}

impl TypePredicate {
    pub fn expr(&self) -> &TypeExpr {
        &self.expr
    }

    /// Failures raised while checking (a malformed `not<...>`, a subtype
    /// removed by a later registration) count as a mismatch.
    pub fn matches(&self, value: &Value) -> bool {
        self.types
            .satisfies(&self.expr, value)
            .unwrap_or_else(|err| {
                warn!("Type check against {} failed: {}", self.expr, err);
                false
            })
    }
}

fn single_arg(expr: &TypeExpr) -> BoxResult<&TypeExpr> {
    match expr.args.as_slice() {
        [arg] => Ok(arg),
        _ => Err(BoxError::InvalidDescriptor {
            descriptor: expr.to_string(),
            position: expr.name.len(),
            reason: "expected exactly one type argument",
        }),
    }
}

fn kind_of(value: &Value) -> Option<&BoxKind> {
    value.as_boxed().map(BoxedValue::kind)
}

fn content_of(value: &Value, kind: &BoxKind) -> Option<Value> {
    match value {
        Value::Boxed(boxed) if boxed.kind() == kind => Some(boxed.value_of()),
        _ => None,
    }
}

/// `Kind` alone checks the kind, `Kind<X>` also checks the fully unwrapped
/// content against `X`.
pub(crate) fn content_matches(
    value: &Value,
    kind: &BoxKind,
    args: &[TypeExpr],
    types: &TypeSystem,
) -> BoxResult<bool> {
    let Some(content) = content_of(value, kind) else {
        return Ok(false);
    };
    match args.first() {
        Some(arg) => types.satisfies(arg, &content),
        None => Ok(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monad::{just, none};

    fn check(types: &TypeSystem, descriptor: &str, value: impl Into<Value>) -> bool {
        types.check(descriptor, &value.into()).unwrap()
    }

    #[test]
    fn primitive_types() {
        let types = TypeSystem::new();
        assert!(check(&types, "int", 5));
        assert!(!check(&types, "int", 5.5));
        assert!(!check(&types, "int", f64::INFINITY));
        assert!(check(&types, "number", 5.5));
        assert!(check(&types, "string", "foo"));
        assert!(!check(&types, "string", 5));
        assert!(check(&types, "undefined", Value::Undefined));
        assert!(check(&types, "boolean", false));
        assert!(check(&types, "*", Value::Null));
    }

    #[test]
    fn combinators() {
        let types = TypeSystem::new();
        assert!(check(&types, "variant<string, int>", 3));
        assert!(!check(&types, "variant<string, int>", true));
        assert!(check(&types, "composite<number, not<int>>", 2.5));
        assert!(!check(&types, "composite<number, not<int>>", 2));
        assert!(check(
            &types,
            "array<int>",
            Value::array([Value::from(1), Value::from(2)])
        ));
        assert!(!check(
            &types,
            "array<int>",
            Value::array([Value::from(1), Value::from("2")])
        ));
    }

    #[test]
    fn boxes_are_functions() {
        let types = TypeSystem::new();
        assert!(check(&types, "function", just(1)));
        assert!(check(&types, "boxType", just(1)));
        assert!(!check(&types, "boxType", Value::function(|v| v)));
    }

    #[test]
    fn monadic_kinds() {
        let types = TypeSystem::new();
        assert!(check(&types, "None", none()));
        assert!(!check(&types, "None", just(1)));
        assert!(check(&types, "Just", just(1)));
        assert!(check(&types, "Just<int>", just(1)));
        assert!(!check(&types, "Just<string>", just(1)));
        assert!(!check(&types, "Just", 1));
    }

    #[test]
    fn first_declared_alternative_wins() {
        let types = TypeSystem::new();
        let expr = TypeExpr::parse("variant<number, int>").unwrap();
        let tag = types.resolve_variant(&expr, &Value::from(4)).unwrap();
        assert_eq!(tag, Some(TypeExpr::new("number")));

        let plain = TypeExpr::parse("int").unwrap();
        assert_eq!(types.resolve_variant(&plain, &Value::from(4)).unwrap(), None);
    }

    #[test]
    fn subtypes_check_their_parent_first() {
        let types = TypeSystem::new();
        types
            .register_subtype("int", "even", subtype_predicate(|value, _, _| {
                Ok(value.as_number().is_some_and(|n| n % 2.0 == 0.0))
            }))
            .unwrap();

        assert!(check(&types, "even", 4));
        assert!(!check(&types, "even", 3));
        assert!(!check(&types, "even", 4.5));
        assert!(!check(&types, "even", "4"));
    }

    #[test]
    fn unknown_and_reserved_names() {
        let types = TypeSystem::new();
        assert_eq!(
            types.check("Nope<int>", &Value::from(1)),
            Err(BoxError::UnknownType("Nope".to_string()))
        );
        assert!(matches!(
            types.is_type_of("array<Nope>"),
            Err(BoxError::UnknownType(name)) if name == "Nope"
        ));
        assert_eq!(
            types.register_subtype("int", "string", subtype_predicate(|_, _, _| Ok(true))),
            Err(BoxError::ReservedName("string".to_string()))
        );
        assert_eq!(
            types.register_subtype(BOX_TYPE, "Maybe", subtype_predicate(|_, _, _| Ok(true))),
            Err(BoxError::ReservedName("Maybe".to_string()))
        );
        assert_eq!(
            types.register_subtype("Nope", "Thing", subtype_predicate(|_, _, _| Ok(true))),
            Err(BoxError::UnknownType("Nope".to_string()))
        );
    }

    #[test_log::test]
    fn malformed_not_is_a_mismatch_for_predicates() {
        let types = TypeSystem::new();
        let predicate = types.is_type_of("not<int, string>").unwrap();
        assert!(!predicate.matches(&Value::from(true)));
    }
}
