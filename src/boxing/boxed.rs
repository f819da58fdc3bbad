use std::{fmt, rc::Rc};

use crate::value::{copy_for, Value};

/// Closed set of box kinds. Every registered name other than the monadic
/// ones lands in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BoxKind {
    None,
    Just,
    Maybe,
    Either,
    Other(String),
}

impl BoxKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "None" => BoxKind::None,
            "Just" => BoxKind::Just,
            "Maybe" => BoxKind::Maybe,
            "Either" => BoxKind::Either,
            other => BoxKind::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            BoxKind::None => "None",
            BoxKind::Just => "Just",
            BoxKind::Maybe => "Maybe",
            BoxKind::Either => "Either",
            BoxKind::Other(name) => name,
        }
    }
}

impl fmt::Display for BoxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug)]
struct Inner {
    kind: BoxKind,
    declared_type: String,
    variant_tag: Option<String>,
    content: Value,
}

thread_local! {
    static NONE: BoxedValue = BoxedValue(Rc::new(Inner {
        kind: BoxKind::None,
        declared_type: "None".to_string(),
        variant_tag: None,
        content: Value::Undefined,
    }));
}

/// Immutable, tagged box around a [`Value`] snapshot.
///
/// Clones share the box; the content is only reachable through
/// [`unbox`](Self::unbox), which hands out copies.
#[derive(Clone)]
pub struct BoxedValue(Rc<Inner>);

impl BoxedValue {
    /// `content` must already be a snapshot taken with the copy policy.
    pub(crate) fn from_parts(
        kind: BoxKind,
        declared_type: String,
        variant_tag: Option<String>,
        content: Value,
    ) -> Self {
        Self(Rc::new(Inner {
            kind,
            declared_type,
            variant_tag,
            content,
        }))
    }

    /// The shared `None` instance of the current thread.
    pub fn none() -> Self {
        NONE.with(BoxedValue::clone)
    }

    pub fn kind(&self) -> &BoxKind {
        &self.0.kind
    }

    pub fn kind_name(&self) -> &str {
        self.0.kind.name()
    }

    pub fn declared_type(&self) -> &str {
        &self.0.declared_type
    }

    pub fn variant_tag(&self) -> Option<&str> {
        self.0.variant_tag.as_deref()
    }

    /// The matched variant alternative if any, else the declared type.
    pub fn current_type(&self) -> &str {
        self.variant_tag().unwrap_or(self.declared_type())
    }

    pub fn is_none(&self) -> bool {
        self.0.kind == BoxKind::None
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Unwraps the content through at most `depth` box layers (unbounded
    /// when `None`), then applies `transform` if given.
    ///
    /// Structured content comes back as a fresh shallow copy. Nested `None`
    /// stops the descent and is what the transform receives; the `None` box
    /// itself ignores both arguments.
    pub fn unbox(&self, transform: Option<&dyn Fn(Value) -> Value>, depth: Option<usize>) -> Value {
        if self.is_none() {
            return Value::Boxed(self.clone());
        }
        let depth = depth.unwrap_or(usize::MAX);
        let result = match &self.0.content {
            Value::Boxed(inner) if inner.is_none() => Value::Boxed(inner.clone()),
            Value::Boxed(inner) if depth > 1 => copy_for(&inner.unbox(None, Some(depth - 1))),
            content => copy_for(content),
        };
        match transform {
            Some(transform) => transform(result),
            None => result,
        }
    }

    pub fn unbox_to(&self, depth: usize) -> Value {
        self.unbox(None, Some(depth))
    }

    pub fn map(&self, transform: impl Fn(Value) -> Value) -> Value {
        self.unbox(Some(&transform), None)
    }

    /// Fully unwrapped content, no transform.
    pub fn value_of(&self) -> Value {
        self.unbox(None, None)
    }
}

impl PartialEq for BoxedValue {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for BoxedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            return write!(f, "None");
        }
        f.debug_struct("BoxedValue")
            .field("kind", &self.0.kind)
            .field("declared_type", &self.0.declared_type)
            .field("variant_tag", &self.0.variant_tag)
            .field("content", &self.0.content)
            .finish()
    }
}

impl fmt::Display for BoxedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            return write!(f, "None");
        }
        write!(
            f,
            "[{} {}]({})",
            self.kind_name(),
            self.current_type(),
            self.value_of()
        )
    }
}
