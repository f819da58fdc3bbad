use tracing::trace;

use crate::{
    boxing::boxed::{BoxKind, BoxedValue},
    error::{BoxError, BoxResult},
    types::{TypeExpr, TypeSystem},
    value::{copy_for, Value},
};

/// Constructor for one box kind.
///
/// The steps mirror the validation order of `build`: the base-type guard is
/// checked first, the declared type second. Builders are cheap to clone and
/// reusable, so a partially configured builder can box any number of values.
#[derive(Clone, Debug)]
pub struct BoxBuilder {
    kind: BoxKind,
    base_type: Option<TypeExpr>,
    declared_type: Option<TypeExpr>,
    types: TypeSystem,
}

impl BoxBuilder {
    pub fn new(kind: &str, types: &TypeSystem) -> Self {
        Self {
            kind: BoxKind::from_name(kind),
            base_type: None,
            declared_type: None,
            types: types.clone(),
        }
    }

    pub fn kind(&self) -> &BoxKind {
        &self.kind
    }

    pub fn base_type(&self) -> Option<&TypeExpr> {
        self.base_type.as_ref()
    }

    pub fn declared_type(&self) -> Option<&TypeExpr> {
        self.declared_type.as_ref()
    }

    /// Guard every value of this kind must satisfy.
    pub fn with_base_type(mut self, descriptor: &str) -> BoxResult<Self> {
        self.base_type = Some(self.parse(descriptor)?);
        Ok(self)
    }

    /// Type the boxed value is declared (and checked) as.
    pub fn with_declared_type(mut self, descriptor: &str) -> BoxResult<Self> {
        self.declared_type = Some(self.parse(descriptor)?);
        Ok(self)
    }

    fn parse(&self, descriptor: &str) -> BoxResult<TypeExpr> {
        let expr = TypeExpr::parse(descriptor)?;
        self.types.validate(&expr)?;
        Ok(expr)
    }

    pub fn build(&self, value: impl Into<Value>) -> BoxResult<BoxedValue> {
        let value = value.into();

        if let Some(base) = &self.base_type {
            if !self.types.satisfies(base, &value)? {
                return Err(BoxError::BaseTypeMismatch {
                    value_type: value.type_name().to_string(),
                    kind: self.kind.name().to_string(),
                });
            }
        }

        let (declared_type, variant_tag) = match &self.declared_type {
            Some(declared) => {
                if !self.types.satisfies(declared, &value)? {
                    return Err(BoxError::TypeMismatch {
                        value: value.to_string(),
                        value_type: value.type_name().to_string(),
                        target: declared.to_string(),
                    });
                }
                let tag = self.types.resolve_variant(declared, &value)?;
                (declared.to_string(), tag.map(|t| t.to_string()))
            }
            None => (value.type_name().to_string(), None),
        };

        trace!(
            kind = self.kind.name(),
            declared_type = declared_type.as_str(),
            variant_tag = variant_tag.as_deref(),
            "boxing value"
        );
        Ok(BoxedValue::from_parts(
            self.kind.clone(),
            declared_type,
            variant_tag,
            copy_for(&value),
        ))
    }
}
