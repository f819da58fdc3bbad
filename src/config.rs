#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::TypeSystem;

/// Name of the generic box kind backing `type_with`.
pub const TYPED_VALUE: &str = "TypedValue";

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RegistryConfig {
    /// Kind used by `BoxRegistry::type_with`
    pub generic_kind: String,
    /// Whether the generic kind is registered when the registry is created
    pub register_generic: bool,
    /// Emit an `info` event on every registration instead of `debug`
    pub trace_registrations: bool,
}

impl RegistryConfig {
    pub fn new(generic_kind: &str, register_generic: bool, trace_registrations: bool) -> Self {
        assert!(
            !generic_kind.is_empty(),
            "The generic box kind must have a name"
        );
        assert!(
            generic_kind
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '$'),
            "The generic box kind must be a plain identifier"
        );
        assert!(
            !TypeSystem::is_reserved(generic_kind),
            "The generic box kind cannot reuse a reserved type name"
        );
        Self {
            generic_kind: generic_kind.to_string(),
            register_generic,
            trace_registrations,
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            generic_kind: TYPED_VALUE.to_string(),
            register_generic: true,
            trace_registrations: false,
        }
    }
}
