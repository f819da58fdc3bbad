use std::fmt::Debug;

use tracing::{debug, info, instrument};

use crate::{
    boxing::builder::BoxBuilder,
    config::RegistryConfig,
    error::{BoxError, BoxResult},
    monad::{self, Fallback},
    types::{
        subtype_predicate,
        system::{content_matches, BOX_TYPE},
        TypeExpr, TypeSystem,
    },
    value::Value,
    HashMap,
};

/// Table of box kinds and the type system their predicates live in.
///
/// Each registry is independent: kinds registered in one are unknown to the
/// descriptors of another.
pub struct BoxRegistry {
    config: RegistryConfig,
    types: TypeSystem,
    entries: HashMap<String, BoxBuilder>,
}

impl BoxRegistry {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        let mut registry = Self {
            config,
            types: TypeSystem::new(),
            entries: HashMap::default(),
        };
        if registry.config.register_generic {
            let generic = BoxBuilder::new(&registry.config.generic_kind, &registry.types);
            registry.install(generic);
        }
        registry
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn types(&self) -> &TypeSystem {
        &self.types
    }

    /// Registers `name` and returns its constructor. Registering an existing
    /// name replaces the previous entry and its type predicate.
    #[instrument(skip(self))]
    pub fn register(&mut self, name: &str, base_type: Option<&str>) -> BoxResult<BoxBuilder> {
        let expr = TypeExpr::parse(name)?;
        if !expr.args.is_empty() || expr.name == "*" {
            return Err(BoxError::InvalidDescriptor {
                descriptor: name.to_string(),
                position: 0,
                reason: "box kinds are plain names",
            });
        }
        if TypeSystem::is_reserved(&expr.name) {
            return Err(BoxError::ReservedName(expr.name));
        }

        let mut builder = BoxBuilder::new(&expr.name, &self.types);
        if let Some(base) = base_type {
            builder = builder.with_base_type(base)?;
        }
        self.install(builder.clone());
        Ok(builder)
    }

    fn install(&mut self, builder: BoxBuilder) {
        let kind = builder.kind().clone();
        let name = kind.name().to_string();
        // `Name` checks the kind, `Name<X>` the unwrapped content too
        let predicate = subtype_predicate(move |value, args, types| {
            content_matches(value, &kind, args, types)
        });
        if let Err(err) = self.types.register_subtype(BOX_TYPE, &name, predicate) {
            debug!(kind = name.as_str(), %err, "type predicate not installed");
        }

        let replaced = self.entries.insert(name.clone(), builder).is_some();
        if self.config.trace_registrations {
            info!(kind = name.as_str(), replaced, "box kind registered");
        } else {
            debug!(kind = name.as_str(), replaced, "box kind registered");
        }
    }

    pub fn get(&self, name: &str) -> Option<BoxBuilder> {
        self.entries.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered kind names, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    pub fn box_with(&self, name: &str) -> BoxResult<BoxBuilder> {
        self.get(name)
            .ok_or_else(|| BoxError::UnknownBoxKind(name.to_string()))
    }

    /// Constructor of the generic kind declared as `descriptor`.
    pub fn type_with(&self, descriptor: &str) -> BoxResult<BoxBuilder> {
        self.box_with(&self.config.generic_kind)?
            .with_declared_type(descriptor)
    }

    pub fn maybe(&self, descriptor: &str) -> BoxResult<Fallback> {
        monad::maybe(&self.types, descriptor)
    }

    pub fn either(&self, descriptor: &str, default: impl Into<Value>) -> BoxResult<Fallback> {
        monad::either(&self.types, descriptor, default)
    }

    /// Shorthand for `types().is_type_of(descriptor)` followed by a check.
    pub fn is_type_of(&self, descriptor: &str, value: &Value) -> BoxResult<bool> {
        Ok(self.types.is_type_of(descriptor)?.matches(value))
    }
}

impl Default for BoxRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for BoxRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxRegistry")
            .field("config", &self.config)
            .field("kinds", &self.kinds())
            .finish()
    }
}
