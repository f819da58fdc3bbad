//! Tagged, validated value boxes over a dynamic value model.
//!
//! A [`BoxRegistry`] maps box-kind names to [`BoxBuilder`]s. Builders check
//! values against type descriptors evaluated by the registry's
//! [`TypeSystem`], snapshot them, and produce [`BoxedValue`]s that unwrap
//! through nested boxes up to a requested depth. The [`monad`] module builds
//! `None`, `Just`, `Maybe` and `Either` on the same machinery.
//!
//! Everything here is single-threaded: values and boxes share storage through
//! `Rc`, so a registry and the boxes it builds stay on one thread.

pub mod boxing;
pub mod config;
pub mod error;
pub mod monad;
pub mod types;
pub mod value;

pub use boxing::{BoxBuilder, BoxKind, BoxRegistry, BoxedValue};
pub use config::RegistryConfig;
pub use error::{BoxError, BoxResult};
pub use monad::{either, just, maybe, none, some, Fallback};
pub use types::{TypeExpr, TypePredicate, TypeSystem};
pub use value::Value;

pub type HashMap<K, V> = rustc_hash::FxHashMap<K, V>;
