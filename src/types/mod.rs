//! Type descriptors and the predicate service that evaluates them.

pub mod expr;
pub mod system;

pub use expr::TypeExpr;
pub use system::{subtype_predicate, SubtypePredicate, TypePredicate, TypeSystem};
