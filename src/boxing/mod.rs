pub mod boxed;
pub mod builder;
pub mod registry;

pub use boxed::{BoxKind, BoxedValue};
pub use builder::BoxBuilder;
pub use registry::BoxRegistry;
