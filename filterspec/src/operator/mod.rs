//! The closed operator registry.
//!
//! Every operator a rule may name lives in a static table keyed by the
//! [`Operator`] enum. Each entry records the operator family, the value
//! shape it expects and the token it compiles to.

mod registry;
mod type_alias;

pub use registry::*;
pub use type_alias::*;
