//! Field schema: which fields a caller may filter on, their kinds, the
//! operators permitted on them and how their names map to storage keys.

mod field_kind;
mod field_schema;
mod schema_registry;

pub use field_kind::*;
pub use field_schema::*;
pub use schema_registry::*;
