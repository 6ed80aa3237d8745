//! # filterspec - structured filter rules for document stores
//!
//! filterspec sits between an API that accepts filter conditions from clients
//! and a storage engine with a MongoDB-style query language. Clients send a
//! JSON rule tree; filterspec checks it against a field schema and a set of
//! limits and compiles it into a native filter document. Nothing outside the
//! operator registry ever reaches the storage engine.
//!
//! ## Pipeline
//!
//! ```text
//! raw JSON -> rule::parse_rule_tree -> validator::validate -> compiler::compile -> NativeFilter
//! ```
//!
//! Any failure stops the pipeline and comes back as a [`FilterError`] whose
//! [`ErrorKind`] tells a client mistake apart from a server-side problem.
//!
//! ## Quick Start
//!
//! ```rust
//! use filterspec::operator::Operator;
//! use filterspec::schema::{FieldKind, FieldSchema, FieldSpec};
//! use filterspec::FilterCompiler;
//!
//! # fn main() -> Result<(), filterspec::errors::FilterError> {
//! let schema = FieldSchema::builder()
//!     .field("status", FieldSpec::new(FieldKind::String))
//!     .field("cpu.load", FieldSpec::new(FieldKind::Number).with_operators([Operator::Gt, Operator::Lt]))
//!     .build()?;
//!
//! let compiler = FilterCompiler::builder().schema(schema).build()?;
//! let filter = compiler.compile_json(r#"{
//!     "condition": "NOT",
//!     "rules": [{"field": "status", "operator": "$eq", "value": "stopped"}]
//! }"#)?;
//!
//! assert_eq!(filter.to_string(), r#"{"$not":{"status":"stopped"}}"#);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`codec`] - Reversible escaping of `.` in field names and document keys
//! - [`common`] - Constants and small helpers
//! - [`compiler`] - Rule tree to native filter translation
//! - [`config`] - Validation limits
//! - [`errors`] - Error types and result definitions
//! - [`filter_compiler`] - The parse, validate and compile entry point
//! - [`operator`] - The closed operator registry
//! - [`rule`] - Rule tree model, parser and fluent builders
//! - [`schema`] - Field schema and its reloadable registry
//! - [`validator`] - Rule tree validation

pub mod codec;
pub mod common;
pub mod compiler;
pub mod config;
pub mod errors;
pub mod filter_compiler;
pub mod operator;
pub mod rule;
pub mod schema;
pub mod validator;

pub use compiler::NativeFilter;
pub use errors::{ErrorKind, FilterError, FilterResult};
pub use filter_compiler::{FilterCompiler, FilterCompilerBuilder};
