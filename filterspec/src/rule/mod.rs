//! Rule tree model.
//!
//! A rule tree is the caller-facing filter expression. It has exactly two
//! node shapes:
//!
//! - an atom `{"field": ..., "operator": ..., "value": ...}`
//! - a combined rule `{"condition": "AND" | "OR" | "NOT" | "NOR", "rules": [...]}`
//!
//! Trees are parsed from JSON with [`parse_rule_tree`], or built in code with
//! the fluent API:
//!
//! ```rust
//! use filterspec::rule::{field, not, or};
//!
//! let rule = or(vec![
//!     field("status").in_list(["running", "paused"]),
//!     not(field("tags").size(0)),
//! ]);
//! assert_eq!(rule.fields(), vec!["status", "tags"]);
//! ```

mod atom_rule;
mod combined_rule;
mod fluent;
mod parser;
mod path;
#[allow(clippy::module_inception)]
mod rule;

pub use atom_rule::*;
pub use combined_rule::*;
pub use fluent::*;
pub use parser::{parse_root, parse_rule_tree};
pub use path::*;
pub use rule::*;
