//! Tree-sitter integration: Rust source files as queryable syntax trees.
//!
//! Node types are tree-sitter kinds (`function_item`, `call_expression`,
//! ...) and fields are the grammar's field names, so selectors written for
//! ESTree carry over with the Rust grammar's vocabulary.

pub mod errors;
pub mod node;
pub mod parser;

pub use errors::TreeSitterError;
pub use node::{TsNode, TsSchema, CHILDREN_FIELD};
pub use parser::{read_source, ParsedSource, RustParser};
