//! astsel: CSS-like selector queries over abstract syntax trees.
//!
//! A selector (`CallExpression > MemberExpression.callee`, expressed as a
//! selector AST) is evaluated against every node of a syntax tree, and the
//! matching nodes are returned in document order.
//!
//! # Architecture
//!
//! The engine is generic over the tree. A tree dialect provides:
//!
//! - a node handle implementing [`SyntaxNode`] (type tag, typed field
//!   access, node identity), and
//! - a [`ChildSchema`] saying which fields of a node hold its children.
//!
//! Two dialects ship with the crate: ESTree-shaped JSON ([`JsonNode`],
//! [`EstreeSchema`]) and Rust source parsed with tree-sitter
//! ([`ts::TsNode`], [`ts::TsSchema`]).
//!
//! # Subjects
//!
//! A selector can mark parts of itself as the subject (`!A > B` in selector
//! syntax, `"subject": true` in the AST). When the whole selector matches,
//! the nodes matched by the marked parts are reported instead of the node
//! the selector was evaluated on.
//!
//! # Example
//!
//! ```
//! use astsel::{EstreeSchema, JsonNode, Query, Selector};
//! use serde_json::json;
//!
//! let program = json!({
//!     "type": "Program",
//!     "body": [{
//!         "type": "ExpressionStatement",
//!         "expression": { "type": "Identifier", "name": "x" }
//!     }]
//! });
//!
//! let selector = Selector::child(
//!     Selector::identifier("ExpressionStatement"),
//!     Selector::identifier("Identifier"),
//! );
//!
//! let schema = EstreeSchema::new();
//! let root = JsonNode::root(&program).unwrap();
//! let found = Query::new(&schema).match_tree(&root, Some(&selector)).unwrap();
//!
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].value()["name"], "x");
//! ```

pub mod cache;
pub mod config;
pub mod engine;
pub mod pool;
pub mod selector;
pub mod tree;
pub mod ts;

// Re-exports
pub use config::{load_from_path, load_from_str, AstselConfig, ConfigError};
pub use engine::{match_tree, matches, query_json, AncestryStack, Matcher, Query, QueryError};
pub use selector::{
    subjects, AttributeOperator, AttributeValue, Literal, Selector, SelectorError, SelectorKind,
};
pub use tree::{
    traverse, ChildSchema, EstreeSchema, Fallback, JsonNode, SyntaxNode, TreeError, Value,
    Visitor,
};
pub use ts::{RustParser, TreeSitterError, TsNode, TsSchema};
