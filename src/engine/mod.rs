//! The matching engine.
//!
//! - [`path`] resolves dotted field paths on a node.
//! - [`Matcher`] decides whether one node satisfies a selector, given its
//!   ancestry; the sibling and position tests live in [`structural`].
//! - [`Query`] walks a whole tree, keeps the ancestry stack, and decides
//!   which nodes to report using the selector's subject markers.

pub mod driver;
pub mod errors;
pub mod matcher;
pub mod path;
pub mod structural;

pub use driver::{AncestryStack, Query};
pub use errors::QueryError;
pub use matcher::Matcher;

use crate::selector::ast::Selector;
use crate::tree::json::{EstreeSchema, JsonNode};
use crate::tree::node::SyntaxNode;
use crate::tree::schema::ChildSchema;

/// Test a single node. See [`Matcher::matches`].
pub fn matches<N, S>(node: &N, selector: Option<&Selector>, ancestry: &[N], schema: &S) -> bool
where
    N: SyntaxNode,
    S: ChildSchema<N> + ?Sized,
{
    Matcher::new(schema).matches(node, selector, ancestry)
}

/// Run `selector` over the tree under `root`. See [`Query::match_tree`].
pub fn match_tree<N, S>(root: &N, selector: Option<&Selector>, schema: &S) -> Result<Vec<N>, QueryError>
where
    N: SyntaxNode,
    S: ChildSchema<N> + ?Sized,
{
    Ok(Query::new(schema).match_tree(root, selector)?)
}

/// Run a JSON-encoded selector AST over an ESTree JSON document using the
/// standard ESTree schema.
pub fn query_json<'a>(
    document: &'a serde_json::Value,
    selector: &serde_json::Value,
) -> Result<Vec<JsonNode<'a>>, QueryError> {
    let selector = Selector::from_value(selector)?;
    let root = JsonNode::root(document)?;
    let schema = EstreeSchema::new();
    match_tree(&root, Some(&selector), &schema)
}
