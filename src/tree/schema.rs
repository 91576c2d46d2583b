use crate::tree::errors::TreeError;
use crate::tree::node::SyntaxNode;
use serde::Deserialize;
use std::borrow::Cow;

/// Knows which fields of a node may hold child nodes.
///
/// Field order is traversal order. Structural predicates (siblings,
/// nth-child) also enumerate a parent's fields through this schema.
pub trait ChildSchema<N: SyntaxNode> {
    fn child_fields<'s>(&'s self, node: &N) -> Result<Cow<'s, [String]>, TreeError>;
}

impl<N: SyntaxNode, S: ChildSchema<N> + ?Sized> ChildSchema<N> for &S {
    fn child_fields<'s>(&'s self, node: &N) -> Result<Cow<'s, [String]>, TreeError> {
        (**self).child_fields(node)
    }
}

/// What a schema does with a node type it has no entry for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Fallback {
    /// Treat every field holding a node or a list as a child field.
    #[default]
    Iteration,
    /// Refuse to traverse the node.
    Strict,
}
