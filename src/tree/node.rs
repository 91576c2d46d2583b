use crate::tree::value::Value;
use std::fmt;
use std::ops::Range;

/// A node of a syntax tree, as seen by the matching engine.
///
/// Implementations are expected to be cheap handles (references or ids into
/// a tree), since the engine clones them onto its ancestry stack and into
/// result lists.
pub trait SyntaxNode: Clone + fmt::Debug {
    /// The node's type tag, e.g. `BinaryExpression` or `function_item`.
    fn kind(&self) -> &str;

    /// Read a single named field.
    fn field(&self, name: &str) -> Value<Self>;

    /// Identity comparison: true only if both handles denote the same node
    /// in the same tree. Structurally equal but distinct nodes are not the
    /// same node.
    fn same_node(&self, other: &Self) -> bool;

    /// Byte range of the node in its source text, when known.
    fn span(&self) -> Option<Range<usize>> {
        None
    }
}
