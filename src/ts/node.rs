use crate::tree::errors::TreeError;
use crate::tree::node::SyntaxNode;
use crate::tree::schema::ChildSchema;
use crate::tree::value::Value;
use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

/// Pseudo-field listing a node's named children, in source order.
pub const CHILDREN_FIELD: &str = "children";

/// A tree-sitter node together with the source it was parsed from.
///
/// Fields resolve to the grammar's named fields first (`name`, `body`,
/// `parameters`, ...). A field holding several nodes becomes a list. On top
/// of the grammar, every node answers:
///
/// - `children`: all named children
/// - `text`: the node's source text
/// - `start`, `end`: byte offsets
/// - `line`: 1-based start line
#[derive(Clone, Copy)]
pub struct TsNode<'t> {
    node: tree_sitter::Node<'t>,
    source: &'t str,
}

impl<'t> TsNode<'t> {
    pub fn new(node: tree_sitter::Node<'t>, source: &'t str) -> Self {
        Self { node, source }
    }

    pub fn inner(&self) -> tree_sitter::Node<'t> {
        self.node
    }

    /// Source text covered by this node.
    pub fn text(&self) -> &'t str {
        self.source.get(self.node.byte_range()).unwrap_or_default()
    }

    fn wrap(&self, node: tree_sitter::Node<'t>) -> Value<Self> {
        Value::Node(Self::new(node, self.source))
    }
}

impl fmt::Debug for TsNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TsNode")
            .field("kind", &self.node.kind())
            .field("range", &self.node.byte_range())
            .finish()
    }
}

impl SyntaxNode for TsNode<'_> {
    fn kind(&self) -> &str {
        self.node.kind()
    }

    fn field(&self, name: &str) -> Value<Self> {
        let mut cursor = self.node.walk();
        let mut nodes: Vec<_> = self
            .node
            .children_by_field_name(name, &mut cursor)
            .collect();
        match nodes.len() {
            0 => {}
            1 => return self.wrap(nodes.remove(0)),
            _ => return Value::List(nodes.into_iter().map(|n| self.wrap(n)).collect()),
        }

        match name {
            CHILDREN_FIELD => {
                let mut cursor = self.node.walk();
                let kids = self
                    .node
                    .named_children(&mut cursor)
                    .map(|n| self.wrap(n))
                    .collect();
                Value::List(kids)
            }
            "text" => Value::String(self.text().to_string()),
            "start" => Value::Number(self.node.start_byte() as f64),
            "end" => Value::Number(self.node.end_byte() as f64),
            "line" => Value::Number((self.node.start_position().row + 1) as f64),
            _ => Value::Absent,
        }
    }

    fn same_node(&self, other: &Self) -> bool {
        self.node == other.node
    }

    fn span(&self) -> Option<Range<usize>> {
        Some(self.node.byte_range())
    }
}

/// Child-field schema for tree-sitter trees: every named child is visited
/// once, through the `children` pseudo-field.
#[derive(Debug, Clone)]
pub struct TsSchema {
    fields: Vec<String>,
}

impl TsSchema {
    pub fn new() -> Self {
        Self {
            fields: vec![CHILDREN_FIELD.to_string()],
        }
    }
}

impl Default for TsSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl<'t> ChildSchema<TsNode<'t>> for TsSchema {
    fn child_fields<'s>(&'s self, _node: &TsNode<'t>) -> Result<Cow<'s, [String]>, TreeError> {
        Ok(Cow::Borrowed(self.fields.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ts::parser::RustParser;

    #[test]
    fn grammar_fields_and_pseudo_fields() {
        let mut parser = RustParser::new().unwrap();
        let source = "fn add(a: i32, b: i32) -> i32 { a + b }";
        let parsed = parser.parse_with_source(source).unwrap();
        let root = parsed.root();

        let items = root.field(CHILDREN_FIELD);
        let items = items.as_list().unwrap();
        assert_eq!(items.len(), 1);
        let func = items[0].as_node().unwrap();
        assert_eq!(func.kind(), "function_item");

        let name = func.field("name");
        let name = name.as_node().unwrap();
        assert_eq!(name.text(), "add");
        assert!(matches!(name.field("text"), Value::String(ref s) if s == "add"));
        assert!(matches!(func.field("line"), Value::Number(n) if n == 1.0));
        assert!(matches!(func.field("no_such_field"), Value::Absent));
    }

    #[test]
    fn identity_follows_tree_sitter_ids() {
        let mut parser = RustParser::new().unwrap();
        let parsed = parser.parse_with_source("fn a() {} fn b() {}").unwrap();
        let root = parsed.root();
        let items = root.field(CHILDREN_FIELD);
        let items = items.as_list().unwrap();
        let a = items[0].as_node().unwrap();
        let b = items[1].as_node().unwrap();

        assert!(a.same_node(a));
        assert!(!a.same_node(b));
    }
}
