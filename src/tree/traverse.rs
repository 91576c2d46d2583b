use crate::tree::errors::TreeError;
use crate::tree::node::SyntaxNode;
use crate::tree::schema::ChildSchema;
use crate::tree::value::Value;

/// Callbacks for a depth-first walk.
///
/// `enter` runs before any descendant is visited, `leave` after all of them.
/// `parent` is `None` only for the root.
pub trait Visitor<N> {
    fn enter(&mut self, node: &N, parent: Option<&N>);

    fn leave(&mut self, _node: &N, _parent: Option<&N>) {}
}

enum Frame<N> {
    Enter { node: N, parent: Option<N> },
    Leave { node: N, parent: Option<N> },
}

/// Walk the tree under `root` in document (pre-)order.
///
/// Uses an explicit work stack, so deeply nested trees do not grow the call
/// stack. Fails only when the schema rejects a node type.
pub fn traverse<N, S, V>(root: &N, schema: &S, visitor: &mut V) -> Result<(), TreeError>
where
    N: SyntaxNode,
    S: ChildSchema<N> + ?Sized,
    V: Visitor<N> + ?Sized,
{
    let mut stack = vec![Frame::Enter {
        node: root.clone(),
        parent: None,
    }];

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Enter { node, parent } => {
                visitor.enter(&node, parent.as_ref());
                let kids = children(&node, schema)?;
                // the leave frame sits below every descendant frame
                stack.push(Frame::Leave {
                    node: node.clone(),
                    parent,
                });
                for child in kids.into_iter().rev() {
                    stack.push(Frame::Enter {
                        node: child,
                        parent: Some(node.clone()),
                    });
                }
            }
            Frame::Leave { node, parent } => visitor.leave(&node, parent.as_ref()),
        }
    }

    Ok(())
}

/// The direct children of `node`, in schema field order.
pub fn children<N, S>(node: &N, schema: &S) -> Result<Vec<N>, TreeError>
where
    N: SyntaxNode,
    S: ChildSchema<N> + ?Sized,
{
    let mut out = Vec::new();
    for name in schema.child_fields(node)?.iter() {
        match node.field(name) {
            Value::Node(child) => out.push(child),
            Value::List(items) => {
                out.extend(items.into_iter().filter_map(|item| match item {
                    Value::Node(child) => Some(child),
                    _ => None,
                }));
            }
            _ => {}
        }
    }
    Ok(out)
}
