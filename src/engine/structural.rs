//! Sibling and position predicates.
//!
//! All of these look at the immediate parent (`ancestry[0]`) and only at its
//! list-valued child fields. Without a parent they are false.

use crate::engine::matcher::Matcher;
use crate::selector::ast::Selector;
use crate::tree::node::SyntaxNode;
use crate::tree::schema::ChildSchema;
use crate::tree::value::Value;

impl<S: ?Sized> Matcher<'_, S> {
    /// Some other element of one of the parent's lists matches `selector`.
    pub fn has_sibling<N>(&self, node: &N, selector: &Selector, ancestry: &[N]) -> bool
    where
        N: SyntaxNode,
        S: ChildSchema<N>,
    {
        self.parent_lists(ancestry).iter().any(|items| {
            items.iter().any(|item| match item.as_node() {
                Some(sibling) => !sibling.same_node(node) && self.test(sibling, selector, ancestry),
                None => false,
            })
        })
    }

    /// The element right before or right after `node`, in the list that
    /// holds it, matches `selector`.
    pub fn has_adjacent_sibling<N>(&self, node: &N, selector: &Selector, ancestry: &[N]) -> bool
    where
        N: SyntaxNode,
        S: ChildSchema<N>,
    {
        let neighbour_matches = |item: Option<&Value<N>>| {
            item.and_then(Value::as_node)
                .is_some_and(|sibling| self.test(sibling, selector, ancestry))
        };

        self.parent_lists(ancestry).iter().any(|items| {
            let Some(idx) = position_of(node, items) else {
                return false;
            };
            (idx > 0 && neighbour_matches(items.get(idx - 1))) || neighbour_matches(items.get(idx + 1))
        })
    }

    /// `node`'s zero-based position in one of the parent's lists equals
    /// `index_fn(list_len)`.
    pub fn is_nth_child<N, F>(&self, node: &N, ancestry: &[N], index_fn: F) -> bool
    where
        N: SyntaxNode,
        S: ChildSchema<N>,
        F: Fn(usize) -> Option<usize>,
    {
        self.parent_lists(ancestry).iter().any(|items| {
            position_of(node, items).is_some_and(|idx| index_fn(items.len()) == Some(idx))
        })
    }

    /// Every list-valued child field of the immediate parent, in schema order.
    fn parent_lists<N>(&self, ancestry: &[N]) -> Vec<Vec<Value<N>>>
    where
        N: SyntaxNode,
        S: ChildSchema<N>,
    {
        let Some(parent) = ancestry.first() else {
            return Vec::new();
        };
        let fields = match self.schema().child_fields(parent) {
            Ok(fields) => fields,
            Err(err) => {
                log::trace!("no sibling lists for {}: {}", parent.kind(), err);
                return Vec::new();
            }
        };
        fields
            .iter()
            .filter_map(|name| match parent.field(name) {
                Value::List(items) => Some(items),
                _ => None,
            })
            .collect()
    }
}

fn position_of<N: SyntaxNode>(node: &N, items: &[Value<N>]) -> Option<usize> {
    items
        .iter()
        .position(|item| item.as_node().is_some_and(|n| n.same_node(node)))
}
