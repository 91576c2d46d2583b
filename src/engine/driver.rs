use crate::engine::matcher::Matcher;
use crate::selector::ast::Selector;
use crate::selector::subjects::subjects;
use crate::tree::errors::TreeError;
use crate::tree::node::SyntaxNode;
use crate::tree::schema::ChildSchema;
use crate::tree::traverse::{traverse, Visitor};
use std::collections::VecDeque;

/// Ancestors of the node currently visited, nearest first.
///
/// Discipline: push the parent when entering a node that has one, pop when
/// leaving any node. Popping an empty stack (leaving the root) is a no-op.
/// One stack serves exactly one query.
#[derive(Debug)]
pub struct AncestryStack<N> {
    inner: VecDeque<N>,
}

impl<N> AncestryStack<N> {
    pub fn new() -> Self {
        Self {
            inner: VecDeque::new(),
        }
    }

    pub fn push(&mut self, parent: N) {
        self.inner.push_front(parent);
    }

    pub fn pop(&mut self) -> Option<N> {
        self.inner.pop_front()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The ancestry as a slice, `[0]` being the immediate parent.
    pub fn as_slice(&mut self) -> &[N] {
        self.inner.make_contiguous()
    }
}

impl<N> Default for AncestryStack<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs a selector over whole trees.
///
/// Cheap to construct; holds nothing but the schema reference, so a fresh
/// `Query` per call is fine.
pub struct Query<'s, S: ?Sized> {
    matcher: Matcher<'s, S>,
}

impl<'s, S: ?Sized> Query<'s, S> {
    pub fn new(schema: &'s S) -> Self {
        Self {
            matcher: Matcher::new(schema),
        }
    }

    pub fn matcher(&self) -> &Matcher<'s, S> {
        &self.matcher
    }

    /// Collect every node under `root` (inclusive) reported by `selector`,
    /// in traversal order.
    ///
    /// Without subject markers the reported node is the one the selector
    /// matched. With markers, each marked fragment is tested against the
    /// matched node and each of its ancestors, and every hit is reported.
    /// The same node can be reported more than once.
    pub fn match_tree<N>(&self, root: &N, selector: Option<&Selector>) -> Result<Vec<N>, TreeError>
    where
        N: SyntaxNode,
        S: ChildSchema<N>,
    {
        let Some(selector) = selector else {
            return Ok(Vec::new());
        };

        let alt_subjects = subjects(selector);
        log::debug!(
            "running '{}' selector with {} subject fragment(s)",
            selector.kind.tag(),
            alt_subjects.len()
        );

        let mut collector = Collector {
            matcher: &self.matcher,
            selector,
            alt_subjects,
            ancestry: AncestryStack::new(),
            results: Vec::new(),
        };
        traverse(root, self.matcher.schema(), &mut collector)?;

        log::debug!("selector reported {} node(s)", collector.results.len());
        Ok(collector.results)
    }
}

struct Collector<'q, 's, S: ?Sized, N> {
    matcher: &'q Matcher<'s, S>,
    selector: &'q Selector,
    alt_subjects: Vec<&'q Selector>,
    ancestry: AncestryStack<N>,
    results: Vec<N>,
}

impl<S, N> Visitor<N> for Collector<'_, '_, S, N>
where
    S: ChildSchema<N> + ?Sized,
    N: SyntaxNode,
{
    fn enter(&mut self, node: &N, parent: Option<&N>) {
        if let Some(parent) = parent {
            self.ancestry.push(parent.clone());
        }
        let ancestry = self.ancestry.as_slice();

        if !self.matcher.test(node, self.selector, ancestry) {
            return;
        }
        log::trace!("matched {} at depth {}", node.kind(), ancestry.len());

        if self.alt_subjects.is_empty() {
            self.results.push(node.clone());
            return;
        }

        for alt in &self.alt_subjects {
            if self.matcher.test(node, alt, ancestry) {
                self.results.push(node.clone());
            }
            for (k, ancestor) in ancestry.iter().enumerate() {
                if self.matcher.test(ancestor, alt, &ancestry[k + 1..]) {
                    self.results.push(ancestor.clone());
                }
            }
        }
    }

    fn leave(&mut self, _node: &N, _parent: Option<&N>) {
        self.ancestry.pop();
    }
}
