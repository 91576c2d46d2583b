use crate::engine::path;
use crate::selector::ast::{AttributeOperator, AttributeValue, Selector, SelectorKind};
use crate::tree::node::SyntaxNode;
use crate::tree::schema::ChildSchema;
use crate::tree::value::Value;
use std::cmp::Ordering;

/// Decides whether a single node satisfies a selector.
///
/// Stateless apart from the child-field schema, which the structural
/// selectors (`~`, `+`, `:nth-child`) use to enumerate a parent's children.
pub struct Matcher<'s, S: ?Sized> {
    schema: &'s S,
}

impl<S: ?Sized> Clone for Matcher<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized> Copy for Matcher<'_, S> {}

impl<'s, S: ?Sized> Matcher<'s, S> {
    pub fn new(schema: &'s S) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &'s S {
        self.schema
    }

    /// Test `node` against `selector`.
    ///
    /// `ancestry[0]` is the node's parent, `ancestry[1]` its grandparent and
    /// so on. A missing selector matches everything.
    pub fn matches<N>(&self, node: &N, selector: Option<&Selector>, ancestry: &[N]) -> bool
    where
        N: SyntaxNode,
        S: ChildSchema<N>,
    {
        match selector {
            Some(selector) => self.test(node, selector, ancestry),
            None => true,
        }
    }

    pub(crate) fn test<N>(&self, node: &N, selector: &Selector, ancestry: &[N]) -> bool
    where
        N: SyntaxNode,
        S: ChildSchema<N>,
    {
        match &selector.kind {
            SelectorKind::Wildcard => true,

            SelectorKind::Identifier { value } => value.to_lowercase() == node.kind().to_lowercase(),

            SelectorKind::Field { name } => {
                let segments: Vec<&str> = name.split('.').collect();
                match ancestry.get(segments.len() - 1) {
                    Some(ancestor) => path::in_path(node, &Value::Node(ancestor.clone()), &segments),
                    None => false,
                }
            }

            SelectorKind::Matches { selectors } => {
                selectors.iter().any(|s| self.test(node, s, ancestry))
            }

            SelectorKind::Compound { selectors } => {
                selectors.iter().all(|s| self.test(node, s, ancestry))
            }

            SelectorKind::Not { selectors } => {
                !selectors.iter().any(|s| self.test(node, s, ancestry))
            }

            // the local test on `right` runs before any ancestor search
            SelectorKind::Child { left, right } => {
                self.test(node, right, ancestry)
                    && match ancestry.split_first() {
                        Some((parent, above)) => self.test(parent, left, above),
                        None => false,
                    }
            }

            SelectorKind::Descendant { left, right } => {
                self.test(node, right, ancestry)
                    && (0..ancestry.len())
                        .any(|i| self.test(&ancestry[i], left, &ancestry[i + 1..]))
            }

            SelectorKind::Attribute {
                name,
                operator,
                value,
            } => {
                let found = path::resolve(node, name);
                match (operator, value) {
                    (None, _) => found.is_present(),
                    (Some(op), Some(value)) => compare_attribute(&found, *op, value),
                    (Some(_), None) => false,
                }
            }

            SelectorKind::Sibling { left, right } => {
                (self.test(node, right, ancestry) && self.has_sibling(node, left, ancestry))
                    || (self.test(node, left, ancestry) && self.has_sibling(node, right, ancestry))
            }

            SelectorKind::Adjacent { left, right } => {
                (self.test(node, right, ancestry) && self.has_adjacent_sibling(node, left, ancestry))
                    || (self.test(node, left, ancestry)
                        && self.has_adjacent_sibling(node, right, ancestry))
            }

            SelectorKind::NthChild { index, right } => {
                self.matches(node, right.as_deref(), ancestry)
                    && self.is_nth_child(node, ancestry, |_| index.checked_sub(1))
            }

            SelectorKind::NthLastChild { index, right } => {
                self.matches(node, right.as_deref(), ancestry)
                    && self.is_nth_child(node, ancestry, |len| len.checked_sub(*index))
            }
        }
    }
}

fn compare_attribute<N>(found: &Value<N>, operator: AttributeOperator, value: &AttributeValue) -> bool {
    match operator {
        AttributeOperator::Eq => equals(found, value),
        AttributeOperator::Ne => !equals(found, value),
        AttributeOperator::Lt | AttributeOperator::Le | AttributeOperator::Gt | AttributeOperator::Ge => {
            let Some(operand) = value.raw() else {
                return false;
            };
            let ordering = found.to_primitive().compare(&operand);
            match operator {
                AttributeOperator::Lt => ordering == Some(Ordering::Less),
                AttributeOperator::Le => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
                AttributeOperator::Gt => ordering == Some(Ordering::Greater),
                _ => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
            }
        }
    }
}

fn equals<N>(found: &Value<N>, value: &AttributeValue) -> bool {
    match value {
        AttributeValue::Regexp(pattern) => pattern.is_match(&found.coerce_string()),
        AttributeValue::Literal(literal) => literal.to_primitive().coerce_string() == found.coerce_string(),
        AttributeValue::TypeName(name) => name == found.type_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::ast::{Literal, Pattern};
    use crate::tree::json::{EstreeSchema, JsonNode};
    use serde_json::json;

    fn matcher(schema: &EstreeSchema) -> Matcher<'_, EstreeSchema> {
        Matcher::new(schema)
    }

    fn literal(value: Literal) -> AttributeValue {
        AttributeValue::Literal(value)
    }

    fn regexp(source: &str) -> AttributeValue {
        let regex = crate::cache::get_or_compile_regex(source, "").unwrap();
        AttributeValue::Regexp(Pattern::from_parts(source.to_string(), String::new(), regex))
    }

    #[test]
    fn missing_selector_matches_anything() {
        let schema = EstreeSchema::new();
        let doc = json!({ "type": "Identifier", "name": "x" });
        let node = JsonNode::root(&doc).unwrap();
        assert!(matcher(&schema).matches(&node, None, &[]));
    }

    #[test]
    fn identifiers_ignore_case() {
        let schema = EstreeSchema::new();
        let doc = json!({ "type": "Identifier", "name": "x" });
        let node = JsonNode::root(&doc).unwrap();
        let m = matcher(&schema);

        assert!(m.matches(&node, Some(&Selector::identifier("identifier")), &[]));
        assert!(!m.matches(&node, Some(&Selector::identifier("Literal")), &[]));
    }

    #[test]
    fn empty_logical_groups() {
        let schema = EstreeSchema::new();
        let doc = json!({ "type": "Identifier" });
        let node = JsonNode::root(&doc).unwrap();
        let m = matcher(&schema);

        assert!(m.matches(&node, Some(&Selector::compound(vec![])), &[]));
        assert!(!m.matches(&node, Some(&Selector::matches(vec![])), &[]));
        assert!(m.matches(&node, Some(&Selector::not(vec![])), &[]));
    }

    #[test]
    fn attribute_existence() {
        let schema = EstreeSchema::new();
        let doc = json!({ "type": "VariableDeclarator", "id": { "type": "Identifier" }, "init": null });
        let node = JsonNode::root(&doc).unwrap();
        let m = matcher(&schema);

        assert!(m.matches(&node, Some(&Selector::has_attribute("id")), &[]));
        assert!(!m.matches(&node, Some(&Selector::has_attribute("init")), &[]));
        assert!(!m.matches(&node, Some(&Selector::has_attribute("missing.deeper")), &[]));
    }

    #[test]
    fn attribute_equality_kinds() {
        let schema = EstreeSchema::new();
        let doc = json!({ "type": "Literal", "value": 5, "raw": "5", "name": "fooBar" });
        let node = JsonNode::root(&doc).unwrap();
        let m = matcher(&schema);
        let eq = |name: &str, value: AttributeValue| {
            m.matches(&node, Some(&Selector::attribute(name, AttributeOperator::Eq, value)), &[])
        };

        // string coercion
        assert!(eq("value", literal(Literal::String("5".into()))));
        assert!(eq("raw", literal(Literal::Number(5.0))));
        assert!(!eq("value", literal(Literal::String("6".into()))));

        // type names
        assert!(eq("raw", AttributeValue::TypeName("string".into())));
        assert!(eq("value", AttributeValue::TypeName("number".into())));
        assert!(eq("missing", AttributeValue::TypeName("undefined".into())));

        // regexp
        assert!(eq("name", regexp("^foo")));
        assert!(!eq("name", regexp("^bar")));
        assert!(eq("missing", regexp("undef")));
    }

    #[test]
    fn attribute_inequality_negates() {
        let schema = EstreeSchema::new();
        let doc = json!({ "type": "Literal", "value": "abc" });
        let node = JsonNode::root(&doc).unwrap();
        let m = matcher(&schema);
        let ne = |value: AttributeValue| {
            m.matches(&node, Some(&Selector::attribute("value", AttributeOperator::Ne, value)), &[])
        };

        assert!(ne(literal(Literal::String("xyz".into()))));
        assert!(!ne(literal(Literal::String("abc".into()))));
        assert!(!ne(AttributeValue::TypeName("string".into())));
        assert!(ne(regexp("^z")));
    }

    #[test]
    fn relational_operators() {
        let schema = EstreeSchema::new();
        let doc = json!({ "type": "Literal", "value": 5, "name": "m" });
        let node = JsonNode::root(&doc).unwrap();
        let m = matcher(&schema);
        let cmp = |name: &str, op: AttributeOperator, value: AttributeValue| {
            m.matches(&node, Some(&Selector::attribute(name, op, value)), &[])
        };

        assert!(cmp("value", AttributeOperator::Gt, literal(Literal::Number(3.0))));
        assert!(cmp("value", AttributeOperator::Ge, literal(Literal::Number(5.0))));
        assert!(cmp("value", AttributeOperator::Le, literal(Literal::String("5".into()))));
        assert!(!cmp("value", AttributeOperator::Lt, literal(Literal::Number(5.0))));
        assert!(cmp("name", AttributeOperator::Lt, literal(Literal::String("n".into()))));
        assert!(!cmp("missing", AttributeOperator::Lt, literal(Literal::Number(1.0))));
        assert!(!cmp("value", AttributeOperator::Lt, regexp("9")));
    }

    #[test]
    fn child_requires_an_ancestry() {
        let schema = EstreeSchema::new();
        let doc = json!({ "type": "B" });
        let node = JsonNode::root(&doc).unwrap();
        let sel = Selector::child(Selector::identifier("A"), Selector::identifier("B"));
        assert!(!matcher(&schema).matches(&node, Some(&sel), &[]));
    }

    #[test]
    fn field_selector_checks_path_from_ancestor() {
        let schema = EstreeSchema::new();
        let doc = json!({
            "type": "VariableDeclarator",
            "id": { "type": "Identifier", "name": "a" },
            "init": { "type": "CallExpression", "callee": { "type": "Identifier", "name": "f" }, "arguments": [] }
        });
        let decl = JsonNode::root(&doc).unwrap();
        let init = decl.field("init").as_node().unwrap().clone();
        let callee = init.field("callee").as_node().unwrap().clone();
        let id = decl.field("id").as_node().unwrap().clone();
        let m = matcher(&schema);

        let sel = Selector::field("init.callee");
        assert!(m.matches(&callee, Some(&sel), &[init, decl]));
        assert!(!m.matches(&id, Some(&sel), &[decl]));
        // ancestry too short for the path
        assert!(!m.matches(&callee, Some(&sel), &[init]));
        assert!(m.matches(&id, Some(&Selector::field("id")), &[decl]));
    }
}
