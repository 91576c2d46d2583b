//! ESTree-shaped JSON documents.
//!
//! Any JSON object carrying a string `type` property is a syntax node; its
//! other properties are fields. This is the layout produced by JavaScript
//! parsers such as esprima, acorn and espree.

use crate::tree::errors::TreeError;
use crate::tree::node::SyntaxNode;
use crate::tree::schema::{ChildSchema, Fallback};
use crate::tree::value::Value;
use serde_json::Value as Json;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::ops::Range;
use std::path::Path;

/// Child fields of every standard ESTree node type (ES2022).
const ESTREE_VISITOR_KEYS: &[(&str, &[&str])] = &[
    ("AssignmentExpression", &["left", "right"]),
    ("AssignmentPattern", &["left", "right"]),
    ("ArrayExpression", &["elements"]),
    ("ArrayPattern", &["elements"]),
    ("ArrowFunctionExpression", &["params", "body"]),
    ("AwaitExpression", &["argument"]),
    ("BlockStatement", &["body"]),
    ("BinaryExpression", &["left", "right"]),
    ("BreakStatement", &["label"]),
    ("CallExpression", &["callee", "arguments"]),
    ("CatchClause", &["param", "body"]),
    ("ChainExpression", &["expression"]),
    ("ClassBody", &["body"]),
    ("ClassDeclaration", &["id", "superClass", "body"]),
    ("ClassExpression", &["id", "superClass", "body"]),
    ("ConditionalExpression", &["test", "consequent", "alternate"]),
    ("ContinueStatement", &["label"]),
    ("DebuggerStatement", &[]),
    ("DoWhileStatement", &["body", "test"]),
    ("EmptyStatement", &[]),
    ("ExportAllDeclaration", &["exported", "source"]),
    ("ExportDefaultDeclaration", &["declaration"]),
    ("ExportNamedDeclaration", &["declaration", "specifiers", "source"]),
    ("ExportSpecifier", &["exported", "local"]),
    ("ExpressionStatement", &["expression"]),
    ("ForStatement", &["init", "test", "update", "body"]),
    ("ForInStatement", &["left", "right", "body"]),
    ("ForOfStatement", &["left", "right", "body"]),
    ("FunctionDeclaration", &["id", "params", "body"]),
    ("FunctionExpression", &["id", "params", "body"]),
    ("Identifier", &[]),
    ("IfStatement", &["test", "consequent", "alternate"]),
    ("ImportExpression", &["source"]),
    ("ImportDeclaration", &["specifiers", "source"]),
    ("ImportDefaultSpecifier", &["local"]),
    ("ImportNamespaceSpecifier", &["local"]),
    ("ImportSpecifier", &["imported", "local"]),
    ("Literal", &[]),
    ("LabeledStatement", &["label", "body"]),
    ("LogicalExpression", &["left", "right"]),
    ("MemberExpression", &["object", "property"]),
    ("MetaProperty", &["meta", "property"]),
    ("MethodDefinition", &["key", "value"]),
    ("NewExpression", &["callee", "arguments"]),
    ("ObjectExpression", &["properties"]),
    ("ObjectPattern", &["properties"]),
    ("PrivateIdentifier", &[]),
    ("Program", &["body"]),
    ("Property", &["key", "value"]),
    ("PropertyDefinition", &["key", "value"]),
    ("RestElement", &["argument"]),
    ("ReturnStatement", &["argument"]),
    ("SequenceExpression", &["expressions"]),
    ("SpreadElement", &["argument"]),
    ("StaticBlock", &["body"]),
    ("Super", &[]),
    ("SwitchStatement", &["discriminant", "cases"]),
    ("SwitchCase", &["test", "consequent"]),
    ("TaggedTemplateExpression", &["tag", "quasi"]),
    ("TemplateElement", &[]),
    ("TemplateLiteral", &["quasis", "expressions"]),
    ("ThisExpression", &[]),
    ("ThrowStatement", &["argument"]),
    ("TryStatement", &["block", "handler", "finalizer"]),
    ("UnaryExpression", &["argument"]),
    ("UpdateExpression", &["argument"]),
    ("VariableDeclaration", &["declarations"]),
    ("VariableDeclarator", &["id", "init"]),
    ("WhileStatement", &["test", "body"]),
    ("WithStatement", &["object", "body"]),
    ("YieldExpression", &["argument"]),
];

/// A handle to a JSON object inside a parsed document.
#[derive(Debug, Clone, Copy)]
pub struct JsonNode<'a> {
    value: &'a Json,
}

impl<'a> JsonNode<'a> {
    /// Wrap a document root. The root must be an object with a `type`.
    pub fn root(value: &'a Json) -> Result<Self, TreeError> {
        if is_syntax_node(value) {
            Ok(Self { value })
        } else {
            Err(TreeError::NotANode)
        }
    }

    /// The underlying JSON value.
    pub fn value(&self) -> &'a Json {
        self.value
    }

    fn wrap(value: &'a Json) -> Value<Self> {
        match value {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => Value::String(s.clone()),
            Json::Array(items) => Value::List(items.iter().map(Self::wrap).collect()),
            Json::Object(_) if is_syntax_node(value) => Value::Node(Self { value }),
            Json::Object(_) => Value::Object(Self { value }),
        }
    }
}

impl SyntaxNode for JsonNode<'_> {
    fn kind(&self) -> &str {
        self.value
            .get("type")
            .and_then(Json::as_str)
            .unwrap_or_default()
    }

    fn field(&self, name: &str) -> Value<Self> {
        match self.value.get(name) {
            Some(value) => Self::wrap(value),
            None => Value::Absent,
        }
    }

    fn same_node(&self, other: &Self) -> bool {
        std::ptr::eq(self.value, other.value)
    }

    fn span(&self) -> Option<Range<usize>> {
        let range = self.value.get("range").and_then(Json::as_array);
        if let Some([start, end]) = range.map(Vec::as_slice) {
            return Some(start.as_u64()? as usize..end.as_u64()? as usize);
        }
        let start = self.value.get("start")?.as_u64()? as usize;
        let end = self.value.get("end")?.as_u64()? as usize;
        Some(start..end)
    }
}

fn is_syntax_node(value: &Json) -> bool {
    value.get("type").is_some_and(Json::is_string)
}

/// Child-field schema for ESTree JSON.
#[derive(Debug, Clone)]
pub struct EstreeSchema {
    keys: HashMap<String, Vec<String>>,
    fallback: Fallback,
}

impl EstreeSchema {
    /// The standard ESTree table with iteration fallback.
    pub fn new() -> Self {
        let keys = ESTREE_VISITOR_KEYS
            .iter()
            .map(|(kind, fields)| {
                (
                    kind.to_string(),
                    fields.iter().map(|f| f.to_string()).collect(),
                )
            })
            .collect();
        Self {
            keys,
            fallback: Fallback::default(),
        }
    }

    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Add node types or override the fields of existing ones.
    pub fn with_visitor_keys<I, K, F>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<F>)>,
        K: Into<String>,
        F: Into<String>,
    {
        for (kind, fields) in entries {
            self.keys
                .insert(kind.into(), fields.into_iter().map(Into::into).collect());
        }
        self
    }

    pub fn fallback(&self) -> Fallback {
        self.fallback
    }

    /// Registered child fields for a node type.
    pub fn visitor_keys(&self, kind: &str) -> Option<&[String]> {
        self.keys.get(kind).map(Vec::as_slice)
    }
}

impl Default for EstreeSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> ChildSchema<JsonNode<'a>> for EstreeSchema {
    fn child_fields<'s>(&'s self, node: &JsonNode<'a>) -> Result<Cow<'s, [String]>, TreeError> {
        if let Some(fields) = self.keys.get(node.kind()) {
            return Ok(Cow::Borrowed(fields.as_slice()));
        }
        match self.fallback {
            Fallback::Strict => Err(TreeError::UnknownNodeType {
                kind: node.kind().to_string(),
            }),
            Fallback::Iteration => {
                let fields = node
                    .value
                    .as_object()
                    .map(|map| {
                        map.iter()
                            .filter(|(_, v)| v.is_array() || is_syntax_node(v))
                            .map(|(k, _)| k.clone())
                            .collect()
                    })
                    .unwrap_or_default();
                Ok(Cow::Owned(fields))
            }
        }
    }
}

/// An owned JSON document.
#[derive(Debug, Clone)]
pub struct JsonDocument {
    value: Json,
}

impl JsonDocument {
    pub fn parse(source: &str) -> Result<Self, TreeError> {
        let value: Json = serde_json::from_str(source)?;
        Self::from_value(value)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TreeError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| TreeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&source)
    }

    pub fn from_value(value: Json) -> Result<Self, TreeError> {
        if is_syntax_node(&value) {
            Ok(Self { value })
        } else {
            Err(TreeError::NotANode)
        }
    }

    pub fn root(&self) -> JsonNode<'_> {
        JsonNode { value: &self.value }
    }
}
