use crate::tree::value::Primitive;
use regex::Regex;
use std::fmt;

/// A node of a selector AST.
///
/// `subject` never changes whether a selector matches; it only marks the
/// part of the selector whose match site is reported.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    pub kind: SelectorKind,
    pub subject: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectorKind {
    /// `*`
    Wildcard,
    /// Node type, compared case-insensitively.
    Identifier { value: String },
    /// `.init.callee`: the node sits at this field path below an ancestor.
    Field { name: String },
    /// `:matches(a, b)`
    Matches { selectors: Vec<Selector> },
    /// `a.b[c]`: every part matches.
    Compound { selectors: Vec<Selector> },
    /// `:not(a, b)`
    Not { selectors: Vec<Selector> },
    /// `a > b`
    Child {
        left: Box<Selector>,
        right: Box<Selector>,
    },
    /// `a b`
    Descendant {
        left: Box<Selector>,
        right: Box<Selector>,
    },
    /// `[name]`, `[name op value]`
    Attribute {
        name: String,
        operator: Option<AttributeOperator>,
        value: Option<AttributeValue>,
    },
    /// `a ~ b`
    Sibling {
        left: Box<Selector>,
        right: Box<Selector>,
    },
    /// `a + b`
    Adjacent {
        left: Box<Selector>,
        right: Box<Selector>,
    },
    /// `:nth-child(n)`, 1-based.
    NthChild {
        index: usize,
        right: Option<Box<Selector>>,
    },
    /// `:nth-last-child(n)`, 1-based from the end.
    NthLastChild {
        index: usize,
        right: Option<Box<Selector>>,
    },
}

impl SelectorKind {
    /// Every tag accepted in a selector AST, in declaration order.
    pub const TAGS: &'static [&'static str] = &[
        "wildcard",
        "identifier",
        "field",
        "matches",
        "compound",
        "not",
        "child",
        "descendant",
        "attribute",
        "sibling",
        "adjacent",
        "nth-child",
        "nth-last-child",
    ];

    /// The tag this variant carries in serialized form.
    pub fn tag(&self) -> &'static str {
        match self {
            SelectorKind::Wildcard => "wildcard",
            SelectorKind::Identifier { .. } => "identifier",
            SelectorKind::Field { .. } => "field",
            SelectorKind::Matches { .. } => "matches",
            SelectorKind::Compound { .. } => "compound",
            SelectorKind::Not { .. } => "not",
            SelectorKind::Child { .. } => "child",
            SelectorKind::Descendant { .. } => "descendant",
            SelectorKind::Attribute { .. } => "attribute",
            SelectorKind::Sibling { .. } => "sibling",
            SelectorKind::Adjacent { .. } => "adjacent",
            SelectorKind::NthChild { .. } => "nth-child",
            SelectorKind::NthLastChild { .. } => "nth-last-child",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOperator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl AttributeOperator {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "=" => Some(AttributeOperator::Eq),
            "!=" => Some(AttributeOperator::Ne),
            "<" => Some(AttributeOperator::Lt),
            "<=" => Some(AttributeOperator::Le),
            ">" => Some(AttributeOperator::Gt),
            ">=" => Some(AttributeOperator::Ge),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeOperator::Eq => "=",
            AttributeOperator::Ne => "!=",
            AttributeOperator::Lt => "<",
            AttributeOperator::Le => "<=",
            AttributeOperator::Gt => ">",
            AttributeOperator::Ge => ">=",
        }
    }
}

impl fmt::Display for AttributeOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Right-hand side of an attribute comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// `/pattern/`
    Regexp(Pattern),
    /// `"text"` or `42`
    Literal(Literal),
    /// `type(string)`
    TypeName(String),
}

impl AttributeValue {
    /// The operand as seen by `<`, `<=`, `>` and `>=`.
    pub fn raw(&self) -> Option<Primitive> {
        match self {
            AttributeValue::Regexp(_) => None,
            AttributeValue::Literal(lit) => Some(lit.to_primitive()),
            AttributeValue::TypeName(name) => Some(Primitive::String(name.clone())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

impl Literal {
    pub fn to_primitive(&self) -> Primitive {
        match self {
            Literal::Null => Primitive::Null,
            Literal::Bool(b) => Primitive::Bool(*b),
            Literal::Number(n) => Primitive::Number(*n),
            Literal::String(s) => Primitive::String(s.clone()),
        }
    }
}

/// A compiled regular expression with its source text and flags.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    flags: String,
    regex: Regex,
}

impl Pattern {
    pub(crate) fn from_parts(source: String, flags: String, regex: Regex) -> Self {
        Self {
            source,
            flags,
            regex,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.flags == other.flags
    }
}

fn boxed(selector: Selector) -> Box<Selector> {
    Box::new(selector)
}

impl Selector {
    pub fn new(kind: SelectorKind) -> Self {
        Self {
            kind,
            subject: false,
        }
    }

    /// Mark this selector as the reported subject.
    pub fn subject(mut self) -> Self {
        self.subject = true;
        self
    }

    pub fn wildcard() -> Self {
        Self::new(SelectorKind::Wildcard)
    }

    pub fn identifier(value: impl Into<String>) -> Self {
        Self::new(SelectorKind::Identifier {
            value: value.into(),
        })
    }

    pub fn field(name: impl Into<String>) -> Self {
        Self::new(SelectorKind::Field { name: name.into() })
    }

    pub fn matches(selectors: Vec<Selector>) -> Self {
        Self::new(SelectorKind::Matches { selectors })
    }

    pub fn compound(selectors: Vec<Selector>) -> Self {
        Self::new(SelectorKind::Compound { selectors })
    }

    pub fn not(selectors: Vec<Selector>) -> Self {
        Self::new(SelectorKind::Not { selectors })
    }

    pub fn child(left: Selector, right: Selector) -> Self {
        Self::new(SelectorKind::Child {
            left: boxed(left),
            right: boxed(right),
        })
    }

    pub fn descendant(left: Selector, right: Selector) -> Self {
        Self::new(SelectorKind::Descendant {
            left: boxed(left),
            right: boxed(right),
        })
    }

    pub fn sibling(left: Selector, right: Selector) -> Self {
        Self::new(SelectorKind::Sibling {
            left: boxed(left),
            right: boxed(right),
        })
    }

    pub fn adjacent(left: Selector, right: Selector) -> Self {
        Self::new(SelectorKind::Adjacent {
            left: boxed(left),
            right: boxed(right),
        })
    }

    /// `[name]`
    pub fn has_attribute(name: impl Into<String>) -> Self {
        Self::new(SelectorKind::Attribute {
            name: name.into(),
            operator: None,
            value: None,
        })
    }

    /// `[name op value]`
    pub fn attribute(
        name: impl Into<String>,
        operator: AttributeOperator,
        value: AttributeValue,
    ) -> Self {
        Self::new(SelectorKind::Attribute {
            name: name.into(),
            operator: Some(operator),
            value: Some(value),
        })
    }

    pub fn nth_child(index: usize, right: Option<Selector>) -> Self {
        Self::new(SelectorKind::NthChild {
            index,
            right: right.map(boxed),
        })
    }

    pub fn nth_last_child(index: usize, right: Option<Selector>) -> Self {
        Self::new(SelectorKind::NthLastChild {
            index,
            right: right.map(boxed),
        })
    }
}
