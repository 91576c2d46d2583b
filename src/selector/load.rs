//! Selector ASTs in their JSON form.
//!
//! This is the boundary between a selector parser and the engine: every tag
//! is checked against the closed set of selector kinds here, so the matcher
//! itself never meets an unknown kind.
//!
//! ```json
//! {
//!   "type": "child",
//!   "left": { "type": "identifier", "value": "CallExpression", "subject": true },
//!   "right": { "type": "field", "name": "callee" }
//! }
//! ```

use crate::cache;
use crate::selector::ast::{
    AttributeOperator, AttributeValue, Literal, Pattern, Selector, SelectorKind,
};
use crate::selector::errors::SelectorError;
use serde_json::{json, Map, Value as Json};
use std::fs;
use std::path::Path;
use std::str::FromStr;

impl Selector {
    /// Decode a selector AST from JSON text.
    pub fn from_json(input: &str) -> Result<Self, SelectorError> {
        let value: Json = serde_json::from_str(input)?;
        Self::from_value(&value)
    }

    /// Decode a selector AST from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SelectorError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| SelectorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Decode a selector AST from an already parsed JSON value.
    pub fn from_value(value: &Json) -> Result<Self, SelectorError> {
        let obj = value
            .as_object()
            .ok_or_else(|| SelectorError::MissingField {
                kind: "selector".to_string(),
                field: "type",
            })?;
        let tag = obj
            .get("type")
            .and_then(Json::as_str)
            .ok_or_else(|| SelectorError::MissingField {
                kind: "selector".to_string(),
                field: "type",
            })?;
        let subject = obj.get("subject").and_then(Json::as_bool).unwrap_or(false);

        let kind = match tag {
            "wildcard" => SelectorKind::Wildcard,
            "identifier" => SelectorKind::Identifier {
                value: string_field(obj, tag, "value")?,
            },
            "field" => SelectorKind::Field {
                name: string_field(obj, tag, "name")?,
            },
            "matches" => SelectorKind::Matches {
                selectors: list_field(obj, tag)?,
            },
            "compound" => SelectorKind::Compound {
                selectors: list_field(obj, tag)?,
            },
            "not" => SelectorKind::Not {
                selectors: list_field(obj, tag)?,
            },
            "child" => SelectorKind::Child {
                left: selector_field(obj, tag, "left")?,
                right: selector_field(obj, tag, "right")?,
            },
            "descendant" => SelectorKind::Descendant {
                left: selector_field(obj, tag, "left")?,
                right: selector_field(obj, tag, "right")?,
            },
            "sibling" => SelectorKind::Sibling {
                left: selector_field(obj, tag, "left")?,
                right: selector_field(obj, tag, "right")?,
            },
            "adjacent" => SelectorKind::Adjacent {
                left: selector_field(obj, tag, "left")?,
                right: selector_field(obj, tag, "right")?,
            },
            "attribute" => decode_attribute(obj)?,
            "nth-child" => SelectorKind::NthChild {
                index: index_field(obj, tag)?,
                right: optional_selector_field(obj, "right")?,
            },
            "nth-last-child" => SelectorKind::NthLastChild {
                index: index_field(obj, tag)?,
                right: optional_selector_field(obj, "right")?,
            },
            other => {
                return Err(SelectorError::UnknownSelectorKind {
                    kind: other.to_string(),
                    suggestion: suggest_kind(other),
                })
            }
        };

        Ok(Selector { kind, subject })
    }

    /// Encode back to the JSON form accepted by [`Selector::from_value`].
    pub fn to_value(&self) -> Json {
        let mut obj = Map::new();
        obj.insert("type".to_string(), json!(self.kind.tag()));
        match &self.kind {
            SelectorKind::Wildcard => {
                obj.insert("value".to_string(), json!("*"));
            }
            SelectorKind::Identifier { value } => {
                obj.insert("value".to_string(), json!(value));
            }
            SelectorKind::Field { name } => {
                obj.insert("name".to_string(), json!(name));
            }
            SelectorKind::Matches { selectors }
            | SelectorKind::Compound { selectors }
            | SelectorKind::Not { selectors } => {
                let items: Vec<Json> = selectors.iter().map(Selector::to_value).collect();
                obj.insert("selectors".to_string(), Json::Array(items));
            }
            SelectorKind::Child { left, right }
            | SelectorKind::Descendant { left, right }
            | SelectorKind::Sibling { left, right }
            | SelectorKind::Adjacent { left, right } => {
                obj.insert("left".to_string(), left.to_value());
                obj.insert("right".to_string(), right.to_value());
            }
            SelectorKind::Attribute {
                name,
                operator,
                value,
            } => {
                obj.insert("name".to_string(), json!(name));
                if let Some(op) = operator {
                    obj.insert("operator".to_string(), json!(op.as_str()));
                }
                if let Some(value) = value {
                    obj.insert("value".to_string(), encode_attribute_value(value));
                }
            }
            SelectorKind::NthChild { index, right } | SelectorKind::NthLastChild { index, right } => {
                obj.insert(
                    "index".to_string(),
                    json!({ "type": "literal", "value": index }),
                );
                if let Some(right) = right {
                    obj.insert("right".to_string(), right.to_value());
                }
            }
        }
        if self.subject {
            obj.insert("subject".to_string(), Json::Bool(true));
        }
        Json::Object(obj)
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_json(s)
    }
}

fn string_field(obj: &Map<String, Json>, kind: &str, field: &'static str) -> Result<String, SelectorError> {
    obj.get(field)
        .and_then(Json::as_str)
        .map(str::to_string)
        .ok_or_else(|| SelectorError::MissingField {
            kind: kind.to_string(),
            field,
        })
}

fn selector_field(
    obj: &Map<String, Json>,
    kind: &str,
    field: &'static str,
) -> Result<Box<Selector>, SelectorError> {
    optional_selector_field(obj, field)?.ok_or_else(|| SelectorError::MissingField {
        kind: kind.to_string(),
        field,
    })
}

fn optional_selector_field(
    obj: &Map<String, Json>,
    field: &'static str,
) -> Result<Option<Box<Selector>>, SelectorError> {
    match obj.get(field) {
        None | Some(Json::Null) => Ok(None),
        Some(value) => Ok(Some(Box::new(Selector::from_value(value)?))),
    }
}

fn list_field(obj: &Map<String, Json>, kind: &str) -> Result<Vec<Selector>, SelectorError> {
    obj.get("selectors")
        .and_then(Json::as_array)
        .ok_or_else(|| SelectorError::MissingField {
            kind: kind.to_string(),
            field: "selectors",
        })?
        .iter()
        .map(Selector::from_value)
        .collect()
}

/// Accepts a bare number or a `{ "type": "literal", "value": n }` wrapper.
fn index_field(obj: &Map<String, Json>, kind: &str) -> Result<usize, SelectorError> {
    let raw = obj.get("index").ok_or_else(|| SelectorError::MissingField {
        kind: kind.to_string(),
        field: "index",
    })?;
    let number = match raw {
        Json::Object(inner) => inner.get("value"),
        other => Some(other),
    };
    number
        .and_then(Json::as_u64)
        .map(|n| n as usize)
        .ok_or_else(|| SelectorError::InvalidField {
            kind: kind.to_string(),
            field: "index",
            message: format!("expected a non-negative integer, found {raw}"),
        })
}

fn decode_attribute(obj: &Map<String, Json>) -> Result<SelectorKind, SelectorError> {
    let name = string_field(obj, "attribute", "name")?;

    let operator = match obj.get("operator") {
        None | Some(Json::Null) => None,
        Some(Json::String(op)) => Some(AttributeOperator::parse(op).ok_or_else(|| {
            SelectorError::InvalidField {
                kind: "attribute".to_string(),
                field: "operator",
                message: format!("unknown operator '{op}'"),
            }
        })?),
        Some(other) => {
            return Err(SelectorError::InvalidField {
                kind: "attribute".to_string(),
                field: "operator",
                message: format!("expected a string, found {other}"),
            })
        }
    };

    let value = match obj.get("value") {
        None | Some(Json::Null) => None,
        Some(value) => Some(decode_attribute_value(value)?),
    };

    if operator.is_some() && value.is_none() {
        return Err(SelectorError::MissingAttributeValue { name });
    }

    Ok(SelectorKind::Attribute {
        name,
        operator,
        value,
    })
}

fn decode_attribute_value(value: &Json) -> Result<AttributeValue, SelectorError> {
    let invalid = |message: String| SelectorError::InvalidField {
        kind: "attribute".to_string(),
        field: "value",
        message,
    };

    let obj = value
        .as_object()
        .ok_or_else(|| invalid(format!("expected an object, found {value}")))?;
    let tag = obj
        .get("type")
        .and_then(Json::as_str)
        .ok_or_else(|| invalid("missing value type".to_string()))?;
    let inner = obj.get("value").unwrap_or(&Json::Null);

    match tag {
        "regexp" => {
            // either "value": "src" with optional sibling "flags", or
            // "value": { "source": "src", "flags": "i" }
            let (source, flags) = match inner {
                Json::String(src) => (
                    src.clone(),
                    obj.get("flags").and_then(Json::as_str).unwrap_or_default(),
                ),
                Json::Object(re) => (
                    re.get("source")
                        .and_then(Json::as_str)
                        .ok_or_else(|| invalid("regexp without source".to_string()))?
                        .to_string(),
                    re.get("flags").and_then(Json::as_str).unwrap_or_default(),
                ),
                other => return Err(invalid(format!("expected a pattern, found {other}"))),
            };
            let regex = cache::get_or_compile_regex(&source, flags).map_err(|message| {
                SelectorError::InvalidRegex {
                    pattern: source.clone(),
                    message,
                }
            })?;
            Ok(AttributeValue::Regexp(Pattern::from_parts(
                source,
                flags.to_string(),
                regex,
            )))
        }
        "literal" => {
            let literal = match inner {
                Json::Null => Literal::Null,
                Json::Bool(b) => Literal::Bool(*b),
                Json::Number(n) => Literal::Number(n.as_f64().unwrap_or(f64::NAN)),
                Json::String(s) => Literal::String(s.clone()),
                other => return Err(invalid(format!("expected a scalar literal, found {other}"))),
            };
            Ok(AttributeValue::Literal(literal))
        }
        "type" => inner
            .as_str()
            .map(|name| AttributeValue::TypeName(name.to_string()))
            .ok_or_else(|| invalid("type() needs a type name".to_string())),
        other => Err(invalid(format!("unknown value type '{other}'"))),
    }
}

fn encode_attribute_value(value: &AttributeValue) -> Json {
    match value {
        AttributeValue::Regexp(pattern) => {
            let mut obj = json!({ "type": "regexp", "value": pattern.source() });
            if !pattern.flags().is_empty() {
                obj["flags"] = json!(pattern.flags());
            }
            obj
        }
        AttributeValue::Literal(literal) => {
            let inner = match literal {
                Literal::Null => Json::Null,
                Literal::Bool(b) => json!(b),
                Literal::Number(n) => json!(n),
                Literal::String(s) => json!(s),
            };
            json!({ "type": "literal", "value": inner })
        }
        AttributeValue::TypeName(name) => json!({ "type": "type", "value": name }),
    }
}

/// Closest known selector tag, if any is plausibly a typo of `kind`.
fn suggest_kind(kind: &str) -> Option<String> {
    let lowered = kind.to_lowercase();
    SelectorKind::TAGS
        .iter()
        .map(|tag| (strsim::levenshtein(&lowered, tag), *tag))
        .filter(|(distance, tag)| *distance <= (tag.len() / 3).max(2))
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, tag)| tag.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_nested_selectors() {
        let sel = Selector::from_json(
            r#"{
                "type": "child",
                "left": { "type": "identifier", "value": "A", "subject": true },
                "right": { "type": "compound", "selectors": [
                    { "type": "identifier", "value": "B" },
                    { "type": "attribute", "name": "name" }
                ]}
            }"#,
        )
        .unwrap();

        let expected = Selector::child(
            Selector::identifier("A").subject(),
            Selector::compound(vec![
                Selector::identifier("B"),
                Selector::has_attribute("name"),
            ]),
        );
        assert_eq!(sel, expected);
    }

    #[test]
    fn unknown_kind_is_rejected_with_suggestion() {
        let err = Selector::from_json(r#"{ "type": "decendant", "left": {}, "right": {} }"#)
            .unwrap_err();
        match err {
            SelectorError::UnknownSelectorKind { kind, suggestion } => {
                assert_eq!(kind, "decendant");
                assert_eq!(suggestion.as_deref(), Some("descendant"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_kind_nested_deep_is_rejected() {
        let err = Selector::from_json(
            r#"{ "type": "not", "selectors": [{ "type": "has", "selector": {} }] }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SelectorError::UnknownSelectorKind { ref kind, suggestion: None } if kind == "has"
        ));
    }

    #[test]
    fn operator_without_value_is_rejected() {
        let err = Selector::from_json(r#"{ "type": "attribute", "name": "x", "operator": "=" }"#)
            .unwrap_err();
        assert!(matches!(err, SelectorError::MissingAttributeValue { .. }));
    }

    #[test]
    fn nth_index_accepts_literal_wrapper() {
        let a = Selector::from_json(
            r#"{ "type": "nth-child", "index": { "type": "literal", "value": 2 } }"#,
        )
        .unwrap();
        let b = Selector::from_json(r#"{ "type": "nth-child", "index": 2 }"#).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, Selector::nth_child(2, None));
    }

    #[test]
    fn regexp_values_compile_with_flags() {
        let sel = Selector::from_json(
            r#"{ "type": "attribute", "name": "name", "operator": "=",
                 "value": { "type": "regexp", "value": { "source": "^FOO", "flags": "i" } } }"#,
        )
        .unwrap();
        match sel.kind {
            SelectorKind::Attribute {
                value: Some(AttributeValue::Regexp(pattern)),
                ..
            } => {
                assert!(pattern.is_match("foobar"));
                assert_eq!(pattern.flags(), "i");
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn invalid_regexp_is_reported() {
        let err = Selector::from_json(
            r#"{ "type": "attribute", "name": "n", "operator": "=",
                 "value": { "type": "regexp", "value": "(" } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, SelectorError::InvalidRegex { .. }));
    }

    #[test]
    fn encoding_decodes_to_the_same_selector() {
        let sel = Selector::descendant(
            Selector::matches(vec![Selector::wildcard(), Selector::field("init.callee")]),
            Selector::attribute(
                "value",
                AttributeOperator::Ge,
                AttributeValue::Literal(Literal::Number(3.0)),
            )
            .subject(),
        );
        assert_eq!(Selector::from_value(&sel.to_value()).unwrap(), sel);
    }
}
