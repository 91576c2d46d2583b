use std::cmp::Ordering;

/// The result of reading a named field (or a dotted path) on a syntax node.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<N> {
    /// The field does not exist on the node.
    Absent,
    /// The field exists and holds an explicit null.
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// A child syntax node.
    Node(N),
    /// A structured value that is not itself a syntax node (e.g. a `loc`
    /// record). Paths can walk through it but traversal never visits it.
    Object(N),
    /// An ordered sequence of values, typically child nodes.
    List(Vec<Value<N>>),
}

impl<N> Value<N> {
    /// True unless the value is absent or null.
    pub fn is_present(&self) -> bool {
        !matches!(self, Value::Absent | Value::Null)
    }

    /// The node behind this value, if it is a syntax node.
    pub fn as_node(&self) -> Option<&N> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    /// The record behind this value, whether a syntax node or a plain object.
    pub fn as_record(&self) -> Option<&N> {
        match self {
            Value::Node(node) | Value::Object(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value<N>]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Runtime type name used by `[attr=type(...)]` selectors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Absent => "undefined",
            Value::Null | Value::Node(_) | Value::Object(_) | Value::List(_) => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
        }
    }

    /// Reduce to a primitive the way an attribute comparison sees it.
    pub fn to_primitive(&self) -> Primitive {
        match self {
            Value::Absent => Primitive::Undefined,
            Value::Null => Primitive::Null,
            Value::Bool(b) => Primitive::Bool(*b),
            Value::Number(n) => Primitive::Number(*n),
            Value::String(s) => Primitive::String(s.clone()),
            Value::Node(_) | Value::Object(_) | Value::List(_) => {
                Primitive::String(self.coerce_string())
            }
        }
    }

    /// String form used for literal equality and regexp tests.
    pub fn coerce_string(&self) -> String {
        match self {
            Value::Absent => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            Value::Node(_) | Value::Object(_) => "[object Object]".to_string(),
            Value::List(items) => items
                .iter()
                .map(|item| match item {
                    // nulls inside lists stringify to empty slots
                    Value::Absent | Value::Null => String::new(),
                    other => other.coerce_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

/// A scalar reduced from a [`Value`] or a selector literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

impl Primitive {
    pub fn to_number(&self) -> f64 {
        match self {
            Primitive::Undefined => f64::NAN,
            Primitive::Null => 0.0,
            Primitive::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Primitive::Number(n) => *n,
            Primitive::String(s) => parse_number(s),
        }
    }

    pub fn coerce_string(&self) -> String {
        match self {
            Primitive::Undefined => "undefined".to_string(),
            Primitive::Null => "null".to_string(),
            Primitive::Bool(b) => b.to_string(),
            Primitive::Number(n) => format_number(*n),
            Primitive::String(s) => s.clone(),
        }
    }

    /// Relational ordering: two strings compare lexicographically, anything
    /// else compares numerically. `None` when either side is NaN.
    pub fn compare(&self, other: &Primitive) -> Option<Ordering> {
        match (self, other) {
            (Primitive::String(a), Primitive::String(b)) => Some(a.cmp(b)),
            _ => self.to_number().partial_cmp(&other.to_number()),
        }
    }
}

/// Number to string the way JavaScript's `String(n)` does: plain decimals
/// for magnitudes in `[1e-6, 1e21)`, exponent form (`1e+21`, `1e-7`)
/// outside it.
fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        return format!("{sign}Infinity");
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return n.to_string();
    }
    let formatted = format!("{n:e}");
    match formatted.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => formatted,
    }
}

/// String to number the way JavaScript's `Number(s)` does.
///
/// Blank strings are 0; `Infinity` is spelled out; `0x`, `0o` and `0b`
/// prefixes select a radix. Rust-only spellings such as `inf` or `nan` are
/// NaN.
fn parse_number(s: &str) -> f64 {
    let trimmed = s.trim();
    match trimmed {
        "" => return 0.0,
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix = match trimmed.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &trimmed[2..];
        if digits.is_empty() {
            return f64::NAN;
        }
        return digits.chars().try_fold(0.0_f64, |acc, c| {
            c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
        })
        .unwrap_or(f64::NAN);
    }

    if trimmed
        .chars()
        .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return f64::NAN;
    }
    trimmed.parse().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    type V = Value<()>;

    #[test]
    fn integral_numbers_coerce_without_fraction() {
        assert_eq!(V::Number(5.0).coerce_string(), "5");
        assert_eq!(V::Number(-0.0).coerce_string(), "0");
        assert_eq!(V::Number(2.5).coerce_string(), "2.5");
        assert_eq!(V::Number(f64::INFINITY).coerce_string(), "Infinity");
    }

    #[test]
    fn type_names() {
        assert_eq!(V::Absent.type_name(), "undefined");
        assert_eq!(V::Null.type_name(), "object");
        assert_eq!(V::String("x".into()).type_name(), "string");
        assert_eq!(V::Bool(true).type_name(), "boolean");
        assert_eq!(V::List(vec![]).type_name(), "object");
    }

    #[test]
    fn lists_join_with_commas() {
        let list = V::List(vec![V::Number(1.0), V::Null, V::String("a".into())]);
        assert_eq!(list.coerce_string(), "1,,a");
    }

    #[test]
    fn large_and_tiny_numbers_use_exponent_form() {
        assert_eq!(V::Number(1e21).coerce_string(), "1e+21");
        assert_eq!(V::Number(-1.5e22).coerce_string(), "-1.5e+22");
        assert_eq!(V::Number(1e-7).coerce_string(), "1e-7");
        assert_eq!(V::Number(2.5e-8).coerce_string(), "2.5e-8");
        assert_eq!(V::Number(1e20).coerce_string(), "100000000000000000000");
        assert_eq!(V::Number(0.000001).coerce_string(), "0.000001");
        assert_eq!(V::Number(5e-7).coerce_string(), "5e-7");
    }

    #[test]
    fn strings_convert_like_number() {
        let num = |s: &str| Primitive::String(s.into()).to_number();
        assert_eq!(num("  42 "), 42.0);
        assert_eq!(num(""), 0.0);
        assert_eq!(num("0x10"), 16.0);
        assert_eq!(num("0b101"), 5.0);
        assert_eq!(num("1e3"), 1000.0);
        assert_eq!(num("-Infinity"), f64::NEG_INFINITY);
        assert!(num("inf").is_nan());
        assert!(num("nan").is_nan());
        assert!(num("0x").is_nan());
        assert!(num("0xZZ").is_nan());
        assert!(num("12px").is_nan());
    }

    #[test]
    fn mixed_comparison_is_numeric() {
        let five = Primitive::Number(5.0);
        assert_eq!(five.compare(&Primitive::String("10".into())), Some(Ordering::Less));
        assert_eq!(
            Primitive::String("10".into()).compare(&Primitive::String("9".into())),
            Some(Ordering::Less)
        );
        assert_eq!(five.compare(&Primitive::Undefined), None);
        assert_eq!(
            Primitive::Null.compare(&Primitive::Number(0.0)),
            Some(Ordering::Equal)
        );
    }
}
