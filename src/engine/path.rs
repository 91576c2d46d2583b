use crate::tree::node::SyntaxNode;
use crate::tree::value::Value;

/// Read the value at a dotted path (`init.callee.name`) below `node`.
///
/// An absent or null step short-circuits and is returned as-is. Lists accept
/// numeric segments and `length`, strings accept `length`; any other step
/// into a scalar resolves to [`Value::Absent`].
pub fn resolve<N: SyntaxNode>(node: &N, path: &str) -> Value<N> {
    let mut current = Value::Node(node.clone());
    for segment in path.split('.') {
        if !current.is_present() {
            return current;
        }
        current = step(&current, segment);
    }
    current
}

fn step<N: SyntaxNode>(value: &Value<N>, segment: &str) -> Value<N> {
    match value {
        Value::Node(record) | Value::Object(record) => record.field(segment),
        Value::List(items) if segment == "length" => Value::Number(items.len() as f64),
        Value::List(items) => segment
            .parse::<usize>()
            .ok()
            .and_then(|idx| items.get(idx).cloned())
            .unwrap_or(Value::Absent),
        Value::String(s) if segment == "length" => Value::Number(s.chars().count() as f64),
        _ => Value::Absent,
    }
}

/// Whether `node` is reached from `ancestor` by following `path`, trying
/// every element where a step lands on a list.
pub(crate) fn in_path<N: SyntaxNode>(node: &N, ancestor: &Value<N>, path: &[&str]) -> bool {
    let Some((head, rest)) = path.split_first() else {
        return ancestor
            .as_record()
            .is_some_and(|record| record.same_node(node));
    };
    let Some(record) = ancestor.as_record() else {
        return false;
    };
    match record.field(head) {
        Value::List(items) => items.iter().any(|item| in_path(node, item, rest)),
        other => in_path(node, &other, rest),
    }
}
