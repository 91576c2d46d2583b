//! Integration tests for selectors over Rust source parsed with tree-sitter

use astsel::pool::with_parser;
use astsel::selector::{AttributeOperator, AttributeValue, Literal};
use astsel::ts::ParsedSource;
use astsel::{match_tree, Selector, SyntaxNode, TsNode, TsSchema, Value};

const SOURCE: &str = r#"struct Counter {
    value: u32,
}

impl Counter {
    fn new() -> Self {
        Counter { value: 0 }
    }

    fn bump(&mut self) {
        self.value += 1;
        log(self.value);
        log(0);
    }
}

fn log(v: u32) {
    println!("{}", v);
}

fn main() {
    let mut c = Counter::new();
    c.bump();
}
"#;

fn parse(source: &str) -> ParsedSource<'_> {
    let tree = with_parser(|parser| parser.parse(source)).unwrap().unwrap();
    ParsedSource { source, tree }
}

fn query<'t>(parsed: &'t ParsedSource<'_>, selector: &Selector) -> Vec<TsNode<'t>> {
    match_tree(&parsed.root(), Some(selector), &TsSchema::new()).unwrap()
}

fn fn_name(node: &TsNode<'_>) -> String {
    match node.field("name") {
        Value::Node(name) => name.text().to_string(),
        other => panic!("function without a name: {other:?}"),
    }
}

fn names(nodes: &[TsNode<'_>]) -> Vec<String> {
    nodes.iter().map(fn_name).collect()
}

#[test]
fn test_identifier_selects_node_kind() {
    let parsed = parse(SOURCE);
    let found = query(&parsed, &Selector::identifier("function_item"));
    assert_eq!(names(&found), ["new", "bump", "log", "main"]);
}

#[test]
fn test_child_selector_finds_methods() {
    let parsed = parse(SOURCE);
    let selector = Selector::child(
        Selector::identifier("declaration_list"),
        Selector::identifier("function_item"),
    );
    assert_eq!(names(&query(&parsed, &selector)), ["new", "bump"]);
}

#[test]
fn test_subject_reports_enclosing_function_per_call() {
    let parsed = parse(SOURCE);
    let selector = Selector::descendant(
        Selector::identifier("function_item").subject(),
        Selector::identifier("call_expression"),
    );
    assert_eq!(
        names(&query(&parsed, &selector)),
        ["bump", "bump", "main", "main"]
    );
}

#[test]
fn test_attribute_on_pseudo_fields() {
    let parsed = parse(SOURCE);

    let by_name = Selector::compound(vec![
        Selector::identifier("function_item"),
        Selector::attribute(
            "name.text",
            AttributeOperator::Eq,
            AttributeValue::Literal(Literal::String("main".into())),
        ),
    ]);
    let found = query(&parsed, &by_name);
    assert_eq!(names(&found), ["main"]);
    assert_eq!(found[0].inner().start_position().row, 20);

    let by_line = Selector::compound(vec![
        Selector::identifier("function_item"),
        Selector::attribute(
            "line",
            AttributeOperator::Ge,
            AttributeValue::Literal(Literal::Number(17.0)),
        ),
    ]);
    assert_eq!(names(&query(&parsed, &by_line)), ["log", "main"]);
}

#[test]
fn test_regexp_attribute_from_json() {
    let parsed = parse(SOURCE);
    let selector = Selector::from_json(
        r#"{
            "type": "compound",
            "selectors": [
                { "type": "identifier", "value": "function_item" },
                {
                    "type": "attribute",
                    "name": "name.text",
                    "operator": "=",
                    "value": { "type": "regexp", "value": "^b" }
                }
            ]
        }"#,
    )
    .unwrap();
    assert_eq!(names(&query(&parsed, &selector)), ["bump"]);
}

#[test]
fn test_nth_child_uses_named_children() {
    let parsed = parse(SOURCE);
    let selector = Selector::nth_child(1, Some(Selector::identifier("function_item")));
    assert_eq!(names(&query(&parsed, &selector)), ["new"]);

    let last = Selector::nth_last_child(1, Some(Selector::identifier("function_item")));
    let found = query(&parsed, &last);
    assert_eq!(names(&found), ["bump", "main"]);
}

#[test]
fn test_field_selector_matches_function_names() {
    let parsed = parse(SOURCE);
    let selector = Selector::compound(vec![
        Selector::identifier("identifier"),
        Selector::field("name"),
    ]);
    let found = query(&parsed, &selector);
    let texts: Vec<&str> = found.iter().map(|n| n.text()).collect();
    // the last one is the `name` of the `Counter::new` path
    assert_eq!(texts, ["new", "bump", "log", "main", "new"]);
}

#[test]
fn test_queries_survive_syntax_errors() {
    let source = "fn ok() {}\nfn broken( {\n";
    let parsed = parse(source);
    assert!(parsed.has_errors());

    let found = query(&parsed, &Selector::identifier("function_item"));
    assert!(found.iter().any(|n| n.text() == "fn ok() {}"));
}
