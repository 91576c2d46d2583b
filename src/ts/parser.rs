use crate::ts::errors::TreeSitterError;
use crate::ts::node::TsNode;
use ast_grep_language::{LanguageExt, SupportLang};
use std::fs;
use std::path::Path;
use tree_sitter::{Parser, Tree};

/// Tree-sitter parser wrapper for Rust source code.
pub struct RustParser {
    parser: Parser,
}

impl RustParser {
    pub fn new() -> Result<Self, TreeSitterError> {
        let mut parser = Parser::new();
        // Get the tree-sitter Language from ast-grep-language
        let ts_lang = SupportLang::Rust.get_ts_language();
        parser
            .set_language(&ts_lang)
            .map_err(|_| TreeSitterError::LanguageSet)?;

        Ok(Self { parser })
    }

    /// Parse source code into a tree-sitter Tree.
    pub fn parse(&mut self, source: &str) -> Result<Tree, TreeSitterError> {
        self.parser
            .parse(source, None)
            .ok_or(TreeSitterError::ParseFailed)
    }

    /// Parse source code and keep the source alongside the tree.
    pub fn parse_with_source<'a>(
        &mut self,
        source: &'a str,
    ) -> Result<ParsedSource<'a>, TreeSitterError> {
        let tree = self.parse(source)?;
        Ok(ParsedSource { source, tree })
    }
}

/// Read a Rust source file for parsing.
pub fn read_source(path: impl AsRef<Path>) -> Result<String, TreeSitterError> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|source| TreeSitterError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// A parsed source file with its tree-sitter tree.
pub struct ParsedSource<'a> {
    pub source: &'a str,
    pub tree: Tree,
}

impl<'a> ParsedSource<'a> {
    /// The root of the tree as a queryable syntax node.
    pub fn root(&self) -> TsNode<'_> {
        TsNode::new(self.tree.root_node(), self.source)
    }

    /// Check if the tree contains any ERROR or MISSING nodes.
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Number of ERROR and MISSING nodes in the tree.
    pub fn error_count(&self) -> usize {
        count_error_nodes(self.tree.root_node())
    }
}

fn count_error_nodes(node: tree_sitter::Node<'_>) -> usize {
    let own = usize::from(node.is_error() || node.is_missing());
    if !node.has_error() {
        return own;
    }

    let mut cursor = node.walk();
    let nested: usize = node
        .children(&mut cursor)
        .map(count_error_nodes)
        .sum();
    own + nested
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::node::SyntaxNode;

    #[test]
    fn parse_valid_rust() {
        let mut parser = RustParser::new().unwrap();
        let source = "fn main() { println!(\"hello\"); }";
        let parsed = parser.parse_with_source(source).unwrap();

        assert!(!parsed.has_errors());
        assert_eq!(parsed.error_count(), 0);
        assert_eq!(parsed.root().kind(), "source_file");
    }

    #[test]
    fn read_source_reports_missing_files() {
        let err = read_source("/nonexistent/astsel/lib.rs").unwrap_err();
        assert!(matches!(err, TreeSitterError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/astsel/lib.rs"));
    }

    #[test]
    fn parse_invalid_rust() {
        let mut parser = RustParser::new().unwrap();
        let source = "fn main( { }";
        let parsed = parser.parse_with_source(source).unwrap();

        assert!(parsed.has_errors());
        assert!(parsed.error_count() > 0);
    }
}
