//! Thread-local parser pooling.
//!
//! Querying a directory of Rust files parses each of them; a parser is
//! created on first use per thread and reused for every later file.

use crate::ts::{RustParser, TreeSitterError};
use std::cell::RefCell;

thread_local! {
    static RUST_PARSER: RefCell<Option<RustParser>> = const { RefCell::new(None) };
}

/// Execute function with pooled parser instance.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use astsel::pool::with_parser;
///
/// let has_errors = with_parser(|parser| {
///     parser
///         .parse_with_source("fn main() {}")
///         .map(|parsed| parsed.has_errors())
/// })??;
/// # Ok(())
/// # }
/// ```
pub fn with_parser<F, R>(f: F) -> Result<R, TreeSitterError>
where
    F: FnOnce(&mut RustParser) -> R,
{
    RUST_PARSER.with(|cell| {
        let mut slot = cell.borrow_mut();
        let parser = match slot.take() {
            Some(parser) => parser,
            None => RustParser::new()?,
        };
        Ok(f(slot.insert(parser)))
    })
}
