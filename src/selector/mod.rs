//! Selector ASTs: the typed query language the engine evaluates.
//!
//! Selectors arrive either built in code through the constructors on
//! [`Selector`] or as JSON produced by a selector parser (see [`load`]).

pub mod ast;
pub mod errors;
pub mod load;
pub mod subjects;

pub use ast::{AttributeOperator, AttributeValue, Literal, Pattern, Selector, SelectorKind};
pub use errors::SelectorError;
pub use subjects::subjects;
