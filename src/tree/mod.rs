//! Dialect-agnostic syntax tree abstraction.
//!
//! The matching engine never looks at a concrete tree type. It only sees
//! nodes through [`SyntaxNode`] (a type tag plus typed field access), learns
//! which fields hold children from a [`ChildSchema`], and walks whole trees
//! with [`traverse`].

pub mod errors;
pub mod json;
pub mod node;
pub mod schema;
pub mod traverse;
pub mod value;

pub use errors::TreeError;
pub use json::{EstreeSchema, JsonNode};
pub use node::SyntaxNode;
pub use schema::{ChildSchema, Fallback};
pub use traverse::{traverse, Visitor};
pub use value::{Primitive, Value};
