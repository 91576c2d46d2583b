use crate::selector::errors::SelectorError;
use crate::tree::errors::TreeError;
use thiserror::Error;

/// Failure of a whole query: either the selector could not be ingested or
/// the tree could not be walked.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error(transparent)]
    Selector(#[from] SelectorError),

    #[error(transparent)]
    Tree(#[from] TreeError),
}
