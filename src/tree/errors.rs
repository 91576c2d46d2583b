use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("unknown node type '{kind}' (no child-field schema entry)")]
    UnknownNodeType { kind: String },

    #[error("document root is not a syntax node (expected an object with a \"type\" field)")]
    NotANode,

    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
