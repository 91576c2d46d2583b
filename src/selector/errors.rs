use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SelectorError {
    #[error("unknown selector kind '{kind}'{}", did_you_mean(.suggestion))]
    UnknownSelectorKind {
        kind: String,
        suggestion: Option<String>,
    },

    #[error("'{kind}' selector is missing required field '{field}'")]
    MissingField { kind: String, field: &'static str },

    #[error("'{kind}' selector has an invalid '{field}': {message}")]
    InvalidField {
        kind: String,
        field: &'static str,
        message: String,
    },

    #[error("attribute selector '[{name}]' has an operator but no value")]
    MissingAttributeValue { name: String },

    #[error("invalid regular expression /{pattern}/: {message}")]
    InvalidRegex { pattern: String, message: String },

    #[error("invalid selector JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{s}'?)"),
        None => String::new(),
    }
}
