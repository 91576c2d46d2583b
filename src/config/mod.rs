pub mod loader;
pub mod schema;

pub use loader::{
    discover, load_from_path, load_from_str, load_nearest, ConfigError, CONFIG_FILE_NAME,
};
pub use schema::{
    AstselConfig, OutputFormat, OutputSection, SchemaSection, ValidationError, ValidationIssue,
};
