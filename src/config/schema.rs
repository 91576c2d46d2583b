use crate::tree::json::EstreeSchema;
use crate::tree::schema::Fallback;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Contents of an `astsel.toml` file.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct AstselConfig {
    #[serde(default)]
    pub schema: SchemaSection,
    #[serde(default)]
    pub output: OutputSection,
}

impl AstselConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        for (node_type, fields) in &self.schema.visitor_keys {
            if node_type.trim().is_empty() {
                issues.push(ValidationIssue::EmptyNodeType);
                continue;
            }
            let mut seen = HashSet::new();
            for field in fields {
                if field.trim().is_empty() {
                    issues.push(ValidationIssue::EmptyFieldName {
                        node_type: node_type.clone(),
                    });
                } else if !seen.insert(field.as_str()) {
                    issues.push(ValidationIssue::DuplicateField {
                        node_type: node_type.clone(),
                        field: field.clone(),
                    });
                }
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }

    /// The ESTree schema with this config's fallback and extra visitor keys.
    pub fn estree_schema(&self) -> EstreeSchema {
        EstreeSchema::new()
            .with_fallback(self.schema.fallback)
            .with_visitor_keys(self.schema.visitor_keys.clone())
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SchemaSection {
    #[serde(default)]
    pub fallback: Fallback,
    /// Node type -> child field names, merged over the ESTree defaults.
    #[serde(default)]
    pub visitor_keys: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputSection {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "default_color")]
    pub color: bool,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            color: default_color(),
        }
    }
}

fn default_color() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    EmptyNodeType,
    EmptyFieldName { node_type: String },
    DuplicateField { node_type: String, field: String },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyNodeType => {
                write!(f, "schema.visitor_keys contains an empty node type")
            }
            ValidationIssue::EmptyFieldName { node_type } => {
                write!(f, "visitor keys for '{node_type}' contain an empty field name")
            }
            ValidationIssue::DuplicateField { node_type, field } => {
                write!(f, "visitor keys for '{node_type}' list '{field}' more than once")
            }
        }
    }
}
