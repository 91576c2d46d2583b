use crate::config::schema::{AstselConfig, ValidationError};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up by [`discover`].
pub const CONFIG_FILE_NAME: &str = "astsel.toml";

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Toml {
        path: Option<PathBuf>,
        source: toml_edit::de::Error,
    },
    Validation {
        path: Option<PathBuf>,
        source: ValidationError,
    },
}

impl ConfigError {
    fn with_path(self, path: &Path) -> Self {
        let path = path.to_path_buf();
        match self {
            ConfigError::Io { .. } => self,
            ConfigError::Toml { path: None, source } => ConfigError::Toml {
                path: Some(path),
                source,
            },
            ConfigError::Validation { path: None, source } => ConfigError::Validation {
                path: Some(path),
                source,
            },
            other => other,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read astsel config {}: {}", path.display(), source)
            }
            ConfigError::Toml { path, source } => match path {
                Some(path) => write!(
                    f,
                    "{} is not valid TOML: {}",
                    path.display(),
                    source
                ),
                None => write!(f, "config is not valid TOML: {}", source),
            },
            ConfigError::Validation { path, source } => match path {
                Some(path) => write!(f, "invalid astsel config {}:\n{}", path.display(), source),
                None => write!(f, "invalid astsel config:\n{}", source),
            },
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Toml { source, .. } => Some(source),
            ConfigError::Validation { source, .. } => Some(source),
        }
    }
}

pub fn load_from_str(input: &str) -> Result<AstselConfig, ConfigError> {
    let config: AstselConfig = toml_edit::de::from_str(input)
        .map_err(|source| ConfigError::Toml { path: None, source })?;
    config
        .validate()
        .map_err(|source| ConfigError::Validation { path: None, source })?;
    Ok(config)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<AstselConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents).map_err(|error| error.with_path(path))
}

/// Find the nearest `astsel.toml` in `start` or any of its ancestors.
pub fn discover(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

/// Load the nearest `astsel.toml` above `start`, or the defaults when there
/// is none. Returns the path the config came from, if any.
pub fn load_nearest(start: &Path) -> Result<(AstselConfig, Option<PathBuf>), ConfigError> {
    match discover(start) {
        Some(path) => {
            log::debug!("loading config from {}", path.display());
            let config = load_from_path(&path)?;
            Ok((config, Some(path)))
        }
        None => Ok((AstselConfig::default(), None)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::ValidationIssue;

    #[test]
    fn toml_errors_mention_the_file() {
        let err = load_from_str("[output]\nformat = 3\n")
            .unwrap_err()
            .with_path(Path::new("conf/astsel.toml"));
        assert!(err.to_string().starts_with("conf/astsel.toml is not valid TOML"));
    }

    #[test]
    fn validation_lists_issues_one_per_line() {
        let err = load_from_str("[schema.visitor_keys]\n\"\" = []\nFoo = [\"\"]\n").unwrap_err();
        match &err {
            ConfigError::Validation { source, .. } => {
                assert_eq!(source.issues.len(), 2);
                assert_eq!(source.issues[0], ValidationIssue::EmptyNodeType);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(err.to_string().lines().count(), 3);
    }

    #[test]
    fn load_nearest_reports_source_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let nested = dir.path().join("src");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[output]\nformat = \"json\"\n").unwrap();

        let (config, path) = load_nearest(&nested).unwrap();
        assert_eq!(path, Some(dir.path().join(CONFIG_FILE_NAME)));
        assert_eq!(config.output.format, crate::config::OutputFormat::Json);
    }
}
