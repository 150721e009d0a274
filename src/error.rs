//! Structured error types for configuration resolution.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while locating, parsing, or resolving a configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No document exists at the explicit path or at any search location.
    #[error("config file not found (searched: {})", display_paths(.searched))]
    DocumentNotFound { searched: Vec<PathBuf> },

    /// The document exists but could not be read.
    #[error("failed to read config file {}: {source}", .path.display())]
    DocumentRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document was read but is not valid YAML.
    #[error("failed to parse config file {}: {source}", .path.display())]
    DocumentParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A model key was enumerated but its block no longer resolves to a mapping.
    #[error("model '{model}' has no configuration block")]
    ModelTreeMissing { model: String },

    /// The document was loaded but declares zero models.
    #[error("no model found in {}", display_source(.path))]
    NoModelsResolved { path: Option<PathBuf> },
}

impl ConfigError {
    /// Whether the failure happened while locating or parsing the document.
    ///
    /// Recoverable failures leave the resolution state "not found"; the caller
    /// decides whether to retry or abort.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ConfigError::DocumentNotFound { .. }
                | ConfigError::DocumentRead { .. }
                | ConfigError::DocumentParse { .. }
        )
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "none".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn display_source(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => p.display().to_string(),
        None => "<inline document>".to_string(),
    }
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
