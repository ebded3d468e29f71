use std::path::PathBuf;
use thiserror::Error;

/// Violations of the comparator's input contract.
///
/// These are defects in an ingestion collaborator, not compliance findings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContractError {
    #[error("endpoint '{endpoint}' references schema '{schema}' which is not defined in its collection")]
    UnresolvedSchema { endpoint: String, schema: String },

    #[error("schema '{name}' is defined more than once")]
    DuplicateSchema { name: String },

    #[error("schema '{schema}': required_fields and field '{field}' disagree")]
    InconsistentRequiredFields { schema: String, field: String },
}

/// Failures while turning a document or source tree into the canonical model
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("document is neither JSON nor YAML: json error: {json}; yaml error: {yaml}")]
    UnsupportedFormat { json: String, yaml: String },

    #[error("unresolved reference '{reference}'")]
    UnresolvedReference { reference: String },

    #[error("failed to parse Python file {file}: {message}")]
    Python { file: String, message: String },

    #[error(transparent)]
    Contract(#[from] ContractError),
}

/// Invalid project configuration
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    #[error("{field} does not exist: {path}")]
    MissingPath { field: &'static str, path: String },

    #[error("unknown value '{value}' for {field}; expected one of: {expected}")]
    UnknownValue {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}
