//! Error types for the rating and balancing engine
//!
//! Operations return the crate-wide `Result` alias backed by anyhow. The
//! classified reasons below are converted with `.into()` at the failure site,
//! so callers that need to present a specific reason can `downcast_ref` them.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Failures raised by the rating store and the balancers
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Both teams must have 5 players each")]
    IncompleteTeams,

    #[error("Individual appears more than once in the match: {name}")]
    DuplicateIndividual { name: String },

    #[error("Individual not found: {name}")]
    IndividualNotFound { name: String },

    #[error("Individual already exists: {name}")]
    NameConflict { name: String },

    #[error("Invalid individual record: {reason}")]
    InvalidRecord { reason: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}

/// Reasons a bulk roster import is rejected
///
/// The roster is left untouched whenever one of these is returned.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("file-not-selected")]
    FileNotSelected,

    #[error("unreadable-file: {path}: {message}")]
    Unreadable { path: String, message: String },

    #[error("parse-error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid-json-format: top-level value is not an object")]
    NotAnObject,

    #[error("invalid-json-format: record {key} is not an object")]
    RecordNotAnObject { key: String },

    #[error("invalid-json-format: record {key} is missing field {field}")]
    MissingField { key: String, field: &'static str },

    #[error("invalid-json-format: field {field} of record {key} has the wrong type")]
    TypeMismatch { key: String, field: &'static str },

    #[error("invalid-json-format: record {key} carries name {name}")]
    NameMismatch { key: String, name: String },
}
