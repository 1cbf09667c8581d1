//! Error handling for Narrative
//!
//! Every failure is caught at the triggering operation and reported to the
//! user; nothing here is fatal to the process.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for Narrative operations
pub type Result<T> = std::result::Result<T, NarrativeError>;

/// Main error type for Narrative operations
#[derive(Error, Debug)]
pub enum NarrativeError {
    // Input Errors
    #[error("Invalid {what} name '{name}': {reason}")]
    InvalidInput {
        what: &'static str,
        name: String,
        reason: &'static str,
    },

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    // Store Errors
    #[error("A {what} named '{name}' already exists")]
    AlreadyExists { what: &'static str, name: String },

    #[error("{what} not found: {path}")]
    NotFound { what: &'static str, path: PathBuf },

    #[error("Malformed resource file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to {op} {path}: {source}")]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Session Errors
    #[error("No project is open")]
    NoActiveProject,

    #[error("No resource is selected to update")]
    NothingStaged,

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl NarrativeError {
    /// Wrap an I/O error with the operation and path it came from.
    pub fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        NarrativeError::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            NarrativeError::InvalidInput { .. } => "INVALID_INPUT",
            NarrativeError::UnknownCategory(_) => "UNKNOWN_CATEGORY",
            NarrativeError::AlreadyExists { .. } => "ALREADY_EXISTS",
            NarrativeError::NotFound { .. } => "NOT_FOUND",
            NarrativeError::Parse { .. } => "PARSE_ERROR",
            NarrativeError::Io { .. } => "IO_ERROR",
            NarrativeError::NoActiveProject => "NO_ACTIVE_PROJECT",
            NarrativeError::NothingStaged => "NOTHING_STAGED",
            NarrativeError::Clipboard(_) => "CLIPBOARD_ERROR",
            NarrativeError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// True when the user can fix the problem by changing their input.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            NarrativeError::InvalidInput { .. }
                | NarrativeError::UnknownCategory(_)
                | NarrativeError::AlreadyExists { .. }
                | NarrativeError::NotFound { .. }
                | NarrativeError::NoActiveProject
                | NarrativeError::NothingStaged
        )
    }

    /// Returns a user-friendly recovery suggestion.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            NarrativeError::InvalidInput { .. } => {
                Some("Names must be non-empty and may not contain path separators or < > : \" | ? *.")
            }
            NarrativeError::UnknownCategory(_) => {
                Some("Categories are: characters, locations, props, clothing.")
            }
            NarrativeError::AlreadyExists { .. } => Some("Pick a different name."),
            NarrativeError::NotFound { .. } => {
                Some("The item may have been renamed or deleted; refresh the listing.")
            }
            NarrativeError::Parse { .. } => {
                Some("The resource file is not valid JSON; fix or delete it by hand.")
            }
            NarrativeError::NoActiveProject => Some("Open a project first."),
            NarrativeError::NothingStaged => Some("Select a resource into the preview first."),
            _ => None,
        }
    }
}
