//! Error types for bibsync-core

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for sync operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Main error type for a sync run
///
/// Every variant is fatal: the run stops and the snapshot is left untouched.
/// Remote transport failures are not represented here, they are logged and
/// counted per entry instead.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Missing or invalid startup configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Bibliography file could not be read
    #[error("Bibliography error: {0}")]
    Bibliography(#[from] BibliographyError),

    /// Snapshot file could not be read or written
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// A record failed field validation before being sent
    #[error("Validation error for '{reference_id}': {source}")]
    Validation {
        reference_id: String,
        #[source]
        source: ValidationError,
    },
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is unset or empty
    #[error("Missing required environment variable {0}")]
    MissingVar(&'static str),
}

/// Bibliography loading errors
#[derive(Error, Debug)]
pub enum BibliographyError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Snapshot persistence errors
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Snapshot I/O on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot encoding: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("Unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Duplicate identifier in snapshot: {0}")]
    DuplicateIdentifier(String),
}

/// Field validation errors raised before any remote write
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("The '{0}' field cannot be empty")]
    EmptyField(&'static str),

    #[error("Unsupported entry type '{0}'")]
    UnsupportedEntryType(String),
}

/// Outcome of a failed remote lookup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The query succeeded but matched no page
    #[error("No page found")]
    NotFound,

    /// Network failure or non-success HTTP status
    #[error("Transport error: {0}")]
    Transport(String),

    /// Body was not JSON or lacked the expected keys
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Errors from remote create/update operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The pre-create existence check failed for a reason other than NotFound
    #[error("Existence check failed: {0}")]
    Lookup(LookupError),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl RemoteError {
    /// Whether this error must abort the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(self, RemoteError::Validation(_))
    }
}
