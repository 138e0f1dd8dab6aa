// src/error.rs

//! Error types for depsnap
//!
//! Every failure is fatal for the run. The variants exist so that callers
//! and tests can tell the causes apart without matching on message text.

use thiserror::Error;

/// Errors that can occur while building or submitting a snapshot
#[derive(Debug, Error)]
pub enum Error {
    /// A required configuration value is missing or malformed
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The lockfile could not be read
    #[error("I/O error: {0}")]
    IoError(String),

    /// The lockfile or payload could not be parsed or serialized
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Two packages claim the same dependency-reference key
    #[error("Ambiguous package identity for key '{key}': {existing} and {incoming}")]
    AmbiguousIdentity {
        key: String,
        existing: String,
        incoming: String,
    },

    /// A dependency reference does not name any package in the lockfile
    #[error("Unresolved dependency '{reference}' of {package}")]
    UnresolvedDependency { package: String, reference: String },

    /// Two manifests in one snapshot share a name
    #[error("Duplicate manifest name: {0}")]
    DuplicateManifest(String),

    /// The platform rejected the snapshot or could not be reached
    #[error("Dependency submission failed: {detail}")]
    SubmissionError {
        /// HTTP status, absent for transport-level failures
        status: Option<u16>,
        detail: String,
        /// The request body that was sent
        body: String,
    },
}

/// Result type for depsnap operations
pub type Result<T> = std::result::Result<T, Error>;
