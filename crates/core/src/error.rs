//! Error types shared by the core adapters.

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No document exists with the given id.
    #[error("document {0} not found")]
    NotFound(String),
    /// Reading or writing a collection file failed.
    #[error("failed to access {path}: {source}")]
    Io {
        /// Collection file involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A collection file could not be encoded or decoded.
    #[error("invalid collection data in {path}: {source}")]
    Serialization {
        /// Collection file involved.
        path: PathBuf,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },
    /// The directory watcher could not be installed.
    #[error("failed to watch store directory: {0}")]
    Watch(#[from] notify::Error),
}

/// Failures raised while fetching or decoding a remote feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Transport-level failure, including non-success status codes.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The payload is not in the expected format.
    #[error("malformed feed: {0}")]
    Malformed(String),
}

/// Authentication failures.
///
/// Every rejection collapses into a single variant so callers cannot tell a
/// wrong password from an unknown account.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Credentials were rejected.
    #[error("You are NOT an admin.")]
    NotAdmin,
}

/// Game form state machine violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    /// A submission is already in flight.
    #[error("a submission is already in progress")]
    AlreadySubmitting,
    /// `finish_submit` was called without a pending submission.
    #[error("no submission is in progress")]
    NotSubmitting,
    /// The edit form has no pending changes.
    #[error("nothing to save")]
    Unchanged,
}

/// Configuration problems detected after loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required value is empty.
    #[error("missing required setting: {0}")]
    MissingField(&'static str),
    /// The value is present but unusable.
    #[error("invalid setting {field}: {reason}")]
    Invalid {
        /// Setting name.
        field: &'static str,
        /// Human readable reason.
        reason: String,
    },
}
