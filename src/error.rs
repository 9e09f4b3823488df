//! Error types for depot
//!
//! Uses `thiserror` for library errors. Validation failures (`NotFound`,
//! `AlreadyExists`, `InvalidLocator`, `InvalidSchedule`) abort the requested
//! operation; per-file failures inside walks are recovered where they occur
//! and never surface through this type.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ports::{PublishError, SchedulerError, StoreError, TransferError};

/// Result type alias for depot operations
pub type DepotResult<T> = Result<T, DepotError>;

/// Main error type for depot operations
#[derive(Error, Debug)]
pub enum DepotError {
    /// Named repository (or copy destination) does not exist
    #[error("repository not found: {name}")]
    NotFound { name: String },

    /// Create with a name that is already registered
    #[error("repository already exists: {name}")]
    AlreadyExists { name: String },

    /// Malformed artifact locator or coordinate set
    #[error("invalid artifact locator '{locator}': {reason}")]
    InvalidLocator { locator: String, reason: String },

    /// Repository settings that violate a structural invariant
    #[error("invalid repository configuration: {reason}")]
    InvalidRepository { reason: String },

    /// Malformed scheduling specification
    #[error("invalid scheduling spec '{spec}': {reason}")]
    InvalidSchedule { spec: String, reason: String },

    /// Storage tree could not be moved, neither atomically nor by copy
    #[error("cannot relocate storage from {} to {}: {message}", .from.display(), .to.display())]
    RelocationFailed {
        from: PathBuf,
        to: PathBuf,
        message: String,
    },

    /// Caller-supplied path escapes the repository storage location
    #[error("path '{}' escapes the repository storage location", .path.display())]
    PathEscape { path: PathBuf },

    /// Artifact fetch/install failure from the transfer collaborator
    #[error("artifact transfer failed: {0}")]
    Transfer(#[from] TransferError),

    /// Repository store load/save failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Endpoint publication failure
    #[error(transparent)]
    Publish(#[from] PublishError),

    /// Scheduler registration failure
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    /// Descriptor document (de)serialization error
    #[error("descriptor document error: {0}")]
    Descriptor(#[from] serde_json::Error),

    /// Configuration file parsing error
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_not_found() {
        let err = DepotError::NotFound {
            name: "releases".to_string(),
        };
        assert_eq!(err.to_string(), "repository not found: releases");
    }

    #[test]
    fn display_invalid_locator() {
        let err = DepotError::InvalidLocator {
            locator: "mvn:broken".to_string(),
            reason: "expected at least group/artifact/version".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid artifact locator 'mvn:broken': expected at least group/artifact/version"
        );
    }
}
