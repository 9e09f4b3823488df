//! EndpointPublisher port
//!
//! Exposes or hides a repository's content at its publication URL. The
//! registry calls this on create, remove and every reconfiguration that
//! changes how the endpoint must behave; the HTTP machinery behind it is
//! an embedding-host concern.

use crate::domain::entities::Repository;

pub trait EndpointPublisher: Send + Sync {
    /// Publish the repository's content at `repository.url`. The record
    /// itself is the handler configuration (proxy target, mirror flag,
    /// security hints, pool size).
    fn publish(&self, repository: &Repository) -> Result<(), PublishError>;

    /// Stop serving the given publication URL.
    fn unpublish(&self, url: &str) -> Result<(), PublishError>;
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PublishError {
    #[error("failed to publish endpoint '{url}': {message}")]
    PublishFailed { url: String, message: String },

    #[error("failed to unpublish endpoint '{url}': {message}")]
    UnpublishFailed { url: String, message: String },
}
