//! RepositoryStore port
//!
//! Durable persistence of the repository registry. Implementations must
//! round-trip the whole snapshot; the registry serializes save/load with
//! its own mutation lock so a torn snapshot is never written.

use std::path::PathBuf;

use crate::domain::entities::Repository;

pub trait RepositoryStore: Send + Sync {
    fn load(&self) -> Result<Vec<Repository>, StoreError>;
    fn save(&self, repositories: &[Repository]) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("failed to access repository store: {message}")]
    AccessError { message: String },

    #[error("repository store corrupted: {}: {message}", .path.display())]
    Corrupted { path: PathBuf, message: String },
}
