//! Repository entity
//!
//! One managed storage area: a named, filesystem-backed location published
//! at a URL, optionally proxying an upstream, optionally carrying a
//! maintenance schedule. The name is immutable once created; everything
//! else is mutated in place by registry reconfiguration operations.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Pool size assigned when none is given
pub const DEFAULT_POOL_SIZE: u32 = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    name: String,
    pub location: PathBuf,
    pub url: String,
    pub proxy: Option<String>,
    pub mirror: bool,
    pub realm: Option<String>,
    pub download_role: Option<String>,
    pub upload_role: Option<String>,
    pub scheduling: Option<String>,
    pub scheduling_action: Option<String>,
    pub pool_size: u32,
}

impl Repository {
    pub fn new(name: impl Into<String>, location: impl Into<PathBuf>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            url: url.into(),
            proxy: None,
            mirror: false,
            realm: None,
            download_role: None,
            upload_role: None,
            scheduling: None,
            scheduling_action: None,
            pool_size: DEFAULT_POOL_SIZE,
        }
    }

    /// The unique, immutable repository name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Stable scheduler job id for this repository.
    pub fn job_id(&self) -> String {
        format!("depot-maintenance-{}", self.name)
    }
}
