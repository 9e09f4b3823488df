//! Local Artifact Transfer
//!
//! An `ArtifactTransfer` for sources reachable through the filesystem:
//! `file:` URLs, plain paths, and `mvn:` locators resolved against a local
//! source repository root. Remote resolvers (HTTP Maven repositories,
//! deploy targets) are an embedding-host concern and stay behind the port.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::ports::{ArtifactTransfer, TransferError};
use crate::domain::value_objects::{Coordinates, MVN_SCHEME};

pub struct LocalTransfer {
    /// Root of a local source repository used to resolve `mvn:` locators.
    local_repository: Option<PathBuf>,
}

impl LocalTransfer {
    pub fn new() -> Self {
        Self {
            local_repository: None,
        }
    }

    pub fn with_local_repository(path: PathBuf) -> Self {
        Self {
            local_repository: Some(path),
        }
    }

    fn resolve(&self, url: &str) -> Result<PathBuf, TransferError> {
        if let Some(rest) = url.strip_prefix(MVN_SCHEME) {
            let root = self
                .local_repository
                .as_ref()
                .ok_or_else(|| TransferError::UnsupportedScheme {
                    url: url.to_string(),
                })?;
            let coords =
                Coordinates::parse(&format!("{MVN_SCHEME}{rest}")).map_err(|e| {
                    TransferError::FetchFailed {
                        url: url.to_string(),
                        message: e.to_string(),
                    }
                })?;
            return Ok(root.join(coords.to_path()));
        }
        if let Some(path) = url.strip_prefix("file://") {
            return Ok(PathBuf::from(path));
        }
        if let Some(path) = url.strip_prefix("file:") {
            return Ok(PathBuf::from(path));
        }
        if url.contains("://") {
            return Err(TransferError::UnsupportedScheme {
                url: url.to_string(),
            });
        }
        Ok(PathBuf::from(url))
    }
}

impl Default for LocalTransfer {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtifactTransfer for LocalTransfer {
    fn fetch(&self, url: &str) -> Result<Box<dyn Read>, TransferError> {
        let path = self.resolve(url)?;
        debug!(url, path = %path.display(), "fetching artifact");
        let file = fs::File::open(&path).map_err(|e| TransferError::FetchFailed {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        Ok(Box::new(file))
    }

    fn install(
        &self,
        coordinates: &Coordinates,
        local_file: &Path,
        location: &Path,
    ) -> Result<(), TransferError> {
        let target = location.join(coordinates.to_path());
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(TransferError::InstallFailed)?;
        }
        fs::copy(local_file, &target).map_err(TransferError::InstallFailed)?;
        debug!(target = %target.display(), "installed artifact");
        Ok(())
    }

    fn deploy(
        &self,
        coordinates: &Coordinates,
        local_file: &Path,
        remote_url: &str,
    ) -> Result<(), TransferError> {
        // A "remote" URL this transfer can deploy to is another local tree.
        let root = self.resolve(remote_url)?;
        self.install(coordinates, local_file, &root)
            .map_err(|e| TransferError::DeployFailed {
                url: remote_url.to_string(),
                message: e.to_string(),
            })
    }
}
