//! ArtifactTransfer port
//!
//! Fetches artifact bytes from a URL and installs local files into a
//! repository's storage under their coordinate-derived path. Resolver
//! libraries (remote Maven repositories, deploy targets) sit behind this
//! boundary.

use std::io::Read;
use std::path::Path;

use crate::domain::value_objects::Coordinates;

pub trait ArtifactTransfer: Send + Sync {
    /// Open a byte stream for the artifact at `url`.
    fn fetch(&self, url: &str) -> Result<Box<dyn Read>, TransferError>;

    /// Install a local file into `location` under the coordinate path.
    fn install(
        &self,
        coordinates: &Coordinates,
        local_file: &Path,
        location: &Path,
    ) -> Result<(), TransferError>;

    /// Deploy a local file to a remote repository URL.
    fn deploy(
        &self,
        coordinates: &Coordinates,
        local_file: &Path,
        remote_url: &str,
    ) -> Result<(), TransferError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("failed to fetch '{url}': {message}")]
    FetchFailed { url: String, message: String },

    #[error("unsupported URL scheme in '{url}'")]
    UnsupportedScheme { url: String },

    #[error("failed to install artifact: {0}")]
    InstallFailed(#[source] std::io::Error),

    #[error("failed to deploy artifact to '{url}': {message}")]
    DeployFailed { url: String, message: String },
}
