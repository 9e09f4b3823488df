//! Engine configuration
//!
//! Settings that shape repository defaults: where storage trees live when a
//! location is not given, the context path published URLs hang off, and the
//! default handler pool size. Loadable from a TOML file; `Default` resolves
//! the storage root under the user's home directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::DepotResult;

/// Context path prefix used when a repository is created without a URL.
pub const DEFAULT_HTTP_CONTEXT: &str = "/depot";

/// Pool size assigned to repositories that do not specify one.
pub const DEFAULT_POOL_SIZE: u32 = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepotConfig {
    /// Root directory under which defaulted repository storage is created.
    pub base_storage: PathBuf,
    /// Context path prepended to defaulted publication URLs.
    pub http_context: String,
    /// Default handler pool size for new repositories.
    pub default_pool_size: u32,
}

impl Default for DepotConfig {
    fn default() -> Self {
        Self {
            base_storage: default_base_storage(),
            http_context: DEFAULT_HTTP_CONTEXT.to_string(),
            default_pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

impl DepotConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> DepotResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Path of the flat repository store file under the base storage root.
    pub fn store_path(&self) -> PathBuf {
        self.base_storage.join("repositories.db")
    }

    /// Default storage location for a repository with the given name.
    pub fn storage_for(&self, name: &str) -> PathBuf {
        self.base_storage.join(name)
    }

    /// Default publication URL for a repository with the given name.
    pub fn url_for(&self, name: &str) -> String {
        format!("{}/{}", self.http_context.trim_end_matches('/'), name)
    }
}

fn default_base_storage() -> PathBuf {
    // Allow override for testing (especially on Windows where dirs::home_dir
    // uses system API and cannot be overridden via environment variables)
    if let Ok(path) = std::env::var("DEPOT_STORAGE_PATH") {
        return PathBuf::from(path);
    }
    dirs::home_dir()
        .map(|h| h.join(".depot/storage"))
        .unwrap_or_else(|| PathBuf::from(".depot/storage"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_config(base: &Path) -> DepotConfig {
        DepotConfig {
            base_storage: base.to_path_buf(),
            ..DepotConfig::default()
        }
    }

    #[test]
    fn url_for_joins_context_and_name() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        assert_eq!(config.url_for("releases"), "/depot/releases");
    }

    #[test]
    fn url_for_tolerates_trailing_slash() {
        let dir = tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.http_context = "/artifacts/".to_string();
        assert_eq!(config.url_for("r"), "/artifacts/r");
    }

    #[test]
    fn storage_for_nests_under_base() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        assert_eq!(config.storage_for("r"), dir.path().join("r"));
    }

    #[test]
    fn load_reads_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("depot.toml");
        fs::write(
            &path,
            "base_storage = \"/srv/depot\"\nhttp_context = \"/repo\"\ndefault_pool_size = 4\n",
        )
        .unwrap();

        let config = DepotConfig::load(&path).unwrap();
        assert_eq!(config.base_storage, PathBuf::from("/srv/depot"));
        assert_eq!(config.http_context, "/repo");
        assert_eq!(config.default_pool_size, 4);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("depot.toml");
        fs::write(&path, "http_context = \"/repo\"\n").unwrap();

        let config = DepotConfig::load(&path).unwrap();
        assert_eq!(config.http_context, "/repo");
        assert_eq!(config.default_pool_size, DEFAULT_POOL_SIZE);
    }
}
