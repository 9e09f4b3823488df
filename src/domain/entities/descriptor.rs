//! Bundle descriptor entities
//!
//! The per-repository descriptor document: an append-only list of indexed
//! artifacts keyed by their repository-relative URI, plus an `increment`
//! marker advanced whenever new entries are merged in. Pure data structure;
//! reading archives and writing the document are the indexer's job.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Capability attribute holding the entry's repository-relative URI.
pub const CONTENT_ATTRIBUTE: &str = "content";

/// Normalize a repository-relative path for descriptor storage (always
/// forward slashes).
pub(crate) fn normalize_uri(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// One indexed artifact inside a repository's descriptor document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleEntry {
    /// Bundle symbolic name (identity, with `version`)
    pub symbolic_name: String,
    /// Bundle version (identity, with `symbolic_name`)
    pub version: String,
    /// URI relative to the owning repository location
    pub uri: String,
    /// Hex-encoded SHA-256 digest; present only after a full read
    pub digest: Option<String>,
    /// Byte size; present only after a full read
    pub size: Option<u64>,
    /// MIME type; present only after a full read
    pub mime_type: Option<String>,
    /// Capability records: arbitrary key/value attributes
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl BundleEntry {
    pub fn new(
        symbolic_name: impl Into<String>,
        version: impl Into<String>,
        uri: impl Into<String>,
    ) -> Self {
        let uri = uri.into();
        let mut attributes = BTreeMap::new();
        attributes.insert(CONTENT_ATTRIBUTE.to_string(), uri.clone());
        Self {
            symbolic_name: symbolic_name.into(),
            version: version.into(),
            uri,
            digest: None,
            size: None,
            mime_type: None,
            attributes,
        }
    }

    /// Stable identity derived from the structural metadata.
    pub fn identity(&self) -> String {
        format!("{}/{}", self.symbolic_name, self.version)
    }
}

/// The descriptor document for one repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleDescriptor {
    /// Last-modified marker, epoch milliseconds; advanced on every
    /// successful merge that appended at least one entry.
    pub increment: i64,
    #[serde(default)]
    pub resources: Vec<BundleEntry>,
}

impl BundleDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge new entries into the document by URI.
    ///
    /// Entries whose URI is already present are dropped, never overwritten.
    /// Returns the number of entries appended; the increment is bumped only
    /// when that number is non-zero.
    pub fn merge(&mut self, entries: Vec<BundleEntry>) -> usize {
        let known: HashSet<String> = self.resources.iter().map(|e| e.uri.clone()).collect();
        let mut appended = 0;
        for entry in entries {
            if known.contains(&entry.uri) {
                continue;
            }
            self.resources.push(entry);
            appended += 1;
        }
        if appended > 0 {
            self.increment = Utc::now().timestamp_millis();
        }
        appended
    }

    /// Whether an entry with the given URI is already indexed.
    pub fn contains_uri(&self, uri: &str) -> bool {
        self.resources.iter().any(|e| e.uri == uri)
    }
}
