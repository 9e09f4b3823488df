//! Bundle Descriptor Indexer
//!
//! Walks a repository's storage tree, extracts structural metadata from
//! each artifact archive, and merges the results into the persisted
//! descriptor document at the repository location. Per-file failures are
//! skipped with a warning so one bad artifact never poisons a scan; a
//! failure to walk the tree itself aborts the update.

pub mod manifest;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::domain::entities::descriptor::normalize_uri;
use crate::domain::entities::{BundleDescriptor, BundleEntry};
use crate::domain::value_objects::ContentHash;
use crate::error::DepotResult;

/// MIME type attached to fully-read bundle entries.
pub const BUNDLE_MIME_TYPE: &str = "application/vnd.osgi.bundle";

/// Name of the descriptor document inside a repository location.
pub const DESCRIPTOR_FILE: &str = "repository.json";

/// File name suffixes that are never artifact candidates.
const SKIP_SUFFIXES: &[&str] = &[
    ".sha1",
    ".pom",
    ".xml",
    ".repositories",
    ".properties",
    ".lastUpdated",
];

/// Manifest headers carried over as capability attributes.
const CAPABILITY_HEADERS: &[&str] = &["Bundle-Name", "Bundle-Version", "Export-Package"];

/// Why a candidate file was skipped rather than indexed.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The file is not an artifact archive with bundle metadata
    #[error("not a bundle artifact")]
    NotABundle,

    /// The file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Recursively collect artifact candidates under a repository location.
///
/// Symlinks are never followed. Files matching the non-artifact suffix set
/// and the descriptor document itself are skipped. Walk errors are fatal.
pub fn scan(location: &Path) -> DepotResult<Vec<PathBuf>> {
    let mut candidates = Vec::new();
    scan_inner(location, &mut candidates)?;
    candidates.sort();
    Ok(candidates)
}

fn scan_inner(dir: &Path, candidates: &mut Vec<PathBuf>) -> DepotResult<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        if file_type.is_symlink() {
            debug!(path = %entry.path().display(), "skipping symlink during scan");
            continue;
        }
        if file_type.is_dir() {
            scan_inner(&entry.path(), candidates)?;
            continue;
        }
        if is_candidate(&entry.file_name().to_string_lossy()) {
            candidates.push(entry.path());
        }
    }
    Ok(())
}

fn is_candidate(file_name: &str) -> bool {
    if file_name == DESCRIPTOR_FILE {
        return false;
    }
    !SKIP_SUFFIXES.iter().any(|suffix| file_name.ends_with(suffix))
}

/// Build a descriptor entry for one artifact file.
///
/// The entry URI is the file path relative to `location`; when the file
/// lies outside the location the absolute path is kept as-is. With
/// `with_digest` the artifact is re-read in a streaming pass to attach the
/// SHA-256 digest, byte size and MIME type.
pub fn build_entry(
    file: &Path,
    location: &Path,
    with_digest: bool,
) -> Result<BundleEntry, IndexError> {
    let manifest = manifest::read_bundle_manifest(file)?.ok_or(IndexError::NotABundle)?;
    let symbolic_name = manifest.symbolic_name().ok_or(IndexError::NotABundle)?;

    let uri = relativize(file, location);
    let mut entry = BundleEntry::new(symbolic_name, manifest.version(), uri);
    for header in CAPABILITY_HEADERS {
        if let Some(value) = manifest.header(header) {
            entry
                .attributes
                .insert(header.to_string(), value.to_string());
        }
    }

    if with_digest {
        let (hash, size) = ContentHash::from_reader(fs::File::open(file)?)?;
        entry.digest = Some(hash.hex().to_string());
        entry.size = Some(size);
        entry.mime_type = Some(BUNDLE_MIME_TYPE.to_string());
    }

    Ok(entry)
}

fn relativize(file: &Path, location: &Path) -> String {
    match file.strip_prefix(location) {
        Ok(relative) => normalize_uri(relative),
        Err(_) => normalize_uri(file),
    }
}

/// Load the descriptor document stored at a repository location.
///
/// A missing document is an empty one.
pub fn load_descriptor(location: &Path) -> DepotResult<BundleDescriptor> {
    let path = location.join(DESCRIPTOR_FILE);
    if !path.exists() {
        return Ok(BundleDescriptor::new());
    }
    let content = fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Scan a repository location and merge the results into its descriptor
/// document, rewriting the document wholesale.
///
/// Returns the updated document. Already-indexed URIs are left untouched;
/// the increment only advances when new entries were appended.
pub fn update_descriptor(location: &Path, with_digest: bool) -> DepotResult<BundleDescriptor> {
    let candidates = scan(location)?;
    let mut document = load_descriptor(location)?;

    let mut entries = Vec::new();
    for candidate in &candidates {
        // Merging is by URI; skip the archive work for files already indexed.
        if document.contains_uri(&relativize(candidate, location)) {
            continue;
        }
        match build_entry(candidate, location, with_digest) {
            Ok(entry) => entries.push(entry),
            Err(IndexError::NotABundle) => {
                debug!(file = %candidate.display(), "not a bundle artifact, skipping");
            }
            Err(e) => {
                warn!(file = %candidate.display(), error = %e, "indexing failed, skipping");
            }
        }
    }

    let appended = document.merge(entries);
    debug!(
        location = %location.display(),
        candidates = candidates.len(),
        appended,
        "descriptor updated"
    );

    let serialized = serde_json::to_string_pretty(&document)?;
    fs::write(location.join(DESCRIPTOR_FILE), serialized)?;
    Ok(document)
}
