//! Bundle manifest extraction
//!
//! Opens an artifact as a zip archive and reads the `META-INF/MANIFEST.MF`
//! main section. Header lines fold with a leading-space continuation; only
//! the main section (up to the first blank line) carries bundle metadata.

use std::collections::BTreeMap;
use std::fs;
use std::io::{BufReader, Read};
use std::path::Path;

use zip::result::ZipError;
use zip::ZipArchive;

/// Archive entry holding the bundle metadata.
pub const MANIFEST_ENTRY: &str = "META-INF/MANIFEST.MF";

/// Header naming the bundle.
pub const BUNDLE_SYMBOLIC_NAME: &str = "Bundle-SymbolicName";

/// Header carrying the bundle version.
pub const BUNDLE_VERSION: &str = "Bundle-Version";

/// Version assumed when a bundle manifest omits `Bundle-Version`.
pub const DEFAULT_BUNDLE_VERSION: &str = "0.0.0";

/// Parsed main-section manifest headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleManifest {
    headers: BTreeMap<String, String>,
}

impl BundleManifest {
    /// Raw header value, if present.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// `Bundle-SymbolicName` with any `;`-separated directives stripped.
    pub fn symbolic_name(&self) -> Option<&str> {
        self.header(BUNDLE_SYMBOLIC_NAME)
            .map(|v| v.split(';').next().unwrap_or(v).trim())
            .filter(|v| !v.is_empty())
    }

    /// `Bundle-Version`, or the default when absent.
    pub fn version(&self) -> &str {
        self.header(BUNDLE_VERSION).unwrap_or(DEFAULT_BUNDLE_VERSION)
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }
}

/// Read the bundle manifest out of an archive file.
///
/// `Ok(None)` means the file is not a bundle archive: not a zip at all, or
/// a zip without a manifest entry. IO failures propagate.
pub fn read_bundle_manifest(path: &Path) -> std::io::Result<Option<BundleManifest>> {
    let file = fs::File::open(path)?;
    let mut archive = match ZipArchive::new(BufReader::new(file)) {
        Ok(archive) => archive,
        Err(ZipError::Io(e)) => return Err(e),
        Err(_) => return Ok(None),
    };

    let mut entry = match archive.by_name(MANIFEST_ENTRY) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(ZipError::Io(e)) => return Err(e),
        Err(_) => return Ok(None),
    };

    let mut raw = String::new();
    if entry.read_to_string(&mut raw).is_err() {
        // Manifest entries are text; anything else is not a bundle.
        return Ok(None);
    }
    Ok(Some(parse_manifest(&raw)))
}

/// Parse manifest text into its main-section headers.
pub fn parse_manifest(raw: &str) -> BundleManifest {
    let mut headers = BTreeMap::new();
    let mut current: Option<(String, String)> = None;

    for line in raw.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            // Main section ends at the first blank line.
            break;
        }
        if let Some(rest) = line.strip_prefix(' ') {
            if let Some((_, value)) = current.as_mut() {
                value.push_str(rest);
            }
            continue;
        }
        if let Some((name, value)) = current.take() {
            headers.insert(name, value);
        }
        if let Some((name, value)) = line.split_once(':') {
            current = Some((name.trim().to_string(), value.trim_start().to_string()));
        }
    }
    if let Some((name, value)) = current {
        headers.insert(name, value);
    }

    BundleManifest { headers }
}
