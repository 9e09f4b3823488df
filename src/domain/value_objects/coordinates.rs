//! Maven Coordinate Value Object
//!
//! Parses `mvn:`-style artifact locators and maps coordinate tuples to the
//! canonical relative storage path. `parse` and `to_locator` are inverse on
//! well-formed coordinate sets.

use std::fmt;

use crate::error::{DepotError, DepotResult};

/// Locator scheme prefix
pub const MVN_SCHEME: &str = "mvn:";

/// Extension used when a locator omits the optional type segment
pub const DEFAULT_EXTENSION: &str = "jar";

/// A full Maven coordinate tuple
///
/// Grammar: `mvn:<groupId>/<artifactId>/<version>[/<extension>[/<classifier>]]`.
/// Group and artifact ids are non-empty and contain no `/` or space; the
/// version may be empty; the extension defaults to `jar`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinates {
    group_id: String,
    artifact_id: String,
    version: String,
    extension: String,
    classifier: Option<String>,
}

/// Coordinates inferred from a non-`mvn:` URL
///
/// Only the artifact id and extension can be derived from a plain URL; the
/// caller supplies the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialCoordinates {
    pub artifact_id: String,
    pub extension: String,
}

impl Coordinates {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            classifier: None,
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }

    /// Parse a `mvn:` locator into a coordinate tuple.
    pub fn parse(locator: &str) -> DepotResult<Self> {
        let rest = locator
            .strip_prefix(MVN_SCHEME)
            .ok_or_else(|| invalid(locator, "missing 'mvn:' scheme"))?;

        let segments: Vec<&str> = rest.split('/').collect();
        if segments.len() < 3 {
            return Err(invalid(locator, "expected group/artifact/version"));
        }
        if segments.len() > 5 {
            return Err(invalid(locator, "too many segments"));
        }

        let group_id = segments[0];
        let artifact_id = segments[1];
        let version = segments[2];
        if group_id.is_empty() || artifact_id.is_empty() {
            return Err(invalid(locator, "group and artifact ids must be non-empty"));
        }
        for segment in &segments {
            if segment.contains(' ') {
                return Err(invalid(locator, "segments must not contain spaces"));
            }
        }

        let extension = match segments.get(3) {
            Some(ext) if !ext.is_empty() => ext.to_string(),
            _ => DEFAULT_EXTENSION.to_string(),
        };
        let classifier = segments
            .get(4)
            .filter(|c| !c.is_empty())
            .map(|c| c.to_string());

        Ok(Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
            extension,
            classifier,
        })
    }

    /// Derive the artifact id and extension from the last path segment of a
    /// plain URL. Fails when the URL carries no path segment at all.
    pub fn infer_from_url(url: &str) -> DepotResult<PartialCoordinates> {
        let without_query = url.split(['?', '#']).next().unwrap_or(url);
        // For scheme://authority/path URLs only the path part carries segments.
        let path = match without_query.split_once("://") {
            Some((_, rest)) => rest.split_once('/').map(|(_, p)| p).unwrap_or(""),
            None => without_query,
        };
        let last = path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| invalid(url, "no path segment to infer an artifact id from"))?;

        let (artifact_id, extension) = match last.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
                (stem.to_string(), ext.to_string())
            }
            _ => (last.to_string(), DEFAULT_EXTENSION.to_string()),
        };

        Ok(PartialCoordinates {
            artifact_id,
            extension,
        })
    }

    /// Canonical relative storage path for this coordinate tuple.
    ///
    /// `<group with '.' as '/'>/<artifact>/<version>/<artifact>-<version>[-<classifier>].<extension>`,
    /// with the group segment omitted entirely when the group id is empty.
    pub fn to_path(&self) -> String {
        let mut path = String::new();
        if !self.group_id.is_empty() {
            path.push_str(&self.group_id.replace('.', "/"));
            path.push('/');
        }
        path.push_str(&self.artifact_id);
        path.push('/');
        path.push_str(&self.version);
        path.push('/');
        path.push_str(&self.artifact_id);
        path.push('-');
        path.push_str(&self.version);
        if let Some(classifier) = &self.classifier {
            path.push('-');
            path.push_str(classifier);
        }
        path.push('.');
        path.push_str(&self.extension);
        path
    }

    /// Canonical `mvn:` locator form; inverse of [`Coordinates::parse`].
    pub fn to_locator(&self) -> String {
        let mut locator = format!(
            "{}{}/{}/{}",
            MVN_SCHEME, self.group_id, self.artifact_id, self.version
        );
        let default_ext = self.extension == DEFAULT_EXTENSION;
        if !default_ext || self.classifier.is_some() {
            locator.push('/');
            locator.push_str(&self.extension);
        }
        if let Some(classifier) = &self.classifier {
            locator.push('/');
            locator.push_str(classifier);
        }
        locator
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_locator())
    }
}

fn invalid(locator: &str, reason: &str) -> DepotError {
    DepotError::InvalidLocator {
        locator: locator.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_locator() {
        let coords = Coordinates::parse("mvn:group.foo/bar/1.0").unwrap();
        assert_eq!(coords.group_id(), "group.foo");
        assert_eq!(coords.artifact_id(), "bar");
        assert_eq!(coords.version(), "1.0");
        assert_eq!(coords.extension(), "jar");
        assert_eq!(coords.classifier(), None);
    }

    #[test]
    fn parse_full_locator() {
        let coords = Coordinates::parse("mvn:g/a/2.1/xml/sources").unwrap();
        assert_eq!(coords.extension(), "xml");
        assert_eq!(coords.classifier(), Some("sources"));
    }

    #[test]
    fn parse_allows_empty_version() {
        let coords = Coordinates::parse("mvn:g/a/").unwrap();
        assert_eq!(coords.version(), "");
    }

    #[test]
    fn parse_empty_extension_segment_defaults_to_jar() {
        let coords = Coordinates::parse("mvn:g/a/1.0//sources").unwrap();
        assert_eq!(coords.extension(), "jar");
        assert_eq!(coords.classifier(), Some("sources"));
    }

    #[test]
    fn parse_rejects_missing_scheme() {
        assert!(matches!(
            Coordinates::parse("g/a/1.0"),
            Err(DepotError::InvalidLocator { .. })
        ));
    }

    #[test]
    fn parse_rejects_too_few_segments() {
        assert!(Coordinates::parse("mvn:g/a").is_err());
    }

    #[test]
    fn parse_rejects_spaces() {
        assert!(Coordinates::parse("mvn:g g/a/1.0").is_err());
    }

    #[test]
    fn to_path_dotted_group() {
        let coords = Coordinates::new("group.foo", "bar", "1.0");
        assert_eq!(coords.to_path(), "group/foo/bar/1.0/bar-1.0.jar");
    }

    #[test]
    fn to_path_with_extension_and_classifier() {
        let coords = Coordinates::new("my.group", "my.artifact", "3.0")
            .with_extension("xml")
            .with_classifier("myclassifier");
        assert_eq!(
            coords.to_path(),
            "my/group/my.artifact/3.0/my.artifact-3.0-myclassifier.xml"
        );
    }

    #[test]
    fn to_path_omits_empty_group() {
        let coords = Coordinates {
            group_id: String::new(),
            artifact_id: "a".to_string(),
            version: "1".to_string(),
            extension: "jar".to_string(),
            classifier: None,
        };
        assert_eq!(coords.to_path(), "a/1/a-1.jar");
    }

    #[test]
    fn locator_round_trip_default_extension() {
        let coords = Coordinates::new("g", "a", "1.0");
        assert_eq!(coords.to_locator(), "mvn:g/a/1.0");
        assert_eq!(Coordinates::parse(&coords.to_locator()).unwrap(), coords);
    }

    #[test]
    fn locator_round_trip_classifier_forces_extension() {
        let coords = Coordinates::new("g", "a", "1.0").with_classifier("linux");
        assert_eq!(coords.to_locator(), "mvn:g/a/1.0/jar/linux");
        assert_eq!(Coordinates::parse(&coords.to_locator()).unwrap(), coords);
    }

    #[test]
    fn infer_from_url_with_extension() {
        let partial = Coordinates::infer_from_url("https://host/path/widget-1.0.zip").unwrap();
        assert_eq!(partial.artifact_id, "widget-1.0");
        assert_eq!(partial.extension, "zip");
    }

    #[test]
    fn infer_from_url_without_extension_defaults_to_jar() {
        let partial = Coordinates::infer_from_url("https://host/artifacts/widget").unwrap();
        assert_eq!(partial.artifact_id, "widget");
        assert_eq!(partial.extension, "jar");
    }

    #[test]
    fn infer_from_url_without_path_fails() {
        assert!(matches!(
            Coordinates::infer_from_url("https://"),
            Err(DepotError::InvalidLocator { .. })
        ));
        assert!(Coordinates::infer_from_url("https://host").is_err());
    }
}
