//! Descriptor indexing integration tests: scan, digest, merge and
//! idempotence over a real repository storage tree.

mod common;

use std::fs;

use depot::indexer::{self, BUNDLE_MIME_TYPE, DESCRIPTOR_FILE};
use depot::{ContentHash, CreateRepository};
use tempfile::tempdir;

#[test]
fn update_descriptor_indexes_installed_bundles() {
    let dir = tempdir().unwrap();
    let engine = common::engine(dir.path());
    let repo = engine
        .registry
        .create(CreateRepository::new("releases"))
        .unwrap();

    common::write_bundle(
        &repo.location.join("g/a/1.0/a-1.0.jar"),
        "org.example.a",
        "1.0.0",
    );
    common::write_bundle(
        &repo.location.join("g/b/2.0/b-2.0.jar"),
        "org.example.b",
        "2.0.0",
    );
    // Sidecar files that must never become entries.
    fs::write(repo.location.join("g/a/1.0/a-1.0.jar.sha1"), "x").unwrap();
    fs::write(repo.location.join("g/a/1.0/a-1.0.pom"), "x").unwrap();

    let doc = engine.registry.update_descriptor("releases").unwrap();

    assert_eq!(doc.resources.len(), 2);
    let uris: Vec<&str> = doc.resources.iter().map(|e| e.uri.as_str()).collect();
    assert!(uris.contains(&"g/a/1.0/a-1.0.jar"));
    assert!(uris.contains(&"g/b/2.0/b-2.0.jar"));
    assert!(repo.location.join(DESCRIPTOR_FILE).is_file());
}

#[test]
fn entries_carry_digest_size_and_capabilities() {
    let dir = tempdir().unwrap();
    let engine = common::engine(dir.path());
    let repo = engine
        .registry
        .create(CreateRepository::new("releases"))
        .unwrap();

    let jar = repo.location.join("a-1.0.jar");
    common::write_bundle(&jar, "org.example.a", "1.0.0");

    let doc = engine.registry.update_descriptor("releases").unwrap();
    let entry = &doc.resources[0];

    assert_eq!(entry.symbolic_name, "org.example.a");
    assert_eq!(entry.version, "1.0.0");
    assert_eq!(entry.mime_type.as_deref(), Some(BUNDLE_MIME_TYPE));
    assert_eq!(entry.size, Some(fs::metadata(&jar).unwrap().len()));

    let (expected, _) = ContentHash::from_reader(fs::File::open(&jar).unwrap()).unwrap();
    assert_eq!(entry.digest.as_deref(), Some(expected.hex()));

    // The distinguished content attribute holds the relative URI.
    assert_eq!(
        entry.attributes.get("content").map(String::as_str),
        Some("a-1.0.jar")
    );
}

#[test]
fn reindexing_unchanged_tree_keeps_increment() {
    let dir = tempdir().unwrap();
    let engine = common::engine(dir.path());
    let repo = engine
        .registry
        .create(CreateRepository::new("releases"))
        .unwrap();
    common::write_bundle(&repo.location.join("a-1.0.jar"), "org.example.a", "1.0");

    let first = engine.registry.update_descriptor("releases").unwrap();
    let second = engine.registry.update_descriptor("releases").unwrap();

    assert_eq!(second.resources.len(), first.resources.len());
    assert_eq!(second.increment, first.increment);
}

#[test]
fn reindexing_never_overwrites_existing_entries() {
    let dir = tempdir().unwrap();
    let engine = common::engine(dir.path());
    let repo = engine
        .registry
        .create(CreateRepository::new("releases"))
        .unwrap();

    let jar = repo.location.join("a-1.0.jar");
    common::write_bundle(&jar, "org.example.a", "1.0.0");
    engine.registry.update_descriptor("releases").unwrap();

    // Replace the file in place; the URI is unchanged, so the indexed
    // entry must stay as it was.
    common::write_bundle(&jar, "org.example.replacement", "9.9.9");
    let doc = engine.registry.update_descriptor("releases").unwrap();

    assert_eq!(doc.resources.len(), 1);
    assert_eq!(doc.resources[0].symbolic_name, "org.example.a");
}

#[test]
fn non_bundle_files_are_skipped_not_fatal() {
    let dir = tempdir().unwrap();
    let engine = common::engine(dir.path());
    let repo = engine
        .registry
        .create(CreateRepository::new("releases"))
        .unwrap();

    common::write_bundle(&repo.location.join("good-1.0.jar"), "org.example.good", "1.0");
    fs::write(repo.location.join("broken.jar"), "not a zip archive").unwrap();

    let doc = engine.registry.update_descriptor("releases").unwrap();
    assert_eq!(doc.resources.len(), 1);
    assert_eq!(doc.resources[0].symbolic_name, "org.example.good");
}

#[test]
fn descriptor_survives_reload_from_disk() {
    let dir = tempdir().unwrap();
    let engine = common::engine(dir.path());
    let repo = engine
        .registry
        .create(CreateRepository::new("releases"))
        .unwrap();
    common::write_bundle(&repo.location.join("a-1.0.jar"), "org.example.a", "1.0");

    let written = engine.registry.update_descriptor("releases").unwrap();
    let loaded = indexer::load_descriptor(&repo.location).unwrap();
    assert_eq!(loaded, written);
}
