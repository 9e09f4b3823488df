//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use depot::domain::entities::ScheduleTrigger;
use depot::domain::ports::{
    EndpointPublisher, PublishError, Scheduler, SchedulerError,
};
use depot::{DepotConfig, LocalTransfer, PropertiesStore, RepositoryRegistry};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Publisher double that records publish/unpublish calls.
#[derive(Default)]
pub struct RecordingPublisher {
    pub published: Mutex<Vec<String>>,
    pub unpublished: Mutex<Vec<String>>,
}

impl EndpointPublisher for RecordingPublisher {
    fn publish(&self, repository: &depot::Repository) -> Result<(), PublishError> {
        self.published
            .lock()
            .unwrap()
            .push(repository.url.clone());
        Ok(())
    }

    fn unpublish(&self, url: &str) -> Result<(), PublishError> {
        self.unpublished.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

impl RecordingPublisher {
    pub fn published_urls(&self) -> Vec<String> {
        self.published.lock().unwrap().clone()
    }

    pub fn unpublished_urls(&self) -> Vec<String> {
        self.unpublished.lock().unwrap().clone()
    }
}

/// Scheduler double that keeps registered jobs in memory.
#[derive(Default)]
pub struct RecordingScheduler {
    pub jobs: Mutex<BTreeMap<String, ScheduleTrigger>>,
}

impl Scheduler for RecordingScheduler {
    fn schedule(&self, job_id: &str, trigger: &ScheduleTrigger) -> Result<(), SchedulerError> {
        self.jobs
            .lock()
            .unwrap()
            .insert(job_id.to_string(), trigger.clone());
        Ok(())
    }

    fn unschedule(&self, job_id: &str) -> Result<(), SchedulerError> {
        self.jobs.lock().unwrap().remove(job_id);
        Ok(())
    }

    fn job_ids(&self) -> Vec<String> {
        self.jobs.lock().unwrap().keys().cloned().collect()
    }
}

/// A registry wired to in-memory collaborator doubles over a temp storage
/// root.
pub struct TestEngine {
    pub registry: RepositoryRegistry,
    pub publisher: Arc<RecordingPublisher>,
    pub scheduler: Arc<RecordingScheduler>,
    pub config: DepotConfig,
}

pub fn engine(base_storage: &Path) -> TestEngine {
    engine_with_source(base_storage, None)
}

/// Like [`engine`], with a local source repository for `mvn:` fetches.
pub fn engine_with_source(base_storage: &Path, source: Option<PathBuf>) -> TestEngine {
    let config = DepotConfig {
        base_storage: base_storage.to_path_buf(),
        ..DepotConfig::default()
    };
    let publisher = Arc::new(RecordingPublisher::default());
    let scheduler = Arc::new(RecordingScheduler::default());
    let store = Arc::new(PropertiesStore::new(config.store_path()));
    let transfer = Arc::new(match source {
        Some(root) => LocalTransfer::with_local_repository(root),
        None => LocalTransfer::new(),
    });
    let registry = RepositoryRegistry::new(
        config.clone(),
        store,
        publisher.clone(),
        scheduler.clone(),
        transfer,
    );
    TestEngine {
        registry,
        publisher,
        scheduler,
        config,
    }
}

/// Write a minimal bundle archive with the given identity.
pub fn write_bundle(path: &Path, symbolic_name: &str, version: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let file = fs::File::create(path).unwrap();
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    writer.start_file("META-INF/MANIFEST.MF", options).unwrap();
    writer
        .write_all(
            format!(
                "Manifest-Version: 1.0\nBundle-SymbolicName: {symbolic_name}\nBundle-Version: {version}\n"
            )
            .as_bytes(),
        )
        .unwrap();
    writer.start_file("org/example/Widget.class", options).unwrap();
    writer.write_all(b"\xca\xfe\xba\xbe").unwrap();
    writer.finish().unwrap();
}
