//! Repository Registry
//!
//! The authoritative in-memory map of active repositories and every
//! operation that mutates it: lifecycle (create/remove/copy/relocate),
//! reconfiguration, artifact add/delete and descriptor updates. All
//! mutation runs inside one critical section per registry instance, and
//! every successful mutation persists the full snapshot through the
//! injected store, so save never observes a torn registry.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::config::DepotConfig;
use crate::domain::entities::{BundleDescriptor, Repository, ScheduleTrigger};
use crate::domain::ports::{ArtifactTransfer, EndpointPublisher, RepositoryStore, Scheduler};
use crate::domain::value_objects::{Coordinates, StoragePath, MVN_SCHEME};
use crate::error::{DepotError, DepotResult};
use crate::indexer;
use crate::infrastructure::fs::{copy_tree, move_tree, purge_tree, remove_tree, CopyStats};

/// Settings for a new repository. Unset fields take engine defaults.
#[derive(Debug, Clone, Default)]
pub struct CreateRepository {
    pub name: String,
    pub location: Option<PathBuf>,
    pub url: Option<String>,
    pub proxy: Option<String>,
    pub mirror: bool,
    pub realm: Option<String>,
    pub download_role: Option<String>,
    pub upload_role: Option<String>,
    pub scheduling: Option<String>,
    pub scheduling_action: Option<String>,
    pub pool_size: Option<u32>,
}

impl CreateRepository {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// An artifact to add to a repository. Explicit coordinate fields override
/// whatever can be derived from the URL.
#[derive(Debug, Clone, Default)]
pub struct ArtifactUpload {
    pub url: String,
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub extension: Option<String>,
    pub classifier: Option<String>,
}

impl ArtifactUpload {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

pub struct RepositoryRegistry {
    config: DepotConfig,
    store: Arc<dyn RepositoryStore>,
    publisher: Arc<dyn EndpointPublisher>,
    scheduler: Arc<dyn Scheduler>,
    transfer: Arc<dyn ArtifactTransfer>,
    repositories: Mutex<BTreeMap<String, Repository>>,
}

impl RepositoryRegistry {
    pub fn new(
        config: DepotConfig,
        store: Arc<dyn RepositoryStore>,
        publisher: Arc<dyn EndpointPublisher>,
        scheduler: Arc<dyn Scheduler>,
        transfer: Arc<dyn ArtifactTransfer>,
    ) -> Self {
        Self {
            config,
            store,
            publisher,
            scheduler,
            transfer,
            repositories: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn config(&self) -> &DepotConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Repository>> {
        self.repositories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, repositories: &BTreeMap<String, Repository>) -> DepotResult<()> {
        let snapshot: Vec<Repository> = repositories.values().cloned().collect();
        self.store.save(&snapshot)?;
        Ok(())
    }

    /// Rebuild the registry from the persisted store and republish every
    /// repository. Schedules are not part of the persisted schema, so
    /// restored repositories come back unscheduled.
    pub fn restore(&self) -> DepotResult<usize> {
        let mut repositories = self.lock();
        let loaded = self.store.load()?;
        let count = loaded.len();
        for repo in loaded {
            if let Err(e) = self.publisher.publish(&repo) {
                warn!(name = repo.name(), error = %e, "republish failed during restore");
            }
            repositories.insert(repo.name().to_string(), repo);
        }
        info!(count, "registry restored");
        Ok(count)
    }

    /// Snapshot of all repositories, ordered by name.
    pub fn repositories(&self) -> Vec<Repository> {
        self.lock().values().cloned().collect()
    }

    /// Snapshot of one repository.
    pub fn repository(&self, name: &str) -> Option<Repository> {
        self.lock().get(name).cloned()
    }

    /// Create a repository, defaulting location and URL from the engine
    /// configuration, and register it with the collaborators.
    pub fn create(&self, options: CreateRepository) -> DepotResult<Repository> {
        if options.name.is_empty() {
            return Err(DepotError::InvalidRepository {
                reason: "name must not be empty".to_string(),
            });
        }
        if options.pool_size == Some(0) {
            return Err(DepotError::InvalidRepository {
                reason: "pool size must be positive".to_string(),
            });
        }

        let mut repositories = self.lock();
        if repositories.contains_key(&options.name) {
            return Err(DepotError::AlreadyExists { name: options.name });
        }

        let location = options
            .location
            .unwrap_or_else(|| self.config.storage_for(&options.name));
        let url = options
            .url
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| self.config.url_for(&options.name));
        fs::create_dir_all(&location)?;

        let mut repo = Repository::new(options.name, location, url);
        repo.proxy = options.proxy;
        repo.mirror = options.mirror;
        repo.realm = options.realm;
        repo.download_role = options.download_role;
        repo.upload_role = options.upload_role;
        repo.scheduling = options.scheduling;
        repo.scheduling_action = options.scheduling_action;
        repo.pool_size = options.pool_size.unwrap_or(self.config.default_pool_size);

        // Validate the schedule before any collaborator side effect.
        let trigger = repo
            .scheduling
            .as_deref()
            .map(ScheduleTrigger::parse)
            .transpose()?;

        self.publisher.publish(&repo)?;
        if let Some(trigger) = &trigger {
            self.scheduler.schedule(&repo.job_id(), trigger)?;
        }

        let name = repo.name().to_string();
        repositories.insert(name.clone(), repo.clone());
        self.persist(&repositories)?;
        info!(name = %name, location = %repo.location.display(), "repository created");
        Ok(repo)
    }

    /// Remove a repository, optionally deleting its storage tree.
    ///
    /// Collaborator failures are logged, not fatal: a repository can always
    /// be removed even when the publisher or scheduler is wedged.
    pub fn remove(&self, name: &str, storage_cleanup: bool) -> DepotResult<()> {
        let mut repositories = self.lock();
        let repo = repositories
            .get(name)
            .ok_or_else(|| DepotError::NotFound {
                name: name.to_string(),
            })?
            .clone();

        if storage_cleanup {
            remove_tree(&repo.location)?;
        }
        if let Err(e) = self.publisher.unpublish(&repo.url) {
            warn!(name, error = %e, "unpublish failed during remove");
        }
        let job_id = repo.job_id();
        if self.scheduler.job_ids().contains(&job_id) {
            if let Err(e) = self.scheduler.unschedule(&job_id) {
                warn!(name, error = %e, "unschedule failed during remove");
            }
        }

        repositories.remove(name);
        self.persist(&repositories)?;
        info!(name, storage_cleanup, "repository removed");
        Ok(())
    }

    /// Delete everything under the repository's storage location, keeping
    /// the record and the directory itself.
    pub fn purge(&self, name: &str) -> DepotResult<()> {
        let repositories = self.lock();
        let repo = repositories.get(name).ok_or_else(|| DepotError::NotFound {
            name: name.to_string(),
        })?;
        purge_tree(&repo.location)?;
        info!(name, "repository purged");
        Ok(())
    }

    /// Move the repository's storage tree to a new location.
    pub fn change_location(&self, name: &str, new_location: PathBuf) -> DepotResult<()> {
        let mut repositories = self.lock();
        let repo = repositories.get_mut(name).ok_or_else(|| DepotError::NotFound {
            name: name.to_string(),
        })?;

        if repo.location == new_location {
            return Ok(());
        }
        if repo.location.exists() {
            move_tree(&repo.location, &new_location)?;
        } else {
            fs::create_dir_all(&new_location)?;
        }
        repo.location = new_location;
        self.persist(&repositories)?;
        Ok(())
    }

    /// Republish the repository under a new URL.
    pub fn change_url(&self, name: &str, new_url: String) -> DepotResult<()> {
        if new_url.is_empty() {
            return Err(DepotError::InvalidRepository {
                reason: "url must not be empty".to_string(),
            });
        }
        let mut repositories = self.lock();
        let repo = repositories.get_mut(name).ok_or_else(|| DepotError::NotFound {
            name: name.to_string(),
        })?;

        if let Err(e) = self.publisher.unpublish(&repo.url) {
            warn!(name, url = %repo.url, error = %e, "unpublish of old url failed");
        }
        repo.url = new_url;
        let updated = repo.clone();
        self.publisher.publish(&updated)?;
        self.persist(&repositories)?;
        Ok(())
    }

    /// Change the proxy target and mirror mode, republished in place.
    pub fn change_proxy(
        &self,
        name: &str,
        proxy: Option<String>,
        mirror: bool,
    ) -> DepotResult<()> {
        self.republish_with(name, |repo| {
            repo.proxy = proxy;
            repo.mirror = mirror;
        })
    }

    /// Change the security hints, republished in place.
    pub fn change_security(
        &self,
        name: &str,
        realm: Option<String>,
        download_role: Option<String>,
        upload_role: Option<String>,
    ) -> DepotResult<()> {
        self.republish_with(name, |repo| {
            repo.realm = realm;
            repo.download_role = download_role;
            repo.upload_role = upload_role;
        })
    }

    fn republish_with(
        &self,
        name: &str,
        mutate: impl FnOnce(&mut Repository),
    ) -> DepotResult<()> {
        let mut repositories = self.lock();
        let repo = repositories.get_mut(name).ok_or_else(|| DepotError::NotFound {
            name: name.to_string(),
        })?;

        if let Err(e) = self.publisher.unpublish(&repo.url) {
            warn!(name, url = %repo.url, error = %e, "unpublish failed during reconfigure");
        }
        mutate(repo);
        let updated = repo.clone();
        self.publisher.publish(&updated)?;
        self.persist(&repositories)?;
        Ok(())
    }

    /// Replace the repository's maintenance schedule.
    ///
    /// The new trigger is validated before the old job is unscheduled, so
    /// an invalid spec leaves the existing schedule untouched.
    pub fn change_scheduling(
        &self,
        name: &str,
        scheduling: Option<String>,
        scheduling_action: Option<String>,
    ) -> DepotResult<()> {
        let trigger = scheduling
            .as_deref()
            .map(ScheduleTrigger::parse)
            .transpose()?;

        let mut repositories = self.lock();
        let repo = repositories.get_mut(name).ok_or_else(|| DepotError::NotFound {
            name: name.to_string(),
        })?;

        let job_id = repo.job_id();
        if self.scheduler.job_ids().contains(&job_id) {
            if let Err(e) = self.scheduler.unschedule(&job_id) {
                warn!(name, error = %e, "unschedule of old job failed");
            }
        }
        repo.scheduling = scheduling;
        repo.scheduling_action = scheduling_action;
        if let Some(trigger) = &trigger {
            self.scheduler.schedule(&job_id, trigger)?;
        }
        self.persist(&repositories)?;
        Ok(())
    }

    /// Copy the source repository's storage tree into the destination's.
    ///
    /// Per-file failures are logged by the walk and reported in the stats;
    /// they do not abort the copy.
    pub fn copy(&self, source: &str, destination: &str) -> DepotResult<CopyStats> {
        let repositories = self.lock();
        let src = repositories.get(source).ok_or_else(|| DepotError::NotFound {
            name: source.to_string(),
        })?;
        let dst = repositories
            .get(destination)
            .ok_or_else(|| DepotError::NotFound {
                name: destination.to_string(),
            })?;

        let stats = copy_tree(&src.location, &dst.location)?;
        info!(
            source,
            destination,
            copied = stats.copied,
            failed = stats.failed,
            "repository copied"
        );
        Ok(stats)
    }

    /// Add an artifact to a repository, deriving missing coordinates from
    /// the artifact URL, staging the bytes in a temporary file and
    /// installing them under the coordinate path.
    pub fn add_artifact(&self, name: &str, upload: ArtifactUpload) -> DepotResult<PathBuf> {
        let repositories = self.lock();
        let repo = repositories.get(name).ok_or_else(|| DepotError::NotFound {
            name: name.to_string(),
        })?;

        let coords = resolve_coordinates(&upload)?;
        let mut reader = self.transfer.fetch(&upload.url)?;
        let mut staged = tempfile::NamedTempFile::new()?;
        io::copy(&mut reader, &mut staged)?;

        self.transfer
            .install(&coords, staged.path(), &repo.location)?;
        let installed = repo.location.join(coords.to_path());
        debug!(name, artifact = %coords, path = %installed.display(), "artifact added");
        Ok(installed)
    }

    /// Delete an artifact addressed by a `mvn:` locator or a path relative
    /// to the repository location. A missing path is a no-op.
    pub fn delete_artifact(&self, name: &str, locator_or_path: &str) -> DepotResult<()> {
        let repositories = self.lock();
        let repo = repositories.get(name).ok_or_else(|| DepotError::NotFound {
            name: name.to_string(),
        })?;

        let relative = if locator_or_path.starts_with(MVN_SCHEME) {
            PathBuf::from(Coordinates::parse(locator_or_path)?.to_path())
        } else {
            StoragePath::new(locator_or_path)?.as_path().to_path_buf()
        };
        remove_tree(&repo.location.join(relative))?;
        Ok(())
    }

    /// Delete an artifact addressed by explicit coordinates.
    pub fn delete_artifact_coordinates(
        &self,
        name: &str,
        coordinates: &Coordinates,
    ) -> DepotResult<()> {
        let repositories = self.lock();
        let repo = repositories.get(name).ok_or_else(|| DepotError::NotFound {
            name: name.to_string(),
        })?;
        remove_tree(&repo.location.join(coordinates.to_path()))?;
        Ok(())
    }

    /// Re-index the repository's storage tree into its descriptor document
    /// with a full digest pass.
    pub fn update_descriptor(&self, name: &str) -> DepotResult<BundleDescriptor> {
        let repositories = self.lock();
        let repo = repositories.get(name).ok_or_else(|| DepotError::NotFound {
            name: name.to_string(),
        })?;
        indexer::update_descriptor(&repo.location, true)
    }
}

fn resolve_coordinates(upload: &ArtifactUpload) -> DepotResult<Coordinates> {
    let (group_id, artifact_id, version, extension, classifier) =
        if upload.url.starts_with(MVN_SCHEME) {
            let parsed = Coordinates::parse(&upload.url)?;
            (
                upload
                    .group_id
                    .clone()
                    .unwrap_or_else(|| parsed.group_id().to_string()),
                upload
                    .artifact_id
                    .clone()
                    .unwrap_or_else(|| parsed.artifact_id().to_string()),
                upload
                    .version
                    .clone()
                    .unwrap_or_else(|| parsed.version().to_string()),
                upload
                    .extension
                    .clone()
                    .unwrap_or_else(|| parsed.extension().to_string()),
                upload
                    .classifier
                    .clone()
                    .or_else(|| parsed.classifier().map(str::to_string)),
            )
        } else {
            let inferred = Coordinates::infer_from_url(&upload.url)?;
            let group_id = upload.group_id.clone().ok_or_else(|| missing(upload, "groupId"))?;
            let version = upload.version.clone().ok_or_else(|| missing(upload, "version"))?;
            (
                group_id,
                upload
                    .artifact_id
                    .clone()
                    .unwrap_or(inferred.artifact_id),
                version,
                upload.extension.clone().unwrap_or(inferred.extension),
                upload.classifier.clone(),
            )
        };

    let mut coords = Coordinates::new(group_id, artifact_id, version).with_extension(extension);
    if let Some(classifier) = classifier {
        coords = coords.with_classifier(classifier);
    }
    Ok(coords)
}

fn missing(upload: &ArtifactUpload, field: &str) -> DepotError {
    DepotError::InvalidLocator {
        locator: upload.url.clone(),
        reason: format!("{field} is required when it cannot be derived from the URL"),
    }
}
