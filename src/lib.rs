//! depot - artifact repository management engine
//!
//! depot manages named, filesystem-backed repositories of versioned binary
//! artifacts addressed by Maven-style coordinates: lifecycle and
//! reconfiguration, a content-addressed bundle descriptor index per
//! repository, flat-file persistence of the registry, and a scheduling
//! policy for periodic maintenance actions. Endpoint publication, timers
//! and remote artifact resolution are injected collaborator traits.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod indexer;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{ArtifactUpload, CreateRepository, RepositoryRegistry};
pub use config::DepotConfig;
pub use domain::entities::{Action, BundleDescriptor, BundleEntry, Repository, ScheduleTrigger};
pub use domain::value_objects::{ContentHash, Coordinates, StoragePath};
pub use error::{DepotError, DepotResult};
pub use infrastructure::{LocalTransfer, PropertiesStore};
