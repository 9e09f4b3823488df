//! Domain Entities

pub mod descriptor;
pub mod repository;
pub mod schedule;

pub use descriptor::{BundleDescriptor, BundleEntry, CONTENT_ATTRIBUTE};
pub use repository::Repository;
pub use schedule::{Action, ScheduleTrigger};
