//! Domain Value Objects
//!
//! Immutable, validated values used throughout the domain layer.

pub mod content_hash;
pub mod coordinates;
pub mod storage_path;

pub use content_hash::ContentHash;
pub use coordinates::{Coordinates, PartialCoordinates, DEFAULT_EXTENSION, MVN_SCHEME};
pub use storage_path::StoragePath;
