//! Infrastructure Layer
//!
//! Concrete implementations of the domain ports plus the storage tree
//! operations the registry builds on.

pub mod fs;
pub mod store;
pub mod transfer;

pub use store::PropertiesStore;
pub use transfer::LocalTransfer;
