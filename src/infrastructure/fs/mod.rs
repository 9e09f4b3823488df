//! Filesystem infrastructure

pub mod tree;

pub use tree::{copy_tree, move_tree, purge_tree, remove_tree, CopyStats};
