//! Treestore Core - hierarchical index over parent-linked records
//!
//! This crate provides the [`TreeStore`] index and the item types it
//! operates on. Items only need an identifier and an optional parent
//! identifier; the hierarchy is derived from those fields on demand.

pub mod error;
pub mod item;
pub mod options;
pub mod store;

pub use error::{Error, Result};
pub use item::{Item, ItemId, TreeItem};
pub use options::{DuplicatePolicy, StoreOptions, TraversalOrder, UpdateMode};
pub use store::TreeStore;
