//! Error types for Treestore Core

use thiserror::Error;

/// Result type alias using Treestore's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Treestore error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid item: {0}")]
    InvalidItem(String),

    #[error("Item with id {0} not found")]
    NotFound(String),

    #[error("Item with id {0} already exists")]
    DuplicateId(String),

    #[error("Cycle detected through item {0}")]
    CycleDetected(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn missing_id() -> Self {
        Self::InvalidItem("id is required".to_string())
    }
}
