pub mod kv;
pub mod repository;

pub use kv::*;
pub use repository::*;

use thiserror::Error;

/// Store key holding the medication document.
pub const MEDICATIONS_KEY: &str = "medications";

/// Store key holding the derived reminder document.
pub const REMINDERS_KEY: &str = "reminders";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub(crate) fn not_found(entity_type: &str, id: &str) -> Self {
        StoreError::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// True for failures of the underlying read/write, as opposed to
    /// lookups and input checks.
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            StoreError::Io(_) | StoreError::Json(_) | StoreError::LockPoisoned
        )
    }
}
