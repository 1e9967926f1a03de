//! Repository layer — collection-scoped document operations.
//!
//! Each collection lives in one JSON array under one store key and every
//! mutation rewrites the whole array.

mod medication;
mod seed;

pub use medication::*;
pub use seed::*;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{KeyValueStore, StoreError};

/// Read a JSON array document. A missing or blank value is an empty
/// collection; a value that fails to parse is an error, never "no data".
pub(crate) fn load_collection<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Vec<T>, StoreError> {
    match store.get_item(key)? {
        Some(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw).map_err(|e| {
            tracing::warn!(key, "Stored document is corrupt: {e}");
            StoreError::from(e)
        }),
        _ => Ok(Vec::new()),
    }
}

/// True when the key holds a non-blank document.
pub(crate) fn has_collection(store: &dyn KeyValueStore, key: &str) -> Result<bool, StoreError> {
    Ok(store
        .get_item(key)?
        .is_some_and(|raw| !raw.trim().is_empty()))
}

/// Serialise and replace the whole document under `key`.
pub(crate) fn save_collection<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    items: &[T],
) -> Result<(), StoreError> {
    let json = serde_json::to_string(items)?;
    store.set_item(key, &json)
}
