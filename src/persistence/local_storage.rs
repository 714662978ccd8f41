//! Browser localStorage backend (WASM only).

use crate::persistence::backend::KeyValueBackend;
use crate::persistence::error::StoreError;

/// Prefix applied to every key so the engine's records do not collide with
/// other data on the same origin.
const KEY_PREFIX: &str = "claimscope:";

/// Backend storing each key as a localStorage item.
#[derive(Debug, Clone, Default)]
pub struct LocalStorageBackend;

impl LocalStorageBackend {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Result<web_sys::Storage, StoreError> {
        let window =
            web_sys::window().ok_or_else(|| StoreError::storage("No window object available"))?;
        window
            .local_storage()
            .map_err(|e| StoreError::storage(format!("localStorage access error: {:?}", e)))?
            .ok_or_else(|| StoreError::storage("localStorage not available"))
    }

    fn prefixed(key: &str) -> String {
        format!("{}{}", KEY_PREFIX, key)
    }
}

impl KeyValueBackend for LocalStorageBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Self::storage()?
            .get_item(&Self::prefixed(key))
            .map_err(|e| StoreError::storage(format!("Failed to read '{}': {:?}", key, e)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        Self::storage()?
            .set_item(&Self::prefixed(key), value)
            .map_err(|e| StoreError::storage(format!("Failed to write '{}': {:?}", key, e)))
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        Self::storage()?
            .remove_item(&Self::prefixed(key))
            .map_err(|e| StoreError::storage(format!("Failed to remove '{}': {:?}", key, e)))
    }
}
