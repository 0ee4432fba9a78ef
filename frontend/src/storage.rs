//! `localStorage` implementation of the client storage backend.

use client::{StorageBackend, StorageError};
use web_sys::Storage;

pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<Storage, StorageError> {
        web_sys::window()
            .ok_or_else(|| StorageError("no window".to_string()))?
            .local_storage()
            .map_err(|_| StorageError("localStorage unavailable".to_string()))?
            .ok_or_else(|| StorageError("localStorage disabled".to_string()))
    }
}

impl StorageBackend for LocalStorage {
    fn read(&self, slot: &str) -> Option<String> {
        Self::storage().ok()?.get_item(slot).ok().flatten()
    }

    fn write(&self, slot: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(slot, value)
            .map_err(|_| StorageError(format!("failed to write {slot}")))
    }

    fn remove(&self, slot: &str) -> Result<(), StorageError> {
        Self::storage()?
            .remove_item(slot)
            .map_err(|_| StorageError(format!("failed to remove {slot}")))
    }
}
