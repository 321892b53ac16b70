//! Key/value persistence for missed facts, settings and leaderboards
//!
//! Backends:
//! - `MemoryStore`: in-process map (tests, headless runs)
//! - `DirStore`: one JSON file per key in a directory (native)
//! - `LocalStorageStore`: browser LocalStorage (wasm32)
//!
//! Every value is a JSON string. Keys are namespaced per game variant by the
//! callers (see `GameVariant::storage_key`).

use std::collections::BTreeMap;

use crate::error::StoreError;

#[cfg(not(target_arch = "wasm32"))]
mod dir;
#[cfg(target_arch = "wasm32")]
mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use dir::DirStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

/// A flat string key/value store
pub trait KeyValueStore {
    /// Read the value for `key`, `None` if never written
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
