//! Key-value persistence
//!
//! Features:
//! - Synchronous string store abstraction (LocalStorage on web, memory elsewhere)
//! - JSON encode/decode helpers
//! - `PersistedState`: an in-memory value mirrored to one storage key
//!
//! Nothing above `PersistedState` ever sees a storage error: reads fall back to
//! defaults and writes are logged and dropped.

#[cfg(target_arch = "wasm32")]
pub mod local;
pub mod memory;
pub mod mirror;

use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;
pub use memory::MemoryStore;
pub use mirror::PersistedState;

/// Errors raised by storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("failed to read `{key}`: {reason}")]
    Read { key: String, reason: String },
    #[error("failed to write `{key}`: {reason}")]
    Write { key: String, reason: String },
    #[error("failed to encode value for `{key}`")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("stored value for `{key}` is not valid")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Synchronous string key-value store (the shape of browser LocalStorage)
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Store shared by every activity in the tab
pub type SharedStore = Rc<dyn KeyValueStore>;

/// Read and decode a JSON value. `Ok(None)` when the key is absent.
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = store.get_item(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Decode {
            key: key.to_string(),
            source,
        })
}

/// Encode and write a JSON value
pub fn save_json<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set_item(key, &json)
}
