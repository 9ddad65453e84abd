//! Typed state mirrored to a single storage key

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{SharedStore, load_json, save_json};

/// An in-memory value kept in sync with one key of the store.
///
/// The value is read once in [`PersistedState::load`] and written back
/// synchronously on every [`set`](PersistedState::set) or
/// [`update`](PersistedState::update). A missing or unreadable entry yields
/// the supplied default; a failed write is logged and the in-memory value
/// still changes, so the session stays consistent even if persistence doesn't.
pub struct PersistedState<T> {
    store: SharedStore,
    key: String,
    value: T,
}

impl<T> PersistedState<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn load(store: SharedStore, key: impl Into<String>, default: T) -> Self {
        let key = key.into();
        let value = match load_json::<T>(store.as_ref(), &key) {
            Ok(Some(value)) => {
                log::debug!("Loaded `{}` from storage", key);
                value
            }
            Ok(None) => default,
            Err(e) => {
                log::warn!("{}; using defaults", e);
                default
            }
        };
        Self { store, key, value }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Replace the value and persist it
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.persist();
    }

    /// Mutate the value in place and persist it
    pub fn update(&mut self, f: impl FnOnce(&mut T)) {
        f(&mut self.value);
        self.persist();
    }

    fn persist(&self) {
        if let Err(e) = save_json(self.store.as_ref(), &self.key, &self.value) {
            log::error!("Not persisted: {}", e);
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for PersistedState<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistedState")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish()
    }
}
