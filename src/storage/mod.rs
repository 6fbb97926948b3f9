//! Local key-value storage
//!
//! Every piece of durable client state (accounts, the active session, favorites
//! partitions) lives under a [`StorageKey`] in a [`KeyValueStore`]. Values are
//! JSON documents that are read and rewritten whole.

use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Display;
use std::sync::Arc;

use crate::config::{Config, StorageBackend};
use crate::error::AppResult;
use crate::models::User;

pub mod file;
pub mod memory;
pub mod redis_store;

pub use file::JsonFileStore;
pub use memory::InMemoryStore;
pub use redis_store::RedisStore;

/// Synchronous, string-keyed durable storage.
///
/// Implementations must make a successful `set_item`/`remove_item` durable
/// before returning.
pub trait KeyValueStore: Send + Sync {
    /// Returns the raw value for `key`, or `None` if absent or unreadable.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> AppResult<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> AppResult<()>;

    /// All keys currently stored, sorted.
    fn keys(&self) -> Vec<String>;
}

/// Shared handle to a store
pub type StoreHandle = Arc<dyn KeyValueStore>;

/// Which favorites partition is active
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    /// Nobody is logged in
    Guest,
    /// Logged in user, by user id
    User(String),
}

impl Identity {
    /// Identity of an optional logged in user
    pub fn of(user: Option<&User>) -> Self {
        match user {
            Some(user) => Identity::User(user.id.clone()),
            None => Identity::Guest,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// email -> credential entry map
    AccountsMap,
    /// The logged in user
    CurrentSession,
    /// Favorites list of one identity
    Favorites(Identity),
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageKey::AccountsMap => write!(f, "accounts-map"),
            StorageKey::CurrentSession => write!(f, "current-session"),
            StorageKey::Favorites(Identity::Guest) => write!(f, "favorites:guest"),
            StorageKey::Favorites(Identity::User(id)) => write!(f, "favorites:{}", id),
        }
    }
}

/// Reads and decodes the JSON document under `key`.
///
/// A malformed document reads as absent.
pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &StorageKey) -> Option<T> {
    let key = key.to_string();
    let raw = store.get_item(&key)?;

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Ignoring malformed stored record");
            None
        }
    }
}

/// Encodes `value` as JSON and stores it under `key`.
pub fn write_json<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &StorageKey,
    value: &T,
) -> AppResult<()> {
    let json = serde_json::to_string(value)?;
    store.set_item(&key.to_string(), &json)
}

/// Removes the document under `key`.
pub fn remove(store: &dyn KeyValueStore, key: &StorageKey) -> AppResult<()> {
    store.remove_item(&key.to_string())
}

/// Opens the store selected by configuration
pub fn open_store(config: &Config) -> AppResult<StoreHandle> {
    let store: StoreHandle = match config.storage_backend {
        StorageBackend::Memory => Arc::new(InMemoryStore::new()),
        StorageBackend::File => Arc::new(JsonFileStore::open(&config.storage_path)?),
        StorageBackend::Redis => Arc::new(RedisStore::connect(
            &config.redis_url,
            &config.redis_namespace,
        )?),
    };

    tracing::info!(backend = ?config.storage_backend, "Local storage opened");
    Ok(store)
}
