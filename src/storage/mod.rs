//! Key/value storage shared by the stores.
//!
//! A [`Storage`] backend holds raw string values. [`SharedStorage`] wraps a
//! backend for one origin and announces every write on a broadcast channel,
//! the way a browser fires `storage` events at the other open tabs. Stores
//! never talk to a backend directly: they get a [`StorageHandle`], which
//! tags each write with the tab that made it.

use std::{fmt, sync::Arc};

use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::error::AppResult;

pub mod file;
pub mod keys;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

const EVENT_CAPACITY: usize = 256;

pub trait Storage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: String) -> AppResult<()>;
    fn remove_item(&self, key: &str) -> AppResult<()>;
    fn keys(&self) -> Vec<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct TabId(Uuid);

impl TabId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for TabId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A change to one key, published after the write has happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub source: TabId,
}

/// One origin's storage area plus its change channel.
#[derive(Clone)]
pub struct SharedStorage {
    backend: Arc<dyn Storage>,
    events: broadcast::Sender<StorageEvent>,
}

impl SharedStorage {
    pub fn new(backend: impl Storage + 'static) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            backend: Arc::new(backend),
            events,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    pub fn handle(&self, tab: TabId) -> StorageHandle {
        StorageHandle {
            shared: self.clone(),
            tab,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.events.subscribe()
    }

    pub fn keys(&self) -> Vec<String> {
        self.backend.keys()
    }
}

/// Access to a [`SharedStorage`] on behalf of one tab.
#[derive(Clone)]
pub struct StorageHandle {
    shared: SharedStorage,
    tab: TabId,
}

impl StorageHandle {
    pub fn tab(&self) -> TabId {
        self.tab
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.shared.subscribe()
    }

    pub fn get_item(&self, key: &str) -> Option<String> {
        self.shared.backend.get_item(key)
    }

    pub fn set_item(&self, key: &str, value: String) -> AppResult<()> {
        let old_value = self.shared.backend.get_item(key);
        self.shared.backend.set_item(key, value.clone())?;
        if old_value.as_deref() != Some(value.as_str()) {
            self.publish(key, old_value, Some(value));
        }
        Ok(())
    }

    pub fn remove_item(&self, key: &str) -> AppResult<()> {
        let old_value = self.shared.backend.get_item(key);
        self.shared.backend.remove_item(key)?;
        if old_value.is_some() {
            self.publish(key, old_value, None);
        }
        Ok(())
    }

    /// Read a JSON array, falling back to an empty list when the key is
    /// missing, null or malformed.
    pub fn read_list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        self.read_json::<Option<Vec<T>>>(key)
            .flatten()
            .unwrap_or_default()
    }

    /// Read a JSON value, `None` when missing or malformed.
    pub fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_item(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(key, error = %err, "ignoring malformed storage value");
                None
            }
        }
    }

    pub fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> AppResult<()> {
        self.set_item(key, serde_json::to_string(value)?)
    }

    fn publish(&self, key: &str, old_value: Option<String>, new_value: Option<String>) {
        let event = StorageEvent {
            key: key.to_string(),
            old_value,
            new_value,
            source: self.tab,
        };
        // No subscribers is fine: nobody else has the origin open.
        let _ = self.shared.events.send(event);
    }
}
