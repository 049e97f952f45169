//! Key-value store backends
//! Values are UTF-8 text; the gateway layers the record shapes on top.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sled::Db;

/// Asynchronous durable key-value store
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Sled-backed store with crash safety
pub struct SledStore {
    db: Arc<Db>,
}

impl SledStore {
    /// Create or open the store at the default location
    pub fn new() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    /// Open the store at a specific path
    pub fn open(path: PathBuf) -> Result<Self> {
        let db = sled::open(&path)?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Get the default database path
    fn default_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir().ok_or_else(|| anyhow!("No config directory found"))?;
        path.push("feedcore");
        path.push("feedcore.db");

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        Ok(path)
    }
}

#[async_trait]
impl KeyValueStore for SledStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match self.db.get(key.as_bytes())? {
            Some(bytes) => Ok(Some(String::from_utf8(bytes.to_vec())?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db.insert(key.as_bytes(), value.as_bytes())?;
        self.db.flush_async().await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.db.remove(key.as_bytes())?;
        self.db.flush_async().await?;
        Ok(())
    }
}

impl Clone for SledStore {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
        }
    }
}

/// In-memory store for tests and dry runs
#[derive(Default)]
pub struct MemoryStore {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let map = self.map.lock().map_err(|_| anyhow!("store lock poisoned"))?;
        Ok(map.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.map.lock().map_err(|_| anyhow!("store lock poisoned"))?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut map = self.map.lock().map_err(|_| anyhow!("store lock poisoned"))?;
        map.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn sled_store_round_trip() {
        let dir = tempdir().unwrap();
        let store = SledStore::open(dir.path().join("test.db")).unwrap();

        store.set("key1", "value1").await.unwrap();
        assert_eq!(store.get("key1").await.unwrap(), Some("value1".to_string()));

        store.remove("key1").await.unwrap();
        assert_eq!(store.get("key1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryStore::new();

        assert_eq!(store.get("missing").await.unwrap(), None);
        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));
        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }
}
