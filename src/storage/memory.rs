// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::StorageError;
use crate::traits::{KeyValueStore, VconStorage};
use crate::vcon::Vcon;

/// Process-local vCon store with optional per-vCon leases.
#[derive(Debug, Default)]
pub struct InMemoryVconStorage {
    vcons: RwLock<HashMap<Uuid, Vcon>>,
    locks: RwLock<HashMap<Uuid, String>>,
}

impl InMemoryVconStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a vCon, replacing any existing copy.
    pub async fn insert(&self, vcon: Vcon) {
        self.vcons.write().await.insert(vcon.uuid, vcon);
    }

    /// Take a lease on `uuid` under `lock_key`; false if someone else holds it.
    pub async fn lock(&self, uuid: Uuid, lock_key: &str) -> bool {
        let mut locks = self.locks.write().await;
        match locks.get(&uuid) {
            Some(holder) => holder == lock_key,
            None => {
                locks.insert(uuid, lock_key.to_string());
                true
            }
        }
    }

    pub async fn is_locked(&self, uuid: Uuid) -> bool {
        self.locks.read().await.contains_key(&uuid)
    }

    pub async fn len(&self) -> usize {
        self.vcons.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.vcons.read().await.is_empty()
    }
}

#[async_trait]
impl VconStorage for InMemoryVconStorage {
    async fn get(&self, uuid: Uuid) -> Result<Option<Vcon>, StorageError> {
        Ok(self.vcons.read().await.get(&uuid).cloned())
    }

    async fn set(&self, vcon: &Vcon) -> Result<(), StorageError> {
        self.vcons.write().await.insert(vcon.uuid, vcon.clone());
        Ok(())
    }

    async fn delete(&self, uuid: Uuid) -> Result<bool, StorageError> {
        Ok(self.vcons.write().await.remove(&uuid).is_some())
    }

    async fn release_lock(&self, uuid: Uuid, lock_key: &str) -> Result<(), StorageError> {
        let mut locks = self.locks.write().await;
        if locks.get(&uuid).is_some_and(|holder| holder == lock_key) {
            locks.remove(&uuid);
        }
        Ok(())
    }
}

/// Process-local string key-value store.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        Ok(self
            .entries
            .read()
            .await
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_vcon_round_trip_and_delete() {
        let storage = InMemoryVconStorage::new();
        let vcon = Vcon::new();

        assert_eq!(storage.get(vcon.uuid).await.unwrap(), None);
        storage.set(&vcon).await.unwrap();
        assert_eq!(storage.get(vcon.uuid).await.unwrap(), Some(vcon.clone()));

        assert!(storage.delete(vcon.uuid).await.unwrap());
        assert!(!storage.delete(vcon.uuid).await.unwrap());
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_lock_release_requires_matching_key() {
        let storage = InMemoryVconStorage::new();
        let uuid = Uuid::new_v4();

        assert!(storage.lock(uuid, "job-a").await);
        assert!(!storage.lock(uuid, "job-b").await);

        storage.release_lock(uuid, "job-b").await.unwrap();
        assert!(storage.is_locked(uuid).await);

        storage.release_lock(uuid, "job-a").await.unwrap();
        assert!(!storage.is_locked(uuid).await);
        assert!(storage.lock(uuid, "job-b").await);
    }

    #[tokio::test]
    async fn test_key_value_prefix_listing() {
        let store = InMemoryKeyValueStore::new();
        store.set("pipeline:a", "1".to_string()).await.unwrap();
        store.set("pipeline:b", "2".to_string()).await.unwrap();
        store.set("other:c", "3".to_string()).await.unwrap();

        let mut keys = store.keys("pipeline:").await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["pipeline:a", "pipeline:b"]);

        assert!(store.delete("pipeline:a").await.unwrap());
        assert!(!store.delete("pipeline:a").await.unwrap());
        assert_eq!(store.get("pipeline:b").await.unwrap(), Some("2".to_string()));
    }
}
