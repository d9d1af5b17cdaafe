// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::StorageError;
use crate::vcon::Vcon;

/// Durable vCon storage, keyed by UUID.
#[async_trait]
pub trait VconStorage: Send + Sync {
    async fn get(&self, uuid: Uuid) -> Result<Option<Vcon>, StorageError>;

    async fn set(&self, vcon: &Vcon) -> Result<(), StorageError>;

    /// Remove a vCon; `Ok(false)` if it was not stored.
    async fn delete(&self, uuid: Uuid) -> Result<bool, StorageError>;

    /// Release an external lease taken out under `lock_key`.
    ///
    /// Backends without leases keep the default no-op.
    async fn release_lock(&self, _uuid: Uuid, _lock_key: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

/// String key-value store backing pipeline definitions.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// Remove a key; `Ok(false)` if it was absent.
    async fn delete(&self, key: &str) -> Result<bool, StorageError>;

    /// All keys starting with `prefix`, in no particular order.
    async fn keys(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
}
