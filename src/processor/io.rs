// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The context object passed through every processor of a pipeline run.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::VconIoError;
use crate::traits::VconStorage;
use crate::vcon::{ExtraForms, MultifariousVcon, Vcon, VconForm, VconValue};

#[derive(Debug, Clone)]
struct VconSlot {
    vcon: MultifariousVcon,
    lock_key: Option<String>,
    pending_update: bool,
}

impl VconSlot {
    fn is_writable(&self) -> bool {
        self.lock_key.is_some() || self.pending_update
    }
}

/// Ordered vCon slots plus named output parameters.
///
/// A slot is writable when it was added under a lock key, or added as a new
/// (non-readonly, unlocked) vCon. Locked slots become pending only once
/// updated; unlocked writable slots are pending from the start.
#[derive(Clone)]
pub struct ProcessorIo {
    storage: Arc<dyn VconStorage>,
    slots: Vec<VconSlot>,
    parameters: Map<String, Value>,
    update_count: u64,
}

impl ProcessorIo {
    pub fn new(storage: Arc<dyn VconStorage>) -> Self {
        Self {
            storage,
            slots: Vec::new(),
            parameters: Map::new(),
            update_count: 0,
        }
    }

    pub fn storage(&self) -> &Arc<dyn VconStorage> {
        &self.storage
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Add a vCon in any form and return its slot index.
    ///
    /// An empty `lock_key` counts as no lock.
    pub async fn add_vcon(
        &mut self,
        value: impl Into<VconValue>,
        lock_key: Option<&str>,
        readonly: bool,
    ) -> Result<usize, VconIoError> {
        let lock_key = lock_key.filter(|key| !key.is_empty());
        if lock_key.is_some() && readonly {
            return Err(VconIoError::LockedReadonly);
        }

        let mut vcon = MultifariousVcon::new(value.into());
        let uuid = vcon
            .uuid(self.storage.as_ref())
            .await
            .ok_or(VconIoError::UuidUnresolvable)?;

        if let Some(index) = self.find_index(uuid).await {
            return Err(VconIoError::DuplicateUuid { uuid, index });
        }

        self.slots.push(VconSlot {
            vcon,
            lock_key: lock_key.map(str::to_string),
            pending_update: !readonly && lock_key.is_none(),
        });
        Ok(self.slots.len() - 1)
    }

    /// Fetch the vCon at `index` in the requested form.
    pub async fn get_vcon(&mut self, index: usize, form: VconForm) -> Option<VconValue> {
        let slot = self.slots.get_mut(index)?;
        slot.vcon.get(form, self.storage.as_ref()).await
    }

    /// Owned copy of the parsed vCon at `index`.
    pub async fn get_vcon_object(&mut self, index: usize) -> Option<Vcon> {
        let slot = self.slots.get_mut(index)?;
        slot.vcon.object(self.storage.as_ref()).await.cloned()
    }

    pub async fn vcon_uuid(&mut self, index: usize) -> Option<Uuid> {
        let slot = self.slots.get_mut(index)?;
        slot.vcon.uuid(self.storage.as_ref()).await
    }

    /// Replace the slot whose UUID matches `value` and mark it pending.
    pub async fn update_vcon(&mut self, value: impl Into<VconValue>) -> Result<usize, VconIoError> {
        let value = value.into();
        let mut incoming = MultifariousVcon::new(value.clone());
        let uuid = incoming
            .uuid(self.storage.as_ref())
            .await
            .ok_or(VconIoError::UuidUnresolvable)?;

        let index = self
            .find_index(uuid)
            .await
            .ok_or(VconIoError::NotFound { uuid })?;

        let slot = &mut self.slots[index];
        if !slot.is_writable() {
            return Err(VconIoError::NoWritePermission { uuid, index });
        }

        slot.vcon.update(
            value,
            ExtraForms {
                uuid: Some(uuid),
                ..ExtraForms::default()
            },
        );
        slot.pending_update = true;
        self.update_count += 1;
        Ok(index)
    }

    pub fn lock_key(&self, index: usize) -> Option<&str> {
        self.slots.get(index).and_then(|slot| slot.lock_key.as_deref())
    }

    pub fn is_pending_update(&self, index: usize) -> bool {
        self.slots.get(index).is_some_and(|slot| slot.pending_update)
    }

    /// Pending-update flag for every slot, in slot order.
    pub fn vcons_modified(&self) -> Vec<bool> {
        self.slots.iter().map(|slot| slot.pending_update).collect()
    }

    /// Number of successful `update_vcon` calls over the context's lifetime.
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// UUIDs of every slot, in slot order.
    pub async fn uuids(&mut self) -> Vec<Option<Uuid>> {
        let mut uuids = Vec::with_capacity(self.slots.len());
        for slot in self.slots.iter_mut() {
            uuids.push(slot.vcon.uuid(self.storage.as_ref()).await);
        }
        uuids
    }

    /// Set an output parameter, renamed through `rename` when it has an entry.
    pub fn set_parameter(&mut self, name: &str, value: Value, rename: &HashMap<String, String>) {
        let key = rename.get(name).map(String::as_str).unwrap_or(name);
        self.parameters.insert(key.to_string(), value);
    }

    pub fn get_parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }

    pub fn parameters(&self) -> &Map<String, Value> {
        &self.parameters
    }

    async fn find_index(&mut self, uuid: Uuid) -> Option<usize> {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.vcon.uuid(self.storage.as_ref()).await == Some(uuid) {
                return Some(index);
            }
        }
        None
    }
}

impl fmt::Debug for ProcessorIo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorIo")
            .field("slots", &self.slots)
            .field("parameters", &self.parameters)
            .field("update_count", &self.update_count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryVconStorage;
    use serde_json::json;

    fn context() -> (ProcessorIo, Arc<InMemoryVconStorage>) {
        let storage = Arc::new(InMemoryVconStorage::new());
        (ProcessorIo::new(storage.clone()), storage)
    }

    #[tokio::test]
    async fn test_add_vcon_modes() {
        struct TestCase {
            name: &'static str,
            lock_key: Option<&'static str>,
            readonly: bool,
            expected: Result<bool, VconIoError>,
        }

        let test_cases = vec![
            TestCase {
                name: "locked writable",
                lock_key: Some("lock-1"),
                readonly: false,
                expected: Ok(false),
            },
            TestCase {
                name: "readonly",
                lock_key: None,
                readonly: true,
                expected: Ok(false),
            },
            TestCase {
                name: "new vcon",
                lock_key: None,
                readonly: false,
                expected: Ok(true),
            },
            TestCase {
                name: "empty lock key is no lock",
                lock_key: Some(""),
                readonly: false,
                expected: Ok(true),
            },
            TestCase {
                name: "locked readonly",
                lock_key: Some("lock-1"),
                readonly: true,
                expected: Err(VconIoError::LockedReadonly),
            },
        ];

        for test_case in test_cases {
            let (mut io, _) = context();
            let result = io
                .add_vcon(Vcon::new(), test_case.lock_key, test_case.readonly)
                .await
                .map(|index| io.is_pending_update(index));
            assert_eq!(result, test_case.expected, "Test case '{}'", test_case.name);
        }
    }

    #[tokio::test]
    async fn test_duplicate_uuid_rejected() {
        let (mut io, _) = context();
        let vcon = Vcon::new();
        io.add_vcon(vcon.clone(), None, false).await.unwrap();

        // Same record in another form still collides
        let dict = vcon.to_dict().unwrap();
        let result = io.add_vcon(dict, None, true).await;
        assert_eq!(
            result,
            Err(VconIoError::DuplicateUuid {
                uuid: vcon.uuid,
                index: 0
            })
        );
        assert_eq!(io.len(), 1);
    }

    #[tokio::test]
    async fn test_unresolvable_uuid() {
        let (mut io, _) = context();

        let garbage = io.add_vcon(VconValue::from_text("not json"), None, true).await;
        assert_eq!(garbage, Err(VconIoError::UuidUnresolvable));
    }

    #[tokio::test]
    async fn test_add_by_uuid_loads_from_storage() {
        let (mut io, storage) = context();
        let mut vcon = Vcon::new();
        vcon.subject = Some("stored".to_string());
        storage.insert(vcon.clone()).await;

        let index = io.add_vcon(vcon.uuid, Some("job-1"), false).await.unwrap();
        assert_eq!(io.get_vcon_object(index).await, Some(vcon));
        assert_eq!(io.lock_key(index), Some("job-1"));
    }

    #[tokio::test]
    async fn test_update_permissions() {
        let (mut io, _) = context();
        let locked = Vcon::new();
        let readonly = Vcon::new();
        let fresh = Vcon::new();
        io.add_vcon(locked.clone(), Some("lock"), false).await.unwrap();
        io.add_vcon(readonly.clone(), None, true).await.unwrap();
        io.add_vcon(fresh.clone(), None, false).await.unwrap();
        assert_eq!(io.vcons_modified(), vec![false, false, true]);

        let mut changed = locked.clone();
        changed.subject = Some("changed".to_string());
        assert_eq!(io.update_vcon(changed.clone()).await, Ok(0));
        assert_eq!(io.get_vcon_object(0).await, Some(changed));

        assert_eq!(
            io.update_vcon(readonly.clone()).await,
            Err(VconIoError::NoWritePermission {
                uuid: readonly.uuid,
                index: 1
            })
        );
        assert_eq!(io.update_vcon(fresh).await, Ok(2));

        let stranger = Vcon::new();
        assert_eq!(
            io.update_vcon(stranger.clone()).await,
            Err(VconIoError::NotFound {
                uuid: stranger.uuid
            })
        );

        assert_eq!(io.vcons_modified(), vec![true, false, true]);
        assert_eq!(io.update_count(), 2);
    }

    #[tokio::test]
    async fn test_update_with_json_form() {
        let (mut io, _) = context();
        let vcon = Vcon::new();
        io.add_vcon(vcon.clone(), Some("lock"), false).await.unwrap();

        let mut changed = vcon.clone();
        changed.add_party(json!({"name": "Alice"}));
        let text = changed.to_json().unwrap();
        io.update_vcon(VconValue::Json(text.clone())).await.unwrap();

        assert_eq!(io.get_vcon(0, VconForm::Json).await, Some(VconValue::Json(text)));
        assert_eq!(io.get_vcon_object(0).await, Some(changed));
    }

    #[tokio::test]
    async fn test_out_of_range_reads() {
        let (mut io, _) = context();
        assert_eq!(io.get_vcon(0, VconForm::Dict).await, None);
        assert_eq!(io.get_vcon_object(3).await, None);
        assert_eq!(io.lock_key(0), None);
        assert!(!io.is_pending_update(0));
    }

    #[test]
    fn test_parameters_with_rename() {
        let (mut io, _) = context();
        let rename = HashMap::from([("count".to_string(), "party_total".to_string())]);

        io.set_parameter("count", json!(2), &rename);
        io.set_parameter("other", json!("x"), &rename);

        assert_eq!(io.get_parameter("party_total"), Some(&json!(2)));
        assert_eq!(io.get_parameter("count"), None);
        assert_eq!(io.get_parameter("other"), Some(&json!("x")));
    }
}
