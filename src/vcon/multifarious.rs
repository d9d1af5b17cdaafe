// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Lazy, memoizing cache over the interchangeable forms of one vCon.
//!
//! A [`MultifariousVcon`] holds one authoritative form plus any forms derived
//! from it. Derived forms are computed on demand by walking a fixed route
//! table and every intermediate result is cached, so asking for the JSON text
//! of a dict-backed vCon also leaves the parsed object behind for the next
//! caller.
//!
//! ```text
//!   from \ to | Uuid        Object   Dict         Json
//!   ----------+------------------------------------------------
//!   Object    | direct      -        direct       direct
//!   Dict      | direct      direct   via Object   via Object
//!   Json      | via Object  direct   via Object   -
//!   Uuid      | -           storage lookup, then as Object
//! ```

use serde_json::{Map, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::traits::VconStorage;
use crate::vcon::{Vcon, VconForm, VconValue};

/// Source preference when no cached value of the target form exists.
const SOURCE_PREFERENCE: [VconForm; 3] = [VconForm::Object, VconForm::Dict, VconForm::Json];

/// Forms supplied alongside an authoritative value to pre-seed the cache.
#[derive(Debug, Clone, Default)]
pub struct ExtraForms {
    pub uuid: Option<Uuid>,
    pub object: Option<Vcon>,
    pub dict: Option<Map<String, Value>>,
    pub json: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MultifariousVcon {
    uuid: Option<Uuid>,
    object: Option<Box<Vcon>>,
    dict: Option<Map<String, Value>>,
    json: Option<String>,
    authoritative: Option<VconForm>,
}

impl MultifariousVcon {
    pub fn new(value: VconValue) -> Self {
        let mut cache = Self::default();
        cache.update(value, ExtraForms::default());
        cache
    }

    /// Replace every cached form with `value` and any supplied extras.
    ///
    /// The UUID is cached right away when it can be read without parsing text.
    pub fn update(&mut self, value: VconValue, extra: ExtraForms) {
        let form = value.form();
        *self = Self::default();
        self.authoritative = Some(form);
        self.store(value);

        if form != VconForm::Json {
            if let Some(json) = extra.json {
                self.json = Some(json);
            }
        }
        if form != VconForm::Dict {
            if let Some(dict) = extra.dict {
                self.dict = Some(dict);
            }
        }
        if form != VconForm::Object {
            if let Some(object) = extra.object {
                self.object = Some(Box::new(object));
            }
        }

        if form != VconForm::Uuid {
            if let Some(uuid) = extra.uuid {
                self.uuid = Some(uuid);
            } else if let Some(object) = &self.object {
                self.uuid = Some(object.uuid);
            } else if let Some(dict) = &self.dict {
                self.uuid = uuid_from_dict(dict);
            }
        }
    }

    pub fn authoritative_form(&self) -> Option<VconForm> {
        self.authoritative
    }

    /// Forms currently held, without triggering any conversion.
    pub fn cached_forms(&self) -> Vec<VconForm> {
        [VconForm::Uuid, VconForm::Object, VconForm::Dict, VconForm::Json]
            .into_iter()
            .filter(|form| self.has(*form))
            .collect()
    }

    /// Cached value of `form`, without triggering any conversion.
    pub fn peek(&self, form: VconForm) -> Option<VconValue> {
        match form {
            VconForm::Uuid => self.uuid.map(VconValue::Uuid),
            VconForm::Object => self.object.clone().map(VconValue::Object),
            VconForm::Dict => self.dict.clone().map(VconValue::Dict),
            VconForm::Json => self.json.clone().map(VconValue::Json),
        }
    }

    /// The vCon in the requested form, converting and caching as needed.
    ///
    /// Returns `None` when the form cannot be produced, e.g. malformed JSON
    /// text or a UUID that storage does not know.
    pub async fn get(&mut self, form: VconForm, storage: &dyn VconStorage) -> Option<VconValue> {
        if self.resolve(form, storage).await {
            self.peek(form)
        } else {
            None
        }
    }

    pub async fn uuid(&mut self, storage: &dyn VconStorage) -> Option<Uuid> {
        self.resolve(VconForm::Uuid, storage).await;
        self.uuid
    }

    pub async fn object(&mut self, storage: &dyn VconStorage) -> Option<&Vcon> {
        self.resolve(VconForm::Object, storage).await;
        self.object.as_deref()
    }

    pub async fn dict(&mut self, storage: &dyn VconStorage) -> Option<&Map<String, Value>> {
        self.resolve(VconForm::Dict, storage).await;
        self.dict.as_ref()
    }

    pub async fn json(&mut self, storage: &dyn VconStorage) -> Option<&str> {
        self.resolve(VconForm::Json, storage).await;
        self.json.as_deref()
    }

    /// Make `target` available in the cache; true on success.
    async fn resolve(&mut self, target: VconForm, storage: &dyn VconStorage) -> bool {
        if self.has(target) {
            return true;
        }

        if self.cached_forms() == [VconForm::Uuid] {
            self.fetch_from_storage(storage).await;
        }

        let Some(source) = SOURCE_PREFERENCE.into_iter().find(|form| self.has(*form)) else {
            return false;
        };

        let mut current = source;
        for &next in route(source, target) {
            match self.derive(current, next) {
                Some(value) => self.store(value),
                None => {
                    debug!(from = ?current, to = ?next, "vCon form conversion failed");
                    return false;
                }
            }
            current = next;
        }

        self.has(target)
    }

    async fn fetch_from_storage(&mut self, storage: &dyn VconStorage) {
        let Some(uuid) = self.uuid else {
            return;
        };

        match storage.get(uuid).await {
            Ok(Some(vcon)) => self.object = Some(Box::new(vcon)),
            Ok(None) => warn!(%uuid, "unable to get vCon from storage"),
            Err(e) => warn!(%uuid, error = %e, "vCon storage lookup failed"),
        }
    }

    /// Convert the cached `from` form into `to` in a single step.
    fn derive(&self, from: VconForm, to: VconForm) -> Option<VconValue> {
        match (from, to) {
            (VconForm::Object, VconForm::Uuid) => self.object.as_ref().map(|v| VconValue::Uuid(v.uuid)),
            (VconForm::Object, VconForm::Dict) => {
                self.object.as_ref()?.to_dict().ok().map(VconValue::Dict)
            }
            (VconForm::Object, VconForm::Json) => {
                self.object.as_ref()?.to_json().ok().map(VconValue::Json)
            }
            (VconForm::Dict, VconForm::Uuid) => uuid_from_dict(self.dict.as_ref()?).map(VconValue::Uuid),
            (VconForm::Dict, VconForm::Object) => Vcon::from_dict(self.dict.clone()?)
                .ok()
                .map(|v| VconValue::Object(Box::new(v))),
            (VconForm::Json, VconForm::Object) => Vcon::from_json(self.json.as_deref()?)
                .ok()
                .map(|v| VconValue::Object(Box::new(v))),
            _ => None,
        }
    }

    fn has(&self, form: VconForm) -> bool {
        match form {
            VconForm::Uuid => self.uuid.is_some(),
            VconForm::Object => self.object.is_some(),
            VconForm::Dict => self.dict.is_some(),
            VconForm::Json => self.json.is_some(),
        }
    }

    fn store(&mut self, value: VconValue) {
        match value {
            VconValue::Uuid(uuid) => self.uuid = Some(uuid),
            VconValue::Object(object) => self.object = Some(object),
            VconValue::Dict(dict) => self.dict = Some(dict),
            VconValue::Json(json) => self.json = Some(json),
        }
    }
}

/// Intermediate forms to walk, in order, to turn `from` into `to`.
fn route(from: VconForm, to: VconForm) -> &'static [VconForm] {
    match (from, to) {
        (VconForm::Object, VconForm::Uuid) => &[VconForm::Uuid],
        (VconForm::Object, VconForm::Dict) => &[VconForm::Dict],
        (VconForm::Object, VconForm::Json) => &[VconForm::Json],
        (VconForm::Dict, VconForm::Uuid) => &[VconForm::Uuid],
        (VconForm::Dict, VconForm::Object) => &[VconForm::Object],
        (VconForm::Dict, VconForm::Json) => &[VconForm::Object, VconForm::Json],
        (VconForm::Json, VconForm::Object) => &[VconForm::Object],
        (VconForm::Json, VconForm::Uuid) => &[VconForm::Object, VconForm::Uuid],
        (VconForm::Json, VconForm::Dict) => &[VconForm::Object, VconForm::Dict],
        _ => &[],
    }
}

fn uuid_from_dict(dict: &Map<String, Value>) -> Option<Uuid> {
    dict.get("uuid")?.as_str()?.parse().ok()
}
