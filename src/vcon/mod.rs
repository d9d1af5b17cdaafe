// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! vCon conversation records and their interchangeable representations.

mod model;
mod multifarious;

pub use model::{Vcon, VCON_VERSION};
pub use multifarious::{ExtraForms, MultifariousVcon};

use serde_json::{Map, Value};
use uuid::Uuid;

/// The representations a vCon can be held in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VconForm {
    Uuid,
    Object,
    Dict,
    Json,
}

/// A vCon in exactly one of its representations.
#[derive(Debug, Clone, PartialEq)]
pub enum VconValue {
    Uuid(Uuid),
    Object(Box<Vcon>),
    Dict(Map<String, Value>),
    Json(String),
}

impl VconValue {
    pub fn form(&self) -> VconForm {
        match self {
            VconValue::Uuid(_) => VconForm::Uuid,
            VconValue::Object(_) => VconForm::Object,
            VconValue::Dict(_) => VconForm::Dict,
            VconValue::Json(_) => VconForm::Json,
        }
    }

    /// Classify free text as either a UUID reference or serialized vCon JSON.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        match text.trim().parse::<Uuid>() {
            Ok(uuid) => VconValue::Uuid(uuid),
            Err(_) => VconValue::Json(text),
        }
    }
}

impl From<Vcon> for VconValue {
    fn from(vcon: Vcon) -> Self {
        VconValue::Object(Box::new(vcon))
    }
}

impl From<Uuid> for VconValue {
    fn from(uuid: Uuid) -> Self {
        VconValue::Uuid(uuid)
    }
}

impl From<Map<String, Value>> for VconValue {
    fn from(dict: Map<String, Value>) -> Self {
        VconValue::Dict(dict)
    }
}
