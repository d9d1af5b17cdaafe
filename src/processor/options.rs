// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Typed options handed to processors at construction and at each invocation.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::errors::ProcessorError;

/// Options for a single `process` invocation.
///
/// `input_vcon_index` selects the context slot to work on. Any other members
/// are kept verbatim in `extra` so processor specific fields survive even when
/// no validation against a declared options type was requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessorOptions {
    #[serde(default)]
    pub input_vcon_index: usize,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProcessorOptions {
    pub fn new(input_vcon_index: usize) -> Self {
        Self {
            input_vcon_index,
            extra: Map::new(),
        }
    }

    /// Build options from a raw JSON value; `null` yields the defaults.
    pub fn from_value(value: &Value) -> Result<Self, ProcessorError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        Self::deserialize(value).map_err(|e| ProcessorError::InvalidOptions {
            options_type: "ProcessorOptions".to_string(),
            message: e.to_string(),
        })
    }

    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.extra.insert(key.to_string(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Deserialize these options into a processor's own options struct.
    pub fn parse<T: DeserializeOwned>(&self, options_type: &str) -> Result<T, ProcessorError> {
        let value = serde_json::to_value(self).map_err(|e| ProcessorError::InvalidOptions {
            options_type: options_type.to_string(),
            message: e.to_string(),
        })?;
        T::deserialize(&value).map_err(|e| ProcessorError::InvalidOptions {
            options_type: options_type.to_string(),
            message: e.to_string(),
        })
    }
}

fn validate_as<T: DeserializeOwned>(value: &Value) -> Result<(), String> {
    T::deserialize(value).map(|_| ()).map_err(|e| e.to_string())
}

/// The options type a processor declares for its `process` parameters.
///
/// Holds a validator monomorphized for the processor's options struct, so a
/// pipeline definition can be checked without instantiating any options.
#[derive(Clone, Copy)]
pub struct OptionsType {
    name: &'static str,
    validate: fn(&Value) -> Result<(), String>,
}

impl OptionsType {
    pub fn of<T: DeserializeOwned>(name: &'static str) -> Self {
        Self {
            name,
            validate: validate_as::<T>,
        }
    }

    /// The base options type: only `input_vcon_index`, extras allowed.
    pub fn base() -> Self {
        Self::of::<ProcessorOptions>("ProcessorOptions")
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn validate(&self, value: &Value) -> Result<(), ProcessorError> {
        let value = if value.is_null() {
            Value::Object(Map::new())
        } else {
            value.clone()
        };
        (self.validate)(&value).map_err(|message| ProcessorError::InvalidOptions {
            options_type: self.name.to_string(),
            message,
        })
    }

    /// Validate `value` against this type and build the generic options from it.
    pub fn build(&self, value: &Value) -> Result<ProcessorOptions, ProcessorError> {
        self.validate(value)?;
        ProcessorOptions::from_value(value)
    }
}

impl fmt::Debug for OptionsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionsType").field("name", &self.name).finish()
    }
}

/// Options passed to a processor constructor when it is registered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InitOptions(pub Map<String, Value>);

impl InitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.0.insert(key.to_string(), value);
        self
    }

    /// Deserialize into the init options struct of `class_name`.
    pub fn parse<T: DeserializeOwned>(&self, class_name: &str) -> Result<T, ProcessorError> {
        T::deserialize(&Value::Object(self.0.clone())).map_err(|e| {
            ProcessorError::InvalidInitOptions {
                class_name: class_name.to_string(),
                message: e.to_string(),
            }
        })
    }
}

impl From<Map<String, Value>> for InitOptions {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
