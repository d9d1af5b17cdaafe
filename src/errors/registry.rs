// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for processor registration lookups.

use std::error::Error;
use std::fmt;

/// Why a registered processor has no usable instance
#[derive(Debug, Clone, PartialEq)]
pub enum NotInstantiatedReason {
    /// Registration never tried to load the plugin module
    LoadNotAttempted,

    /// The plugin module named in the registration does not exist
    ModuleNotFound { module_name: String },

    /// The module exists but does not export the requested class
    ClassNotFound {
        module_name: String,
        class_name: String,
    },

    /// The class constructor rejected its init options or failed
    ConstructionFailed { reason: String },
}

impl fmt::Display for NotInstantiatedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotInstantiatedReason::LoadNotAttempted => write!(f, "load not attempted"),
            NotInstantiatedReason::ModuleNotFound { module_name } => {
                write!(f, "module: {} not found", module_name)
            }
            NotInstantiatedReason::ClassNotFound {
                module_name,
                class_name,
            } => write!(
                f,
                "class: {} not found in module: {}",
                class_name, module_name
            ),
            NotInstantiatedReason::ConstructionFailed { reason } => {
                write!(f, "construction failed: {}", reason)
            }
        }
    }
}

/// Errors that can occur when looking up a processor instance
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryError {
    /// No registration exists under the given name
    NotRegistered { name: String },

    /// A registration exists but holds no usable instance
    NotInstantiated {
        name: String,
        reason: NotInstantiatedReason,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::NotRegistered { name } => {
                write!(f, "VconProcessor not registered under the name: {}", name)
            }
            RegistryError::NotInstantiated { name, reason } => {
                write!(f, "VconProcessor {} not instantiated, {}", name, reason)
            }
        }
    }
}

impl Error for RegistryError {}
