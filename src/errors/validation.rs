// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

/// Errors raised while validating pipeline definitions and processor options
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A field holds a value of the wrong type or out of range
    InvalidField {
        /// Dotted path of the offending field, e.g. `pipeline_options.timeout`
        field: String,
        /// What was wrong with the value
        message: String,
    },
    /// A pipeline references a processor name that is not in the registry
    ProcessorNotRegistered {
        /// The unknown processor name
        processor_name: String,
    },
    /// A pipeline references a registered processor that failed to load
    ProcessorNotInstantiated {
        processor_name: String,
        reason: String,
    },
    /// Options for a processor do not match its declared options type
    InvalidProcessorOptions {
        /// The processor whose options were rejected
        processor_name: String,
        /// Name of the declared options type
        options_type: String,
        /// Deserialization failure details
        message: String,
    },
    /// The definition document itself could not be parsed
    MalformedDefinition {
        /// Parser error details
        message: String,
    },
}

impl ValidationError {
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The field path this error refers to, when it refers to one.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::InvalidField { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidField { field, message } => {
                write!(f, "{}: {}", field, message)
            }
            ValidationError::ProcessorNotRegistered { processor_name } => {
                write!(f, "processor: {} not registered", processor_name)
            }
            ValidationError::ProcessorNotInstantiated {
                processor_name,
                reason,
            } => {
                write!(f, "processor: {} not instantiated, {}", processor_name, reason)
            }
            ValidationError::InvalidProcessorOptions {
                processor_name,
                options_type,
                message,
            } => {
                write!(
                    f,
                    "processor: {} options do not match {}: {}",
                    processor_name, options_type, message
                )
            }
            ValidationError::MalformedDefinition { message } => {
                write!(f, "malformed pipeline definition: {}", message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
