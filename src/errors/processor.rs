// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised by processor construction and execution.

use crate::errors::VconIoError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcessorError {
    /// The processor never declared whether it may modify vCons.
    #[error("processor method may modify vCons policy not set for: {class_name}")]
    MayModifyPolicyNotSet { class_name: String },

    /// The processor did not declare a version.
    #[error("{class_name} version not set")]
    VersionNotSet { class_name: String },

    /// Init options failed to deserialize into the processor's init type.
    #[error("invalid init options for {class_name}: {message}")]
    InvalidInitOptions { class_name: String, message: String },

    /// Per-invocation options failed to deserialize into the declared options type.
    #[error("invalid processor options for {options_type}: {message}")]
    InvalidOptions { options_type: String, message: String },

    /// `input_vcon_index` points past the end of the context.
    #[error("no vCon at input index: {index}")]
    InputVconMissing { index: usize },

    /// A context operation failed inside the processor.
    #[error(transparent)]
    Io(#[from] VconIoError),

    /// Processor-specific failure.
    #[error("{0}")]
    Failed(String),
}
