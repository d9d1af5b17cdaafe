// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::{
    ProcessorError, QueueError, RegistryError, StorageError, ValidationError, VconIoError,
};
use crate::pipeline::RunState;
use thiserror::Error;
use uuid::Uuid;

/// Errors from the pipeline store, job handler and service facade.
///
/// Processor failures and timeouts during a run are not errors at this level;
/// they are reported through [`crate::pipeline::RunStatus`].
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("pipeline: {name} not found")]
    PipelineNotFound { name: String },

    #[error("vCon: {uuid} not found")]
    VconNotFound { uuid: Uuid },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Io(#[from] VconIoError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error("illegal run state transition: {from:?} -> {to:?}")]
    InvalidRunTransition { from: RunState, to: RunState },
}

/// Why a single pipeline step failed.
///
/// Carried inside [`crate::pipeline::RunStatus::Failed`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StepError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Processor(#[from] ProcessorError),

    /// The processor handed back a context missing a vCon it was given.
    #[error("processor returned {returned} of {expected} vCons, missing: {missing}")]
    ContextTruncated {
        expected: usize,
        returned: usize,
        missing: Uuid,
    },

    /// A processor declared read-only updated a vCon anyway.
    #[error("processor {processor_name} may not modify vCons but made {updates} update(s)")]
    ModifyPolicyViolated {
        processor_name: String,
        updates: u64,
    },
}
