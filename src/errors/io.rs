// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;
use uuid::Uuid;

/// Errors raised by [`crate::processor::ProcessorIo`] slot operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VconIoError {
    /// A lock key implies write-back, which contradicts a readonly add.
    #[error("should not lock readonly vCon")]
    LockedReadonly,

    /// The UUID of the given vCon could not be determined.
    #[error("unable to determine the UUID of the given vCon")]
    UuidUnresolvable,

    /// Another slot already holds a vCon with the same UUID.
    #[error("cannot add duplicate vCon to ProcessorIo, same uuid: {uuid} at index: {index}")]
    DuplicateUuid { uuid: Uuid, index: usize },

    /// No slot holds a vCon with this UUID.
    #[error("vCon {uuid} not found in ProcessorIo")]
    NotFound { uuid: Uuid },

    /// The slot is neither locked nor pending, so it is readonly.
    #[error("vCon {uuid} index: {index} has no write lock")]
    NoWritePermission { uuid: Uuid, index: usize },
}
