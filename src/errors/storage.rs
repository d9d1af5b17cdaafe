// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors surfaced by vCon storage and key-value backends.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by job queue backends.
#[derive(Error, Debug)]
pub enum QueueError {
    #[error("queue backend error: {0}")]
    Backend(String),

    #[error("queue name must not be empty")]
    EmptyQueueName,
}
