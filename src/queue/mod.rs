// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pipeline jobs and the in-memory job queue backend.

mod job;
mod memory;
pub mod priority_job_queue;

pub use job::{JobId, PipelineJob};
pub use memory::InMemoryJobQueue;
pub use priority_job_queue::PriorityJobQueue;

use std::sync::Arc;

use crate::errors::ConfigError;
use crate::traits::JobQueue;

/// Build the job queue named by `url`; only `memory://` is supported.
pub fn open_job_queue(url: &str) -> Result<Arc<dyn JobQueue>, ConfigError> {
    if url.starts_with("memory://") {
        Ok(Arc::new(InMemoryJobQueue::new()))
    } else {
        Err(ConfigError::UnsupportedUrl(url.to_string()))
    }
}
