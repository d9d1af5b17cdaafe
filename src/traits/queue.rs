// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::QueueError;
use crate::queue::{JobId, PipelineJob};

/// Durable store of pending pipeline jobs, partitioned into named queues.
#[async_trait]
pub trait JobQueue: Send + Sync {
    async fn enqueue(&self, queue_name: &str, job: PipelineJob) -> Result<JobId, QueueError>;

    /// Atomically remove and return the next job, or `None` if the queue is empty.
    async fn claim_next(&self, queue_name: &str) -> Result<Option<PipelineJob>, QueueError>;

    async fn len(&self, queue_name: &str) -> Result<usize, QueueError>;

    async fn queue_names(&self) -> Result<Vec<String>, QueueError>;
}
