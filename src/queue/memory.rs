// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::errors::QueueError;
use crate::queue::{JobId, PipelineJob, PriorityJobQueue};
use crate::traits::JobQueue;

/// Process-local job queues keyed by name.
#[derive(Debug, Default)]
pub struct InMemoryJobQueue {
    queues: Mutex<HashMap<String, PriorityJobQueue>>,
}

impl InMemoryJobQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_name(queue_name: &str) -> Result<(), QueueError> {
    if queue_name.trim().is_empty() {
        Err(QueueError::EmptyQueueName)
    } else {
        Ok(())
    }
}

#[async_trait]
impl JobQueue for InMemoryJobQueue {
    async fn enqueue(&self, queue_name: &str, job: PipelineJob) -> Result<JobId, QueueError> {
        check_name(queue_name)?;
        let id = job.id;
        self.queues
            .lock()
            .await
            .entry(queue_name.to_string())
            .or_default()
            .push(job);
        Ok(id)
    }

    async fn claim_next(&self, queue_name: &str) -> Result<Option<PipelineJob>, QueueError> {
        check_name(queue_name)?;
        Ok(self
            .queues
            .lock()
            .await
            .get_mut(queue_name)
            .and_then(PriorityJobQueue::pop))
    }

    async fn len(&self, queue_name: &str) -> Result<usize, QueueError> {
        check_name(queue_name)?;
        Ok(self
            .queues
            .lock()
            .await
            .get(queue_name)
            .map_or(0, PriorityJobQueue::len))
    }

    async fn queue_names(&self) -> Result<Vec<String>, QueueError> {
        let mut names: Vec<String> = self.queues.lock().await.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}
