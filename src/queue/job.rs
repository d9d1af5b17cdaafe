// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type JobId = Uuid;

/// A request to run a named pipeline over stored vCons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineJob {
    pub id: JobId,
    pub pipeline_name: String,
    pub vcon_uuids: Vec<Uuid>,
    /// Higher runs first within a queue
    #[serde(default)]
    pub priority: i32,
    pub enqueued_at: DateTime<Utc>,
}

impl PipelineJob {
    pub fn new(pipeline_name: impl Into<String>, vcon_uuids: Vec<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            pipeline_name: pipeline_name.into(),
            vcon_uuids,
            priority: 0,
            enqueued_at: Utc::now(),
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// The lock key used when the job's vCons are added to a context.
    pub fn lock_key(&self) -> String {
        self.id.to_string()
    }
}
