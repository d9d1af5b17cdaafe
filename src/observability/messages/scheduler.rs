// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the background job scheduler.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;
use uuid::Uuid;

/// Scheduler task started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use std::time::Duration;
/// use vcon_pipeline::observability::messages::scheduler::SchedulerStarted;
///
/// let queues = vec!["ingress".to_string()];
/// let msg = SchedulerStarted {
///     queues: &queues,
///     startup_delay: Duration::from_secs(5),
///     poll_interval: Duration::from_millis(100),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct SchedulerStarted<'a> {
    pub queues: &'a [String],
    pub startup_delay: Duration,
    pub poll_interval: Duration,
}

impl Display for SchedulerStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Background scheduler started: queues=[{}], startup_delay={:?}, poll_interval={:?}",
            self.queues.join(", "),
            self.startup_delay,
            self.poll_interval
        )
    }
}

/// Scheduler task stopped after cancellation.
///
/// # Log Level
/// `info!` - Important operational event
pub struct SchedulerStopped {
    pub jobs_run: u64,
}

impl Display for SchedulerStopped {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Background scheduler stopped after {} jobs", self.jobs_run)
    }
}

/// Job claimed from a queue.
///
/// # Log Level
/// `info!`
pub struct JobClaimed<'a> {
    pub job_id: Uuid,
    pub queue_name: &'a str,
    pub pipeline_name: &'a str,
    pub vcon_count: usize,
}

impl Display for JobClaimed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Claimed job {} from queue '{}': pipeline='{}', vcons={}",
            self.job_id, self.queue_name, self.pipeline_name, self.vcon_count
        )
    }
}

impl StructuredLog for JobClaimed<'_> {
    fn log(&self) {
        tracing::info!(
            job_id = %self.job_id,
            queue_name = self.queue_name,
            pipeline_name = self.pipeline_name,
            vcon_count = self.vcon_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "job",
            span_name = name,
            job_id = %self.job_id,
            queue_name = self.queue_name,
            pipeline_name = self.pipeline_name,
        )
    }
}

/// Job run failed; the job may have been routed to a failure queue.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct JobFailed<'a> {
    pub job_id: Uuid,
    pub queue_name: &'a str,
    pub failure_queue: Option<&'a str>,
    pub reason: &'a str,
}

impl Display for JobFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.failure_queue {
            Some(failure_queue) => write!(
                f,
                "Job {} from queue '{}' failed, moved to '{}': {}",
                self.job_id, self.queue_name, failure_queue, self.reason
            ),
            None => write!(
                f,
                "Job {} from queue '{}' failed: {}",
                self.job_id, self.queue_name, self.reason
            ),
        }
    }
}

impl StructuredLog for JobFailed<'_> {
    fn log(&self) {
        tracing::error!(
            job_id = %self.job_id,
            queue_name = self.queue_name,
            failure_queue = ?self.failure_queue,
            reason = self.reason,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "job_failed",
            span_name = name,
            job_id = %self.job_id,
            queue_name = self.queue_name,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_failed_mentions_failure_queue() {
        let id = Uuid::nil();

        let routed = JobFailed {
            job_id: id,
            queue_name: "ingress",
            failure_queue: Some("ingress_failed"),
            reason: "boom",
        };
        assert!(routed.to_string().contains("moved to 'ingress_failed'"));

        let dropped = JobFailed {
            failure_queue: None,
            ..routed
        };
        assert!(!dropped.to_string().contains("moved to"));
    }
}
