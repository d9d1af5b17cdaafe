// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;
use tracing::Instrument;

use crate::errors::PipelineError;
use crate::observability::messages::scheduler::{JobClaimed, JobFailed};
use crate::observability::messages::StructuredLog;
use crate::pipeline::{PipelineDefinition, PipelineRunner, PipelineStore, RunOptions, RunStatus};
use crate::processor::ProcessorIo;
use crate::queue::PipelineJob;
use crate::traits::{JobQueue, VconStorage};

/// What happened to a claimed job.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    /// The pipeline ran to a terminal status
    Finished(RunStatus),
    /// The run could not start or commit; holds the error text
    Aborted(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobReport {
    pub job: PipelineJob,
    pub queue_name: String,
    pub outcome: JobOutcome,
    /// Failure queue the job was re-enqueued on, if any
    pub routed_to: Option<String>,
}

impl JobReport {
    pub fn is_success(&self) -> bool {
        self.outcome == JobOutcome::Finished(RunStatus::Completed)
    }
}

/// Claims queued jobs and runs their pipelines.
#[derive(Clone)]
pub struct PipelineJobHandler {
    queue: Arc<dyn JobQueue>,
    pipelines: PipelineStore,
    runner: PipelineRunner,
    storage: Arc<dyn VconStorage>,
}

impl PipelineJobHandler {
    pub fn new(
        queue: Arc<dyn JobQueue>,
        pipelines: PipelineStore,
        runner: PipelineRunner,
        storage: Arc<dyn VconStorage>,
    ) -> Self {
        Self {
            queue,
            pipelines,
            runner,
            storage,
        }
    }

    pub fn queue(&self) -> &Arc<dyn JobQueue> {
        &self.queue
    }

    /// Claim and run at most one job from `queue_name`.
    ///
    /// `Ok(None)` means the queue was empty. Pipeline failures are reported in
    /// the [`JobReport`]; only queue backend errors come back as `Err`.
    pub async fn run_one_job(&self, queue_name: &str) -> Result<Option<JobReport>, PipelineError> {
        let Some(job) = self.queue.claim_next(queue_name).await? else {
            return Ok(None);
        };

        let claimed = JobClaimed {
            job_id: job.id,
            queue_name,
            pipeline_name: &job.pipeline_name,
            vcon_count: job.vcon_uuids.len(),
        };
        claimed.log();
        let span = claimed.span("job");

        self.process(queue_name, job).instrument(span).await.map(Some)
    }

    async fn process(&self, queue_name: &str, job: PipelineJob) -> Result<JobReport, PipelineError> {
        let definition = match self.pipelines.get(&job.pipeline_name).await {
            Ok(definition) => definition,
            Err(e) => {
                let reason = e.to_string();
                return self
                    .finish(queue_name, job, None, JobOutcome::Aborted(reason.clone()), &reason)
                    .await;
            }
        };

        let outcome = match self.run(&job, &definition).await {
            Ok(status) => JobOutcome::Finished(status),
            Err(e) => JobOutcome::Aborted(e.to_string()),
        };

        let failure = match &outcome {
            JobOutcome::Finished(RunStatus::Completed) => None,
            JobOutcome::Finished(RunStatus::Failed { error, .. }) => Some(error.to_string()),
            JobOutcome::Finished(RunStatus::TimedOut { .. }) => Some("pipeline timed out".to_string()),
            JobOutcome::Aborted(message) => Some(message.clone()),
        };
        match failure {
            None => Ok(JobReport {
                job,
                queue_name: queue_name.to_string(),
                outcome,
                routed_to: None,
            }),
            Some(reason) => {
                let failure_queue = definition.pipeline_options.failure_queue.clone();
                self.finish(queue_name, job, failure_queue, outcome, &reason)
                    .await
            }
        }
    }

    async fn run(
        &self,
        job: &PipelineJob,
        definition: &PipelineDefinition,
    ) -> Result<RunStatus, PipelineError> {
        let lock_key = job.lock_key();
        let mut io = ProcessorIo::new(self.storage.clone());
        for uuid in &job.vcon_uuids {
            let vcon = self
                .storage
                .get(*uuid)
                .await?
                .ok_or(PipelineError::VconNotFound { uuid: *uuid })?;
            io.add_vcon(vcon, Some(&lock_key), false).await?;
        }

        let options = RunOptions {
            return_results: false,
            ..RunOptions::default()
        };
        let result = self
            .runner
            .run(&job.pipeline_name, definition, io, &options)
            .await?;
        Ok(result.status)
    }

    /// Report a failed job, re-enqueueing it on `failure_queue` when set.
    async fn finish(
        &self,
        queue_name: &str,
        job: PipelineJob,
        failure_queue: Option<String>,
        outcome: JobOutcome,
        reason: &str,
    ) -> Result<JobReport, PipelineError> {
        let failure_queue = failure_queue.filter(|name| !name.trim().is_empty());
        if let Some(failure_queue) = &failure_queue {
            self.queue.enqueue(failure_queue, job.clone()).await?;
        }

        JobFailed {
            job_id: job.id,
            queue_name,
            failure_queue: failure_queue.as_deref(),
            reason,
        }
        .log();

        Ok(JobReport {
            job,
            queue_name: queue_name.to_string(),
            outcome,
            routed_to: failure_queue,
        })
    }
}
