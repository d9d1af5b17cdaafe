// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Single-consumer background job scheduler.
//!
//! One tokio task per scheduler. After a startup delay it walks its queues in
//! order, running at most one job at a time through a
//! [`PipelineJobHandler`]. When a full pass finds no work it sleeps for the
//! poll interval. Cancellation is observed between jobs only, so a job that
//! has been claimed always runs to its terminal state.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::consts::{DEFAULT_POLL_INTERVAL, DEFAULT_STARTUP_DELAY};
use crate::observability::messages::scheduler::{SchedulerStarted, SchedulerStopped};
use crate::pipeline::{JobReport, PipelineJobHandler};

/// Timing knobs for a [`BackgroundScheduler`].
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerOptions {
    pub queues: Vec<String>,
    pub startup_delay: Duration,
    pub poll_interval: Duration,
}

impl SchedulerOptions {
    pub fn new(queues: Vec<String>) -> Self {
        Self {
            queues,
            startup_delay: DEFAULT_STARTUP_DELAY,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_startup_delay(mut self, startup_delay: Duration) -> Self {
        self.startup_delay = startup_delay;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

/// Handle to a running scheduler task.
pub struct BackgroundScheduler {
    cancellation_token: CancellationToken,
    task: JoinHandle<u64>,
}

impl BackgroundScheduler {
    /// Spawn the scheduler task on the current runtime.
    ///
    /// When `outcomes` is set, every finished job's [`JobReport`] is sent on it;
    /// a closed receiver is ignored.
    pub fn start(
        handler: PipelineJobHandler,
        options: SchedulerOptions,
        outcomes: Option<mpsc::UnboundedSender<JobReport>>,
    ) -> Self {
        let cancellation_token = CancellationToken::new();
        let task = tokio::spawn(Self::run_loop(
            handler,
            options,
            outcomes,
            cancellation_token.clone(),
        ));
        Self {
            cancellation_token,
            task,
        }
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop after the in-flight job (if any) and wait for the task to exit.
    ///
    /// Returns how many jobs the scheduler ran.
    pub async fn shutdown(self) -> u64 {
        self.cancellation_token.cancel();
        match self.task.await {
            Ok(jobs_run) => jobs_run,
            Err(e) => {
                tracing::error!(error = %e, "background scheduler task ended abnormally");
                0
            }
        }
    }

    async fn run_loop(
        handler: PipelineJobHandler,
        options: SchedulerOptions,
        outcomes: Option<mpsc::UnboundedSender<JobReport>>,
        cancellation_token: CancellationToken,
    ) -> u64 {
        tracing::info!(
            "{}",
            SchedulerStarted {
                queues: &options.queues,
                startup_delay: options.startup_delay,
                poll_interval: options.poll_interval,
            }
        );

        let mut jobs_run = 0;
        tokio::select! {
            _ = cancellation_token.cancelled() => {
                tracing::info!("{}", SchedulerStopped { jobs_run });
                return jobs_run;
            }
            _ = tokio::time::sleep(options.startup_delay) => {}
        }

        while !cancellation_token.is_cancelled() {
            let mut found_job = false;
            for queue_name in &options.queues {
                if cancellation_token.is_cancelled() {
                    break;
                }
                match handler.run_one_job(queue_name).await {
                    Ok(Some(report)) => {
                        found_job = true;
                        jobs_run += 1;
                        if let Some(outcomes) = &outcomes {
                            let _ = outcomes.send(report);
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        tracing::error!(queue_name = %queue_name, error = %e, "failed to claim job");
                    }
                }
            }

            if !found_job {
                tokio::select! {
                    _ = cancellation_token.cancelled() => break,
                    _ = tokio::time::sleep(options.poll_interval) => {}
                }
            }
        }

        tracing::info!("{}", SchedulerStopped { jobs_run });
        jobs_run
    }
}
