// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Sequential pipeline execution with a cooperative deadline.
//!
//! Steps run strictly in definition order; each step's returned context is
//! the next step's input. The deadline is checked at step boundaries only, so
//! a slow processor finishes its call before the run is marked timed out.
//!
//! At a terminal state the runner applies the commit rules: pending vCons are
//! written back only when the run completed (or `commit_on_failure` is set)
//! and saving is enabled; every lease held under a lock key is released
//! whatever the outcome.

use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Instrument;
use uuid::Uuid;

use crate::errors::{PipelineError, StepError};
use crate::observability::messages::pipeline::{
    PipelineCommitted, PipelineRunCompleted, PipelineRunFailed, PipelineRunStarted,
    PipelineRunTimedOut,
};
use crate::observability::messages::processor::{
    ProcessorExecutionCompleted, ProcessorExecutionFailed, ProcessorExecutionStarted,
};
use crate::observability::messages::StructuredLog;
use crate::pipeline::{PipelineDefinition, PipelineProcessor};
use crate::processor::{ProcessorIo, ProcessorRegistry};
use crate::traits::ProcessorIntent;
use crate::vcon::{VconForm, VconValue};

/// Lifecycle of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Pending,
    Running,
    Completed,
    TimedOut,
    Failed,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunState::Completed | RunState::TimedOut | RunState::Failed
        )
    }

    /// Move to `next`, rejecting anything but `Pending -> Running -> terminal`.
    pub fn transition(self, next: RunState) -> Result<RunState, PipelineError> {
        let allowed = match self {
            RunState::Pending => next == RunState::Running,
            RunState::Running => next.is_terminal(),
            _ => false,
        };
        if allowed {
            Ok(next)
        } else {
            Err(PipelineError::InvalidRunTransition {
                from: self,
                to: next,
            })
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunStatus {
    Completed,
    TimedOut {
        completed_steps: usize,
    },
    Failed {
        processor_name: String,
        processor_index: usize,
        error: StepError,
    },
}

impl RunStatus {
    pub fn state(&self) -> RunState {
        match self {
            RunStatus::Completed => RunState::Completed,
            RunStatus::TimedOut { .. } => RunState::TimedOut,
            RunStatus::Failed { .. } => RunState::Failed,
        }
    }
}

/// Per-run overrides supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    /// Overrides `pipeline_options.save_vcons` when set
    pub save_vcons: Option<bool>,
    pub return_results: bool,
    /// Commit pending vCons even when the run timed out or failed
    pub commit_on_failure: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            save_vcons: None,
            return_results: true,
            commit_on_failure: false,
        }
    }
}

/// The vCons of a completed run, as returned to API callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOutput {
    pub vcons: Vec<Map<String, Value>>,
    pub vcons_modified: Vec<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineRunResult {
    pub pipeline_name: String,
    pub status: RunStatus,
    pub elapsed: Duration,
    pub vcons_modified: Vec<bool>,
    /// UUIDs written back to vCon storage
    pub committed: Vec<Uuid>,
    pub parameters: Map<String, Value>,
    /// Present only for completed runs that asked for results
    pub output: Option<RunOutput>,
}

impl PipelineRunResult {
    pub fn state(&self) -> RunState {
        self.status.state()
    }

    pub fn is_completed(&self) -> bool {
        self.status == RunStatus::Completed
    }
}

fn deadline_passed(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|deadline| Instant::now() >= deadline)
}

/// Runs pipeline definitions against a prepared [`ProcessorIo`].
#[derive(Clone)]
pub struct PipelineRunner {
    registry: Arc<ProcessorRegistry>,
}

impl PipelineRunner {
    pub fn new(registry: Arc<ProcessorRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ProcessorRegistry> {
        &self.registry
    }

    /// Run every step of `definition` over `io` and apply the commit rules.
    ///
    /// Processor failures and timeouts are reported in the result's status;
    /// `Err` is reserved for storage faults while committing.
    pub async fn run(
        &self,
        pipeline_name: &str,
        definition: &PipelineDefinition,
        io: ProcessorIo,
        options: &RunOptions,
    ) -> Result<PipelineRunResult, PipelineError> {
        let start_msg = PipelineRunStarted {
            pipeline_name,
            processor_count: definition.processors.len(),
            vcon_count: io.len(),
            timeout: definition.pipeline_options.timeout,
        };
        let span = start_msg.span("pipeline_run");
        start_msg.log();

        self.execute(pipeline_name, definition, io, options)
            .instrument(span)
            .await
    }

    async fn execute(
        &self,
        pipeline_name: &str,
        definition: &PipelineDefinition,
        mut io: ProcessorIo,
        options: &RunOptions,
    ) -> Result<PipelineRunResult, PipelineError> {
        let started = Instant::now();
        // A deadline past the end of the clock is treated as unbounded
        let deadline = definition
            .pipeline_options
            .timeout_duration()
            .and_then(|timeout| started.checked_add(timeout));
        let mut state = RunState::Pending.transition(RunState::Running)?;
        let mut status = RunStatus::Completed;

        for (index, step) in definition.processors.iter().enumerate() {
            if deadline_passed(deadline) {
                status = RunStatus::TimedOut {
                    completed_steps: index,
                };
                break;
            }

            // Keep the pre-step context so a failed step leaves a coherent one
            let fallback = io.clone();
            match self.run_step(index, step, io).await {
                Ok(returned) => io = returned,
                Err(error) => {
                    io = fallback;
                    status = RunStatus::Failed {
                        processor_name: step.processor_name.clone(),
                        processor_index: index,
                        error,
                    };
                    break;
                }
            }

            if deadline_passed(deadline) {
                status = RunStatus::TimedOut {
                    completed_steps: index + 1,
                };
                break;
            }
        }

        state = state.transition(status.state())?;
        let elapsed = started.elapsed();
        self.log_outcome(pipeline_name, &status, &io, elapsed, definition);

        let save_vcons = options
            .save_vcons
            .unwrap_or(definition.pipeline_options.save_vcons);
        let should_commit = save_vcons && (status == RunStatus::Completed || options.commit_on_failure);
        let commit_result = if should_commit {
            Self::commit(&mut io).await
        } else {
            Ok(Vec::new())
        };
        let released = Self::release_locks(&mut io).await;
        let committed = commit_result?;

        tracing::debug!(
            "{}",
            PipelineCommitted {
                pipeline_name,
                saved: committed.len(),
                released,
            }
        );

        let output = if options.return_results && state == RunState::Completed {
            Some(Self::collect_output(&mut io).await)
        } else {
            None
        };

        Ok(PipelineRunResult {
            pipeline_name: pipeline_name.to_string(),
            status,
            elapsed,
            vcons_modified: io.vcons_modified(),
            committed,
            parameters: io.parameters().clone(),
            output,
        })
    }

    async fn run_step(
        &self,
        index: usize,
        step: &PipelineProcessor,
        mut io: ProcessorIo,
    ) -> Result<ProcessorIo, StepError> {
        let processor = self.registry.get_instance(&step.processor_name)?;
        let options = processor
            .info()
            .options_type()
            .build(&step.processor_options)?;

        let expected = io.uuids().await;
        let updates_before = io.update_count();

        let start_msg = ProcessorExecutionStarted {
            processor_name: &step.processor_name,
            processor_index: index,
            vcon_count: expected.len(),
        };
        start_msg.log();
        let step_started = Instant::now();

        let mut returned = match processor.process(io, options).await {
            Ok(returned) => returned,
            Err(e) => {
                ProcessorExecutionFailed {
                    processor_name: &step.processor_name,
                    processor_index: index,
                    error: &e,
                }
                .log();
                return Err(e.into());
            }
        };

        let actual = returned.uuids().await;
        if let Some(missing) = expected
            .iter()
            .flatten()
            .find(|uuid| !actual.contains(&Some(**uuid)))
        {
            return Err(StepError::ContextTruncated {
                expected: expected.len(),
                returned: actual.len(),
                missing: *missing,
            });
        }

        let updates = returned.update_count().saturating_sub(updates_before);
        if processor.declared_intent() == ProcessorIntent::Analyze && updates > 0 {
            return Err(StepError::ModifyPolicyViolated {
                processor_name: step.processor_name.clone(),
                updates,
            });
        }

        ProcessorExecutionCompleted {
            processor_name: &step.processor_name,
            processor_index: index,
            duration: step_started.elapsed(),
        }
        .log();

        Ok(returned)
    }

    fn log_outcome(
        &self,
        pipeline_name: &str,
        status: &RunStatus,
        io: &ProcessorIo,
        elapsed: Duration,
        definition: &PipelineDefinition,
    ) {
        match status {
            RunStatus::Completed => PipelineRunCompleted {
                pipeline_name,
                modified_count: io.vcons_modified().iter().filter(|m| **m).count(),
                duration: elapsed,
            }
            .log(),
            RunStatus::TimedOut { completed_steps } => PipelineRunTimedOut {
                pipeline_name,
                completed_steps: *completed_steps,
                elapsed,
                timeout: definition.pipeline_options.timeout.unwrap_or_default(),
            }
            .log(),
            RunStatus::Failed {
                processor_name,
                error,
                ..
            } => PipelineRunFailed {
                pipeline_name,
                processor_name,
                error,
            }
            .log(),
        }
    }

    /// Write every pending vCon back to the context's storage.
    async fn commit(io: &mut ProcessorIo) -> Result<Vec<Uuid>, PipelineError> {
        let storage = io.storage().clone();
        let mut committed = Vec::new();
        for index in 0..io.len() {
            if !io.is_pending_update(index) {
                continue;
            }
            match io.get_vcon_object(index).await {
                Some(vcon) => {
                    storage.set(&vcon).await?;
                    committed.push(vcon.uuid);
                }
                None => tracing::warn!(index, "pending vCon could not be materialized for commit"),
            }
        }
        Ok(committed)
    }

    /// Release the lease of every locked slot; returns how many were released.
    async fn release_locks(io: &mut ProcessorIo) -> usize {
        let storage = io.storage().clone();
        let mut released = 0;
        for index in 0..io.len() {
            let Some(lock_key) = io.lock_key(index).map(str::to_string) else {
                continue;
            };
            let Some(uuid) = io.vcon_uuid(index).await else {
                continue;
            };
            match storage.release_lock(uuid, &lock_key).await {
                Ok(()) => released += 1,
                Err(e) => tracing::warn!(%uuid, error = %e, "failed to release vCon lock"),
            }
        }
        released
    }

    async fn collect_output(io: &mut ProcessorIo) -> RunOutput {
        let mut vcons = Vec::with_capacity(io.len());
        for index in 0..io.len() {
            if let Some(VconValue::Dict(dict)) = io.get_vcon(index, VconForm::Dict).await {
                vcons.push(dict);
            }
        }
        RunOutput {
            vcons,
            vcons_modified: io.vcons_modified(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_state_transitions() {
        struct TestCase {
            from: RunState,
            to: RunState,
            allowed: bool,
        }

        let test_cases = vec![
            TestCase { from: RunState::Pending, to: RunState::Running, allowed: true },
            TestCase { from: RunState::Running, to: RunState::Completed, allowed: true },
            TestCase { from: RunState::Running, to: RunState::TimedOut, allowed: true },
            TestCase { from: RunState::Running, to: RunState::Failed, allowed: true },
            TestCase { from: RunState::Pending, to: RunState::Completed, allowed: false },
            TestCase { from: RunState::Running, to: RunState::Pending, allowed: false },
            TestCase { from: RunState::Completed, to: RunState::Running, allowed: false },
            TestCase { from: RunState::Failed, to: RunState::Completed, allowed: false },
            TestCase { from: RunState::TimedOut, to: RunState::TimedOut, allowed: false },
        ];

        for test_case in test_cases {
            let result = test_case.from.transition(test_case.to);
            assert_eq!(
                result.is_ok(),
                test_case.allowed,
                "{:?} -> {:?}",
                test_case.from,
                test_case.to
            );
        }
    }

    #[test]
    fn test_default_run_options() {
        let options = RunOptions::default();
        assert_eq!(options.save_vcons, None);
        assert!(options.return_results);
        assert!(!options.commit_on_failure);
    }
}
