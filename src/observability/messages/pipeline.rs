// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for pipeline runs and the pipeline definition store.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

fn describe_timeout(timeout: Option<f64>) -> String {
    match timeout {
        Some(seconds) => format!("{}s", seconds),
        None => "none".to_string(),
    }
}

/// Pipeline run started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use vcon_pipeline::observability::messages::pipeline::PipelineRunStarted;
///
/// let msg = PipelineRunStarted {
///     pipeline_name: "transcribe_and_summarize",
///     processor_count: 3,
///     vcon_count: 1,
///     timeout: Some(10.0),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct PipelineRunStarted<'a> {
    pub pipeline_name: &'a str,
    pub processor_count: usize,
    pub vcon_count: usize,
    pub timeout: Option<f64>,
}

impl Display for PipelineRunStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting pipeline '{}': {} processors, {} vcons, timeout={}",
            self.pipeline_name,
            self.processor_count,
            self.vcon_count,
            describe_timeout(self.timeout)
        )
    }
}

impl StructuredLog for PipelineRunStarted<'_> {
    fn log(&self) {
        tracing::info!(
            pipeline_name = self.pipeline_name,
            processor_count = self.processor_count,
            vcon_count = self.vcon_count,
            timeout = ?self.timeout,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "pipeline_run",
            span_name = name,
            pipeline_name = self.pipeline_name,
            processor_count = self.processor_count,
            vcon_count = self.vcon_count,
        )
    }
}

/// Pipeline run completed every step.
///
/// # Log Level
/// `info!` - Important operational event
pub struct PipelineRunCompleted<'a> {
    pub pipeline_name: &'a str,
    pub modified_count: usize,
    pub duration: Duration,
}

impl Display for PipelineRunCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline '{}' completed: {} vcons modified, duration={:?}",
            self.pipeline_name, self.modified_count, self.duration
        )
    }
}

impl StructuredLog for PipelineRunCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            pipeline_name = self.pipeline_name,
            modified_count = self.modified_count,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "pipeline_completed",
            span_name = name,
            pipeline_name = self.pipeline_name,
        )
    }
}

/// Pipeline run exceeded its timeout.
///
/// # Log Level
/// `warn!` - Degraded behavior, remaining steps skipped
pub struct PipelineRunTimedOut<'a> {
    pub pipeline_name: &'a str,
    pub completed_steps: usize,
    pub elapsed: Duration,
    pub timeout: f64,
}

impl Display for PipelineRunTimedOut<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline '{}' timed out after {:?} (limit {}s, {} steps completed)",
            self.pipeline_name, self.elapsed, self.timeout, self.completed_steps
        )
    }
}

impl StructuredLog for PipelineRunTimedOut<'_> {
    fn log(&self) {
        tracing::warn!(
            pipeline_name = self.pipeline_name,
            completed_steps = self.completed_steps,
            elapsed_ms = self.elapsed.as_millis() as u64,
            timeout = self.timeout,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "pipeline_timed_out",
            span_name = name,
            pipeline_name = self.pipeline_name,
            timeout = self.timeout,
        )
    }
}

/// Pipeline run stopped on a failing step.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct PipelineRunFailed<'a> {
    pub pipeline_name: &'a str,
    pub processor_name: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for PipelineRunFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline '{}' failed at processor '{}': {}",
            self.pipeline_name, self.processor_name, self.error
        )
    }
}

impl StructuredLog for PipelineRunFailed<'_> {
    fn log(&self) {
        tracing::error!(
            pipeline_name = self.pipeline_name,
            processor_name = self.processor_name,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "pipeline_failed",
            span_name = name,
            pipeline_name = self.pipeline_name,
            processor_name = self.processor_name,
            error = %self.error,
        )
    }
}

/// Modified vCons were written back and locks released.
///
/// # Log Level
/// `debug!`
pub struct PipelineCommitted<'a> {
    pub pipeline_name: &'a str,
    pub saved: usize,
    pub released: usize,
}

impl Display for PipelineCommitted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline '{}' committed: saved={} locks_released={}",
            self.pipeline_name, self.saved, self.released
        )
    }
}

/// Pipeline definition created or replaced.
///
/// # Log Level
/// `info!`
pub struct PipelineStored<'a> {
    pub pipeline_name: &'a str,
    pub processor_count: usize,
}

impl Display for PipelineStored<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Stored pipeline '{}' with {} processors",
            self.pipeline_name, self.processor_count
        )
    }
}

/// Pipeline definition deleted.
pub struct PipelineDeleted<'a> {
    pub pipeline_name: &'a str,
}

impl Display for PipelineDeleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Deleted pipeline '{}'", self.pipeline_name)
    }
}
