// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for processor registration and execution events.
//!
//! This module contains message types for logging events related to:
//! * Processor registration and lazy instantiation
//! * Processor execution lifecycle within a pipeline (start, completion, failure)

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Processor registered under a name.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use vcon_pipeline::observability::messages::processor::ProcessorRegistered;
///
/// let msg = ProcessorRegistered {
///     processor_name: "append_analysis",
///     module_name: "local",
///     class_name: "analysis_appender",
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ProcessorRegistered<'a> {
    pub processor_name: &'a str,
    pub module_name: &'a str,
    pub class_name: &'a str,
}

impl Display for ProcessorRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Registered processor '{}' ({}.{})",
            self.processor_name, self.module_name, self.class_name
        )
    }
}

/// Processor instantiation failed during registration.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use vcon_pipeline::observability::messages::processor::ProcessorInstantiationFailed;
///
/// let msg = ProcessorInstantiationFailed {
///     processor_name: "whisper_base",
///     module_name: "whisper",
///     reason: "module not found",
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct ProcessorInstantiationFailed<'a> {
    pub processor_name: &'a str,
    pub module_name: &'a str,
    pub reason: &'a str,
}

impl Display for ProcessorInstantiationFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Failed to instantiate processor '{}' from module '{}': {}",
            self.processor_name, self.module_name, self.reason
        )
    }
}

/// Processor step started inside a pipeline run.
///
/// # Log Level
/// `debug!` - Per-step detail
pub struct ProcessorExecutionStarted<'a> {
    pub processor_name: &'a str,
    pub processor_index: usize,
    pub vcon_count: usize,
}

impl Display for ProcessorExecutionStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Processor '{}' (step {}) started: vcons={}",
            self.processor_name, self.processor_index, self.vcon_count
        )
    }
}

impl StructuredLog for ProcessorExecutionStarted<'_> {
    fn log(&self) {
        tracing::debug!(
            processor_name = self.processor_name,
            processor_index = self.processor_index,
            vcon_count = self.vcon_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "processor_execution",
            span_name = name,
            processor_name = self.processor_name,
            processor_index = self.processor_index,
            vcon_count = self.vcon_count,
        )
    }
}

/// Processor step completed.
///
/// # Log Level
/// `debug!` - Per-step detail
pub struct ProcessorExecutionCompleted<'a> {
    pub processor_name: &'a str,
    pub processor_index: usize,
    pub duration: std::time::Duration,
}

impl Display for ProcessorExecutionCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Processor '{}' (step {}) completed: duration={:?}",
            self.processor_name, self.processor_index, self.duration
        )
    }
}

impl StructuredLog for ProcessorExecutionCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            processor_name = self.processor_name,
            processor_index = self.processor_index,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "processor_completed",
            span_name = name,
            processor_name = self.processor_name,
            processor_index = self.processor_index,
        )
    }
}

/// Processor step failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use vcon_pipeline::observability::messages::processor::ProcessorExecutionFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::Other, "test error");
/// let msg = ProcessorExecutionFailed {
///     processor_name: "transcribe",
///     processor_index: 2,
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct ProcessorExecutionFailed<'a> {
    pub processor_name: &'a str,
    pub processor_index: usize,
    pub error: &'a dyn std::error::Error,
}

impl Display for ProcessorExecutionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Processor '{}' (step {}) failed: {}",
            self.processor_name, self.processor_index, self.error
        )
    }
}

impl StructuredLog for ProcessorExecutionFailed<'_> {
    fn log(&self) {
        tracing::error!(
            processor_name = self.processor_name,
            processor_index = self.processor_index,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "processor_failed",
            span_name = name,
            processor_name = self.processor_name,
            processor_index = self.processor_index,
            error = %self.error,
        )
    }
}
