// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for human-readable output. Types
//! that are emitted on hot paths also implement [`StructuredLog`], which logs
//! the message together with its fields as tracing key-value pairs and can
//! open a span carrying the same fields.
//!
//! * `processor` - Processor registration, instantiation and execution
//! * `pipeline` - Pipeline run lifecycle and definition store events
//! * `scheduler` - Background scheduler and job queue events

use tracing::Span;

pub mod pipeline;
pub mod processor;
pub mod scheduler;

/// Emit a message as a structured tracing event, or open a span for it.
pub trait StructuredLog {
    /// Log at the level appropriate for this message.
    fn log(&self);

    /// Create a span named after the message with its fields attached.
    fn span(&self, name: &str) -> Span;
}
