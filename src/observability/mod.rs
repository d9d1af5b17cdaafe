// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Message types follow a struct-based pattern with a `Display` implementation
//! so log text lives in one place instead of being scattered through the
//! runner, registry and scheduler as ad hoc format strings.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::processor` - Registry and processor lifecycle events
//! * `messages::pipeline` - Pipeline runs, commits and definition changes
//! * `messages::scheduler` - Background job loop events
//!
//! # Usage
//!
//! ```rust
//! use vcon_pipeline::observability::messages::processor::ProcessorExecutionFailed;
//!
//! let error = std::io::Error::new(std::io::ErrorKind::Other, "test error");
//! let msg = ProcessorExecutionFailed {
//!     processor_name: "transcribe",
//!     processor_index: 0,
//!     error: &error,
//! };
//!
//! tracing::error!("{}", msg);
//! ```

pub mod messages;
