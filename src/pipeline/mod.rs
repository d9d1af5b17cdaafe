// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pipeline definitions, their store, the sequential runner and the job
//! handler that feeds queued work into it.

mod definition;
mod executor;
mod job;
mod store;


pub use definition::{parse_timeout, PipelineDefinition, PipelineOptions, PipelineProcessor};
pub use executor::{
    PipelineRunResult, PipelineRunner, RunOptions, RunOutput, RunState, RunStatus,
};
pub use job::{JobOutcome, JobReport, PipelineJobHandler};
pub use store::PipelineStore;
