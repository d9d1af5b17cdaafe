// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod consts;
mod loader;
mod settings;

pub use loader::{load_pipeline_seeds, seed_pipelines, PipelineSeeds};
pub use settings::{ProcessorSettings, SchedulerSettings, Settings};
