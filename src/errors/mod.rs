// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod io;
mod pipeline;
mod processor;
mod registry;
mod storage;
mod validation;

pub use config::ConfigError;
pub use io::VconIoError;
pub use pipeline::{PipelineError, StepError};
pub use processor::ProcessorError;
pub use registry::{NotInstantiatedReason, RegistryError};
pub use storage::{QueueError, StorageError};
pub use validation::ValidationError;
