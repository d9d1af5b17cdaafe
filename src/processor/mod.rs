// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Processor metadata, options, the I/O context and the registry.

mod info;
mod io;
mod options;
mod registry;

pub use info::{ProcessorInfo, ProcessorInfoBuilder};
pub use io::ProcessorIo;
pub use options::{InitOptions, OptionsType, ProcessorOptions};
pub use registry::{PluginModule, ProcessorConstructor, ProcessorRegistry, Registration};
