// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Processor implementations that ship with the engine.
//!
//! Each backend exposes a [`PluginModule`](crate::processor::PluginModule): a
//! static table of class name to constructor. The registry instantiates
//! classes from these tables by name.
//!
//! ## Local Backend
//! In-process processors:
//! - **analysis_appender**: appends an analysis object to the input vCon
//! - **party_counter**: read-only, sets the `party_count` output parameter
//!
//! ## Stub Backend (Test-Only)
//! Processors that sleep, fail, drop vCons or break their declared modify
//! policy, for exercising the runner. Not available in production builds.
//!
//! # Examples
//!
//! ```rust
//! use vcon_pipeline::backends::local::{LocalProcessorFactory, LOCAL_MODULE};
//! use vcon_pipeline::processor::{InitOptions, ProcessorRegistry};
//!
//! let mut registry = ProcessorRegistry::new();
//! registry.add_module(LocalProcessorFactory::module());
//! registry.register(InitOptions::new(), "count", LOCAL_MODULE, "party_counter", None, None);
//!
//! assert!(registry.get_instance("count").is_ok());
//! ```

pub mod local;
#[cfg(test)]
pub mod stub;
