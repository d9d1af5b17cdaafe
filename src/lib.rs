// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod api;          // REST contract as a service facade
pub mod backends;     // built-in processors
pub mod config;       // settings + pipeline seeds
pub mod errors;       // error handling
pub mod observability;
pub mod pipeline;     // definitions, store, runner, job handler
pub mod processor;    // processor I/O context, options, registry
pub mod queue;        // pipeline jobs
pub mod scheduler;    // background job loop
pub mod storage;      // vCon + key-value backends
pub mod traits;       // unified abstractions
pub mod vcon;         // vCon record and multi-form cache
