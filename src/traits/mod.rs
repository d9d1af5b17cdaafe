// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod processor;
pub mod queue;
pub mod storage;

pub use processor::{ProcessorIntent, VconProcessor};
pub use queue::JobQueue;
pub use storage::{KeyValueStore, VconStorage};
