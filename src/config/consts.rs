// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::time::Duration;

/// Idle sleep between scheduler passes that found no job
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Delay before the scheduler claims its first job
pub const DEFAULT_STARTUP_DELAY: Duration = Duration::from_millis(5000);
/// Default backend for vCons, job queues and pipeline definitions
pub const DEFAULT_STORAGE_URL: &str = "memory://";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_NUM_WORKERS: usize = 1;
