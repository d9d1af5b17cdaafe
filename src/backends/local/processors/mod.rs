// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod analysis_appender;
pub mod party_counter;

pub use analysis_appender::*;
pub use party_counter::*;
