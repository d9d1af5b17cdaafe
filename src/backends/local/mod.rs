// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod factory;
pub mod processors;

pub use factory::{LocalProcessorFactory, LOCAL_MODULE};
pub use processors::*;
