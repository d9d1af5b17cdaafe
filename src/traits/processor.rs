// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::ProcessorError;
use crate::processor::{ProcessorInfo, ProcessorIo, ProcessorOptions};

/// Whether a processor rewrites vCons or only reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorIntent {
    /// May call `update_vcon` on the context
    Transform,
    /// Reads vCons, may only set output parameters
    Analyze,
}

/// A single named transformation step in a pipeline.
///
/// `process` receives the whole context by value and must hand the whole
/// context back, including slots it did not touch. The pipeline runner rejects
/// a returned context that lost any vCon it was given.
#[async_trait]
pub trait VconProcessor: Send + Sync {
    fn info(&self) -> &ProcessorInfo;

    async fn process(
        &self,
        io: ProcessorIo,
        options: ProcessorOptions,
    ) -> Result<ProcessorIo, ProcessorError>;

    fn declared_intent(&self) -> ProcessorIntent {
        if self.info().may_modify_vcons() {
            ProcessorIntent::Transform
        } else {
            ProcessorIntent::Analyze
        }
    }
}
