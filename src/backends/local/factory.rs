// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::processors::*;
use crate::processor::PluginModule;

pub const LOCAL_MODULE: &str = "local";

/// Factory for the built-in (in-process) processor classes
pub struct LocalProcessorFactory;

impl LocalProcessorFactory {
    /// Module table for the registry.
    ///
    /// Classes:
    /// - "analysis_appender" -> AnalysisAppenderProcessor
    /// - "party_counter" -> PartyCounterProcessor
    pub fn module() -> PluginModule {
        PluginModule::new(LOCAL_MODULE)
            .with_class(ANALYSIS_APPENDER, AnalysisAppenderProcessor::construct)
            .with_class(PARTY_COUNTER, PartyCounterProcessor::construct)
    }

    /// List all available local processor implementations
    pub fn list_available_implementations() -> Vec<&'static str> {
        vec![ANALYSIS_APPENDER, PARTY_COUNTER]
    }
}
