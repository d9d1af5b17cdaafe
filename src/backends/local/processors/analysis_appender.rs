// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::ProcessorError;
use crate::processor::{InitOptions, OptionsType, ProcessorInfo, ProcessorIo, ProcessorOptions};
use crate::traits::VconProcessor;

pub const ANALYSIS_APPENDER: &str = "analysis_appender";

/// Init options for [`AnalysisAppenderProcessor`]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisAppenderConfig {
    #[serde(default = "default_analysis_type")]
    pub analysis_type: String,
    #[serde(default = "default_vendor")]
    pub vendor: String,
    #[serde(default)]
    pub product: Option<String>,
    /// Simulated service latency per call
    #[serde(default)]
    pub latency_ms: u64,
}

fn default_analysis_type() -> String {
    "summary".to_string()
}

fn default_vendor() -> String {
    "vcon-pipeline".to_string()
}

/// Per-call options for [`AnalysisAppenderProcessor`]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisAppenderOptions {
    #[serde(default)]
    pub input_vcon_index: usize,
    #[serde(default)]
    pub dialog_index: usize,
    #[serde(default)]
    pub body: Option<Value>,
}

/// Appends one analysis entry to the input vCon.
///
/// Stands in for an external analysis service (transcription, summary and
/// so on): it waits `latency_ms`, then records an analysis of the configured
/// type and vendor against `dialog_index`.
pub struct AnalysisAppenderProcessor {
    info: ProcessorInfo,
    config: AnalysisAppenderConfig,
}

impl AnalysisAppenderProcessor {
    pub fn new(config: AnalysisAppenderConfig) -> Result<Self, ProcessorError> {
        let info = ProcessorInfo::builder("AnalysisAppender")
            .title("Analysis appender")
            .description("Adds an analysis object of a configured type to the input vCon")
            .version("0.1.0")
            .options_type(OptionsType::of::<AnalysisAppenderOptions>(
                "AnalysisAppenderOptions",
            ))
            .may_modify_vcons(true)
            .build()?;
        Ok(Self { info, config })
    }

    pub fn construct(init: &InitOptions) -> Result<Arc<dyn VconProcessor>, ProcessorError> {
        let config: AnalysisAppenderConfig = init.parse("AnalysisAppender")?;
        Ok(Arc::new(Self::new(config)?))
    }
}

#[async_trait]
impl VconProcessor for AnalysisAppenderProcessor {
    fn info(&self) -> &ProcessorInfo {
        &self.info
    }

    async fn process(
        &self,
        mut io: ProcessorIo,
        options: ProcessorOptions,
    ) -> Result<ProcessorIo, ProcessorError> {
        let options: AnalysisAppenderOptions = options.parse("AnalysisAppenderOptions")?;

        if self.config.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;
        }

        let index = options.input_vcon_index;
        let mut vcon = io
            .get_vcon_object(index)
            .await
            .ok_or(ProcessorError::InputVconMissing { index })?;

        let body = options
            .body
            .unwrap_or_else(|| Value::Object(Map::new()));
        vcon.add_analysis(
            options.dialog_index,
            &self.config.analysis_type,
            &self.config.vendor,
            self.config.product.as_deref(),
            body,
        );
        io.update_vcon(vcon).await?;
        Ok(io)
    }
}
