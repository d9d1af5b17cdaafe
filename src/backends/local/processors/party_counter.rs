// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::ProcessorError;
use crate::processor::{InitOptions, OptionsType, ProcessorInfo, ProcessorIo, ProcessorOptions};
use crate::traits::VconProcessor;

pub const PARTY_COUNTER: &str = "party_counter";
pub const PARTY_COUNT_PARAMETER: &str = "party_count";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PartyCounterOptions {
    #[serde(default)]
    pub input_vcon_index: usize,
    /// Output parameter renames, e.g. `{"party_count": "callers"}`
    #[serde(default)]
    pub rename: HashMap<String, String>,
}

/// Party Counter processor - reports how many parties the input vCon has
pub struct PartyCounterProcessor {
    info: ProcessorInfo,
}

impl PartyCounterProcessor {
    pub fn new() -> Result<Self, ProcessorError> {
        let info = ProcessorInfo::builder("PartyCounter")
            .title("Party counter")
            .description("Sets the party_count output parameter from the input vCon")
            .version("0.1.0")
            .options_type(OptionsType::of::<PartyCounterOptions>("PartyCounterOptions"))
            .may_modify_vcons(false)
            .build()?;
        Ok(Self { info })
    }

    pub fn construct(_: &InitOptions) -> Result<Arc<dyn VconProcessor>, ProcessorError> {
        Ok(Arc::new(Self::new()?))
    }
}

#[async_trait]
impl VconProcessor for PartyCounterProcessor {
    fn info(&self) -> &ProcessorInfo {
        &self.info
    }

    async fn process(
        &self,
        mut io: ProcessorIo,
        options: ProcessorOptions,
    ) -> Result<ProcessorIo, ProcessorError> {
        let options: PartyCounterOptions = options.parse("PartyCounterOptions")?;
        let index = options.input_vcon_index;
        let count = io
            .get_vcon_object(index)
            .await
            .ok_or(ProcessorError::InputVconMissing { index })?
            .parties
            .len();

        io.set_parameter(PARTY_COUNT_PARAMETER, json!(count), &options.rename);
        Ok(io)
    }
}
