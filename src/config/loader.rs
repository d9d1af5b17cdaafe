// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::errors::{ConfigError, PipelineError};
use crate::pipeline::{PipelineDefinition, PipelineStore};

/// Pipeline definitions by name, as read from a seed file.
pub type PipelineSeeds = BTreeMap<String, PipelineDefinition>;

/// Load a YAML file mapping pipeline names to definitions.
///
/// # Example
/// ```yaml
/// transcribe:
///   pipeline_options:
///     save_vcons: true
///     timeout: 30
///   processors:
///     - processor_name: transcribe
///       processor_options:
///         dialog_index: 0
/// ```
pub fn load_pipeline_seeds<P: AsRef<Path>>(path: P) -> Result<PipelineSeeds, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_pipeline_seeds(&content)
}

fn parse_pipeline_seeds(content: &str) -> Result<PipelineSeeds, ConfigError> {
    let raw: BTreeMap<String, Value> = serde_yaml::from_str(content)?;
    raw.into_iter()
        .map(|(name, value)| {
            PipelineDefinition::from_value(value)
                .map(|definition| (name.clone(), definition))
                .map_err(|e| ConfigError::InvalidValue {
                    key: name,
                    message: e.to_string(),
                })
        })
        .collect()
}

/// Store every seed, validating processor names and options.
///
/// Stops at the first rejected definition.
pub async fn seed_pipelines(
    store: &PipelineStore,
    seeds: &PipelineSeeds,
) -> Result<usize, PipelineError> {
    for (name, definition) in seeds {
        store.set(name, definition, true).await?;
    }
    Ok(seeds.len())
}
