// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::errors::{PipelineError, RegistryError, StorageError, ValidationError};
use crate::observability::messages::pipeline::{PipelineDeleted, PipelineStored};
use crate::pipeline::PipelineDefinition;
use crate::processor::ProcessorRegistry;
use crate::traits::KeyValueStore;

const KEY_PREFIX: &str = "pipeline:";

/// Named pipeline definitions persisted as JSON in a key-value store.
#[derive(Clone)]
pub struct PipelineStore {
    store: Arc<dyn KeyValueStore>,
    registry: Arc<ProcessorRegistry>,
}

impl PipelineStore {
    pub fn new(store: Arc<dyn KeyValueStore>, registry: Arc<ProcessorRegistry>) -> Self {
        Self { store, registry }
    }

    fn key(name: &str) -> String {
        format!("{}{}", KEY_PREFIX, name)
    }

    /// Check every step names a usable processor and, when asked, that its
    /// options fit the processor's declared options type.
    pub fn validate(
        &self,
        definition: &PipelineDefinition,
        validate_processor_options: bool,
    ) -> Result<(), PipelineError> {
        for step in &definition.processors {
            let processor = match self.registry.get_instance(&step.processor_name) {
                Ok(processor) => processor,
                Err(RegistryError::NotRegistered { name }) => {
                    return Err(ValidationError::ProcessorNotRegistered {
                        processor_name: name,
                    }
                    .into())
                }
                Err(RegistryError::NotInstantiated { name, reason }) => {
                    return Err(ValidationError::ProcessorNotInstantiated {
                        processor_name: name,
                        reason: reason.to_string(),
                    }
                    .into())
                }
            };

            if validate_processor_options {
                let options_type = processor.info().options_type();
                options_type
                    .validate(&step.processor_options)
                    .map_err(|e| ValidationError::InvalidProcessorOptions {
                        processor_name: step.processor_name.clone(),
                        options_type: options_type.name().to_string(),
                        message: e.to_string(),
                    })?;
            }
        }
        Ok(())
    }

    /// Create or replace a definition.
    ///
    /// Processor names are only checked against the registry when
    /// `validate_processor_options` is set.
    pub async fn set(
        &self,
        name: &str,
        definition: &PipelineDefinition,
        validate_processor_options: bool,
    ) -> Result<(), PipelineError> {
        if name.trim().is_empty() {
            return Err(ValidationError::invalid_field("name", "must not be empty").into());
        }
        if validate_processor_options {
            self.validate(definition, true)?;
        }

        let document = serde_json::to_string(definition).map_err(StorageError::from)?;
        self.store.set(&Self::key(name), document).await?;

        tracing::info!(
            "{}",
            PipelineStored {
                pipeline_name: name,
                processor_count: definition.processors.len(),
            }
        );
        Ok(())
    }

    pub async fn get(&self, name: &str) -> Result<PipelineDefinition, PipelineError> {
        let document =
            self.store
                .get(&Self::key(name))
                .await?
                .ok_or_else(|| PipelineError::PipelineNotFound {
                    name: name.to_string(),
                })?;
        Ok(PipelineDefinition::from_json(&document)?)
    }

    pub async fn delete(&self, name: &str) -> Result<(), PipelineError> {
        if !self.store.delete(&Self::key(name)).await? {
            return Err(PipelineError::PipelineNotFound {
                name: name.to_string(),
            });
        }
        tracing::info!("{}", PipelineDeleted { pipeline_name: name });
        Ok(())
    }

    /// Names of all stored pipelines, sorted.
    pub async fn list_names(&self) -> Result<Vec<String>, PipelineError> {
        let mut names: Vec<String> = self
            .store
            .keys(KEY_PREFIX)
            .await?
            .into_iter()
            .filter_map(|key| key.strip_prefix(KEY_PREFIX).map(str::to_string))
            .collect();
        names.sort();
        Ok(names)
    }

    pub fn registry(&self) -> &Arc<ProcessorRegistry> {
        &self.registry
    }
}
