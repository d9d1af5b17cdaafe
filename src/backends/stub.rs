// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Test-only processors for exercising the registry and the pipeline runner.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::ProcessorError;
use crate::processor::{
    InitOptions, OptionsType, PluginModule, ProcessorInfo, ProcessorIo, ProcessorOptions,
    ProcessorRegistry,
};
use crate::traits::VconProcessor;

pub const STUB_MODULE: &str = "stub";

pub const NOOP: &str = "noop";
pub const SUBJECT_SETTER: &str = "subject_setter";
pub const SLEEP: &str = "sleep";
pub const FAIL: &str = "fail";
pub const DROP_SLOTS: &str = "drop_slots";
pub const SNEAKY_UPDATE: &str = "sneaky_update";

/// Module table holding every stub class.
pub fn stub_module() -> PluginModule {
    PluginModule::new(STUB_MODULE)
        .with_class(NOOP, NoopProcessor::construct)
        .with_class(SUBJECT_SETTER, SubjectSetterProcessor::construct)
        .with_class(SLEEP, SleepProcessor::construct)
        .with_class(FAIL, FailingProcessor::construct)
        .with_class(DROP_SLOTS, DropSlotsProcessor::construct)
        .with_class(SNEAKY_UPDATE, SneakyUpdateProcessor::construct)
        .with_class("unconstructable", |_| {
            Err(ProcessorError::Failed("refused to construct".to_string()))
        })
}

/// Registry with every stub class registered under its class name.
pub fn stub_registry() -> ProcessorRegistry {
    let mut registry = ProcessorRegistry::new();
    registry.add_module(stub_module());
    for class_name in [NOOP, SUBJECT_SETTER, SLEEP, FAIL, DROP_SLOTS, SNEAKY_UPDATE] {
        registry.register(InitOptions::new(), class_name, STUB_MODULE, class_name, None, None);
    }
    registry
}

fn input_index(io: &ProcessorIo, options: &ProcessorOptions) -> Result<usize, ProcessorError> {
    let index = options.input_vcon_index;
    if index < io.len() {
        Ok(index)
    } else {
        Err(ProcessorError::InputVconMissing { index })
    }
}

/// Hands the context back untouched
pub struct NoopProcessor {
    info: ProcessorInfo,
}

impl NoopProcessor {
    fn construct(_: &InitOptions) -> Result<Arc<dyn VconProcessor>, ProcessorError> {
        let info = ProcessorInfo::builder("NoopProcessor")
            .version("0.0.1")
            .may_modify_vcons(true)
            .build()?;
        Ok(Arc::new(Self { info }))
    }
}

#[async_trait]
impl VconProcessor for NoopProcessor {
    fn info(&self) -> &ProcessorInfo {
        &self.info
    }

    async fn process(
        &self,
        io: ProcessorIo,
        _options: ProcessorOptions,
    ) -> Result<ProcessorIo, ProcessorError> {
        Ok(io)
    }
}

#[derive(Debug, Deserialize)]
struct SubjectOptions {
    #[serde(default)]
    input_vcon_index: usize,
    subject: String,
}

/// Sets the subject of the input vCon
pub struct SubjectSetterProcessor {
    info: ProcessorInfo,
}

impl SubjectSetterProcessor {
    fn construct(_: &InitOptions) -> Result<Arc<dyn VconProcessor>, ProcessorError> {
        let info = ProcessorInfo::builder("SubjectSetterProcessor")
            .version("0.0.1")
            .options_type(OptionsType::of::<SubjectOptions>("SubjectOptions"))
            .may_modify_vcons(true)
            .build()?;
        Ok(Arc::new(Self { info }))
    }
}

#[async_trait]
impl VconProcessor for SubjectSetterProcessor {
    fn info(&self) -> &ProcessorInfo {
        &self.info
    }

    async fn process(
        &self,
        mut io: ProcessorIo,
        options: ProcessorOptions,
    ) -> Result<ProcessorIo, ProcessorError> {
        let typed: SubjectOptions = options.parse("SubjectOptions")?;
        let mut vcon = io
            .get_vcon_object(typed.input_vcon_index)
            .await
            .ok_or(ProcessorError::InputVconMissing {
                index: typed.input_vcon_index,
            })?;
        vcon.subject = Some(typed.subject);
        io.update_vcon(vcon).await?;
        Ok(io)
    }
}

#[derive(Debug, Deserialize)]
struct SleepInit {
    #[serde(default = "default_sleep_seconds")]
    seconds: f64,
}

fn default_sleep_seconds() -> f64 {
    0.05
}

/// Sleeps for a configured time, then returns the context
pub struct SleepProcessor {
    info: ProcessorInfo,
    delay: Duration,
}

impl SleepProcessor {
    fn construct(init: &InitOptions) -> Result<Arc<dyn VconProcessor>, ProcessorError> {
        let init: SleepInit = init.parse("SleepProcessor")?;
        let info = ProcessorInfo::builder("SleepProcessor")
            .version("0.0.1")
            .may_modify_vcons(false)
            .build()?;
        Ok(Arc::new(Self {
            info,
            delay: Duration::from_secs_f64(init.seconds.max(0.0)),
        }))
    }
}

#[async_trait]
impl VconProcessor for SleepProcessor {
    fn info(&self) -> &ProcessorInfo {
        &self.info
    }

    async fn process(
        &self,
        io: ProcessorIo,
        _options: ProcessorOptions,
    ) -> Result<ProcessorIo, ProcessorError> {
        tokio::time::sleep(self.delay).await;
        Ok(io)
    }
}

/// Always fails
pub struct FailingProcessor {
    info: ProcessorInfo,
}

impl FailingProcessor {
    fn construct(_: &InitOptions) -> Result<Arc<dyn VconProcessor>, ProcessorError> {
        let info = ProcessorInfo::builder("FailingProcessor")
            .version("0.0.1")
            .may_modify_vcons(true)
            .build()?;
        Ok(Arc::new(Self { info }))
    }
}

#[async_trait]
impl VconProcessor for FailingProcessor {
    fn info(&self) -> &ProcessorInfo {
        &self.info
    }

    async fn process(
        &self,
        _io: ProcessorIo,
        _options: ProcessorOptions,
    ) -> Result<ProcessorIo, ProcessorError> {
        Err(ProcessorError::Failed(
            "simulated processor failure".to_string(),
        ))
    }
}

/// Returns a fresh, empty context instead of the one it was given
pub struct DropSlotsProcessor {
    info: ProcessorInfo,
}

impl DropSlotsProcessor {
    fn construct(_: &InitOptions) -> Result<Arc<dyn VconProcessor>, ProcessorError> {
        let info = ProcessorInfo::builder("DropSlotsProcessor")
            .version("0.0.1")
            .may_modify_vcons(true)
            .build()?;
        Ok(Arc::new(Self { info }))
    }
}

#[async_trait]
impl VconProcessor for DropSlotsProcessor {
    fn info(&self) -> &ProcessorInfo {
        &self.info
    }

    async fn process(
        &self,
        io: ProcessorIo,
        _options: ProcessorOptions,
    ) -> Result<ProcessorIo, ProcessorError> {
        Ok(ProcessorIo::new(io.storage().clone()))
    }
}

/// Declared read-only, but rewrites the input vCon anyway
pub struct SneakyUpdateProcessor {
    info: ProcessorInfo,
}

impl SneakyUpdateProcessor {
    fn construct(_: &InitOptions) -> Result<Arc<dyn VconProcessor>, ProcessorError> {
        let info = ProcessorInfo::builder("SneakyUpdateProcessor")
            .version("0.0.1")
            .may_modify_vcons(false)
            .build()?;
        Ok(Arc::new(Self { info }))
    }
}

#[async_trait]
impl VconProcessor for SneakyUpdateProcessor {
    fn info(&self) -> &ProcessorInfo {
        &self.info
    }

    async fn process(
        &self,
        mut io: ProcessorIo,
        options: ProcessorOptions,
    ) -> Result<ProcessorIo, ProcessorError> {
        let index = input_index(&io, &options)?;
        let mut vcon = io
            .get_vcon_object(index)
            .await
            .ok_or(ProcessorError::InputVconMissing { index })?;
        vcon.subject = Some("sneaky".to_string());
        io.update_vcon(vcon).await?;
        Ok(io)
    }
}
