// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::consts::{
    DEFAULT_LOG_LEVEL, DEFAULT_NUM_WORKERS, DEFAULT_POLL_INTERVAL, DEFAULT_STARTUP_DELAY,
    DEFAULT_STORAGE_URL,
};
use crate::errors::ConfigError;
use crate::processor::{InitOptions, ProcessorRegistry};

/// Process-wide settings, read once at startup.
///
/// # Example
/// ```toml
/// vcon_storage_url = "memory://"
/// pipeline_db_url = "file:///var/lib/vcon/pipelines"
/// log_level = "debug"
/// job_queues = ["ingress"]
///
/// [scheduler]
/// startup_delay_ms = 1000
///
/// [[processors]]
/// name = "transcribe"
/// module = "local"
/// class_name = "analysis_appender"
/// init_options = { analysis_type = "transcript", vendor = "acme" }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub vcon_storage_url: String,
    pub queue_db_url: String,
    pub pipeline_db_url: String,
    pub log_level: String,
    /// Advisory only; the scheduler runs a single consumer
    pub num_workers: usize,
    /// Queues the background scheduler consumes, in polling order
    pub job_queues: Vec<String>,
    pub scheduler: SchedulerSettings,
    /// YAML file of pipeline definitions stored at startup
    pub pipeline_seed_file: Option<PathBuf>,
    pub processors: Vec<ProcessorSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vcon_storage_url: DEFAULT_STORAGE_URL.to_string(),
            queue_db_url: DEFAULT_STORAGE_URL.to_string(),
            pipeline_db_url: DEFAULT_STORAGE_URL.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            num_workers: DEFAULT_NUM_WORKERS,
            job_queues: Vec::new(),
            scheduler: SchedulerSettings::default(),
            pipeline_seed_file: None,
            processors: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SchedulerSettings {
    pub run_background_jobs: bool,
    pub startup_delay_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            run_background_jobs: true,
            startup_delay_ms: DEFAULT_STARTUP_DELAY.as_millis() as u64,
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
        }
    }
}

impl SchedulerSettings {
    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// One processor registration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProcessorSettings {
    pub name: String,
    pub module: String,
    pub class_name: String,
    #[serde(default)]
    pub init_options: Map<String, Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Settings {
    /// Read settings from a TOML file, then apply environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut settings = Self::from_toml(&content)?;
        settings.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    /// Defaults plus environment overrides, for running without a file.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Self::default();
        settings.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `STORAGE_URL`, `QUEUE_DB_URL`, `PIPELINE_DB_URL`, `LOG_LEVEL`,
    /// `NUM_WORKERS` and `JOB_QUEUES` (comma separated) from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("STORAGE_URL") {
            self.vcon_storage_url = url;
        }
        if let Some(url) = lookup("QUEUE_DB_URL") {
            self.queue_db_url = url;
        }
        if let Some(url) = lookup("PIPELINE_DB_URL") {
            self.pipeline_db_url = url;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(workers) = lookup("NUM_WORKERS") {
            self.num_workers = workers
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                    key: "NUM_WORKERS".to_string(),
                    message: e.to_string(),
                })?;
        }
        if let Some(queues) = lookup("JOB_QUEUES") {
            self.job_queues = queues
                .split(',')
                .map(str::trim)
                .filter(|queue| !queue.is_empty())
                .map(str::to_string)
                .collect();
        }
        Ok(())
    }

    /// Register every configured processor with `registry`.
    ///
    /// Construction failures are recorded in the registry, not returned.
    pub fn register_processors(&self, registry: &mut ProcessorRegistry) {
        for processor in &self.processors {
            registry.register(
                InitOptions::from(processor.init_options.clone()),
                &processor.name,
                &processor.module,
                &processor.class_name,
                processor.title.as_deref(),
                processor.description.as_deref(),
            );
        }
    }
}
