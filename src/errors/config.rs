// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading settings and pipeline seed files.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid pipeline seed file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("unsupported storage url: {0}")]
    UnsupportedUrl(String),
}
