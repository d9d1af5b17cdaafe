// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! vCon and key-value storage backends, selected by URL scheme.
//!
//! * `memory://` - process-local maps, lost on exit
//! * `file://<dir>` - one file per key under `<dir>` (key-value store only)

mod file;
mod memory;

pub use file::FileKeyValueStore;
pub use memory::{InMemoryKeyValueStore, InMemoryVconStorage};

use std::sync::Arc;

use crate::errors::ConfigError;
use crate::traits::{KeyValueStore, VconStorage};

const MEMORY_SCHEME: &str = "memory://";
const FILE_SCHEME: &str = "file://";

/// Build the vCon store named by `url`.
pub fn open_vcon_storage(url: &str) -> Result<Arc<dyn VconStorage>, ConfigError> {
    if url.starts_with(MEMORY_SCHEME) {
        Ok(Arc::new(InMemoryVconStorage::new()))
    } else {
        Err(ConfigError::UnsupportedUrl(url.to_string()))
    }
}

/// Build the key-value store named by `url`.
pub async fn open_key_value_store(url: &str) -> Result<Arc<dyn KeyValueStore>, ConfigError> {
    if url.starts_with(MEMORY_SCHEME) {
        return Ok(Arc::new(InMemoryKeyValueStore::new()));
    }

    match url.strip_prefix(FILE_SCHEME) {
        Some(dir) if !dir.is_empty() => {
            let store = FileKeyValueStore::open(dir)
                .await
                .map_err(|e| ConfigError::InvalidValue {
                    key: "pipeline_db_url".to_string(),
                    message: e.to_string(),
                })?;
            Ok(Arc::new(store))
        }
        _ => Err(ConfigError::UnsupportedUrl(url.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_url_schemes() {
        struct TestCase {
            url: String,
            vcon_ok: bool,
            kv_ok: bool,
        }

        let dir = tempfile::TempDir::new().unwrap();
        let test_cases = vec![
            TestCase {
                url: "memory://".to_string(),
                vcon_ok: true,
                kv_ok: true,
            },
            TestCase {
                url: format!("file://{}", dir.path().display()),
                vcon_ok: false,
                kv_ok: true,
            },
            TestCase {
                url: "file://".to_string(),
                vcon_ok: false,
                kv_ok: false,
            },
            TestCase {
                url: "redis://localhost:6379".to_string(),
                vcon_ok: false,
                kv_ok: false,
            },
        ];

        for test_case in test_cases {
            assert_eq!(
                open_vcon_storage(&test_case.url).is_ok(),
                test_case.vcon_ok,
                "vcon store for '{}'",
                test_case.url
            );
            assert_eq!(
                open_key_value_store(&test_case.url).await.is_ok(),
                test_case.kv_ok,
                "key-value store for '{}'",
                test_case.url
            );
        }
    }
}
