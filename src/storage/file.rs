// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Directory-backed key-value store: one file per key.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::errors::StorageError;
use crate::traits::KeyValueStore;

const ENTRY_EXTENSION: &str = "kv";

/// Stores each key as `<escaped key>.kv` under a base directory.
///
/// Keys are escaped so any string (including `:` and `/`) maps to a single
/// flat file name. Writes go to a temporary file first and are renamed into
/// place.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    base_path: PathBuf,
}

impl FileKeyValueStore {
    /// Open (creating if needed) the store rooted at `base_path`.
    pub async fn open(base_path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path).await?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.base_path
            .join(format!("{}.{}", escape_key(key), ENTRY_EXTENSION))
    }
}

fn escape_key(key: &str) -> String {
    let mut escaped = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' => {
                escaped.push(byte as char)
            }
            _ => escaped.push_str(&format!("%{:02X}", byte)),
        }
    }
    escaped
}

fn unescape_key(escaped: &str) -> Option<String> {
    let bytes = escaped.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] == b'%' {
            let hex = escaped.get(index + 1..index + 3)?;
            decoded.push(u8::from_str_radix(hex, 16).ok()?);
            index += 3;
        } else {
            decoded.push(bytes[index]);
            index += 1;
        }
    }
    String::from_utf8(decoded).ok()
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.entry_path(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let path = self.entry_path(key);
        let staging = path.with_extension("tmp");
        fs::write(&staging, value).await?;
        fs::rename(&staging, &path).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        match fs::remove_file(self.entry_path(key)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        let mut entries = fs::read_dir(&self.base_path).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(ENTRY_EXTENSION) {
                continue;
            }
            let Some(key) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(unescape_key)
            else {
                continue;
            };
            if key.starts_with(prefix) {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}
