// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

/// vCon document version written by [`Vcon::new`].
pub const VCON_VERSION: &str = "0.0.1";

fn default_version() -> String {
    VCON_VERSION.to_string()
}

/// Parsed form of a vCon conversation record.
///
/// Parties, dialogs, analyses and attachments are kept as raw JSON objects so
/// that processors can carry vendor specific members through a pipeline
/// untouched. Unknown top-level members are preserved in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vcon {
    #[serde(default = "default_version")]
    pub vcon: String,
    pub uuid: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default)]
    pub parties: Vec<Value>,
    #[serde(default)]
    pub dialog: Vec<Value>,
    #[serde(default)]
    pub analysis: Vec<Value>,
    #[serde(default)]
    pub attachments: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Vcon {
    /// Create an empty vCon with a fresh v4 UUID.
    pub fn new() -> Self {
        Self::with_uuid(Uuid::new_v4())
    }

    pub fn with_uuid(uuid: Uuid) -> Self {
        Self {
            vcon: default_version(),
            uuid,
            created_at: Some(Utc::now()),
            subject: None,
            parties: Vec::new(),
            dialog: Vec::new(),
            analysis: Vec::new(),
            attachments: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn from_dict(dict: Map<String, Value>) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(dict))
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_dict(&self) -> Result<Map<String, Value>, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            // Struct serialization always yields an object
            other => Err(serde::ser::Error::custom(format!(
                "vCon serialized to non-object: {}",
                other
            ))),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Append a party and return its index.
    pub fn add_party(&mut self, party: Value) -> usize {
        self.parties.push(party);
        self.parties.len() - 1
    }

    /// Append a dialog and return its index.
    pub fn add_dialog(&mut self, dialog: Value) -> usize {
        self.dialog.push(dialog);
        self.dialog.len() - 1
    }

    /// Append an analysis object for the dialog at `dialog_index` and return its index.
    pub fn add_analysis(
        &mut self,
        dialog_index: usize,
        analysis_type: &str,
        vendor: &str,
        product: Option<&str>,
        body: Value,
    ) -> usize {
        let mut analysis = json!({
            "type": analysis_type,
            "dialog": dialog_index,
            "vendor": vendor,
            "body": body,
            "encoding": "json",
        });
        if let (Some(product), Value::Object(map)) = (product, &mut analysis) {
            map.insert("product".to_string(), Value::String(product.to_string()));
        }
        self.analysis.push(analysis);
        self.analysis.len() - 1
    }
}

impl Default for Vcon {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_members_preserved() {
        let text = r#"{
            "vcon": "0.0.1",
            "uuid": "018a4a76-3e6e-8b3c-9a2c-6f5e0d1c2b3a",
            "parties": [{"tel": "+12345678901"}],
            "redacted": {"reason": "pii"}
        }"#;

        let vcon = Vcon::from_json(text).unwrap();
        assert_eq!(vcon.parties.len(), 1);
        assert!(vcon.dialog.is_empty());
        assert_eq!(vcon.extra.get("redacted"), Some(&json!({"reason": "pii"})));

        let dict = vcon.to_dict().unwrap();
        assert_eq!(dict.get("redacted"), Some(&json!({"reason": "pii"})));
    }

    #[test]
    fn test_missing_uuid_is_rejected() {
        let result = Vcon::from_json(r#"{"vcon": "0.0.1", "parties": []}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_add_analysis() {
        let mut vcon = Vcon::new();
        vcon.add_dialog(json!({"type": "recording"}));
        let index = vcon.add_analysis(0, "transcript", "deepgram", Some("transcription"), json!("hello"));

        assert_eq!(index, 0);
        assert_eq!(vcon.analysis[0]["type"], "transcript");
        assert_eq!(vcon.analysis[0]["vendor"], "deepgram");
        assert_eq!(vcon.analysis[0]["product"], "transcription");
        assert_eq!(vcon.analysis[0]["dialog"], 0);
    }
}
