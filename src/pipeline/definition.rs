// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

use crate::errors::ValidationError;

const TIMEOUT_FIELD: &str = "pipeline_options.timeout";

/// Pipeline-level execution options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineOptions {
    #[serde(default)]
    pub save_vcons: bool,
    /// Seconds from run start; `None` is unbounded
    #[serde(default, deserialize_with = "deserialize_timeout")]
    pub timeout: Option<f64>,
    #[serde(default)]
    pub failure_queue: Option<String>,
}

impl PipelineOptions {
    /// `None` when unbounded or too large to represent as a [`Duration`].
    pub fn timeout_duration(&self) -> Option<Duration> {
        self.timeout
            .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok())
    }
}

/// Interpret a raw `timeout` value: a non-negative number of seconds or null.
pub fn parse_timeout(value: &Value) -> Result<Option<f64>, ValidationError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => match number.as_f64() {
            Some(seconds) if seconds.is_finite() && seconds >= 0.0 => Ok(Some(seconds)),
            _ => Err(ValidationError::invalid_field(
                TIMEOUT_FIELD,
                format!("must be a non-negative number of seconds, got {}", number),
            )),
        },
        other => Err(ValidationError::invalid_field(
            TIMEOUT_FIELD,
            format!("must be a number of seconds or null, got {}", other),
        )),
    }
}

fn deserialize_timeout<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    parse_timeout(&value).map_err(serde::de::Error::custom)
}

/// One step of a pipeline: a registered processor name and its options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineProcessor {
    pub processor_name: String,
    #[serde(default = "empty_options")]
    pub processor_options: Value,
}

fn empty_options() -> Value {
    Value::Object(Map::new())
}

impl PipelineProcessor {
    pub fn new(processor_name: impl Into<String>, processor_options: Value) -> Self {
        Self {
            processor_name: processor_name.into(),
            processor_options,
        }
    }
}

/// A named pipeline's options and ordered processor steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineDefinition {
    #[serde(default)]
    pub pipeline_options: PipelineOptions,
    #[serde(default)]
    pub processors: Vec<PipelineProcessor>,
}

impl PipelineDefinition {
    pub fn new(pipeline_options: PipelineOptions, processors: Vec<PipelineProcessor>) -> Self {
        Self {
            pipeline_options,
            processors,
        }
    }

    /// Parse a definition document, reporting a bad `timeout` by field name.
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        if let Some(timeout) = value
            .get("pipeline_options")
            .and_then(|options| options.get("timeout"))
        {
            parse_timeout(timeout)?;
        }

        serde_json::from_value(value).map_err(|e| ValidationError::MalformedDefinition {
            message: e.to_string(),
        })
    }

    pub fn from_json(text: &str) -> Result<Self, ValidationError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| ValidationError::MalformedDefinition {
                message: e.to_string(),
            })?;
        Self::from_value(value)
    }

    pub fn processor_names(&self) -> impl Iterator<Item = &str> {
        self.processors.iter().map(|p| p.processor_name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_timeout_values() {
        struct TestCase {
            name: &'static str,
            timeout: Value,
            expected: Result<Option<f64>, ()>,
        }

        let test_cases = vec![
            TestCase {
                name: "float",
                timeout: json!(0.1),
                expected: Ok(Some(0.1)),
            },
            TestCase {
                name: "integer",
                timeout: json!(10),
                expected: Ok(Some(10.0)),
            },
            TestCase {
                name: "null is unbounded",
                timeout: Value::Null,
                expected: Ok(None),
            },
            TestCase {
                name: "string",
                timeout: json!("ddd"),
                expected: Err(()),
            },
            TestCase {
                name: "negative",
                timeout: json!(-1.0),
                expected: Err(()),
            },
            TestCase {
                name: "boolean",
                timeout: json!(true),
                expected: Err(()),
            },
        ];

        for test_case in test_cases {
            let document = json!({
                "pipeline_options": {"timeout": test_case.timeout},
                "processors": []
            });
            let result = PipelineDefinition::from_value(document);
            match test_case.expected {
                Ok(timeout) => assert_eq!(
                    result.map(|d| d.pipeline_options.timeout),
                    Ok(timeout),
                    "Test case '{}'",
                    test_case.name
                ),
                Err(()) => {
                    let error = result.unwrap_err();
                    assert_eq!(error.field(), Some(TIMEOUT_FIELD), "Test case '{}'", test_case.name);
                    assert!(error.to_string().contains("timeout"));
                }
            }
        }
    }

    #[test]
    fn test_timeout_duration() {
        struct TestCase {
            name: &'static str,
            timeout: Option<f64>,
            expected: Option<Duration>,
        }

        let test_cases = vec![
            TestCase {
                name: "unbounded",
                timeout: None,
                expected: None,
            },
            TestCase {
                name: "fractional seconds",
                timeout: Some(0.25),
                expected: Some(Duration::from_millis(250)),
            },
            TestCase {
                name: "beyond duration range",
                timeout: Some(1e20),
                expected: None,
            },
        ];

        for test_case in test_cases {
            let options = PipelineOptions {
                timeout: test_case.timeout,
                ..PipelineOptions::default()
            };
            assert_eq!(
                options.timeout_duration(),
                test_case.expected,
                "Test case '{}'",
                test_case.name
            );
        }
    }

    #[test]
    fn test_defaults_when_members_missing() {
        let definition = PipelineDefinition::from_json(
            r#"{"processors": [{"processor_name": "party_counter"}]}"#,
        )
        .unwrap();

        assert!(!definition.pipeline_options.save_vcons);
        assert_eq!(definition.pipeline_options.timeout, None);
        assert_eq!(definition.pipeline_options.failure_queue, None);
        assert_eq!(definition.processors[0].processor_options, json!({}));
    }

    #[test]
    fn test_serialized_shape() {
        let definition = PipelineDefinition::new(
            PipelineOptions {
                save_vcons: true,
                timeout: Some(2.5),
                failure_queue: Some("failed".to_string()),
            },
            vec![PipelineProcessor::new("a", json!({"input_vcon_index": 0}))],
        );

        assert_eq!(
            serde_json::to_value(&definition).unwrap(),
            json!({
                "pipeline_options": {"save_vcons": true, "timeout": 2.5, "failure_queue": "failed"},
                "processors": [{"processor_name": "a", "processor_options": {"input_vcon_index": 0}}]
            })
        );
    }

    #[test]
    fn test_malformed_documents() {
        let not_json = PipelineDefinition::from_json("{processors:");
        assert!(matches!(
            not_json,
            Err(ValidationError::MalformedDefinition { .. })
        ));

        let wrong_shape = PipelineDefinition::from_value(json!({"processors": "a,b"}));
        assert!(matches!(
            wrong_shape,
            Err(ValidationError::MalformedDefinition { .. })
        ));
    }

    #[test]
    fn test_yaml_timeout_validation() {
        let bad: Result<PipelineOptions, _> = serde_yaml::from_str("timeout: soon");
        assert!(bad.unwrap_err().to_string().contains("timeout"));

        let good: PipelineOptions = serde_yaml::from_str("timeout: 3\nsave_vcons: true").unwrap();
        assert_eq!(good.timeout, Some(3.0));
        assert!(good.save_vcons);
    }
}
