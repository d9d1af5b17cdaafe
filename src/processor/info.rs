// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::ProcessorError;
use crate::processor::OptionsType;

/// Descriptive metadata every processor exposes.
#[derive(Debug, Clone)]
pub struct ProcessorInfo {
    class_name: &'static str,
    title: String,
    description: String,
    version: String,
    options_type: OptionsType,
    may_modify_vcons: bool,
}

impl ProcessorInfo {
    pub fn builder(class_name: &'static str) -> ProcessorInfoBuilder {
        ProcessorInfoBuilder {
            class_name,
            title: None,
            description: None,
            version: None,
            options_type: None,
            may_modify_vcons: None,
        }
    }

    pub fn class_name(&self) -> &'static str {
        self.class_name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn options_type(&self) -> OptionsType {
        self.options_type
    }

    pub fn may_modify_vcons(&self) -> bool {
        self.may_modify_vcons
    }
}

/// Builder for [`ProcessorInfo`].
///
/// `version` and `may_modify_vcons` have no defaults; `build` fails if either
/// was never set.
#[derive(Debug)]
pub struct ProcessorInfoBuilder {
    class_name: &'static str,
    title: Option<String>,
    description: Option<String>,
    version: Option<String>,
    options_type: Option<OptionsType>,
    may_modify_vcons: Option<bool>,
}

impl ProcessorInfoBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn options_type(mut self, options_type: OptionsType) -> Self {
        self.options_type = Some(options_type);
        self
    }

    pub fn may_modify_vcons(mut self, may_modify: bool) -> Self {
        self.may_modify_vcons = Some(may_modify);
        self
    }

    pub fn build(self) -> Result<ProcessorInfo, ProcessorError> {
        let may_modify_vcons =
            self.may_modify_vcons
                .ok_or_else(|| ProcessorError::MayModifyPolicyNotSet {
                    class_name: self.class_name.to_string(),
                })?;
        let version = self
            .version
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ProcessorError::VersionNotSet {
                class_name: self.class_name.to_string(),
            })?;

        Ok(ProcessorInfo {
            class_name: self.class_name,
            title: self.title.unwrap_or_else(|| self.class_name.to_string()),
            description: self
                .description
                .unwrap_or_else(|| format!("{} vCon processor", self.class_name)),
            version,
            options_type: self.options_type.unwrap_or_else(OptionsType::base),
            may_modify_vcons,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_requirements() {
        struct TestCase {
            name: &'static str,
            builder: ProcessorInfoBuilder,
            expected: Result<(), ProcessorError>,
        }

        let test_cases = vec![
            TestCase {
                name: "complete",
                builder: ProcessorInfo::builder("Counter")
                    .version("1.0.0")
                    .may_modify_vcons(false),
                expected: Ok(()),
            },
            TestCase {
                name: "missing modify policy",
                builder: ProcessorInfo::builder("Counter").version("1.0.0"),
                expected: Err(ProcessorError::MayModifyPolicyNotSet {
                    class_name: "Counter".to_string(),
                }),
            },
            TestCase {
                name: "missing version",
                builder: ProcessorInfo::builder("Counter").may_modify_vcons(true),
                expected: Err(ProcessorError::VersionNotSet {
                    class_name: "Counter".to_string(),
                }),
            },
            TestCase {
                name: "empty version",
                builder: ProcessorInfo::builder("Counter")
                    .version("")
                    .may_modify_vcons(true),
                expected: Err(ProcessorError::VersionNotSet {
                    class_name: "Counter".to_string(),
                }),
            },
        ];

        for test_case in test_cases {
            let result = test_case.builder.build().map(|_| ());
            assert_eq!(result, test_case.expected, "Test case '{}'", test_case.name);
        }
    }

    #[test]
    fn test_defaults() {
        let info = ProcessorInfo::builder("Counter")
            .version("0.1.0")
            .may_modify_vcons(false)
            .build()
            .unwrap();

        assert_eq!(info.title(), "Counter");
        assert_eq!(info.description(), "Counter vCon processor");
        assert_eq!(info.options_type().name(), "ProcessorOptions");
        assert!(!info.may_modify_vcons());
    }

    #[test]
    fn test_policy_error_message() {
        let error = ProcessorInfo::builder("Counter")
            .version("0.1.0")
            .build()
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "processor method may modify vCons policy not set for: Counter"
        );
    }
}
