// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Named processor instances resolved from static plugin module tables.
//!
//! A [`PluginModule`] is the in-process stand-in for a loadable package: a
//! table of class names to constructor functions. Registration looks the
//! module and class up once, constructs the processor with its init options
//! and records how far it got. Failures are logged and remembered, never
//! returned, so one bad processor cannot keep the service from starting.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::errors::{NotInstantiatedReason, ProcessorError, RegistryError};
use crate::observability::messages::processor::{
    ProcessorInstantiationFailed, ProcessorRegistered,
};
use crate::processor::InitOptions;
use crate::traits::VconProcessor;

/// Builds a processor from its init options.
pub type ProcessorConstructor =
    fn(&InitOptions) -> Result<Arc<dyn VconProcessor>, ProcessorError>;

/// A named table of processor classes.
#[derive(Clone)]
pub struct PluginModule {
    name: String,
    classes: HashMap<String, ProcessorConstructor>,
}

impl PluginModule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            classes: HashMap::new(),
        }
    }

    pub fn with_class(mut self, class_name: &str, constructor: ProcessorConstructor) -> Self {
        self.classes.insert(class_name.to_string(), constructor);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self, class_name: &str) -> Option<ProcessorConstructor> {
        self.classes.get(class_name).copied()
    }

    pub fn class_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.classes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

enum LoadState {
    NotAttempted,
    Failed(NotInstantiatedReason),
    Ready(Arc<dyn VconProcessor>),
}

/// One registry entry and the outcome of loading it.
pub struct Registration {
    name: String,
    module_name: String,
    class_name: String,
    init_options: InitOptions,
    title: Option<String>,
    description: Option<String>,
    state: LoadState,
}

impl Registration {
    fn new(
        name: &str,
        module_name: &str,
        class_name: &str,
        init_options: InitOptions,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Self {
        Self {
            name: name.to_string(),
            module_name: module_name.to_string(),
            class_name: class_name.to_string(),
            init_options,
            title: title.filter(|t| !t.is_empty()).map(str::to_string),
            description: description.filter(|d| !d.is_empty()).map(str::to_string),
            state: LoadState::NotAttempted,
        }
    }

    fn load(&mut self, modules: &HashMap<String, PluginModule>) {
        if !matches!(self.state, LoadState::NotAttempted) {
            return;
        }

        self.state = match self.construct(modules) {
            Ok(instance) => LoadState::Ready(instance),
            Err(reason) => LoadState::Failed(reason),
        };
    }

    fn construct(
        &self,
        modules: &HashMap<String, PluginModule>,
    ) -> Result<Arc<dyn VconProcessor>, NotInstantiatedReason> {
        let module = modules
            .get(&self.module_name)
            .ok_or_else(|| NotInstantiatedReason::ModuleNotFound {
                module_name: self.module_name.clone(),
            })?;
        let constructor =
            module
                .class(&self.class_name)
                .ok_or_else(|| NotInstantiatedReason::ClassNotFound {
                    module_name: self.module_name.clone(),
                    class_name: self.class_name.clone(),
                })?;
        constructor(&self.init_options).map_err(|e| NotInstantiatedReason::ConstructionFailed {
            reason: e.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn init_options(&self) -> &InitOptions {
        &self.init_options
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, LoadState::Ready(_))
    }

    pub fn instance(&self) -> Result<Arc<dyn VconProcessor>, RegistryError> {
        match &self.state {
            LoadState::Ready(instance) => Ok(instance.clone()),
            LoadState::NotAttempted => Err(RegistryError::NotInstantiated {
                name: self.name.clone(),
                reason: NotInstantiatedReason::LoadNotAttempted,
            }),
            LoadState::Failed(reason) => Err(RegistryError::NotInstantiated {
                name: self.name.clone(),
                reason: reason.clone(),
            }),
        }
    }

    /// Title override, else the processor's own title.
    pub fn title(&self) -> Option<&str> {
        match (&self.title, &self.state) {
            (Some(title), _) => Some(title.as_str()),
            (None, LoadState::Ready(instance)) => Some(instance.info().title()),
            (None, _) => None,
        }
    }

    /// Description override, else the processor's own description.
    pub fn description(&self) -> Option<&str> {
        match (&self.description, &self.state) {
            (Some(description), _) => Some(description.as_str()),
            (None, LoadState::Ready(instance)) => Some(instance.info().description()),
            (None, _) => None,
        }
    }
}

/// Processor instances by registration name.
#[derive(Default)]
pub struct ProcessorRegistry {
    modules: HashMap<String, PluginModule>,
    registrations: BTreeMap<String, Registration>,
}

impl ProcessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a plugin module available to later registrations.
    pub fn add_module(&mut self, module: PluginModule) {
        self.modules.insert(module.name().to_string(), module);
    }

    /// Register a processor under `name`, replacing any earlier entry.
    ///
    /// Never fails; see [`ProcessorRegistry::get_instance`] for the outcome.
    pub fn register(
        &mut self,
        init_options: InitOptions,
        name: &str,
        module_name: &str,
        class_name: &str,
        title: Option<&str>,
        description: Option<&str>,
    ) {
        let mut registration = Registration::new(
            name,
            module_name,
            class_name,
            init_options,
            title,
            description,
        );
        registration.load(&self.modules);

        match &registration.state {
            LoadState::Failed(reason) => {
                let reason = reason.to_string();
                tracing::error!(
                    "{}",
                    ProcessorInstantiationFailed {
                        processor_name: name,
                        module_name,
                        reason: &reason,
                    }
                );
            }
            _ => tracing::info!(
                "{}",
                ProcessorRegistered {
                    processor_name: name,
                    module_name,
                    class_name,
                }
            ),
        }

        self.registrations.insert(name.to_string(), registration);
    }

    pub fn get_instance(&self, name: &str) -> Result<Arc<dyn VconProcessor>, RegistryError> {
        self.registrations
            .get(name)
            .ok_or_else(|| RegistryError::NotRegistered {
                name: name.to_string(),
            })?
            .instance()
    }

    pub fn registration(&self, name: &str) -> Option<&Registration> {
        self.registrations.get(name)
    }

    /// Registered names, sorted; only those with a ready instance if asked.
    pub fn processor_names(&self, only_successful: bool) -> Vec<String> {
        self.registrations
            .values()
            .filter(|registration| !only_successful || registration.is_ready())
            .map(|registration| registration.name.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Markdown catalogue of every ready processor.
    pub fn processor_docs(&self) -> String {
        let mut docs = String::from("# vCon Processors\n");
        for registration in self.registrations.values() {
            let Ok(instance) = registration.instance() else {
                continue;
            };
            let info = instance.info();
            docs.push_str(&format!(
                "\n## {}\n\n**{}** (`{}.{}` version {})\n\n{}\n\nOptions type: `{}`\n\nModifies vCons: {}\n",
                registration.name(),
                registration.title().unwrap_or(info.class_name()),
                registration.module_name(),
                registration.class_name(),
                info.version(),
                registration.description().unwrap_or_default(),
                info.options_type().name(),
                if info.may_modify_vcons() { "yes" } else { "no" },
            ));
        }
        docs
    }
}
