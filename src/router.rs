//! Handler registry - binds handler names in manifests to actions

use crate::action::{Action, ActionMetaData};
use crate::error::{CommandError, CommandResult};
use std::collections::HashMap;

#[cfg(feature = "manifest")]
use crate::manifest::CommandManifest;
#[cfg(feature = "manifest")]
use crate::schema::CommandSchema;

/// Registry mapping handler names to actions
#[derive(Debug, Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Action>,
}

impl HandlerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `action` under `name`, replacing any previous handler
    pub fn register(mut self, name: impl Into<String>, action: Action) -> Self {
        self.handlers.insert(name.into(), action);
        self
    }

    /// Register a synchronous closure under `name`
    pub fn register_fn<F>(self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(ActionMetaData) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.register(name, Action::new(handler))
    }

    /// Look up a handler
    pub fn get(&self, name: &str) -> CommandResult<Action> {
        self.handlers
            .get(name)
            .cloned()
            .ok_or_else(|| CommandError::HandlerNotFound(name.to_string()))
    }

    /// Check if a handler is registered
    pub fn has_handler(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// All registered handler names, sorted
    pub fn registered_handlers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Turn a manifest into a schema by binding every handler name
    #[cfg(feature = "manifest")]
    pub fn resolve(&self, manifest: &CommandManifest) -> CommandResult<CommandSchema> {
        let sub_commands = manifest
            .sub_commands
            .iter()
            .map(|sub| self.resolve(sub))
            .collect::<CommandResult<Vec<_>>>()?;

        Ok(CommandSchema {
            command: manifest.command.clone(),
            description: manifest.description.clone(),
            options: manifest.options.clone(),
            action: self.get(&manifest.handler)?,
            sub_commands,
        })
    }
}
