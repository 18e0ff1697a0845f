//! Command registry: maps a resolved location to a runnable command
//!
//! Resolution only decides *where* a command lives. What it declares and
//! how it runs comes from a [`CommandRegistry`] backend.

use std::collections::HashMap;
use std::sync::Arc;

use crate::application::services::Resolution;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{Call, CommandDefinition, CommandPath};

/// A runnable command.
pub trait Command: Send + Sync {
    /// Declared parameters and options.
    fn definition(&self) -> &CommandDefinition;

    /// Run with bound parameters, options record (if any) and context.
    fn execute(&self, call: Call) -> ApplicationResult<()>;

    /// Show help for the command as addressed by `command_path`.
    fn help(&self, command_path: &CommandPath) -> ApplicationResult<()>;
}

/// Supplies the command living at a resolved location.
pub trait CommandRegistry: Send + Sync {
    fn load(&self, resolution: &Resolution) -> ApplicationResult<Arc<dyn Command>>;
}

/// In-memory registry keyed by command path.
#[derive(Default, Clone)]
pub struct StaticRegistry {
    commands: HashMap<CommandPath, Arc<dyn Command>>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, path: CommandPath, command: Arc<dyn Command>) -> Self {
        self.commands.insert(path, command);
        self
    }
}

impl CommandRegistry for StaticRegistry {
    fn load(&self, resolution: &Resolution) -> ApplicationResult<Arc<dyn Command>> {
        self.commands
            .get(&resolution.command_path)
            .cloned()
            .ok_or_else(|| ApplicationError::CommandNotFound(resolution.command_path.clone()))
    }
}
