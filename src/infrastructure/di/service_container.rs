//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::instrument;

use crate::application::services::{
    CommandCatalog, CommandResolver, Dispatcher, Outcome, TreeLayout,
};
use crate::application::{ApplicationResult, CommandRegistry};
use crate::config::Settings;
use crate::infrastructure::manifest::ManifestRegistry;
use crate::infrastructure::traits::{CommandRunner, FileSystem, RealCommandRunner, RealFileSystem};

/// Container holding all application services for one run.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Command runner abstraction
    pub cmd: Arc<dyn CommandRunner>,

    /// Source of command definitions
    pub registry: Arc<dyn CommandRegistry>,

    /// Working directory reported to commands
    pub cwd: PathBuf,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings, cwd: PathBuf) -> Self {
        Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(RealCommandRunner),
            cwd,
        )
    }

    /// Create a service container with custom dependencies (for testing).
    ///
    /// Commands are loaded from manifests through `fs`.
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
        cwd: PathBuf,
    ) -> Self {
        let settings = Arc::new(settings);
        let registry = Arc::new(ManifestRegistry::new(Arc::clone(&fs), Arc::clone(&cmd)));

        Self {
            settings,
            fs,
            cmd,
            registry,
            cwd,
        }
    }

    pub fn layout(&self) -> TreeLayout {
        TreeLayout {
            default_module: self.settings.default_module.clone(),
            extension: self.settings.module_extension.clone(),
        }
    }

    pub fn resolver(&self) -> CommandResolver {
        CommandResolver::new(Arc::clone(&self.fs), self.layout())
    }

    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(Arc::clone(&self.registry), self.cwd.clone())
    }

    pub fn catalog(&self) -> CommandCatalog {
        CommandCatalog::new(Arc::clone(&self.fs), self.layout())
    }

    /// Resolve `argv` against the configured command tree and dispatch it.
    #[instrument(level = "debug", skip(self))]
    pub fn run(&self, argv: &[String]) -> ApplicationResult<Outcome> {
        let resolution =
            self.resolver()
                .resolve(&self.settings.commands_dir, &self.settings.entry, argv);
        self.dispatcher().dispatch(&resolution, argv)
    }
}
