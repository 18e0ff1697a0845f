//! TOML manifest registry
//!
//! Each module in the command tree is a TOML file declaring the command's
//! parameters and options, plus an optional program to run:
//!
//! ```toml
//! summary = "Create a widget"
//! run = ["./scripts/create.sh", "--verbose"]
//!
//! [[params]]
//! name = "name"
//! type = "string"
//!
//! [[options]]
//! name = "force"
//! flag = "f"
//! toggle = true
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use colored::Colorize;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::application::services::Resolution;
use crate::application::{help, ApplicationError, ApplicationResult, Command, CommandRegistry};
use crate::domain::{Call, CommandDefinition, CommandPath, Value};
use crate::infrastructure::traits::{CommandRunner, FileSystem};
use crate::infrastructure::InfraError;

/// Environment variable prefix for values exported to `run` programs.
pub const ENV_PREFIX: &str = "CMDTREE";

/// On-disk shape of a module.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    /// Program and fixed arguments.
    #[serde(default)]
    pub run: Vec<String>,
    #[serde(flatten)]
    pub definition: CommandDefinition,
}

impl Manifest {
    pub fn parse(content: &str, path: &Path) -> Result<Self, InfraError> {
        toml::from_str(content).map_err(|e| InfraError::Manifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// A command backed by a manifest file.
pub struct ManifestCommand {
    path: PathBuf,
    manifest: Manifest,
    cmd: Arc<dyn CommandRunner>,
}

impl ManifestCommand {
    pub fn new(path: PathBuf, manifest: Manifest, cmd: Arc<dyn CommandRunner>) -> Self {
        Self {
            path,
            manifest,
            cmd,
        }
    }

    /// Environment exported to the `run` program.
    ///
    /// Undefined values are not exported.
    pub fn environment(&self, call: &Call) -> Vec<(String, String)> {
        let definition = &self.manifest.definition;
        let mut envs = Vec::new();

        for (param, value) in definition.params.iter().zip(&call.params) {
            if !value.is_undefined() {
                envs.push((env_key("PARAM", &param.name), value.to_string()));
            }
        }
        for (name, value) in call.options.iter().flatten() {
            if !value.is_undefined() {
                envs.push((env_key("OPTION", name), value.to_string()));
            }
        }
        envs.push((
            format!("{ENV_PREFIX}_COMMAND_PATH"),
            call.context.command_path.to_string(),
        ));
        envs
    }

    fn print_call(&self, call: &Call) {
        let definition = &self.manifest.definition;
        println!("{}", call.context.command_path.to_string().cyan().bold());
        for (param, value) in definition.params.iter().zip(&call.params) {
            println!("  {} = {}", param.name, render(value));
        }
        for (name, value) in call.options.iter().flatten() {
            println!("  --{} = {}", name, render(value));
        }
        if !call.context.extra.is_empty() {
            println!("  extra: {}", call.context.extra.join(" "));
        }
    }
}

fn env_key(kind: &str, name: &str) -> String {
    format!(
        "{ENV_PREFIX}_{kind}_{}",
        name.to_ascii_uppercase().replace('-', "_")
    )
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => format!("{s:?}"),
        other => other.to_string(),
    }
}

impl Command for ManifestCommand {
    fn definition(&self) -> &CommandDefinition {
        &self.manifest.definition
    }

    #[instrument(level = "debug", skip(self, call), fields(manifest = %self.path.display()))]
    fn execute(&self, call: Call) -> ApplicationResult<()> {
        let Some((program, fixed)) = self.manifest.run.split_first() else {
            self.print_call(&call);
            return Ok(());
        };

        let mut args = fixed.to_vec();
        args.extend(call.context.extra.iter().cloned());
        let envs = self.environment(&call);
        debug!("execute: {} {:?}", program, args);

        let status = self
            .cmd
            .run_interactive(program, &args, &envs, &call.context.cwd)
            .map_err(|e| ApplicationError::OperationFailed {
                context: format!("run {program}"),
                source: Box::new(e),
            })?;

        if !status.success() {
            return Err(ApplicationError::OperationFailed {
                context: format!("{} exited with {}", call.context.command_path, status),
                source: Box::new(InfraError::Exec {
                    program: program.clone(),
                    exit_code: status.code(),
                }),
            });
        }
        Ok(())
    }

    fn help(&self, command_path: &CommandPath) -> ApplicationResult<()> {
        print!("{}", help::render(&self.manifest.definition, command_path));
        Ok(())
    }
}

/// Registry reading manifests from the resolved module location.
pub struct ManifestRegistry {
    fs: Arc<dyn FileSystem>,
    cmd: Arc<dyn CommandRunner>,
}

impl ManifestRegistry {
    pub fn new(fs: Arc<dyn FileSystem>, cmd: Arc<dyn CommandRunner>) -> Self {
        Self { fs, cmd }
    }

    /// Read and parse the manifest at `path`.
    pub fn read(&self, path: &Path) -> ApplicationResult<Manifest> {
        let content = self
            .fs
            .read_to_string(path)
            .map_err(|e| ApplicationError::OperationFailed {
                context: format!("read manifest {}", path.display()),
                source: Box::new(e),
            })?;
        Manifest::parse(&content, path).map_err(|e| ApplicationError::OperationFailed {
            context: format!("parse manifest {}", path.display()),
            source: Box::new(e),
        })
    }
}

impl CommandRegistry for ManifestRegistry {
    fn load(&self, resolution: &Resolution) -> ApplicationResult<Arc<dyn Command>> {
        if !self.fs.is_file(&resolution.location) {
            return Err(ApplicationError::CommandNotFound(
                resolution.command_path.clone(),
            ));
        }
        debug!("load: {}", resolution.location.display());
        let manifest = self.read(&resolution.location)?;
        Ok(Arc::new(ManifestCommand::new(
            resolution.location.clone(),
            manifest,
            Arc::clone(&self.cmd),
        )))
    }
}
