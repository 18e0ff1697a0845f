//! Command execution for the cmdtree binary

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::services::Outcome;
use crate::cli::args::Cli;
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::Settings;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Execute the CLI command.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    if let Some(shell) = cli.completion {
        return _completion(shell);
    }
    if cli.config_template {
        output::info(&Settings::template());
        return Ok(());
    }

    let cwd = std::env::current_dir()
        .map_err(|e| InfraError::io("determine working directory", e))?;
    let settings = load_settings(cli, &cwd)?;
    if cli.show_config {
        output::info(&settings.to_toml()?);
        return Ok(());
    }

    let container = ServiceContainer::new(settings, cwd);
    if !container.fs.is_dir(&container.settings.commands_dir) {
        return Err(CliError::Usage(format!(
            "command tree not found: {} (set --commands-dir or commands_dir in .cmdtree.toml; see --cmdtree-help)",
            container.settings.commands_dir.display()
        )));
    }

    if cli.list {
        _list(&container)
    } else if cli.tree {
        _tree(&container)
    } else {
        _dispatch(&container, &cli.args)
    }
}

/// Layered settings with command-line flags applied last.
fn load_settings(cli: &Cli, cwd: &Path) -> CliResult<Settings> {
    let mut settings = Settings::load(Some(cwd))?;
    if let Some(dir) = &cli.commands_dir {
        settings = settings.with_commands_dir(dir.clone());
    }
    if let Some(entry) = &cli.entry {
        settings = settings.with_entry(entry.clone());
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

#[instrument(skip(container))]
fn _dispatch(container: &ServiceContainer, args: &[String]) -> CliResult<()> {
    match container.run(args)? {
        Outcome::Help => debug!("help shown, nothing dispatched"),
        Outcome::Dispatched => debug!("dispatched"),
    }
    Ok(())
}

fn _list(container: &ServiceContainer) -> CliResult<()> {
    let settings = &container.settings;
    let entries = container
        .catalog()
        .list(&settings.commands_dir, &settings.entry)?;
    if entries.is_empty() {
        output::warning(&format!(
            "no commands in {}",
            settings.commands_dir.display()
        ));
        return Ok(());
    }

    let width = entries
        .iter()
        .map(|e| e.command_path.to_string().len())
        .max()
        .unwrap_or(0);
    for entry in &entries {
        let module = entry
            .module
            .strip_prefix(&settings.commands_dir)
            .unwrap_or(&entry.module);
        output::info(&format!(
            "{:width$}  {}",
            entry.command_path.to_string(),
            module.display()
        ));
    }
    Ok(())
}

fn _tree(container: &ServiceContainer) -> CliResult<()> {
    let settings = &container.settings;
    let tree = container
        .catalog()
        .tree(&settings.commands_dir, &settings.entry)?;
    output::info(&tree);
    Ok(())
}

fn _completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
