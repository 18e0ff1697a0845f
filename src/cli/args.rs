//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgGroup, Parser, ValueHint};

/// Filesystem-driven command tree dispatcher
///
/// Everything from the first non-flag argument on is resolved against the
/// command tree and bound to the resolved command. `-h`, `--help` and `-?`
/// belong to the tree; use `--cmdtree-help` for this text. Put `--` before
/// ARGS to hand `-d` or `-C` to a command.
#[derive(Parser, Debug)]
#[command(name = "cmdtree")]
#[command(author, version, about, long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
#[command(group(ArgGroup::new("action").args(["list", "tree", "show_config", "config_template", "completion"])))]
pub struct Cli {
    /// Debug output to stderr (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Root of the command tree
    #[arg(short = 'C', long, env = "CMDTREE_COMMANDS_DIR", value_hint = ValueHint::DirPath)]
    pub commands_dir: Option<PathBuf>,

    /// Name the command tree is invoked as
    #[arg(long)]
    pub entry: Option<String>,

    /// List all commands in the tree
    #[arg(long)]
    pub list: bool,

    /// Show the command tree
    #[arg(long)]
    pub tree: bool,

    /// Show effective configuration
    #[arg(long)]
    pub show_config: bool,

    /// Print a configuration template
    #[arg(long)]
    pub config_template: bool,

    /// Generate shell completions
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completion: Option<clap_complete::Shell>,

    /// Print help for cmdtree itself
    #[arg(long, action = clap::ArgAction::HelpLong)]
    pub cmdtree_help: Option<bool>,

    /// Print version
    #[arg(long, action = clap::ArgAction::Version)]
    pub version: Option<bool>,

    /// Command tokens followed by the command's own arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub args: Vec<String>,
}
