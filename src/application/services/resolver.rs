//! Command resolution service
//!
//! Walks a directory-shaped command tree token by token and finds the
//! deepest command the leading tokens name. The walk is greedy and never
//! backtracks.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::domain::{is_command_name, CommandPath};
use crate::infrastructure::traits::FileSystem;

/// How modules are named on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLayout {
    /// Stem of the module run when a directory is addressed directly.
    pub default_module: String,
    /// Module file extension, without the dot. May be empty.
    pub extension: String,
}

impl Default for TreeLayout {
    fn default() -> Self {
        Self {
            default_module: "default".into(),
            extension: "toml".into(),
        }
    }
}

impl TreeLayout {
    fn file_name(&self, stem: &str) -> String {
        if self.extension.is_empty() {
            stem.to_string()
        } else {
            format!("{stem}.{}", self.extension)
        }
    }

    /// `<dir>/<token>.<ext>`
    pub fn leaf_module(&self, dir: &Path, token: &str) -> PathBuf {
        dir.join(self.file_name(token))
    }

    /// `<dir>/<default>.<ext>`
    pub fn default_module(&self, dir: &Path) -> PathBuf {
        dir.join(self.file_name(&self.default_module))
    }

    /// Module stem when `path` carries this layout's extension.
    pub fn module_stem<'p>(&self, path: &'p Path) -> Option<&'p str> {
        let name = path.file_name()?.to_str()?;
        if self.extension.is_empty() {
            return Some(name);
        }
        name.strip_suffix(&self.extension)?.strip_suffix('.')
    }
}

/// Where resolution ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Module file of the resolved command.
    pub location: PathBuf,
    /// Entry name followed by every consumed command token.
    pub command_path: CommandPath,
    /// Index in argv where command arguments begin.
    pub args_start: usize,
}

impl Resolution {
    /// The argv tail left for the command.
    pub fn args<'a>(&self, argv: &'a [String]) -> &'a [String] {
        argv.get(self.args_start..).unwrap_or(&[])
    }
}

/// Resolves argv against a command tree on a [`FileSystem`].
pub struct CommandResolver {
    fs: Arc<dyn FileSystem>,
    layout: TreeLayout,
}

impl CommandResolver {
    pub fn new(fs: Arc<dyn FileSystem>, layout: TreeLayout) -> Self {
        Self { fs, layout }
    }

    /// Find the deepest command named by the leading tokens of `argv`.
    ///
    /// For each token that fits the command-name grammar, a leaf module
    /// `<dir>/<token>` is preferred over `<dir>/<token>/<default>`. The
    /// first token that fits neither stops the walk; it and everything
    /// after it belong to the resolved command. With no match at all the
    /// root default module is the result.
    #[instrument(level = "debug", skip(self))]
    pub fn resolve(&self, root: &Path, entry: &str, argv: &[String]) -> Resolution {
        let mut resolution = Resolution {
            location: self.layout.default_module(root),
            command_path: CommandPath::new(entry),
            args_start: 0,
        };
        let mut dir = root.to_path_buf();

        for token in argv {
            if !is_command_name(token) {
                debug!("resolve: {:?} is not a command name, stopping", token);
                break;
            }

            let child_dir = dir.join(token);
            let candidates = [
                self.layout.leaf_module(&dir, token),
                self.layout.default_module(&child_dir),
            ];
            // only regular files are modules; a directory may share a leaf's name
            let Some(module) = candidates.into_iter().find(|c| self.fs.is_file(c)) else {
                if self.fs.is_dir(&child_dir) {
                    debug!(
                        "resolve: {} has no module for {:?}, stopping",
                        child_dir.display(),
                        token
                    );
                } else {
                    debug!("resolve: no command {:?} in {}", token, dir.display());
                }
                break;
            };

            debug!("resolve: {:?} -> {}", token, module.display());
            resolution.location = module;
            resolution.command_path.push(token.as_str());
            resolution.args_start += 1;
            dir = child_dir;
        }

        resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_extension_when_naming_modules_then_paths_follow_layout() {
        let layout = TreeLayout::default();
        let dir = Path::new("/cmds");

        assert_eq!(layout.leaf_module(dir, "create"), PathBuf::from("/cmds/create.toml"));
        assert_eq!(layout.default_module(dir), PathBuf::from("/cmds/default.toml"));
        assert_eq!(layout.module_stem(Path::new("/cmds/create.toml")), Some("create"));
        assert_eq!(layout.module_stem(Path::new("/cmds/create.txt")), None);
        assert_eq!(layout.module_stem(Path::new("/cmds/toml")), None);
    }

    #[test]
    fn given_empty_extension_when_naming_modules_then_no_dot() {
        let layout = TreeLayout {
            default_module: "index".into(),
            extension: String::new(),
        };

        assert_eq!(layout.default_module(Path::new("a")), PathBuf::from("a/index"));
        assert_eq!(layout.module_stem(Path::new("a/run")), Some("run"));
    }

    #[test]
    fn given_args_start_past_end_when_slicing_then_empty() {
        let resolution = Resolution {
            location: PathBuf::from("x"),
            command_path: CommandPath::new("tool"),
            args_start: 3,
        };
        let argv = vec!["a".to_string()];

        assert!(resolution.args(&argv).is_empty());
    }
}
