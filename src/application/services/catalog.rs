//! Command catalog service
//!
//! Enumerates every command reachable in a command tree.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::services::TreeLayout;
use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{is_command_name, CommandPath};
use crate::infrastructure::traits::FileSystem;

/// A command found in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub command_path: CommandPath,
    pub module: PathBuf,
}

pub struct CommandCatalog {
    fs: Arc<dyn FileSystem>,
    layout: TreeLayout,
}

impl CommandCatalog {
    pub fn new(fs: Arc<dyn FileSystem>, layout: TreeLayout) -> Self {
        Self { fs, layout }
    }

    /// All reachable commands below `root`, sorted by command path.
    ///
    /// A default module names its directory. When a leaf module and a
    /// directory default module name the same command, the leaf wins, as
    /// it does during resolution.
    #[instrument(level = "debug", skip(self))]
    pub fn list(&self, root: &Path, entry: &str) -> ApplicationResult<Vec<CatalogEntry>> {
        let files = self
            .fs
            .list_files(root)
            .with_path_context("list command tree", root)?;

        let mut found: BTreeMap<CommandPath, (bool, PathBuf)> = BTreeMap::new();
        for file in files {
            let Some((command_path, is_leaf)) = self.command_path_of(root, &file, entry) else {
                continue;
            };
            match found.get(&command_path) {
                Some((true, _)) => {
                    debug!("list: {} shadowed by leaf module", file.display());
                }
                Some((false, shadowed)) if is_leaf => {
                    debug!("list: {} shadowed by leaf module", shadowed.display());
                    found.insert(command_path, (is_leaf, file));
                }
                Some(_) => {}
                None => {
                    found.insert(command_path, (is_leaf, file));
                }
            }
        }

        // Resolution stops at a directory without a module, so everything
        // below it is unreachable.
        let reachable = |path: &CommandPath| {
            let names = path.names();
            (2..names.len()).all(|end| {
                found.contains_key(&names[..end].iter().cloned().collect::<CommandPath>())
            })
        };
        let reachable: Vec<bool> = found.keys().map(reachable).collect();

        Ok(found
            .into_iter()
            .zip(reachable)
            .filter_map(|(item, keep)| keep.then_some(item))
            .map(|(command_path, (_, module))| CatalogEntry {
                command_path,
                module,
            })
            .collect())
    }

    /// The reachable commands rendered as a tree rooted at `entry`.
    pub fn tree(&self, root: &Path, entry: &str) -> ApplicationResult<Tree<String>> {
        #[derive(Default)]
        struct Node {
            children: BTreeMap<String, Node>,
        }

        fn build(label: String, node: Node) -> Tree<String> {
            Tree::new(label).with_leaves(
                node.children
                    .into_iter()
                    .map(|(name, child)| build(name, child)),
            )
        }

        let mut trie = Node::default();
        for item in self.list(root, entry)? {
            let mut node = &mut trie;
            for name in item.command_path.subcommands() {
                node = node.children.entry(name.clone()).or_default();
            }
        }
        Ok(build(entry.to_string(), trie))
    }

    /// Command path addressed by `file`, and whether it is a leaf module.
    ///
    /// Files that are not modules, or that sit below names resolution can
    /// never match, yield `None`.
    fn command_path_of(&self, root: &Path, file: &Path, entry: &str) -> Option<(CommandPath, bool)> {
        let relative = pathdiff::diff_paths(file, root)?;
        let stem = self.layout.module_stem(&relative)?;

        let mut command_path = CommandPath::new(entry);
        let parent = relative.parent().unwrap_or(Path::new(""));
        for component in parent.components() {
            let Component::Normal(name) = component else {
                return None;
            };
            let name = name.to_str()?;
            if !is_command_name(name) {
                return None;
            }
            command_path.push(name);
        }

        if stem == self.layout.default_module {
            return Some((command_path, false));
        }
        if !is_command_name(stem) {
            return None;
        }
        command_path.push(stem);
        Some((command_path, true))
    }
}
