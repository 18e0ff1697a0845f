//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with mock implementations.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Check if path is a file.
    fn is_file(&self, path: &Path) -> bool;

    /// Check if path is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// All regular files below `root`, recursively, in no particular order.
    fn list_files(&self, root: &Path) -> io::Result<Vec<PathBuf>>;
}

/// External command runner abstraction.
pub trait CommandRunner: Send + Sync {
    /// Run a command with inherited stdio and extra environment variables.
    /// Blocks until the command exits.
    fn run_interactive(
        &self,
        cmd: &str,
        args: &[String],
        envs: &[(String, String)],
        cwd: &Path,
    ) -> io::Result<ExitStatus>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list_files(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        use walkdir::WalkDir;

        let mut files = Vec::new();
        for entry in WalkDir::new(root).follow_links(true) {
            let entry = entry.map_err(|e| {
                io::Error::new(io::ErrorKind::Other, e.to_string())
            })?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

/// Real command runner implementation.
#[derive(Debug, Default)]
pub struct RealCommandRunner;

impl CommandRunner for RealCommandRunner {
    fn run_interactive(
        &self,
        cmd: &str,
        args: &[String],
        envs: &[(String, String)],
        cwd: &Path,
    ) -> io::Result<ExitStatus> {
        std::process::Command::new(cmd)
            .args(args)
            .envs(envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .current_dir(cwd)
            .status()
    }
}
