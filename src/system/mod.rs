//! System abstraction for environment, filesystem and process operations
//!
//! This module provides a unified trait for all external system interactions,
//! allowing for easy testing with mock implementations.

use core::fmt;
use core::time::Duration;
use std::env::VarError;
use std::io;
use std::path::{Path, PathBuf};

pub mod mock;
pub mod real;

pub use mock::MockSystem;
pub use real::RealSystem;

/// Entry from directory walking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    pub path: PathBuf,
    pub is_file: bool,
    pub is_dir: bool,
}

/// An external program invocation (argv form, no shell)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Indices into `args` that must never be logged
    secret_args: Vec<usize>,
}

impl ProcessCommand {
    /// Start a command for `program`
    #[must_use]
    #[inline]
    pub fn new<S: Into<String>>(program: S) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            secret_args: Vec::new(),
        }
    }

    /// Append an argument
    #[must_use]
    #[inline]
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    #[must_use]
    #[inline]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append an argument that is redacted whenever the command is displayed
    #[must_use]
    #[inline]
    pub fn secret_arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.secret_args.push(self.args.len());
        self.args.push(arg.into());
        self
    }
}

impl fmt::Display for ProcessCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for (index, arg) in self.args.iter().enumerate() {
            if self.secret_args.contains(&index) {
                f.write_str(" ********")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// How a subprocess finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    Success,
    /// Non-zero exit; `None` when terminated by a signal
    Failed(Option<i32>),
    TimedOut,
}

impl ProcessOutcome {
    #[must_use]
    #[inline]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Unified trait for system operations (environment + filesystem + processes)
///
/// This trait abstracts all interactions with the operating system,
/// including environment variables, filesystem operations, the version
/// control status of a directory, HTTP downloads and subprocess execution.
///
/// # Implementations
/// - `RealSystem`: Production implementation using `std`, `walkdir`, `git2` and `ureq`
/// - `MockSystem`: Test implementation using in-memory storage
pub trait System: Send + Sync {
    // ==================== Environment Operations ====================

    /// Get an environment variable
    fn env_var(&self, key: &str) -> Result<String, VarError>;

    /// Get the current working directory
    fn current_dir(&self) -> io::Result<PathBuf>;

    /// Path of the running executable
    fn current_exe(&self) -> io::Result<PathBuf>;

    // ==================== Filesystem Operations ====================

    /// Read entire file contents as a string
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Read entire file contents as bytes
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Write bytes to a file, creating it if it doesn't exist
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Recursively create a directory and all parent directories
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Copy a file from source to destination
    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64>;

    /// Check if a path exists
    fn exists(&self, path: &Path) -> io::Result<bool>;

    /// Check if a path points to a file
    fn is_file(&self, path: &Path) -> io::Result<bool>;

    /// Check if a path points to a directory
    fn is_dir(&self, path: &Path) -> io::Result<bool>;

    /// Canonicalize a path (resolve to absolute path)
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    /// Recursively walk a directory, returning all entries
    ///
    /// Symbolic links are followed. Entries that cannot be read are logged
    /// and left out; only a root that cannot be listed is an error.
    ///
    /// # Returns
    /// Vector of all entries found (files and directories), excluding the root
    /// itself, sorted by path so that a directory always precedes its contents
    fn walk_dir(&self, path: &Path) -> io::Result<Vec<WalkEntry>>;

    // ==================== Version Control ====================

    /// Paths with pending changes in the working tree containing `dir`
    ///
    /// A directory outside any repository has no pending changes.
    fn pending_changes(&self, dir: &Path) -> io::Result<Vec<String>>;

    // ==================== Network ====================

    /// Fetch a text document over HTTP(S)
    ///
    /// Any non-success status is an error.
    fn fetch_text(&self, url: &str, timeout: Duration) -> io::Result<String>;

    // ==================== Processes ====================

    /// Run a command to completion with inherited stdio
    ///
    /// The child is killed once `timeout` elapses.
    fn run_process(
        &self,
        command: &ProcessCommand,
        working_dir: &Path,
        timeout: Duration,
    ) -> io::Result<ProcessOutcome>;
}
