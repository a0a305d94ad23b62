//! Real system implementation using `std`, `walkdir`, `git2` and `ureq`

use super::{ProcessCommand, ProcessOutcome, System, WalkEntry};
use core::time::Duration;
use std::env::VarError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Instant;
use tracing::{debug, warn};
use walkdir::WalkDir;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Production implementation of System trait
///
/// This implementation directly delegates to the standard library's
/// environment, filesystem and process functions.
#[derive(Debug, Clone, Copy)]
pub struct RealSystem;

impl RealSystem {
    /// Create a new `RealSystem` instance
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for RealSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for RealSystem {
    fn env_var(&self, key: &str) -> Result<String, VarError> {
        std::env::var(key)
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }

    fn current_exe(&self) -> io::Result<PathBuf> {
        std::env::current_exe()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
        fs::copy(from, to)
    }

    fn exists(&self, path: &Path) -> io::Result<bool> {
        path.try_exists()
    }

    fn is_file(&self, path: &Path) -> io::Result<bool> {
        Ok(path.is_file())
    }

    fn is_dir(&self, path: &Path) -> io::Result<bool> {
        Ok(path.is_dir())
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path)
    }

    fn walk_dir(&self, path: &Path) -> io::Result<Vec<WalkEntry>> {
        if !path.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Directory not found: {}", path.display()),
            ));
        }

        let mut entries = Vec::new();
        let walker = WalkDir::new(path)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    // Unreadable directories, dangling links and link loops
                    warn!("Skipping unreadable template entry: {err}");
                    continue;
                }
            };
            let file_type = entry.file_type();
            entries.push(WalkEntry {
                path: entry.into_path(),
                is_file: file_type.is_file(),
                is_dir: file_type.is_dir(),
            });
        }
        Ok(entries)
    }

    fn pending_changes(&self, dir: &Path) -> io::Result<Vec<String>> {
        let repo = match git2::Repository::discover(dir) {
            Ok(repo) => repo,
            Err(err) if err.code() == git2::ErrorCode::NotFound => {
                debug!("{} is not inside a git repository", dir.display());
                return Ok(Vec::new());
            }
            Err(err) => return Err(io::Error::other(err)),
        };

        let mut options = git2::StatusOptions::new();
        options
            .include_untracked(true)
            .include_ignored(false)
            .recurse_untracked_dirs(false);

        let statuses = repo.statuses(Some(&mut options)).map_err(io::Error::other)?;
        Ok(statuses
            .iter()
            .filter_map(|entry| entry.path().map(str::to_owned))
            .collect())
    }

    fn fetch_text(&self, url: &str, timeout: Duration) -> io::Result<String> {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        let response = agent
            .get(url)
            .call()
            .map_err(|err| io::Error::other(err.to_string()))?;
        response.into_string()
    }

    fn run_process(
        &self,
        command: &ProcessCommand,
        working_dir: &Path,
        timeout: Duration,
    ) -> io::Result<ProcessOutcome> {
        let mut child = Command::new(&command.program)
            .args(&command.args)
            .current_dir(working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()?;

        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(if status.success() {
                    ProcessOutcome::Success
                } else {
                    ProcessOutcome::Failed(status.code())
                });
            }

            if Instant::now() >= deadline {
                child.kill()?;
                child.wait()?;
                return Ok(ProcessOutcome::TimedOut);
            }

            thread::sleep(POLL_INTERVAL);
        }
    }
}
