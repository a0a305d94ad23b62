//! Mock system implementation for testing

#![expect(clippy::module_name_repetitions)]

use super::{ProcessCommand, ProcessOutcome, System, WalkEntry};
use core::time::Duration;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::env::VarError;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// In-memory implementation of System trait for testing
///
/// `MockSystem` provides an in-memory filesystem, environment, working-tree
/// status and process table, perfect for fast, isolated unit tests without
/// side effects. Subprocesses are never spawned; each invocation is recorded
/// and answered with the outcome registered for its program (success by
/// default).
///
/// # Example
/// ```
/// use laravel_init::system::{mock::MockSystem, System};
/// use std::path::Path;
///
/// let system = MockSystem::new()
///     .with_env("HOME", "/home/user").unwrap()
///     .with_file("/test/file.txt", b"Hello, world!").unwrap()
///     .with_dir("/test/subdir").unwrap();
///
/// assert_eq!(system.env_var("HOME").unwrap(), "/home/user");
/// assert!(system.exists(Path::new("/test/file.txt")).unwrap());
/// ```
#[derive(Clone)]
pub struct MockSystem {
    state: Arc<RwLock<MockSystemState>>,
}

struct MockSystemState {
    env_vars: HashMap<String, String>,
    current_dir: PathBuf,
    current_exe: PathBuf,
    files: HashMap<PathBuf, Vec<u8>>,
    dirs: HashSet<PathBuf>,
    pending_changes: Vec<String>,
    process_outcomes: HashMap<String, ProcessOutcome>,
    executed: Vec<ProcessCommand>,
    unreadable_dirs: HashSet<PathBuf>,
    http_responses: HashMap<String, String>,
    fetched: Vec<String>,
}

impl MockSystem {
    /// Create a new `MockSystem` with default state
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MockSystemState {
                env_vars: HashMap::new(),
                current_dir: PathBuf::from("/"),
                current_exe: PathBuf::from("/usr/local/bin/laravel-init"),
                files: HashMap::new(),
                dirs: HashSet::from([PathBuf::from("/")]),
                pending_changes: Vec::new(),
                process_outcomes: HashMap::new(),
                executed: Vec::new(),
                unreadable_dirs: HashSet::new(),
                http_responses: HashMap::new(),
                fetched: Vec::new(),
            })),
        }
    }

    fn write_state(&self) -> io::Result<std::sync::RwLockWriteGuard<'_, MockSystemState>> {
        self.state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))
    }

    fn read_state(&self) -> io::Result<std::sync::RwLockReadGuard<'_, MockSystemState>> {
        self.state
            .read()
            .map_err(|e| io::Error::other(e.to_string()))
    }

    /// Set an environment variable (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    #[inline]
    pub fn with_env(self, key: &str, value: &str) -> io::Result<Self> {
        self.write_state()?
            .env_vars
            .insert(key.to_owned(), value.to_owned());
        Ok(self)
    }

    /// Set the current working directory (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    #[inline]
    pub fn with_current_dir<P: AsRef<Path>>(self, dir: P) -> io::Result<Self> {
        self.write_state()?.current_dir = dir.as_ref().to_path_buf();
        Ok(self)
    }

    /// Set the path reported for the running executable (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    #[inline]
    pub fn with_current_exe<P: AsRef<Path>>(self, exe: P) -> io::Result<Self> {
        self.write_state()?.current_exe = exe.as_ref().to_path_buf();
        Ok(self)
    }

    /// Add a file with contents (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    #[inline]
    pub fn with_file<P: AsRef<Path>>(self, path: P, contents: &[u8]) -> io::Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let mut state = self.write_state()?;

        // Ensure parent directories exist
        if let Some(parent) = path_buf.parent() {
            Self::ensure_parent_dirs(&mut state.dirs, parent);
        }

        state.files.insert(path_buf, contents.to_vec());
        drop(state);
        Ok(self)
    }

    /// Add a directory (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    #[inline]
    pub fn with_dir<P: AsRef<Path>>(self, path: P) -> io::Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let mut state = self.write_state()?;
        Self::ensure_parent_dirs(&mut state.dirs, &path_buf);
        drop(state);
        Ok(self)
    }

    /// Report pending working-tree changes for every directory (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    #[inline]
    pub fn with_pending_changes(self, paths: &[&str]) -> io::Result<Self> {
        self.write_state()?.pending_changes = paths.iter().map(|p| (*p).to_owned()).collect();
        Ok(self)
    }

    /// Answer every invocation of `program` with `outcome` (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    #[inline]
    pub fn with_process_outcome(self, program: &str, outcome: ProcessOutcome) -> io::Result<Self> {
        self.write_state()?
            .process_outcomes
            .insert(program.to_owned(), outcome);
        Ok(self)
    }

    /// Make `walk_dir` fail for an existing directory (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    #[inline]
    pub fn with_unreadable_dir<P: AsRef<Path>>(self, path: P) -> io::Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let mut state = self.write_state()?;
        Self::ensure_parent_dirs(&mut state.dirs, &path_buf);
        state.unreadable_dirs.insert(path_buf);
        drop(state);
        Ok(self)
    }

    /// Serve `body` for `url`; any other URL fails (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    #[inline]
    pub fn with_http_response(self, url: &str, body: &str) -> io::Result<Self> {
        self.write_state()?
            .http_responses
            .insert(url.to_owned(), body.to_owned());
        Ok(self)
    }

    /// URLs passed to `fetch_text`, in request order
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    #[inline]
    pub fn fetched_urls(&self) -> io::Result<Vec<String>> {
        Ok(self.read_state()?.fetched.clone())
    }

    /// Commands passed to `run_process`, in invocation order
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    #[inline]
    pub fn executed_commands(&self) -> io::Result<Vec<ProcessCommand>> {
        Ok(self.read_state()?.executed.clone())
    }

    /// Every file in the in-memory filesystem, ordered by path
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    #[inline]
    pub fn snapshot(&self) -> io::Result<BTreeMap<PathBuf, Vec<u8>>> {
        Ok(self
            .read_state()?
            .files
            .iter()
            .map(|(path, bytes)| (path.clone(), bytes.clone()))
            .collect())
    }

    #[inline]
    fn ensure_parent_dirs(dirs: &mut HashSet<PathBuf>, path: &Path) {
        for ancestor in path.ancestors() {
            if ancestor == Path::new("") {
                break;
            }
            dirs.insert(ancestor.to_path_buf());
        }
    }

    fn not_found(what: &str, path: &Path) -> io::Error {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("{what} not found: {}", path.display()),
        )
    }
}

impl Default for MockSystem {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl System for MockSystem {
    #[inline]
    #[expect(clippy::map_err_ignore, reason = "This is for VarError")]
    fn env_var(&self, key: &str) -> Result<String, VarError> {
        let state = self.state.read().map_err(|_| VarError::NotPresent)?;
        state.env_vars.get(key).cloned().ok_or(VarError::NotPresent)
    }

    #[inline]
    fn current_dir(&self) -> io::Result<PathBuf> {
        Ok(self.read_state()?.current_dir.clone())
    }

    #[inline]
    fn current_exe(&self) -> io::Result<PathBuf> {
        Ok(self.read_state()?.current_exe.clone())
    }

    #[inline]
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {e}")))
    }

    #[inline]
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.read_state()?
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| Self::not_found("File", path))
    }

    #[inline]
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut state = self.write_state()?;

        if let Some(parent) = path.parent()
            && !state.dirs.contains(parent)
        {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Parent directory does not exist: {}", parent.display()),
            ));
        }

        state.files.insert(path.to_path_buf(), contents.to_vec());
        drop(state);
        Ok(())
    }

    #[inline]
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = self.write_state()?;
        Self::ensure_parent_dirs(&mut state.dirs, path);
        drop(state);
        Ok(())
    }

    #[inline]
    #[expect(clippy::as_conversions, reason = "This is for usize to u64 conversion")]
    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
        let contents = self
            .read(from)
            .map_err(|_err| Self::not_found("Source file", from))?;
        let size = contents.len() as u64;
        self.write(to, &contents)?;
        Ok(size)
    }

    #[inline]
    fn exists(&self, path: &Path) -> io::Result<bool> {
        let state = self.read_state()?;
        Ok(state.files.contains_key(path) || state.dirs.contains(path))
    }

    #[inline]
    fn is_file(&self, path: &Path) -> io::Result<bool> {
        Ok(self.read_state()?.files.contains_key(path))
    }

    #[inline]
    fn is_dir(&self, path: &Path) -> io::Result<bool> {
        Ok(self.read_state()?.dirs.contains(path))
    }

    #[inline]
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.current_dir()?.join(path)
        };
        let normalized = crate::utils::path::normalize_path(&absolute);
        if self.exists(&normalized)? {
            Ok(normalized)
        } else {
            Err(Self::not_found("Path", path))
        }
    }

    #[inline]
    fn walk_dir(&self, path: &Path) -> io::Result<Vec<WalkEntry>> {
        let state = self.read_state()?;

        if !state.dirs.contains(path) {
            return Err(Self::not_found("Directory", path));
        }
        if state.unreadable_dirs.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("Permission denied: {}", path.display()),
            ));
        }

        let mut entries: Vec<WalkEntry> = state
            .dirs
            .iter()
            .filter(|dir| dir.starts_with(path) && dir.as_path() != path)
            .map(|dir| WalkEntry {
                path: dir.clone(),
                is_file: false,
                is_dir: true,
            })
            .chain(
                state
                    .files
                    .keys()
                    .filter(|file| file.starts_with(path))
                    .map(|file| WalkEntry {
                        path: file.clone(),
                        is_file: true,
                        is_dir: false,
                    }),
            )
            .collect();
        drop(state);

        // Sort entries by path for deterministic output
        entries.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(entries)
    }

    #[inline]
    fn pending_changes(&self, _dir: &Path) -> io::Result<Vec<String>> {
        Ok(self.read_state()?.pending_changes.clone())
    }

    #[inline]
    fn run_process(
        &self,
        command: &ProcessCommand,
        working_dir: &Path,
        _timeout: Duration,
    ) -> io::Result<ProcessOutcome> {
        let mut state = self.write_state()?;
        if !state.dirs.contains(working_dir) {
            return Err(Self::not_found("Working directory", working_dir));
        }
        state.executed.push(command.clone());
        Ok(state
            .process_outcomes
            .get(&command.program)
            .copied()
            .unwrap_or(ProcessOutcome::Success))
    }

    #[inline]
    fn fetch_text(&self, url: &str, _timeout: Duration) -> io::Result<String> {
        let mut state = self.write_state()?;
        state.fetched.push(url.to_owned());
        state.http_responses.get(url).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::ConnectionRefused,
                format!("No response registered for {url}"),
            )
        })
    }
}
