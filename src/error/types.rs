//! Custom error types with exit codes

use std::path::PathBuf;
use thiserror::Error;

/// Fatal precondition failures raised before any file is touched
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    /// The destination directory does not exist
    #[error("Destination directory does not exist: {}", path.display())]
    MissingDestination { path: PathBuf },

    /// The destination is not a Laravel project
    #[error("{} is not a Laravel project (artisan not found)", path.display())]
    NotAProject { path: PathBuf },

    /// One or more credential variables are unset or empty
    #[error("{} not set", variables.join(" and/or "))]
    MissingCredentials { variables: Vec<String> },

    /// The destination has uncommitted changes
    #[error("There are {changes} uncommitted change(s) in the destination directory")]
    DirtyWorkingTree { changes: usize },
}

impl ValidationError {
    /// Hint telling the operator how to fix the failure
    #[must_use]
    #[inline]
    pub fn remediation(&self) -> String {
        match *self {
            Self::MissingDestination { .. } => {
                "Pass the path of an existing Laravel project as the first argument.".to_owned()
            }
            Self::NotAProject { .. } => {
                "Run the tool from (or point it at) the root of a Laravel project.".to_owned()
            }
            Self::MissingCredentials { ref variables } => format!(
                "Export {} and re-run, or pass --skip-flux.",
                variables.join(" and ")
            ),
            Self::DirtyWorkingTree { .. } => {
                "Commit or stash your changes and re-run.".to_owned()
            }
        }
    }
}

/// Main error type for laravel-init operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum InitError {
    /// Configuration Error - missing or invalid profile, template tree or arguments
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Validation Error - a precondition on the destination failed
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl InitError {
    /// Get the appropriate exit code for this error type
    #[must_use]
    #[inline]
    pub const fn exit_code(&self) -> i32 {
        match *self {
            Self::Configuration { .. } => 1,
            Self::Validation(_) => 2,
        }
    }

    /// Remediation hint, when one applies
    #[must_use]
    #[inline]
    pub fn remediation(&self) -> Option<String> {
        match *self {
            Self::Validation(ref err) => Some(err.remediation()),
            Self::Configuration { .. } => None,
        }
    }

    /// Create a configuration error
    #[inline]
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
