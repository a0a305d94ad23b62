//! Preconditions checked before anything in the destination is touched

use crate::config::Credentials;
use crate::error::ValidationError;
use crate::system::System;
use std::path::Path;
use tracing::{debug, warn};

/// Check every precondition, stopping at the first failure
///
/// Order: destination exists, destination is a Laravel project, credentials
/// are set (unless `require_credentials` is false), working tree is clean.
///
/// # Errors
///
/// Returns the first failed precondition
pub fn validate(
    system: &dyn System,
    destination: &Path,
    credentials: &Credentials,
    require_credentials: bool,
) -> Result<(), ValidationError> {
    if !system.is_dir(destination).unwrap_or(false) {
        return Err(ValidationError::MissingDestination {
            path: destination.to_path_buf(),
        });
    }

    if !system.is_file(&destination.join("artisan")).unwrap_or(false) {
        return Err(ValidationError::NotAProject {
            path: destination.to_path_buf(),
        });
    }

    if require_credentials {
        check_credentials(system, credentials)?;
    } else {
        debug!("Credential check skipped (--skip-flux)");
    }

    check_clean_tree(system, destination)
}

/// Both credential variables must be set and non-empty
///
/// # Errors
///
/// Returns `MissingCredentials` naming every unset variable
pub fn check_credentials(
    system: &dyn System,
    credentials: &Credentials,
) -> Result<(), ValidationError> {
    let missing: Vec<String> = [&credentials.username_var, &credentials.license_var]
        .into_iter()
        .filter(|name| {
            system
                .env_var(name)
                .map_or(true, |value| value.trim().is_empty())
        })
        .cloned()
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingCredentials { variables: missing })
    }
}

/// The destination must have no pending version-control changes
///
/// # Errors
///
/// Returns `DirtyWorkingTree` with the number of pending changes
pub fn check_clean_tree(system: &dyn System, destination: &Path) -> Result<(), ValidationError> {
    match system.pending_changes(destination) {
        Ok(changes) if changes.is_empty() => Ok(()),
        Ok(changes) => {
            for change in &changes {
                debug!("Pending change: {change}");
            }
            Err(ValidationError::DirtyWorkingTree {
                changes: changes.len(),
            })
        }
        Err(err) => {
            warn!("Could not check the working tree status, assuming clean: {err}");
            Ok(())
        }
    }
}
