//! Team conventions guideline for the project's AI tooling

use crate::config::Profile;
use crate::operations::summary::{RunEvent, RunSummary};
use crate::system::System;
use crate::utils::fs::create_parent_directories;
use anyhow::Context as _;
use core::time::Duration;
use std::path::Path;
use tracing::{debug, info, warn};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Download the profile's guideline into the destination
///
/// Best effort: an unreachable URL, an empty document or a failed write is
/// a warning. Dry-run mode downloads nothing.
pub fn update_guidelines(
    system: &dyn System,
    profile: &Profile,
    destination: &Path,
    dry_run: bool,
    summary: &mut RunSummary,
) {
    let Some(url) = profile.guidelines_url.as_deref() else {
        debug!("No guidelines URL configured");
        return;
    };
    let relative = profile.guidelines_path.as_str();

    if dry_run {
        info!("[dry-run] Would fetch {url} into {relative}");
        summary.record(RunEvent::FileWriteSkipped);
        return;
    }

    info!("Fetching team guidelines from {url}");
    let contents = match system.fetch_text(url, FETCH_TIMEOUT) {
        Ok(contents) if contents.trim().is_empty() => {
            warn!("Team guidelines at {url} are empty, skipping");
            return;
        }
        Ok(contents) => contents,
        Err(err) => {
            warn!("Could not fetch team guidelines, skipping: {err}");
            return;
        }
    };

    let target = destination.join(relative);
    if system
        .read_to_string(&target)
        .is_ok_and(|existing| existing == contents)
    {
        debug!("{relative} already up to date");
        return;
    }

    let written = create_parent_directories(system, &target).and_then(|()| {
        system
            .write(&target, contents.as_bytes())
            .with_context(|| format!("Failed to write {relative}"))
    });
    match written {
        Ok(()) => {
            info!("Updated {relative}");
            summary.record(RunEvent::FileWrite);
        }
        Err(err) => warn!("Could not write {relative}: {err:#}"),
    }
}
