//! Template tree merge into the destination project

use crate::cli::InitOptions;
use crate::config::Profile;
use crate::operations::resolve::{ConflictFacts, Decision, decide, resolve};
use crate::operations::summary::{RunEvent, RunSummary};
use crate::prompt::Prompter;
use crate::system::{System, WalkEntry};
use crate::utils::fs::create_parent_directories;
use crate::utils::path::{matches_component_prefix, relative_slash_path};
use anyhow::{Context as _, Result};
use std::path::Path;
use tracing::{debug, info, warn};

/// Merges a template tree into a destination, one file at a time
pub struct TemplateMerger<'src> {
    system: &'src dyn System,
    profile: &'src Profile,
    options: InitOptions,
}

/// Why an entry never reaches the conflict resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Filtered {
    Excluded,
    InternalStub,
    Docker,
}

impl<'src> TemplateMerger<'src> {
    #[must_use]
    #[inline]
    pub const fn new(system: &'src dyn System, profile: &'src Profile, options: InitOptions) -> Self {
        Self {
            system,
            profile,
            options,
        }
    }

    /// Merge every entry of `templates` into `destination`
    ///
    /// Individual failures are warnings; the merge itself only fails when
    /// the template tree cannot be listed.
    ///
    /// # Errors
    ///
    /// Returns an error if `templates` cannot be walked
    pub fn merge(
        &self,
        templates: &Path,
        destination: &Path,
        prompter: &mut dyn Prompter,
        summary: &mut RunSummary,
    ) -> Result<()> {
        let entries = self
            .system
            .walk_dir(templates)
            .with_context(|| format!("Failed to read template tree: {}", templates.display()))?;

        for entry in entries {
            let Some(relative) = relative_slash_path(&entry.path, templates) else {
                continue;
            };

            match self.filter(&relative, entry.is_dir) {
                Some(Filtered::Excluded) => debug!("Excluded {relative}"),
                Some(Filtered::InternalStub) => debug!("Internal stub {relative} not copied"),
                Some(Filtered::Docker) => {
                    if entry.is_file {
                        info!("Skipped {relative} (--skip-docker)");
                        summary.record(RunEvent::DockerSkipped);
                    }
                }
                None => self.merge_entry(&entry, &relative, destination, prompter, summary),
            }
        }

        Ok(())
    }

    fn filter(&self, relative: &str, is_dir: bool) -> Option<Filtered> {
        if self
            .profile
            .exclude
            .iter()
            .any(|entry| is_excluded(relative, entry))
        {
            return Some(Filtered::Excluded);
        }
        if self
            .profile
            .internal_stubs
            .iter()
            .any(|stub| matches_component_prefix(relative, stub))
        {
            return Some(Filtered::InternalStub);
        }
        if self.options.skip_docker
            && self
                .profile
                .docker_paths
                .iter()
                .any(|prefix| is_docker_path(relative, prefix, is_dir))
        {
            return Some(Filtered::Docker);
        }
        None
    }

    fn merge_entry(
        &self,
        entry: &WalkEntry,
        relative: &str,
        destination: &Path,
        prompter: &mut dyn Prompter,
        summary: &mut RunSummary,
    ) {
        let target = destination.join(relative);

        if entry.is_dir {
            if self.options.dry_run {
                return;
            }
            if let Err(err) = self.system.create_dir_all(&target) {
                warn!("Could not create directory {relative}: {err}");
            }
            return;
        }

        if entry.is_file {
            self.merge_file(&entry.path, &target, relative, prompter, summary);
        } else {
            warn!("Skipping {relative}: not a regular file or directory");
        }
    }

    fn merge_file(
        &self,
        source: &Path,
        target: &Path,
        relative: &str,
        prompter: &mut dyn Prompter,
        summary: &mut RunSummary,
    ) {
        let exists = match self.system.exists(target) {
            Ok(exists) => exists,
            Err(err) => {
                warn!("Could not inspect {relative}, skipping: {err}");
                return;
            }
        };

        let facts = ConflictFacts {
            exists,
            force: self.options.force,
            auto_copy: self.profile.is_auto_copy(relative),
            dry_run: self.options.dry_run,
        };

        let decision = match decide(facts) {
            Some(decision) => decision,
            None => match (self.system.read(target), self.system.read(source)) {
                (Ok(existing), Ok(incoming)) => {
                    resolve(prompter, relative, facts, &existing, &incoming)
                }
                (Err(err), _) | (_, Err(err)) => {
                    warn!("Could not read {relative} for comparison, skipping: {err}");
                    Decision::Skip
                }
            },
        };
        debug!("{relative}: {decision:?}");

        match decision {
            Decision::Skip => {
                info!("Skipped {relative}");
                summary.record(RunEvent::Skipped);
            }
            Decision::Copy if self.options.dry_run => {
                info!("[dry-run] Would copy {relative}");
                summary.record(RunEvent::WouldCopy);
            }
            Decision::Overwrite if self.options.dry_run => {
                info!("[dry-run] Would overwrite {relative}");
                summary.record(RunEvent::WouldOverwrite);
            }
            Decision::Copy => {
                if self.copy_file(source, target, relative) {
                    info!("Copied {relative}");
                    summary.record(RunEvent::Copied);
                }
            }
            Decision::Overwrite => {
                if self.copy_file(source, target, relative) {
                    info!("Overwrote {relative}");
                    summary.record(RunEvent::Overwritten);
                }
            }
        }
    }

    fn copy_file(&self, source: &Path, target: &Path, relative: &str) -> bool {
        let copied = create_parent_directories(self.system, target).and_then(|()| {
            self.system
                .copy(source, target)
                .with_context(|| format!("Failed to copy {relative}"))
        });

        match copied {
            Ok(_) => true,
            Err(err) => {
                warn!("Could not copy {relative}: {err:#}");
                false
            }
        }
    }
}

/// Exclusion match
///
/// Entries without a `/` also match any single path component, so
/// `.DS_Store` is excluded at every depth.
fn is_excluded(relative: &str, entry: &str) -> bool {
    matches_component_prefix(relative, entry)
        || (!entry.contains('/') && relative.split('/').any(|component| component == entry))
}

/// Infrastructure path match
///
/// A directory matches when the prefix names the directory itself, so
/// `docker/` skips the `docker` directory as well as its files.
fn is_docker_path(relative: &str, prefix: &str, is_dir: bool) -> bool {
    relative.starts_with(prefix) || (is_dir && format!("{relative}/").starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exclusion_is_component_based() {
        assert!(is_excluded(".git", ".git"));
        assert!(is_excluded(".git/HEAD", ".git"));
        assert!(!is_excluded(".github/workflows/tests.yml", ".git"));
        assert!(!is_excluded(".gitignore", ".git"));
        assert!(is_excluded("resources/.DS_Store", ".DS_Store"));
        assert!(!is_excluded("docs/README.md.stub", "README.md"));
    }

    #[test]
    fn docker_prefix_covers_its_directory() {
        assert!(is_docker_path("docker", "docker/", true));
        assert!(is_docker_path("docker/php/Dockerfile", "docker/", false));
        assert!(is_docker_path("docker-compose.yml", "docker-compose", false));
        assert!(is_docker_path(".github/workflows", ".github/workflows/", true));
        assert!(!is_docker_path(".github", ".github/workflows/", true));
        assert!(!is_docker_path("dockerfiles.txt", "docker/", false));
    }
}
