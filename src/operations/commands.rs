//! External command execution: package installs, asset build, licence activation

use crate::cli::InitOptions;
use crate::config::Profile;
use crate::operations::summary::{RunEvent, RunSummary};
use crate::system::{ProcessCommand, ProcessOutcome, System};
use core::time::Duration;
use std::path::Path;
use tracing::{debug, info, warn};

/// Runs external commands in the destination directory
///
/// A failing command never aborts the run. It is reported along with the
/// command line the operator can retry by hand.
pub struct CommandRunner<'src> {
    system: &'src dyn System,
    working_dir: &'src Path,
    timeout: Duration,
    dry_run: bool,
}

impl<'src> CommandRunner<'src> {
    #[must_use]
    #[inline]
    pub const fn new(
        system: &'src dyn System,
        working_dir: &'src Path,
        timeout: Duration,
        dry_run: bool,
    ) -> Self {
        Self {
            system,
            working_dir,
            timeout,
            dry_run,
        }
    }

    /// Run one command, returning whether it succeeded
    ///
    /// In dry-run mode the command is only logged and counts as a success.
    pub fn run(&self, command: &ProcessCommand, summary: &mut RunSummary) -> bool {
        if self.dry_run {
            info!("[dry-run] Would run: {command}");
            summary.record(RunEvent::ProcessSkipped);
            return true;
        }

        info!("Running: {command}");
        let outcome = match self.system.run_process(command, self.working_dir, self.timeout) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!("Could not start {}: {err}", command.program);
                warn!("Run it manually: {command}");
                summary.record(RunEvent::ProcessFailed);
                return false;
            }
        };

        summary.record(RunEvent::ProcessRan);
        match outcome {
            ProcessOutcome::Success => {
                debug!("{} finished successfully", command.program);
                true
            }
            ProcessOutcome::Failed(code) => {
                match code {
                    Some(code) => warn!("{} exited with code {code}", command.program),
                    None => warn!("{} was terminated by a signal", command.program),
                }
                warn!("Run it manually: {command}");
                summary.record(RunEvent::ProcessFailed);
                false
            }
            ProcessOutcome::TimedOut => {
                warn!(
                    "{} timed out after {}s and was stopped",
                    command.program,
                    self.timeout.as_secs()
                );
                warn!("Run it manually: {command}");
                summary.record(RunEvent::ProcessFailed);
                false
            }
        }
    }

    /// Count a step disabled by a flag
    pub fn skip(&self, step: &str, flag: &str, summary: &mut RunSummary) {
        info!("Skipping {step} ({flag})");
        summary.record(RunEvent::ProcessSkipped);
    }
}

/// `npm install -D <packages>`
#[must_use]
pub fn npm_install(packages: &[String]) -> ProcessCommand {
    ProcessCommand::new("npm").args(["install", "-D"]).args(packages.iter().cloned())
}

/// `npm run build`
#[must_use]
pub fn npm_build() -> ProcessCommand {
    ProcessCommand::new("npm").args(["run", "build"])
}

/// `composer require <packages>`
#[must_use]
pub fn composer_require(packages: &[String]) -> ProcessCommand {
    ProcessCommand::new("composer")
        .arg("require")
        .args(packages.iter().cloned())
}

/// `php artisan flux:activate <username> <license>`, licence redacted
#[must_use]
pub fn flux_activate(username: &str, license: &str) -> ProcessCommand {
    ProcessCommand::new("php")
        .args(["artisan", "flux:activate"])
        .arg(username)
        .secret_arg(license)
}

/// Install, build and activation steps in order
///
/// Credentials are read from the variables named by the profile; they were
/// checked by the validator unless activation is skipped.
pub fn run_install_steps(
    runner: &CommandRunner<'_>,
    system: &dyn System,
    profile: &Profile,
    options: InitOptions,
    summary: &mut RunSummary,
) {
    if options.skip_npm {
        runner.skip("npm install", "--skip-npm", summary);
        runner.skip("npm run build", "--skip-npm", summary);
    } else if runner.run(&npm_install(&profile.npm_packages), summary) {
        runner.run(&npm_build(), summary);
    } else {
        warn!("Skipping npm run build because npm install failed");
        summary.record(RunEvent::ProcessSkipped);
    }

    if options.skip_composer {
        runner.skip("composer require", "--skip-composer", summary);
    } else {
        runner.run(&composer_require(&profile.composer_packages), summary);
    }

    if options.skip_flux {
        runner.skip("Flux activation", "--skip-flux", summary);
    } else {
        let username = system
            .env_var(&profile.credentials.username_var)
            .unwrap_or_default();
        let license = system
            .env_var(&profile.credentials.license_var)
            .unwrap_or_default();
        runner.run(&flux_activate(&username, &license), summary);
    }
}
