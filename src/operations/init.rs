//! Init run coordination

use crate::cli::{Args, InitOptions};
use crate::config::Profile;
use crate::error::{InitError, ValidationError};
use crate::operations::commands::{CommandRunner, run_install_steps};
use crate::operations::edits::ProjectEditor;
use crate::operations::guidelines::update_guidelines;
use crate::operations::merge::TemplateMerger;
use crate::operations::summary::RunSummary;
use crate::operations::validate::validate;
use crate::prompt::Prompter;
use crate::system::System;
use crate::utils::path::normalize_path;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Directory name searched for templates when none is configured
const DEFAULT_TEMPLATES_DIR: &str = "stubs";

/// Coordinates a complete init run
///
/// Validation is the only abort point. Once it passes, the guideline
/// download, the merge, the configuration edits and the external commands
/// all degrade to warnings.
#[non_exhaustive]
#[expect(clippy::module_name_repetitions, reason = "InitOperation")]
pub struct InitOperation<'src> {
    profile: Profile,
    destination: PathBuf,
    templates: PathBuf,
    options: InitOptions,
    system: &'src dyn System,
}

impl<'src> InitOperation<'src> {
    /// Resolve the profile, template tree and destination for a run
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The profile file cannot be loaded or fails validation
    /// - `--timeout` is zero
    /// - No template tree can be found
    /// - The destination directory does not exist
    #[inline]
    pub fn new(args: &Args, system: &'src dyn System) -> Result<Self> {
        let mut profile = match args.profile.as_deref() {
            Some(path) => Profile::load_from_file(system, path)
                .map_err(|err| InitError::configuration(format!("{err:#}")))?,
            None => Profile::default(),
        };

        if let Some(secs) = args.timeout {
            if secs == 0 {
                return Err(InitError::configuration("--timeout must be at least 1 second").into());
            }
            profile.command_timeout_secs = secs;
        }

        let templates = resolve_templates(system, args.templates.as_deref(), &profile)?;
        debug!("Templates: {}", templates.display());

        let destination = system.canonicalize(&args.directory).map_err(|err| {
            debug!("Cannot resolve {}: {err}", args.directory.display());
            InitError::from(ValidationError::MissingDestination {
                path: args.directory.clone(),
            })
        })?;
        debug!("Destination: {}", destination.display());

        Ok(Self {
            profile,
            destination,
            templates,
            options: args.options(),
            system,
        })
    }

    /// Canonical destination directory
    #[must_use]
    #[inline]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Template tree merged into the destination
    #[must_use]
    #[inline]
    pub fn templates(&self) -> &Path {
        &self.templates
    }

    /// Execute the run
    ///
    /// # Errors
    ///
    /// Returns an error if a precondition on the destination fails
    #[inline]
    pub fn execute(&self, prompter: &mut dyn Prompter) -> Result<RunSummary> {
        validate(
            self.system,
            &self.destination,
            &self.profile.credentials,
            !self.options.skip_flux,
        )
        .map_err(InitError::from)?;

        info!("Initialising {}", self.destination.display());
        if self.options.dry_run {
            info!("Dry run: nothing will be written or executed");
        }

        let mut summary = RunSummary::new();

        update_guidelines(
            self.system,
            &self.profile,
            &self.destination,
            self.options.dry_run,
            &mut summary,
        );

        info!("Copying template files...");
        if let Err(err) = TemplateMerger::new(self.system, &self.profile, self.options).merge(
            &self.templates,
            &self.destination,
            prompter,
            &mut summary,
        ) {
            warn!("{err:#}");
            warn!("No template files were copied, continuing with the configuration edits");
        }

        info!("Updating configuration files...");
        ProjectEditor::new(
            self.system,
            &self.profile,
            &self.destination,
            &self.templates,
            self.options,
        )
        .apply_all(&mut summary);

        info!("Installing packages...");
        let runner = CommandRunner::new(
            self.system,
            &self.destination,
            self.profile.command_timeout(),
            self.options.dry_run,
        );
        run_install_steps(&runner, self.system, &self.profile, self.options, &mut summary);

        for line in summary.render().lines() {
            info!("{line}");
        }
        self.suggest_boost();

        Ok(summary)
    }

    fn suggest_boost(&self) {
        let composer_json = self.destination.join("composer.json");
        match self.system.read_to_string(&composer_json) {
            Ok(content) if !content.contains("laravel/boost") => {
                info!("Consider running: composer require laravel/boost");
            }
            Ok(_) => debug!("laravel/boost already required"),
            Err(err) => debug!("Could not read composer.json: {err}"),
        }
    }
}

/// Locate the template tree
///
/// An explicit path (flag, environment or profile) must exist. Otherwise a
/// `stubs` directory next to the executable is preferred over one in the
/// current directory.
///
/// # Errors
///
/// Returns a configuration error when no template tree exists
pub fn resolve_templates(
    system: &dyn System,
    explicit: Option<&Path>,
    profile: &Profile,
) -> Result<PathBuf> {
    let current_dir = system.current_dir()?;

    if let Some(path) = explicit.or(profile.templates.as_deref()) {
        let absolute = normalize_path(&current_dir.join(path));
        if system.is_dir(&absolute)? {
            return Ok(absolute);
        }
        return Err(InitError::configuration(format!(
            "Template directory does not exist: {}",
            path.display()
        ))
        .into());
    }

    let mut candidates = Vec::new();
    let exe = system.current_exe().ok();
    if let Some(exe_dir) = exe.as_deref().and_then(Path::parent) {
        candidates.push(exe_dir.join(DEFAULT_TEMPLATES_DIR));
    }
    candidates.push(current_dir.join(DEFAULT_TEMPLATES_DIR));

    for candidate in candidates {
        if system.is_dir(&candidate)? {
            return Ok(candidate);
        }
    }

    Err(InitError::configuration(
        "No template directory found. Pass --templates or set LARAVEL_INIT_TEMPLATES",
    )
    .into())
}
