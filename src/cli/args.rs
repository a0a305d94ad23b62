use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for laravel-init
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "laravel-init")]
#[command(
    about = "Bootstrap a Laravel project with Flux UI, Keycloak SSO, and common packages"
)]
#[command(long_about = None)]
#[command(version)]
pub struct Args {
    /// Laravel project to initialise
    #[arg(value_name = "DIRECTORY", default_value = ".")]
    pub directory: PathBuf,

    /// Skip npm package installation and the asset build
    #[arg(long)]
    pub skip_npm: bool,

    /// Skip composer package installation
    #[arg(long)]
    pub skip_composer: bool,

    /// Skip Flux activation and its credential check
    #[arg(long)]
    pub skip_flux: bool,

    /// Skip Docker and CI template files
    #[arg(long)]
    pub skip_docker: bool,

    /// Preview every write and command without executing
    #[arg(long)]
    pub dry_run: bool,

    /// Overwrite all files without prompting
    #[arg(long)]
    pub force: bool,

    /// Template tree to merge into the project
    #[arg(long, value_name = "DIR", env = "LARAVEL_INIT_TEMPLATES")]
    pub templates: Option<PathBuf>,

    /// YAML profile overriding the built-in defaults
    #[arg(long, value_name = "PATH", env = "LARAVEL_INIT_PROFILE")]
    pub profile: Option<String>,

    /// Timeout in seconds for each external command
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Behavioural switches for this run
    #[must_use]
    pub const fn options(&self) -> InitOptions {
        InitOptions {
            skip_npm: self.skip_npm,
            skip_composer: self.skip_composer,
            skip_flux: self.skip_flux,
            skip_docker: self.skip_docker,
            dry_run: self.dry_run,
            force: self.force,
        }
    }
}

/// The recognized options of an init run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[expect(clippy::struct_excessive_bools, reason = "These are independent CLI flags")]
pub struct InitOptions {
    pub skip_npm: bool,
    pub skip_composer: bool,
    pub skip_flux: bool,
    pub skip_docker: bool,
    pub dry_run: bool,
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["laravel-init"]).unwrap();
        assert_eq!(args.directory, PathBuf::from("."));
        assert_eq!(args.options(), InitOptions::default());
        assert!(args.timeout.is_none());
    }

    #[test]
    fn test_flags_map_to_options() {
        let args = Args::try_parse_from([
            "laravel-init",
            "/srv/app",
            "--skip-npm",
            "--skip-docker",
            "--dry-run",
            "--timeout",
            "60",
        ])
        .unwrap();

        let options = args.options();
        assert_eq!(args.directory, PathBuf::from("/srv/app"));
        assert!(options.skip_npm);
        assert!(options.skip_docker);
        assert!(options.dry_run);
        assert!(!options.skip_composer);
        assert!(!options.force);
        assert_eq!(args.timeout, Some(60));
    }
}
