//! # `laravel-init`
//!
//! `laravel-init` bootstraps an existing Laravel project with the team's
//! conventions: Flux UI layouts, Keycloak SSO wiring, Tailwind through Vite,
//! environment defaults and the usual composer and npm packages.
//!
//! ## Usage
//!
//! ```sh
//! laravel-init path/to/project
//! laravel-init --dry-run --skip-flux
//! laravel-init --force --skip-npm --skip-composer
//! ```
//!
//! See `laravel-init --help` for every option.

use clap::Parser as _;
use laravel_init::cli::Args;
use laravel_init::error::InitError;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_target(false).with_env_filter(filter).init();

    match laravel_init::run(&args) {
        Ok(_) => std::process::exit(0),
        Err(err) => {
            error!("{err:#}");
            let init_error = err.downcast_ref::<InitError>();
            if let Some(hint) = init_error.and_then(InitError::remediation) {
                info!("{hint}");
            }
            std::process::exit(init_error.map_or(1, InitError::exit_code));
        }
    }
}
