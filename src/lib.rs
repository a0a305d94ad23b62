//! `laravel-init` - A CLI tool for bootstrapping Laravel projects
//!
//! This library merges a template tree into an existing Laravel project,
//! applies idempotent edits to its configuration files, installs the
//! frontend and backend packages, and activates the Flux UI licence.
//! Every step is safe to repeat, so re-running the tool is the recovery
//! path after a partial run.

pub mod cli;
pub mod config;
pub mod error;
pub mod operations;
pub mod prompt;
pub mod system;
pub mod utils;

use anyhow::Result;
use cli::Args;
use operations::{InitOperation, RunSummary};
use prompt::TerminalPrompter;
use system::RealSystem;

/// Main entry point for the laravel-init library
///
/// # Errors
///
/// Returns an error if the configuration is invalid or a precondition on
/// the destination fails
pub fn run(args: &Args) -> Result<RunSummary> {
    let system = RealSystem::new();
    let operation = InitOperation::new(args, &system)?;
    operation.execute(&mut TerminalPrompter)
}
