//! YAML profile loading and parsing

use crate::config::Profile;
use crate::system::System;
use anyhow::{Context as _, Result, anyhow};
use std::path::Path;

/// Load and parse a YAML profile from file
pub fn load_profile(system: &dyn System, path: &str) -> Result<Profile> {
    let path_obj = Path::new(path);

    if !system.exists(path_obj)? {
        return Err(anyhow!(
            "Profile file not found: {path}\n\
            Create the file or drop the --profile option to use the built-in defaults"
        ));
    }

    let content = system
        .read_to_string(path_obj)
        .with_context(|| format!("Failed to read profile file: {path}"))?;

    parse_profile(&content).with_context(|| format!("Invalid profile file: {path}"))
}

/// Parse and validate profile YAML text
pub fn parse_profile(content: &str) -> Result<Profile> {
    let document: serde_yaml::Value = serde_yaml::from_str(content).context(
        "Failed to parse YAML profile\n\
        Please check the syntax and structure of your profile file",
    )?;

    // An empty document means "all defaults"
    if document.is_null() {
        return Ok(Profile::default());
    }

    // Validate the raw document so unknown keys are reported
    let document_json = serde_json::to_value(&document)
        .context("Failed to convert profile to JSON for validation")?;
    crate::config::schema::validate_against_schema(&document_json)?;

    let profile: Profile =
        serde_yaml::from_value(document).context("Failed to parse YAML profile")?;

    crate::config::validation::validate_profile(&profile)?;

    Ok(profile)
}
