//! Profile validation logic

use crate::config::Profile;
use anyhow::{Result, anyhow};
use regex::Regex;
use std::path::{Component, Path};
use std::sync::LazyLock;

/// Shell-style variable name
#[expect(clippy::unwrap_used, reason = "Pattern is a compile-time constant")]
static ENV_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Validate a complete profile
///
/// # Errors
///
/// Returns an error if:
/// - A pattern list contains an empty entry
/// - An env key is not a valid variable name
/// - A credential variable name is empty
/// - The guideline URL is not http(s) or its path leaves the project
/// - The command timeout is zero
#[inline]
pub fn validate_profile(profile: &Profile) -> Result<()> {
    let lists = [
        ("exclude", &profile.exclude),
        ("internal_stubs", &profile.internal_stubs),
        ("auto_copy_patterns", &profile.auto_copy_patterns),
        ("docker_paths", &profile.docker_paths),
        ("gitignore", &profile.gitignore),
        ("npm_packages", &profile.npm_packages),
        ("composer_packages", &profile.composer_packages),
    ];
    for (name, entries) in lists {
        validate_entries(name, entries)?;
    }

    for (index, default) in profile.env.iter().enumerate() {
        if !ENV_KEY.is_match(&default.key) {
            return Err(anyhow!(
                "env #{}: Invalid variable name '{}'",
                index + 1,
                default.key
            ));
        }
        if default.value.contains('\n') {
            return Err(anyhow!(
                "env #{}: Value for '{}' cannot span multiple lines",
                index + 1,
                default.key
            ));
        }
    }

    if profile.credentials.username_var.trim().is_empty()
        || profile.credentials.license_var.trim().is_empty()
    {
        return Err(anyhow!("credentials: Variable names cannot be empty"));
    }

    if let Some(url) = profile.guidelines_url.as_deref()
        && !(url.starts_with("https://") || url.starts_with("http://"))
    {
        return Err(anyhow!("guidelines_url: '{url}' is not an http(s) URL"));
    }

    let guidelines_path = Path::new(&profile.guidelines_path);
    if profile.guidelines_path.trim().is_empty()
        || guidelines_path.is_absolute()
        || guidelines_path
            .components()
            .any(|component| matches!(component, Component::ParentDir))
    {
        return Err(anyhow!(
            "guidelines_path: '{}' must be a relative path inside the project",
            profile.guidelines_path
        ));
    }

    if profile.command_timeout_secs == 0 {
        return Err(anyhow!("command_timeout_secs must be greater than zero"));
    }

    Ok(())
}

/// Reject blank entries in a pattern list
fn validate_entries(name: &str, entries: &[String]) -> Result<()> {
    for (index, entry) in entries.iter().enumerate() {
        if entry.trim().is_empty() {
            return Err(anyhow!("{name} #{}: Entry cannot be empty", index + 1));
        }
    }
    Ok(())
}
