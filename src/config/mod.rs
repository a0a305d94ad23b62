//! Configuration management module
//!
//! Handles the profile that drives an init run: built-in defaults, YAML
//! loading, JSON schema validation and logical validation.

pub mod schema;
pub mod validation;
pub mod yaml;

use crate::system::System;
use core::time::Duration;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Data-driven part of an init run
///
/// Every field has a built-in default, so a YAML profile only needs to name
/// the fields it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Template tree to merge into the destination
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates: Option<PathBuf>,

    /// Template paths that are never copied (component-prefix match)
    pub exclude: Vec<String>,

    /// Template files consumed by later steps and never copied verbatim
    pub internal_stubs: Vec<String>,

    /// Substrings that force an overwrite without prompting
    pub auto_copy_patterns: Vec<String>,

    /// Infrastructure path prefixes skipped by `--skip-docker`
    pub docker_paths: Vec<String>,

    /// Env defaults ensured in `.env`, in file order
    pub env: Vec<EnvDefault>,

    /// Entries appended to `.gitignore`
    pub gitignore: Vec<String>,

    /// Frontend packages installed as dev dependencies
    pub npm_packages: Vec<String>,

    /// Backend packages required through composer
    pub composer_packages: Vec<String>,

    /// Names of the licence credential variables
    pub credentials: Credentials,

    /// Mirror the final `.env` into `.env.example`
    pub sync_env_example: bool,

    /// Upper bound for each external command
    pub command_timeout_secs: u64,

    /// Team conventions guideline downloaded into the project, `null` to skip
    pub guidelines_url: Option<String>,

    /// Where the downloaded guideline lands, relative to the destination
    pub guidelines_path: String,
}

/// A `KEY=value` default for the env file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvDefault {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

impl EnvDefault {
    #[must_use]
    #[inline]
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_owned(),
            value: value.to_owned(),
        }
    }
}

/// Environment variables holding the licence activation credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub username_var: String,
    pub license_var: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username_var: "FLUX_USERNAME".to_owned(),
            license_var: "FLUX_LICENSE_KEY".to_owned(),
        }
    }
}

const DEFAULT_GUIDELINES_URL: &str = "https://raw.githubusercontent.com/UoGSoE/boost-prompts/refs/heads/master/.ai/guidelines/team-conventions.blade.php";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_owned()).collect()
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            templates: None,
            exclude: strings(&[
                ".git",
                ".DS_Store",
                "laravel-init.php",
                "README.md",
                "LICENSE",
                "composer.json",
            ]),
            internal_stubs: strings(&[".env.overrides"]),
            auto_copy_patterns: strings(&["fluxui", "SSOServiceProvider"]),
            docker_paths: strings(&[
                "docker/",
                "docker-compose",
                "compose.yaml",
                "Dockerfile",
                ".dockerignore",
                ".github/workflows/",
                ".gitlab-ci.yml",
            ]),
            env: vec![
                EnvDefault::new("KEYCLOAK_BASE_URL", "https://"),
                EnvDefault::new("KEYCLOAK_REALM", ""),
                EnvDefault::new("KEYCLOAK_CLIENT_ID", "name-in-keycloak"),
                EnvDefault::new("KEYCLOAK_CLIENT_SECRET", "secret-in-keycloak"),
                EnvDefault::new("KEYCLOAK_REDIRECT_URI", "http://your-app/auth/callback"),
                EnvDefault::new("SSO_ENABLED", "false"),
                EnvDefault::new("SSO_AUTOCREATE_NEW_USERS", "false"),
                EnvDefault::new("SSO_ALLOW_STUDENTS", "false"),
                EnvDefault::new("SSO_ADMINS_ONLY", "false"),
            ],
            gitignore: strings(&["auth.json"]),
            npm_packages: strings(&[
                "vite",
                "tailwindcss",
                "@tailwindcss/vite",
                "laravel-vite-plugin",
            ]),
            composer_packages: strings(&[
                "livewire/livewire",
                "livewire/flux",
                "laravel/socialite",
                "socialiteproviders/keycloak",
                "laravel/horizon",
                "laravel/sanctum",
            ]),
            credentials: Credentials::default(),
            sync_env_example: true,
            command_timeout_secs: 300,
            guidelines_url: Some(DEFAULT_GUIDELINES_URL.to_owned()),
            guidelines_path: ".ai/guidelines/team-conventions.blade.php".to_owned(),
        }
    }
}

impl Profile {
    /// Load a profile from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, malformed, or fails validation
    #[inline]
    pub fn load_from_file(system: &dyn System, path: &str) -> anyhow::Result<Self> {
        yaml::load_profile(system, path)
    }

    /// Validate the profile's logical constraints
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid field
    #[inline]
    pub fn validate(&self) -> anyhow::Result<()> {
        validation::validate_profile(self)
    }

    /// Timeout applied to every external command
    #[must_use]
    #[inline]
    pub const fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    /// True when `relative` matches an auto-copy pattern
    #[must_use]
    #[inline]
    pub fn is_auto_copy(&self, relative: &str) -> bool {
        self.auto_copy_patterns
            .iter()
            .any(|pattern| relative.contains(pattern.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_is_valid() {
        Profile::default().validate().unwrap();
    }

    #[test]
    fn auto_copy_matches_substrings() {
        let profile = Profile::default();
        assert!(profile.is_auto_copy("resources/views/flux/fluxui-layout.blade.php"));
        assert!(profile.is_auto_copy("app/Providers/SSOServiceProvider.php"));
        assert!(!profile.is_auto_copy("routes/web.php"));
    }
}
