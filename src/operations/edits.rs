//! Project configuration edits applied after the template merge

use crate::cli::InitOptions;
use crate::config::Profile;
use crate::operations::patch::{
    Patch, Preamble, append_missing_entries, ensure_env_value, insert_after_preamble,
    insert_before_last_marker, merge_env, set_top_level_field, upsert_env_value,
};
use crate::operations::summary::{RunEvent, RunSummary};
use crate::system::System;
use crate::utils::path::{dir_name, slug_from_dir_name, title_from_dir_name};
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

/// Template file holding env overrides for the destination
pub const ENV_OVERRIDES: &str = ".env.overrides";

const ROUTE_INCLUDE: &str = "require __DIR__ . '/sso-auth.php';";

const KEYCLOAK_SERVICE: &str = "
    'keycloak' => [
        'client_id' => env('KEYCLOAK_CLIENT_ID'),
        'client_secret' => env('KEYCLOAK_CLIENT_SECRET'),
        'redirect' => env('KEYCLOAK_REDIRECT_URI'),
        'base_url' => env('KEYCLOAK_BASE_URL'),
        'realms' => env('KEYCLOAK_REALM'),
    ],
";

const SSO_PROVIDER: &str = "    App\\Providers\\SSOServiceProvider::class,\n";

const TAILWIND_IMPORT: &str = "import tailwindcss from '@tailwindcss/vite';";

const TAILWIND_PLUGIN: &str = "        tailwindcss(),\n";

/// Applies the fixed sequence of edits to a destination project
pub struct ProjectEditor<'src> {
    system: &'src dyn System,
    profile: &'src Profile,
    destination: &'src Path,
    templates: &'src Path,
    options: InitOptions,
}

impl<'src> ProjectEditor<'src> {
    #[must_use]
    #[inline]
    pub const fn new(
        system: &'src dyn System,
        profile: &'src Profile,
        destination: &'src Path,
        templates: &'src Path,
        options: InitOptions,
    ) -> Self {
        Self {
            system,
            profile,
            destination,
            templates,
            options,
        }
    }

    /// Run every edit in order
    ///
    /// Nothing here fails the run: a missing file or marker is a warning.
    pub fn apply_all(&self, summary: &mut RunSummary) {
        self.include_sso_routes(summary);
        self.add_keycloak_service(summary);
        self.register_sso_provider(summary);
        self.configure_vite(summary);
        self.update_env_files(summary);
        if self.options.skip_docker {
            debug!("Skipping docker-compose project name (--skip-docker)");
        } else {
            self.set_compose_project_name(summary);
        }
        self.update_gitignore(summary);
    }

    /// Pull the SSO routes file into `routes/web.php`
    pub fn include_sso_routes(&self, summary: &mut RunSummary) {
        let insertion = format!("\n\n{ROUTE_INCLUDE}");
        self.edit_file(
            "routes/web.php",
            "the SSO routes include",
            ROUTE_INCLUDE,
            summary,
            |content| insert_after_preamble(content, Preamble::PhpUses, &insertion, "sso-auth.php"),
        );
    }

    /// Add the keycloak block to `config/services.php`
    pub fn add_keycloak_service(&self, summary: &mut RunSummary) {
        self.edit_file(
            "config/services.php",
            "the Keycloak service config",
            KEYCLOAK_SERVICE,
            summary,
            |content| {
                insert_before_last_marker(
                    content,
                    "];",
                    KEYCLOAK_SERVICE,
                    &["'keycloak'", "\"keycloak\""],
                )
            },
        );
    }

    /// Register the SSO service provider in `bootstrap/providers.php`
    pub fn register_sso_provider(&self, summary: &mut RunSummary) {
        self.edit_file(
            "bootstrap/providers.php",
            "the SSO service provider",
            SSO_PROVIDER,
            summary,
            |content| insert_before_last_marker(content, "];", SSO_PROVIDER, &["SSOServiceProvider"]),
        );
    }

    /// Wire the Tailwind plugin into `vite.config.js`
    pub fn configure_vite(&self, summary: &mut RunSummary) {
        let import = format!("\n{TAILWIND_IMPORT}");
        let manual = format!("{TAILWIND_IMPORT}\n...\nplugins: [\n{TAILWIND_PLUGIN}]");
        self.edit_file("vite.config.js", "the Tailwind plugin", &manual, summary, |content| {
            insert_after_preamble(content, Preamble::JsImports, &import, "@tailwindcss/vite").then(
                content,
                |imported| {
                    insert_before_last_marker(imported, "],", TAILWIND_PLUGIN, &["tailwindcss()"])
                },
            )
        });
    }

    /// Build the final `.env` in memory and write it once
    ///
    /// Starts from `.env`, or `.env.example` when `.env` is missing, then
    /// sets `APP_NAME`, merges the template overrides and ensures the
    /// profile defaults. The result is mirrored into `.env.example` when
    /// the profile asks for it.
    pub fn update_env_files(&self, summary: &mut RunSummary) {
        let env_path = self.destination.join(".env");
        let example_path = self.destination.join(".env.example");

        let existing_env = match self.read_optional(&env_path) {
            Ok(content) => content,
            Err(err) => {
                warn!("Could not read .env, skipping environment setup: {err}");
                return;
            }
        };
        let existing_example = match self.read_optional(&example_path) {
            Ok(content) => content,
            Err(err) => {
                warn!("Could not read .env.example: {err}");
                None
            }
        };

        let Some(base) = existing_env.clone().or_else(|| existing_example.clone()) else {
            warn!("Neither .env nor .env.example exists, skipping environment setup");
            return;
        };
        if existing_env.is_none() {
            info!("Creating .env from .env.example");
        }

        let mut env = base;
        let app_name = title_from_dir_name(&dir_name(self.destination));
        if app_name.is_empty() {
            debug!("No directory name to derive APP_NAME from");
        } else {
            env = upsert_env_value(&env, "APP_NAME", &format!("\"{app_name}\""));
        }

        let overrides_path = self.templates.join(ENV_OVERRIDES);
        match self.system.read_to_string(&overrides_path) {
            Ok(overrides) => env = merge_env(&env, &overrides),
            Err(err) => warn!(
                "Could not read {}, skipping env overrides: {err}",
                overrides_path.display()
            ),
        }

        for default in &self.profile.env {
            env = ensure_env_value(&env, &default.key, &default.value);
        }

        if existing_env.as_deref() == Some(env.as_str()) {
            debug!(".env already up to date");
        } else {
            self.write_text(&env_path, ".env", &env, summary);
        }

        if self.profile.sync_env_example && existing_example.as_deref() != Some(env.as_str()) {
            self.write_text(&example_path, ".env.example", &env, summary);
        }
    }

    /// Name the compose project after the destination directory
    pub fn set_compose_project_name(&self, summary: &mut RunSummary) {
        let slug = slug_from_dir_name(&dir_name(self.destination));
        if slug.is_empty() {
            debug!("No directory name to derive the compose project name from");
            return;
        }
        let manual = format!("name: {slug}");
        self.edit_file("docker-compose.yml", "the project name", &manual, summary, |content| {
            set_top_level_field(content, "name", &slug)
        });
    }

    /// Append the profile's ignore entries to `.gitignore`
    pub fn update_gitignore(&self, summary: &mut RunSummary) {
        let manual = self.profile.gitignore.join("\n");
        self.edit_file(".gitignore", "ignore entries", &manual, summary, |content| {
            append_missing_entries(content, &self.profile.gitignore)
        });
    }

    /// One read, one transformation, one write
    fn edit_file<F>(
        &self,
        relative: &str,
        what: &str,
        manual: &str,
        summary: &mut RunSummary,
        transform: F,
    ) where
        F: FnOnce(&str) -> Patch,
    {
        let path = self.destination.join(relative);
        let content = match self.system.read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!("{relative} not found, skipping {what}");
                return;
            }
            Err(err) => {
                warn!("Could not read {relative}, skipping {what}: {err}");
                return;
            }
        };

        match transform(&content) {
            Patch::Applied(updated) => self.write_text(&path, relative, &updated, summary),
            Patch::Unchanged => debug!("{relative} already has {what}"),
            Patch::MarkerNotFound => warn!(
                "Could not find where to add {what} in {relative}, please add manually:\n{manual}"
            ),
        }
    }

    fn write_text(&self, path: &Path, relative: &str, content: &str, summary: &mut RunSummary) {
        if self.options.dry_run {
            info!("[dry-run] Would write {relative}");
            summary.record(RunEvent::FileWriteSkipped);
            return;
        }

        match self.system.write(path, content.as_bytes()) {
            Ok(()) => {
                info!("Updated {relative}");
                summary.record(RunEvent::FileWrite);
            }
            Err(err) => warn!("Could not write {relative}: {err}"),
        }
    }

    fn read_optional(&self, path: &Path) -> io::Result<Option<String>> {
        match self.system.read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }
}
