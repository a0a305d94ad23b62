//! Shared fixtures: a fresh Laravel project and a template tree in memory

#![allow(dead_code, reason = "Each test binary uses a subset of the fixtures")]
#![expect(clippy::unwrap_used, reason = "This is a test module")]

use laravel_init::cli::Args;
use laravel_init::config::Profile;
use laravel_init::system::{MockSystem, System as _};
use std::path::{Path, PathBuf};

pub const PROJECT: &str = "/work/my-app";
pub const TEMPLATES: &str = "/opt/laravel-init/stubs";

pub const WEB_ROUTES: &str = "<?php

use Illuminate\\Support\\Facades\\Route;

Route::get('/', function () {
    return view('welcome');
});
";

pub const SERVICES: &str = "<?php

return [

    'postmark' => [
        'token' => env('POSTMARK_TOKEN'),
    ],

];
";

pub const PROVIDERS: &str = "<?php

return [
    App\\Providers\\AppServiceProvider::class,
];
";

pub const VITE_CONFIG: &str = "import { defineConfig } from 'vite';
import laravel from 'laravel-vite-plugin';

export default defineConfig({
    plugins: [
        laravel({
            input: ['resources/css/app.css', 'resources/js/app.js'],
            refresh: true,
        }),
    ],
});
";

pub const ENV_EXAMPLE: &str = "APP_NAME=Laravel
APP_ENV=local
APP_KEY=

DB_CONNECTION=sqlite
";

pub const GITIGNORE: &str = "/node_modules
/vendor
.env
";

pub const ENV_OVERRIDES: &str = "# team defaults
DB_CONNECTION=mysql

QUEUE_CONNECTION=redis
";

pub const GUIDELINES: &str = "# Team conventions

- Use Flux UI components for every form.
";

/// Files the template tree copies into a fresh project
pub const COPIED_TEMPLATES: [&str; 6] = [
    ".github/workflows/tests.yml",
    "app/Providers/SSOServiceProvider.php",
    "database/seeders/TestDataSeeder.php",
    "docker-compose.yml",
    "resources/views/components/layouts/fluxui.blade.php",
    "routes/sso-auth.php",
];

pub fn project_path(relative: &str) -> PathBuf {
    Path::new(PROJECT).join(relative)
}

pub fn template_path(relative: &str) -> PathBuf {
    Path::new(TEMPLATES).join(relative)
}

/// A freshly created Laravel project with licence credentials exported and
/// the team guideline being served
pub fn laravel_project() -> MockSystem {
    MockSystem::new()
        .with_current_dir("/work")
        .unwrap()
        .with_env("FLUX_USERNAME", "dev@example.com")
        .unwrap()
        .with_env("FLUX_LICENSE_KEY", "ABCD-1234")
        .unwrap()
        .with_file(project_path("artisan"), b"#!/usr/bin/env php\n")
        .unwrap()
        .with_file(project_path("composer.json"), b"{\"require\": {\"laravel/framework\": \"^12.0\"}}\n")
        .unwrap()
        .with_file(project_path("routes/web.php"), WEB_ROUTES.as_bytes())
        .unwrap()
        .with_file(project_path("config/services.php"), SERVICES.as_bytes())
        .unwrap()
        .with_file(project_path("bootstrap/providers.php"), PROVIDERS.as_bytes())
        .unwrap()
        .with_file(project_path("vite.config.js"), VITE_CONFIG.as_bytes())
        .unwrap()
        .with_file(project_path(".env.example"), ENV_EXAMPLE.as_bytes())
        .unwrap()
        .with_file(project_path(".gitignore"), GITIGNORE.as_bytes())
        .unwrap()
        .with_http_response(&guidelines_url(), GUIDELINES)
        .unwrap()
}

/// Guideline URL of the built-in profile
pub fn guidelines_url() -> String {
    Profile::default().guidelines_url.unwrap()
}

/// Add the template tree to `system`
pub fn with_templates(system: MockSystem) -> MockSystem {
    system
        .with_file(template_path(".git/HEAD"), b"ref: refs/heads/main\n")
        .unwrap()
        .with_file(template_path("README.md"), b"# Templates\n")
        .unwrap()
        .with_file(template_path(".env.overrides"), ENV_OVERRIDES.as_bytes())
        .unwrap()
        .with_file(
            template_path(".github/workflows/tests.yml"),
            b"name: tests\non: [push]\n",
        )
        .unwrap()
        .with_file(
            template_path("app/Providers/SSOServiceProvider.php"),
            b"<?php\n\nclass SSOServiceProvider {}\n",
        )
        .unwrap()
        .with_file(
            template_path("database/seeders/TestDataSeeder.php"),
            b"<?php\n\nclass TestDataSeeder {}\n",
        )
        .unwrap()
        .with_file(
            template_path("docker-compose.yml"),
            b"name: app\n\nservices:\n  app:\n    build: .\n",
        )
        .unwrap()
        .with_file(
            template_path("resources/views/components/layouts/fluxui.blade.php"),
            b"<html>{{ $slot }}</html>\n",
        )
        .unwrap()
        .with_file(
            template_path("routes/sso-auth.php"),
            b"<?php\n\nRoute::get('/login', fn () => 'login');\n",
        )
        .unwrap()
}

/// Project plus templates, ready for a full run
pub fn fixture() -> MockSystem {
    with_templates(laravel_project())
}

/// Arguments pointing at the fixture project and templates
pub fn args() -> Args {
    Args {
        directory: PathBuf::from(PROJECT),
        templates: Some(PathBuf::from(TEMPLATES)),
        ..Args::default()
    }
}

pub fn read(system: &MockSystem, relative: &str) -> String {
    system.read_to_string(&project_path(relative)).unwrap()
}
