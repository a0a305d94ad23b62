//! CLI interface tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn laravel_init() -> Command {
    let mut cmd = Command::cargo_bin("laravel-init").unwrap();
    cmd.env_remove("FLUX_USERNAME")
        .env_remove("FLUX_LICENSE_KEY")
        .env_remove("LARAVEL_INIT_TEMPLATES")
        .env_remove("LARAVEL_INIT_PROFILE")
        .env_remove("RUST_LOG");
    cmd
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn project_and_templates() -> (TempDir, TempDir) {
    let project = TempDir::new().unwrap();
    write(project.path(), "artisan", "#!/usr/bin/env php\n");
    write(project.path(), "routes/web.php", "<?php\n\nuse Illuminate\\Support\\Facades\\Route;\n");
    write(project.path(), ".env.example", "APP_NAME=Laravel\n");

    let templates = TempDir::new().unwrap();
    write(templates.path(), "routes/sso-auth.php", "<?php\n");
    write(templates.path(), ".env.overrides", "QUEUE_CONNECTION=redis\n");

    (project, templates)
}

#[test]
fn test_version_flag() {
    laravel_init()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("laravel-init"));
}

#[test]
fn test_help_flag() {
    laravel_init()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bootstrap a Laravel project"))
        .stdout(predicate::str::contains("--skip-docker"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_missing_templates_error() {
    let (project, _templates) = project_and_templates();

    laravel_init()
        .arg(project.path())
        .arg("--templates")
        .arg("/nonexistent/templates")
        .assert()
        .failure()
        .code(1) // Configuration error
        .stdout(predicate::str::contains("Template directory does not exist"));
}

#[test]
fn test_missing_destination_error() {
    let (_project, templates) = project_and_templates();

    laravel_init()
        .arg("/nonexistent/laravel/app")
        .arg("--templates")
        .arg(templates.path())
        .arg("--skip-flux")
        .assert()
        .failure()
        .code(2) // Validation error
        .stdout(predicate::str::contains("Destination directory does not exist"));
}

#[test]
fn test_missing_credentials_error() {
    let (project, templates) = project_and_templates();

    laravel_init()
        .arg(project.path())
        .arg("--templates")
        .arg(templates.path())
        .assert()
        .failure()
        .code(2)
        .stdout(predicate::str::contains(
            "FLUX_USERNAME and/or FLUX_LICENSE_KEY not set",
        ))
        .stdout(predicate::str::contains("--skip-flux"));

    assert!(!project.path().join("routes/sso-auth.php").exists());
}

#[test]
fn test_invalid_profile_error() {
    let (project, templates) = project_and_templates();
    write(project.path(), "profile.yaml", "exclude: [\n");

    laravel_init()
        .arg(project.path())
        .arg("--templates")
        .arg(templates.path())
        .arg("--profile")
        .arg(project.path().join("profile.yaml"))
        .assert()
        .failure()
        .code(1);
}

#[test]
fn test_dry_run_changes_nothing() {
    let (project, templates) = project_and_templates();
    let routes_before = fs::read_to_string(project.path().join("routes/web.php")).unwrap();

    laravel_init()
        .arg(project.path())
        .arg("--templates")
        .arg(templates.path())
        .arg("--skip-flux")
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("[dry-run] Would copy routes/sso-auth.php"))
        .stdout(predicate::str::contains("[dry-run] Would run: npm install -D"))
        .stdout(predicate::str::contains("Run summary"));

    assert!(!project.path().join("routes/sso-auth.php").exists());
    assert!(!project.path().join(".env").exists());
    assert_eq!(
        fs::read_to_string(project.path().join("routes/web.php")).unwrap(),
        routes_before
    );
}
