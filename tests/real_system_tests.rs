//! Integration tests for the production system against a real filesystem,
//! real git repositories and real child processes

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "This is a test module")]
mod tests {

    use core::time::Duration;
    use git2::{Repository, Signature};
    use laravel_init::error::ValidationError;
    use laravel_init::operations::validate::check_clean_tree;
    use laravel_init::system::{ProcessCommand, ProcessOutcome, RealSystem, System as _};
    use std::fs;
    use std::path::Path;
    use std::time::Instant;
    use tempfile::TempDir;

    /// Repository with `artisan` and a `.gitignore` for `vendor/` committed
    fn committed_project() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let repo = Repository::init(temp_dir.path()).unwrap();

        fs::write(temp_dir.path().join("artisan"), "#!/usr/bin/env php\n").unwrap();
        fs::write(temp_dir.path().join(".gitignore"), "vendor/\n").unwrap();

        let mut index = repo.index().unwrap();
        index.add_path(Path::new("artisan")).unwrap();
        index.add_path(Path::new(".gitignore")).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let signature = Signature::now("Test User", "test@test.com").unwrap();
        repo.commit(Some("HEAD"), &signature, &signature, "Initial commit", &tree, &[])
            .unwrap();

        temp_dir
    }

    #[test]
    fn untracked_file_makes_the_tree_dirty() {
        let temp_dir = TempDir::new().unwrap();
        Repository::init(temp_dir.path()).unwrap();
        fs::write(temp_dir.path().join("x.txt"), "scratch\n").unwrap();

        let system = RealSystem::new();

        assert_eq!(system.pending_changes(temp_dir.path()).unwrap(), ["x.txt"]);
        assert_eq!(
            check_clean_tree(&system, temp_dir.path()),
            Err(ValidationError::DirtyWorkingTree { changes: 1 })
        );
    }

    #[test]
    fn committed_tree_is_clean_and_ignored_files_do_not_count() {
        let project = committed_project();
        fs::create_dir_all(project.path().join("vendor/laravel")).unwrap();
        fs::write(project.path().join("vendor/laravel/x.php"), "<?php\n").unwrap();

        let system = RealSystem::new();

        assert!(system.pending_changes(project.path()).unwrap().is_empty());
        check_clean_tree(&system, project.path()).unwrap();
    }

    #[test]
    fn modified_tracked_file_is_pending() {
        let project = committed_project();
        fs::write(project.path().join("artisan"), "#!/usr/bin/env php\n// edited\n").unwrap();

        let changes = RealSystem::new().pending_changes(project.path()).unwrap();

        assert_eq!(changes, ["artisan"]);
    }

    #[test]
    fn subdirectory_of_a_repository_uses_the_whole_tree() {
        let project = committed_project();
        fs::create_dir_all(project.path().join("app")).unwrap();
        fs::write(project.path().join("notes.txt"), "todo\n").unwrap();

        let changes = RealSystem::new()
            .pending_changes(&project.path().join("app"))
            .unwrap();

        assert_eq!(changes, ["notes.txt"]);
    }

    #[test]
    fn directory_outside_any_repository_is_clean() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("artisan"), "").unwrap();

        let system = RealSystem::new();

        assert!(system.pending_changes(temp_dir.path()).unwrap().is_empty());
        check_clean_tree(&system, temp_dir.path()).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn process_exit_status_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let system = RealSystem::new();
        let timeout = Duration::from_secs(10);

        let success = ProcessCommand::new("sh").args(["-c", "exit 0"]);
        assert_eq!(
            system.run_process(&success, temp_dir.path(), timeout).unwrap(),
            ProcessOutcome::Success
        );

        let failure = ProcessCommand::new("sh").args(["-c", "exit 3"]);
        assert_eq!(
            system.run_process(&failure, temp_dir.path(), timeout).unwrap(),
            ProcessOutcome::Failed(Some(3))
        );
    }

    #[cfg(unix)]
    #[test]
    fn process_runs_in_the_working_directory() {
        let temp_dir = TempDir::new().unwrap();
        let command = ProcessCommand::new("sh").args(["-c", "touch created-here"]);

        RealSystem::new()
            .run_process(&command, temp_dir.path(), Duration::from_secs(10))
            .unwrap();

        assert!(temp_dir.path().join("created-here").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn process_is_killed_when_the_timeout_expires() {
        let temp_dir = TempDir::new().unwrap();
        let command = ProcessCommand::new("sleep").arg("5");

        let started = Instant::now();
        let outcome = RealSystem::new()
            .run_process(&command, temp_dir.path(), Duration::from_millis(300))
            .unwrap();

        assert_eq!(outcome, ProcessOutcome::TimedOut);
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn missing_program_fails_to_start() {
        let temp_dir = TempDir::new().unwrap();
        let command = ProcessCommand::new("laravel-init-no-such-program");

        let result =
            RealSystem::new().run_process(&command, temp_dir.path(), Duration::from_secs(1));

        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn walk_follows_links_and_skips_dangling_ones() {
        use std::os::unix::fs::symlink;

        let templates = TempDir::new().unwrap();
        let root = templates.path();
        fs::create_dir_all(root.join("routes")).unwrap();
        fs::write(root.join("routes/sso-auth.php"), "<?php\n").unwrap();
        fs::write(root.join("shared.php"), "<?php\n").unwrap();
        symlink(root.join("shared.php"), root.join("routes/linked.php")).unwrap();
        symlink(root.join("missing.php"), root.join("dangling.php")).unwrap();

        let entries = RealSystem::new().walk_dir(root).unwrap();
        let listed: Vec<(String, bool, bool)> = entries
            .iter()
            .map(|entry| {
                (
                    entry.path.strip_prefix(root).unwrap().to_string_lossy().into_owned(),
                    entry.is_file,
                    entry.is_dir,
                )
            })
            .collect();

        assert_eq!(
            listed,
            [
                ("routes".to_owned(), false, true),
                ("routes/linked.php".to_owned(), true, false),
                ("routes/sso-auth.php".to_owned(), true, false),
                ("shared.php".to_owned(), true, false),
            ]
        );
    }

    #[test]
    fn walk_of_missing_root_is_an_error() {
        let temp_dir = TempDir::new().unwrap();

        assert!(RealSystem::new().walk_dir(&temp_dir.path().join("nope")).is_err());
    }
}
