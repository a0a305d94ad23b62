//! Tests for the team guideline download

mod common;

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "This is a test module")]
mod tests {

    use super::common::{GUIDELINES, PROJECT, fixture, guidelines_url, project_path, read};
    use laravel_init::config::Profile;
    use laravel_init::operations::guidelines::update_guidelines;
    use laravel_init::operations::summary::RunSummary;
    use laravel_init::system::{MockSystem, System as _};
    use std::path::Path;

    const GUIDELINES_PATH: &str = ".ai/guidelines/team-conventions.blade.php";

    fn update(system: &MockSystem, profile: &Profile, dry_run: bool) -> RunSummary {
        let mut summary = RunSummary::new();
        update_guidelines(system, profile, Path::new(PROJECT), dry_run, &mut summary);
        summary
    }

    #[test]
    fn guideline_is_written_into_new_directory() {
        let system = fixture();

        let summary = update(&system, &Profile::default(), false);

        assert_eq!(read(&system, GUIDELINES_PATH), GUIDELINES);
        assert!(system.is_dir(&project_path(".ai/guidelines")).unwrap());
        assert_eq!(summary.file_writes, 1);
        assert_eq!(system.fetched_urls().unwrap(), [guidelines_url()]);
    }

    #[test]
    fn unchanged_guideline_is_not_rewritten() {
        let system = fixture();
        update(&system, &Profile::default(), false);

        let summary = update(&system, &Profile::default(), false);

        assert_eq!(summary.file_writes, 0);
        assert_eq!(read(&system, GUIDELINES_PATH), GUIDELINES);
    }

    #[test]
    fn outdated_guideline_is_replaced() {
        let system = fixture()
            .with_file(project_path(GUIDELINES_PATH), b"# Old conventions\n")
            .unwrap();

        let summary = update(&system, &Profile::default(), false);

        assert_eq!(summary.file_writes, 1);
        assert_eq!(read(&system, GUIDELINES_PATH), GUIDELINES);
    }

    #[test]
    fn unreachable_url_leaves_project_untouched() {
        let system = fixture();
        let before = system.snapshot().unwrap();
        let profile = Profile {
            guidelines_url: Some("https://example.invalid/conventions.md".to_owned()),
            ..Profile::default()
        };

        let summary = update(&system, &profile, false);

        assert_eq!(summary, RunSummary::new());
        assert_eq!(system.snapshot().unwrap(), before);
    }

    #[test]
    fn empty_document_is_ignored() {
        let system = fixture()
            .with_http_response("https://example.com/empty.md", "  \n")
            .unwrap();
        let profile = Profile {
            guidelines_url: Some("https://example.com/empty.md".to_owned()),
            ..Profile::default()
        };

        let summary = update(&system, &profile, false);

        assert_eq!(summary.file_writes, 0);
        assert!(!system.exists(&project_path(GUIDELINES_PATH)).unwrap());
    }

    #[test]
    fn dry_run_downloads_nothing() {
        let system = fixture();
        let before = system.snapshot().unwrap();

        let summary = update(&system, &Profile::default(), true);

        assert_eq!(summary.file_writes_skipped, 1);
        assert!(system.fetched_urls().unwrap().is_empty());
        assert_eq!(system.snapshot().unwrap(), before);
    }

    #[test]
    fn disabled_download_does_nothing() {
        let system = fixture();
        let profile = Profile {
            guidelines_url: None,
            ..Profile::default()
        };

        let summary = update(&system, &profile, false);

        assert_eq!(summary, RunSummary::new());
        assert!(system.fetched_urls().unwrap().is_empty());
    }

    #[test]
    fn custom_location_is_honoured() {
        let system = fixture();
        let profile = Profile {
            guidelines_path: "docs/conventions.md".to_owned(),
            ..Profile::default()
        };

        update(&system, &profile, false);

        assert_eq!(read(&system, "docs/conventions.md"), GUIDELINES);
    }
}
