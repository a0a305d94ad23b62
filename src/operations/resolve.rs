//! Conflict resolution between an existing destination file and its template

use crate::prompt::Prompter;
use crate::utils::fs::is_binary_content;
use std::io;
use tracing::warn;

/// What to do with one template file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Destination is absent; write it
    Copy,
    /// Destination exists; replace it
    Overwrite,
    /// Destination exists; leave it alone
    Skip,
}

/// Inputs that decide a conflict without asking anyone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConflictFacts {
    pub exists: bool,
    pub force: bool,
    pub auto_copy: bool,
    pub dry_run: bool,
}

/// Decision table, first match wins
///
/// Returns `None` when only the operator can decide.
#[must_use]
pub const fn decide(facts: ConflictFacts) -> Option<Decision> {
    if !facts.exists {
        Some(Decision::Copy)
    } else if facts.force || facts.auto_copy || facts.dry_run {
        Some(Decision::Overwrite)
    } else {
        None
    }
}

/// One parsed operator reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    Diff,
    Invalid,
}

impl Answer {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "y" | "yes" => Self::Yes,
            "" | "n" | "no" => Self::No,
            "d" | "diff" => Self::Diff,
            _ => Self::Invalid,
        }
    }
}

/// States of the overwrite prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptState {
    Asking,
    ShowingDiff,
    Resolved(Decision),
}

/// Ask the operator whether to overwrite `relative_path`
///
/// Loops until the operator answers yes or no; a diff request shows the
/// unified diff and asks again.
///
/// # Errors
///
/// Returns an error if the prompter cannot read an answer
pub fn ask_operator(
    prompter: &mut dyn Prompter,
    relative_path: &str,
    existing: &[u8],
    incoming: &[u8],
) -> io::Result<Decision> {
    let question = format!("Overwrite {relative_path}? [y/n/d(iff)]");
    let mut state = PromptState::Asking;

    loop {
        state = match state {
            PromptState::Asking => match Answer::parse(&prompter.ask(&question, "n")?) {
                Answer::Yes => PromptState::Resolved(Decision::Overwrite),
                Answer::No => PromptState::Resolved(Decision::Skip),
                Answer::Diff => PromptState::ShowingDiff,
                Answer::Invalid => {
                    warn!("Please enter y, n, or d");
                    PromptState::Asking
                }
            },
            PromptState::ShowingDiff => {
                prompter.show(&render_diff(existing, incoming));
                PromptState::Asking
            }
            PromptState::Resolved(decision) => return Ok(decision),
        };
    }
}

/// Resolve a conflict, asking the operator only when the table cannot decide
///
/// A prompt failure is treated as a refusal.
pub fn resolve(
    prompter: &mut dyn Prompter,
    relative_path: &str,
    facts: ConflictFacts,
    existing: &[u8],
    incoming: &[u8],
) -> Decision {
    if let Some(decision) = decide(facts) {
        return decision;
    }

    ask_operator(prompter, relative_path, existing, incoming).unwrap_or_else(|err| {
        warn!("Could not read an answer for {relative_path}, skipping: {err}");
        Decision::Skip
    })
}

/// Unified diff of the existing file against the incoming template
#[must_use]
pub fn render_diff(existing: &[u8], incoming: &[u8]) -> String {
    if is_binary_content(existing) || is_binary_content(incoming) {
        return "Binary files differ".to_owned();
    }

    let existing = String::from_utf8_lossy(existing);
    let incoming = String::from_utf8_lossy(incoming);
    similar::TextDiff::from_lines(existing.as_ref(), incoming.as_ref())
        .unified_diff()
        .context_radius(3)
        .header("Existing file", "Template (new)")
        .to_string()
}
