//! Idempotent point edits against known text file shapes
//!
//! Nothing here parses PHP, JavaScript or YAML. Each edit anchors on a
//! literal marker and is guarded by a substring whose presence means the
//! edit has already been made, so applying any of these twice is the same
//! as applying it once.

use regex::Regex;
use std::sync::LazyLock;

/// `<?php` opening tag followed by any `use ...;` statements
#[expect(clippy::unwrap_used, reason = "Pattern is a compile-time constant")]
static PHP_USE_PREAMBLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<\?php(?:\s*use\s+[^;]+;)*").unwrap());


/// Result of applying an edit to a file's text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch {
    /// New file content
    Applied(String),
    /// The edit is already present
    Unchanged,
    /// The anchor the edit needs is missing
    MarkerNotFound,
}

impl Patch {
    /// Apply `next` to the result of this edit
    ///
    /// `original` is the text this edit was applied to. A missing marker
    /// stops the chain.
    #[must_use]
    pub fn then<F>(self, original: &str, next: F) -> Self
    where
        F: FnOnce(&str) -> Self,
    {
        match self {
            Self::MarkerNotFound => Self::MarkerNotFound,
            Self::Unchanged => next(original),
            Self::Applied(content) => match next(&content) {
                Self::Unchanged => Self::Applied(content),
                chained => chained,
            },
        }
    }
}

/// Which statement header an insertion follows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preamble {
    /// `<?php` plus `use` statements
    PhpUses,
    /// `import` statements
    JsImports,
}

impl Preamble {
    /// Byte offset just past the header, if the file has one
    fn end(self, content: &str) -> Option<usize> {
        match self {
            Self::PhpUses => PHP_USE_PREAMBLE.find(content).map(|header| header.end()),
            Self::JsImports => js_import_block_end(content),
        }
    }
}

/// End of the leading `import` statements, semicolons optional
///
/// Works line by line: blank lines and `//` comments may sit between
/// imports, and a statement may span lines until it closes with its
/// quoted module specifier. The first other line ends the block.
fn js_import_block_end(content: &str) -> Option<usize> {
    let mut end = None;
    let mut in_statement = false;
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let bare = line.trim_end_matches(['\n', '\r']);
        let trimmed = bare.trim();
        let line_offset = offset;
        offset += line.len();

        if !in_statement {
            if trimmed.is_empty() || trimmed.starts_with("//") {
                continue;
            }
            if !starts_import(trimmed) {
                break;
            }
        }

        if ends_with_specifier(trimmed) {
            in_statement = false;
            end = Some(line_offset + bare.trim_end().len());
        } else {
            in_statement = true;
        }
    }

    end
}

fn starts_import(line: &str) -> bool {
    line.strip_prefix("import").is_some_and(|rest| {
        rest.starts_with(|c: char| c.is_whitespace() || matches!(c, '{' | '*' | '\'' | '"'))
    })
}

fn ends_with_specifier(line: &str) -> bool {
    line.trim_end_matches(';')
        .trim_end()
        .ends_with(['\'', '"'])
}

/// Whether an item inserted at `at` starts a new list element
///
/// The text before it has to end an element (`,`) or open the list (`[`),
/// otherwise the insertion would run into the previous element.
fn follows_list_separator(content: &str, at: usize) -> bool {
    content[..at].trim_end().ends_with([',', '['])
}

/// Insert `insertion` right after the file's statement header
///
/// No-op when `guard` already occurs anywhere in the file.
#[must_use]
pub fn insert_after_preamble(
    content: &str,
    preamble: Preamble,
    insertion: &str,
    guard: &str,
) -> Patch {
    if content.contains(guard) {
        return Patch::Unchanged;
    }

    let Some(at) = preamble.end(content) else {
        return Patch::MarkerNotFound;
    };

    Patch::Applied(format!("{}{insertion}{}", &content[..at], &content[at..]))
}

/// Insert `block` before the last occurrence of `marker`
///
/// When only whitespace precedes the marker on its line the block goes in
/// at the start of that line, so `block` should be whole lines ending in a
/// newline. No-op when any of `guards` already occurs in the file.
///
/// The marker counts as missing unless the preceding element ends with a
/// comma or the list is empty, since the block is a new list element.
#[must_use]
pub fn insert_before_last_marker(
    content: &str,
    marker: &str,
    block: &str,
    guards: &[&str],
) -> Patch {
    if guards.iter().any(|guard| content.contains(guard)) {
        return Patch::Unchanged;
    }

    let Some(marker_at) = content.rfind(marker) else {
        return Patch::MarkerNotFound;
    };

    let line_start = content[..marker_at].rfind('\n').map_or(0, |newline| newline + 1);
    let own_line = content[line_start..marker_at].trim().is_empty();
    if !follows_list_separator(content, if own_line { line_start } else { marker_at }) {
        return Patch::MarkerNotFound;
    }

    if own_line {
        Patch::Applied(format!(
            "{}{block}{}",
            &content[..line_start],
            &content[line_start..]
        ))
    } else {
        Patch::Applied(format!(
            "{}\n{block}{}",
            &content[..marker_at],
            &content[marker_at..]
        ))
    }
}

/// Append each entry not already present as a substring
#[must_use]
pub fn append_missing_entries(content: &str, entries: &[String]) -> Patch {
    let missing: Vec<&String> = entries
        .iter()
        .filter(|entry| !content.contains(entry.as_str()))
        .collect();
    if missing.is_empty() {
        return Patch::Unchanged;
    }

    let mut updated = content.to_owned();
    if !updated.is_empty() && !updated.ends_with('\n') {
        updated.push('\n');
    }
    for entry in missing {
        updated.push_str(entry);
        updated.push('\n');
    }
    Patch::Applied(updated)
}

/// Set a top-level `field: value` line
///
/// Replaces the first line starting with `field:`, or prepends one.
#[must_use]
pub fn set_top_level_field(content: &str, field: &str, value: &str) -> Patch {
    let wanted = format!("{field}: {value}");

    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let bare = line.trim_end_matches(['\n', '\r']);
        if bare
            .strip_prefix(field)
            .is_some_and(|rest| rest.starts_with(':'))
        {
            if bare == wanted {
                return Patch::Unchanged;
            }
            let end = offset + bare.len();
            return Patch::Applied(format!("{}{wanted}{}", &content[..offset], &content[end..]));
        }
        offset += line.len();
    }

    Patch::Applied(format!("{wanted}\n{content}"))
}

/// True when `line` is an active `key=...` assignment
fn is_active(line: &str, key: &str) -> bool {
    line.strip_prefix(key)
        .is_some_and(|rest| rest.starts_with('='))
}

/// True when `line` is a commented-out `key=...` assignment
fn is_commented(line: &str, key: &str) -> bool {
    line.trim_start()
        .strip_prefix('#')
        .is_some_and(|rest| is_active(rest.trim_start(), key))
}

/// Whether an env file mentions `key`, active or commented
#[must_use]
pub fn has_env_key(content: &str, key: &str) -> bool {
    content
        .lines()
        .any(|line| is_active(line, key) || is_commented(line, key))
}

/// Line terminator used by `content`, `\r\n` when its first line has one
fn line_ending(content: &str) -> &'static str {
    match content.find('\n') {
        Some(at) if content[..at].ends_with('\r') => "\r\n",
        _ => "\n",
    }
}

fn set_env_line(content: &str, key: &str, value: &str, overwrite: bool) -> String {
    let assignment = format!("{key}={value}");
    let eol = line_ending(content);
    let mut lines: Vec<String> = content.lines().map(str::to_owned).collect();
    let mut trailing_newline = content.is_empty() || content.ends_with('\n');

    let active: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| is_active(line, key))
        .map(|(index, _)| index)
        .collect();

    if let Some((&first, duplicates)) = active.split_first() {
        if overwrite {
            lines[first] = assignment;
        }
        for &index in duplicates.iter().rev() {
            lines.remove(index);
        }
    } else if let Some(index) = lines.iter().position(|line| is_commented(line, key)) {
        lines[index] = assignment;
    } else {
        lines.push(assignment);
        trailing_newline = true;
    }

    let mut updated = lines.join(eol);
    if trailing_newline {
        updated.push_str(eol);
    }
    updated
}

/// Upsert `key=value` into an env file
///
/// Afterwards the file holds exactly one active `key=` line: the existing
/// one rewritten, else the first commented one reactivated, else a new one
/// appended.
#[must_use]
pub fn upsert_env_value(content: &str, key: &str, value: &str) -> String {
    set_env_line(content, key, value, true)
}

/// Like [`upsert_env_value`] but an existing active value wins
#[must_use]
pub fn ensure_env_value(content: &str, key: &str, value: &str) -> String {
    set_env_line(content, key, value, false)
}

/// Merge an env-style override file into `base`, key by key
///
/// Keys already in `base` are upserted in place. New keys are appended;
/// a key that followed a blank line in `overrides` is appended after a
/// blank line too, unless `base` already ends with one.
#[must_use]
pub fn merge_env(base: &str, overrides: &str) -> String {
    let mut merged = base.to_owned();
    let eol = line_ending(base);
    let mut blank_before = false;

    for line in overrides.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            blank_before = true;
            continue;
        }
        if trimmed.starts_with('#') {
            continue;
        }
        let Some((key, value)) = trimmed.split_once('=') else {
            blank_before = false;
            continue;
        };
        let key = key.trim();

        if blank_before && !has_env_key(&merged, key) && !ends_with_blank_line(&merged) {
            if !merged.ends_with('\n') {
                merged.push_str(eol);
            }
            merged.push_str(eol);
        }
        merged = upsert_env_value(&merged, key, value);
        blank_before = false;
    }

    merged
}

fn ends_with_blank_line(content: &str) -> bool {
    content.is_empty()
        || content.ends_with("\n\n")
        || content.ends_with("\n\r\n")
        || content == "\n"
        || content == "\r\n"
}
