//! Path manipulation and naming utilities

use std::path::{Component, Path, PathBuf};

/// Normalize a path by resolving `.` and `..` components
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {
                // Skip '.' components
            }
            Component::ParentDir => {
                // Handle '..' by popping the last component if possible
                if components.is_empty() {
                    // Keep leading '..' components
                    components.push(component);
                } else {
                    components.pop();
                }
            }
            _ => {
                components.push(component);
            }
        }
    }

    components.iter().collect()
}

/// Convert backslashes to forward slashes (for cross-platform compatibility)
#[must_use]
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Path of `path` below `base`, with `/` separators
///
/// Returns `None` when `path` is not inside `base` or is `base` itself.
#[must_use]
pub fn relative_slash_path(path: &Path, base: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).ok()?;
    if relative.as_os_str().is_empty() {
        return None;
    }
    Some(normalize_separators(&relative.to_string_lossy()))
}

/// True when `relative` is `entry` or lies below a directory named `entry`
#[must_use]
pub fn matches_component_prefix(relative: &str, entry: &str) -> bool {
    let entry = entry.trim_end_matches('/');
    relative == entry
        || relative
            .strip_prefix(entry)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Human-readable application name derived from a directory name
///
/// `my-cool_app` becomes `My Cool App`.
#[must_use]
pub fn title_from_dir_name(name: &str) -> String {
    name.split(|c: char| matches!(c, '-' | '_' | ' ' | '.'))
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase slug derived from a directory name
///
/// Runs of characters that are not ASCII alphanumerics collapse to `-`.
#[must_use]
pub fn slug_from_dir_name(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_owned()
}

/// Final component of a directory path as UTF-8
#[must_use]
pub fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
