//! File system utilities

use crate::system::System;
use anyhow::{Context as _, Result};
use std::path::Path;

/// Bytes inspected when sniffing for binary content
const SNIFF_LEN: usize = 8192;

/// Create parent directories for a file path if they don't exist
pub fn create_parent_directories(system: &dyn System, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent()
        && !system.exists(parent)?
    {
        system.create_dir_all(parent).with_context(|| {
            format!(
                "Failed to create parent directories for: {}",
                file_path.display()
            )
        })?;
    }
    Ok(())
}

/// Content sniffing: NUL bytes or invalid UTF-8 in the leading window
#[must_use]
pub fn is_binary_content(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(SNIFF_LEN)];
    if window.contains(&0) {
        return true;
    }
    match core::str::from_utf8(window) {
        Ok(_) => false,
        // A multi-byte character cut off by the window is still text
        Err(err) => err.error_len().is_some(),
    }
}
