//! Shared helpers for filesystem access and path handling

pub mod fs;
pub mod path;
