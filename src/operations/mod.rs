//! Operations module
//!
//! Coordinates an init run: validation, team guidelines, template merge,
//! configuration edits, external commands and the closing summary

pub mod commands;
pub mod edits;
pub mod guidelines;
pub mod init;
pub mod merge;
pub mod patch;
pub mod resolve;
pub mod summary;
pub mod validate;

pub use init::InitOperation;
pub use summary::{RunEvent, RunSummary};
