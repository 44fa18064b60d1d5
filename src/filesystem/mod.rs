// src/filesystem/mod.rs

//! Filesystem operations on the target root
//!
//! - `path`: resolving target-relative paths without escaping the root
//! - `write`: atomic, mode-setting file writes

pub mod path;
mod write;

pub use path::{normalize_relative, target_path};
pub use write::{write_file_atomic, CONFIG_MODE, EXEC_MODE};
