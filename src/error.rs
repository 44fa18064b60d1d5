// src/error.rs

//! Error types shared across netseed
//!
//! Fatal errors such as missing inputs or render and hook failures
//! propagate to the caller. Some variants are recoverable where they are
//! consumed: `ProbeUnavailable` from a version probe becomes a modern
//! ifupdown assumption, and a reconcile error is reported before the apply
//! moves on. An unreadable legacy file is an outcome, not an error.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while applying network configuration
#[derive(Error, Debug)]
pub enum Error {
    /// Required input was not supplied by the caller
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// A target-relative path was absolute or otherwise unusable
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// A target-relative path tried to escape the target root
    #[error("Path traversal detected: {0}")]
    PathTraversal(String),

    /// Package version could not be determined inside the target
    #[error("Package version unavailable: {0}")]
    ProbeUnavailable(String),

    /// Writing a mandatory file into the target failed
    #[error("Failed to write {}: {source}", path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The renderer could not produce the network configuration
    #[error("Render error: {0}")]
    RenderError(String),

    /// A network state or network config document was malformed
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A network config document used an unsupported version
    #[error("Unsupported network config: {0}")]
    UnsupportedConfig(String),

    /// I/O error with context
    #[error("I/O error: {0}")]
    IoError(String),

    /// Raw I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML (de)serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Whether this error stems from caller misuse (exit code 2 on the CLI)
    pub fn is_missing_input(&self) -> bool {
        matches!(self, Error::MissingInput(_))
    }
}

/// Result type alias using netseed's Error type
pub type Result<T> = std::result::Result<T, Error>;
