//! Error types for Berth core operations.
//!
//! This module defines well-structured error types using `thiserror` for
//! library-level errors, while higher-level code can use `anyhow` for
//! convenient error handling.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using BerthError
pub type Result<T> = std::result::Result<T, BerthError>;

/// Core error types for Berth operations.
///
/// These errors represent specific failure modes that callers may want to
/// handle differently (e.g., surfacing a failed scan versus silently
/// skipping one unreadable descriptor).
#[derive(Error, Debug)]
pub enum BerthError {
    // === Scan Errors ===
    /// A directory could not be enumerated mid-traversal
    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Descriptor Errors ===
    /// A descriptor file could not be read or rewritten
    #[error("descriptor error at {path}: {reason}")]
    Descriptor { path: PathBuf, reason: String },

    // === Configuration Errors ===
    /// Configuration file parsing failed
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    // === I/O Errors ===
    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BerthError {
    /// Create a walk error for a directory that failed to enumerate
    pub fn walk(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BerthError::Walk {
            path: path.into(),
            source,
        }
    }

    /// Create a descriptor error
    pub fn descriptor(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        BerthError::Descriptor {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
