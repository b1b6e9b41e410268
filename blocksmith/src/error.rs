//! Error types for content block loading.
//!
//! Every variant in [`LoadError`] aborts the entire load: there is no
//! partial-success mode and no internal retry. Callers treat a failed load as
//! a fatal configuration error surfaced at startup or build time. The
//! persisted cache is never written on a failed load, so the next attempt
//! re-validates from scratch.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using LoadError.
pub type Result<T> = std::result::Result<T, LoadError>;

/// Errors that can occur while loading and compiling content blocks.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Declaration file missing, unparsable, or without a usable `name`.
    #[error("malformed declaration in '{path}': {reason}")]
    MalformedDeclaration { path: PathBuf, reason: String },

    /// Vendor or slug segment of a block name fails the naming rule.
    #[error("invalid {segment} '{value}': must be lowercase and consist of words separated by '-'")]
    InvalidIdentifier {
        segment: &'static str,
        value: String,
    },

    /// A category-specific mandatory key is absent.
    #[error("content block '{name}' is missing required field '{field}'")]
    MissingRequiredField { name: String, field: &'static str },

    /// Numeric page type identifier collides with an already registered one.
    #[error("page type {type_name} of '{name}' is already registered by '{existing}'")]
    ConflictingPageType {
        type_name: i64,
        name: String,
        existing: String,
    },

    /// Two content blocks share the same qualified name.
    #[error("the content block '{name}' exists more than once, please choose another name")]
    DuplicateName { name: String },

    /// Resolved definition directory does not exist at finalization time.
    #[error("content block '{name}' could not be found in '{path}'")]
    SourceNotFound { name: String, path: PathBuf },

    /// Failed to read a file.
    #[error("failed to read '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a directory.
    #[error("failed to create directory '{path}': {source}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Asset publishing failed.
    #[error("failed to publish assets to '{path}': {source}")]
    Publish {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Cache operation failed.
    #[error("cache operation failed: {0}")]
    Cache(String),
}

impl LoadError {
    /// Create a MalformedDeclaration error.
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedDeclaration {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileRead error.
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Create a DirectoryCreation error.
    pub fn directory_creation(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryCreation {
            path: path.into(),
            source,
        }
    }
}
