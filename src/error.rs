//! Source access errors.
//!
//! Every connector has a typed layer that returns `Result<_, SourceError>`.
//! The string operations exposed to callers turn these into readable
//! messages (or `"[]"` for the relational connector) and log them; a
//! `SourceError` never escapes an operation.

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Coarse classification of a [`SourceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The backing file or database does not exist.
    NotFound,
    /// Read failed: lock, corruption, unreadable document.
    Io,
    /// Permission denied by the OS.
    AccessDenied,
    /// SQLite rejected the query or a row did not match the expected schema.
    Database,
    /// The document parsed but produced no text.
    NoReadableText,
    /// A required constructor argument was empty.
    InvalidArgument,
    /// Anything else.
    Unexpected,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("File not found: '{}'. Check that the path is correct.", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error while reading '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Access denied while reading '{}': {source}", .path.display())]
    AccessDenied {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse PDF '{}': {message}", .path.display())]
    Pdf { path: PathBuf, message: String },

    #[error("Database error reading '{}': {source}", .path.display())]
    Database {
        path: PathBuf,
        #[source]
        source: sqlx::Error,
    },

    #[error("Warning: PDF '{}' contains no readable text.", .0.display())]
    NoReadableText(PathBuf),

    #[error("{0} must not be empty or whitespace")]
    InvalidArgument(&'static str),

    #[error("Unexpected error while reading '{}': {message}", .path.display())]
    Unexpected { path: PathBuf, message: String },
}

impl SourceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SourceError::NotFound(_) => ErrorKind::NotFound,
            SourceError::Io { .. } | SourceError::Pdf { .. } => ErrorKind::Io,
            SourceError::AccessDenied { .. } => ErrorKind::AccessDenied,
            SourceError::Database { .. } => ErrorKind::Database,
            SourceError::NoReadableText(_) => ErrorKind::NoReadableText,
            SourceError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            SourceError::Unexpected { .. } => ErrorKind::Unexpected,
        }
    }

    /// Classifies an I/O error raised while reading `path`.
    ///
    /// A file removed between the existence check and the read still counts
    /// as not found.
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => SourceError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => SourceError::AccessDenied {
                path: path.to_path_buf(),
                source: err,
            },
            std::io::ErrorKind::Other => SourceError::Unexpected {
                path: path.to_path_buf(),
                message: err.to_string(),
            },
            _ => SourceError::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }
}
