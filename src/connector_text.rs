//! Plain text file connector.
//!
//! Wraps a single file and returns its whole content. The path is fixed at
//! construction; existence is checked on every read.

use std::path::{Path, PathBuf};
use tracing::{error, warn};

use crate::error::SourceError;
use crate::fsutil::source_exists;

#[derive(Debug, Clone)]
pub struct TextConnector {
    path: PathBuf,
}

impl TextConnector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole file as UTF-8.
    ///
    /// Invalid byte sequences are replaced with U+FFFD rather than failing
    /// the read; valid UTF-8 comes back byte-for-byte.
    pub async fn read_text(&self) -> Result<String, SourceError> {
        if !source_exists(&self.path).await {
            return Err(SourceError::NotFound(self.path.clone()));
        }

        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| SourceError::from_io(&self.path, e))?;

        match String::from_utf8(bytes) {
            Ok(text) => Ok(text),
            Err(e) => {
                warn!(path = %self.path.display(), "file is not valid UTF-8, decoding lossily");
                Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
            }
        }
    }

    /// `ReadAll`: the file content, or a readable diagnostic message.
    pub async fn read_all(&self) -> String {
        match self.read_text().await {
            Ok(text) => text,
            Err(e) => {
                match &e {
                    SourceError::NotFound(_) => warn!(path = %self.path.display(), "{}", e),
                    _ => error!(path = %self.path.display(), kind = ?e.kind(), "{}", e),
                }
                e.to_string()
            }
        }
    }
}
