//! PDF document connector.
//!
//! Extracts text page by page with `pdf-extract`. Parsing is CPU-bound and
//! the parser can panic on malformed input, so it runs on a blocking thread;
//! a panic there surfaces as [`SourceError::Unexpected`].

use std::path::{Path, PathBuf};
use tracing::{error, warn};

use crate::error::SourceError;
use crate::fsutil::source_exists;

#[derive(Debug, Clone)]
pub struct DocumentConnector {
    path: PathBuf,
}

impl DocumentConnector {
    /// Fails with [`SourceError::InvalidArgument`] if `path` is empty or
    /// whitespace-only. Whether the file exists is checked per read.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, SourceError> {
        let path = path.into();
        if path.as_os_str().to_string_lossy().trim().is_empty() {
            error!("PDF path must not be empty or whitespace");
            return Err(SourceError::InvalidArgument("pdf path"));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Extracted text of every page, in document order.
    pub async fn extract_pages(&self) -> Result<Vec<String>, SourceError> {
        if !source_exists(&self.path).await {
            return Err(SourceError::NotFound(self.path.clone()));
        }

        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| match SourceError::from_io(&self.path, e) {
                // locked or unreadable files are I/O faults for documents
                SourceError::AccessDenied { path, source } => SourceError::Io { path, source },
                other => other,
            })?;

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem_by_pages(&bytes).map_err(|e| SourceError::Pdf {
                path,
                message: e.to_string(),
            })
        })
        .await
        .map_err(|e| SourceError::Unexpected {
            path: self.path.clone(),
            message: format!("PDF parser aborted: {}", e),
        })?
    }

    /// Pages joined in order, each followed by a newline.
    ///
    /// A document whose pages contain only whitespace yields
    /// [`SourceError::NoReadableText`].
    pub async fn extract_text(&self) -> Result<String, SourceError> {
        let pages = self.extract_pages().await?;
        let text = join_pages(&pages);
        if text.trim().is_empty() {
            return Err(SourceError::NoReadableText(self.path.clone()));
        }
        Ok(text)
    }

    /// `ReadDocumentText`: the document text, or a readable diagnostic message.
    pub async fn read_document_text(&self) -> String {
        match self.extract_text().await {
            Ok(text) => text,
            Err(e) => {
                match &e {
                    SourceError::NotFound(_) | SourceError::NoReadableText(_) => {
                        warn!(path = %self.path.display(), "{}", e)
                    }
                    _ => error!(path = %self.path.display(), kind = ?e.kind(), "{}", e),
                }
                e.to_string()
            }
        }
    }
}

fn join_pages(pages: &[String]) -> String {
    let mut out = String::with_capacity(pages.iter().map(|p| p.len() + 1).sum());
    for page in pages {
        out.push_str(page);
        out.push('\n');
    }
    out
}
