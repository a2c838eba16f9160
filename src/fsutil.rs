//! Filesystem checks shared by the connectors.

use std::path::Path;

/// Returns `true` if `path` names an existing regular file right now.
///
/// Connectors call this on every invocation, not at construction: sources
/// may appear or disappear between the two. Directories and paths that
/// cannot be stat'ed count as missing.
pub async fn source_exists(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn file_exists_directory_does_not() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("a.txt");
        std::fs::write(&file, "x").unwrap();

        assert!(source_exists(&file).await);
        assert!(!source_exists(tmp.path()).await);
        assert!(!source_exists(&tmp.path().join("missing.txt")).await);
    }
}
