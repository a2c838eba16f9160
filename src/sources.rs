//! Configured source status (`ctxs sources`).

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

use crate::config::Config;
use crate::operations::{PDF_PLUGIN, SQLITE_PLUGIN, TEXT_PLUGIN};

#[derive(Debug, Clone, Serialize)]
pub struct SourceStatus {
    /// Plugin namespace the source is exposed under.
    pub plugin: String,
    pub kind: String,
    pub path: PathBuf,
    pub exists: bool,
    /// ISO8601 modification time when the file exists.
    pub modified: Option<String>,
}

pub fn get_sources(config: &Config) -> Vec<SourceStatus> {
    let entries = [
        (TEXT_PLUGIN, "text", &config.sources.text_file),
        (PDF_PLUGIN, "pdf", &config.sources.pdf_file),
        (SQLITE_PLUGIN, "sqlite", &config.sources.database),
    ];

    entries
        .into_iter()
        .filter_map(|(plugin, kind, path)| {
            let path = path.as_ref()?;
            let meta = std::fs::metadata(path).ok().filter(|m| m.is_file());
            let modified = meta
                .as_ref()
                .and_then(|m| m.modified().ok())
                .map(|t| DateTime::<Utc>::from(t).format("%Y-%m-%dT%H:%M:%SZ").to_string());
            Some(SourceStatus {
                plugin: plugin.to_string(),
                kind: kind.to_string(),
                path: path.clone(),
                exists: meta.is_some(),
                modified,
            })
        })
        .collect()
}

/// Prints the source table, or the statuses as a JSON array when `json`
/// is set.
pub fn list_sources(config: &Config, json: bool) -> Result<()> {
    let sources = get_sources(config);
    if json {
        println!("{}", serde_json::to_string_pretty(&sources)?);
        return Ok(());
    }

    println!(
        "{:<12} {:<8} {:<8} {:<22} PATH",
        "PLUGIN", "KIND", "EXISTS", "MODIFIED"
    );
    for s in sources {
        println!(
            "{:<12} {:<8} {:<8} {:<22} {}",
            s.plugin,
            s.kind,
            s.exists,
            s.modified.as_deref().unwrap_or("-"),
            s.path.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use tempfile::TempDir;

    #[test]
    fn reports_existence_per_source() {
        let tmp = TempDir::new().unwrap();
        let txt = tmp.path().join("demo.txt");
        std::fs::write(&txt, "hello").unwrap();

        let cfg = parse_config(&format!(
            "[sources]\ntext_file = \"{}\"\ndatabase = \"{}\"\n",
            txt.display(),
            tmp.path().join("missing.sqlite").display()
        ))
        .unwrap();

        let sources = get_sources(&cfg);
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].plugin, "TextFile");
        assert!(sources[0].exists);
        assert!(sources[0].modified.is_some());
        assert_eq!(sources[1].kind, "sqlite");
        assert!(!sources[1].exists);
        assert!(sources[1].modified.is_none());
    }
}
