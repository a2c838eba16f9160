//! Configuration loading and validation.
//!
//! The TOML file names the three source paths under `[sources]` (each
//! optional, at least one required) and the HTTP bind address under
//! `[server]`.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub sources: SourcesConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// One backing file per connector. An absent key means the connector is not
/// registered; a present key is never checked for existence here.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SourcesConfig {
    #[serde(default)]
    pub text_file: Option<PathBuf>,
    #[serde(default)]
    pub pdf_file: Option<PathBuf>,
    #[serde(default)]
    pub database: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7341".to_string()
}

impl SourcesConfig {
    pub fn is_empty(&self) -> bool {
        self.text_file.is_none() && self.pdf_file.is_none() && self.database.is_none()
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    if config.sources.is_empty() {
        bail!("at least one of sources.text_file, sources.pdf_file, sources.database must be set");
    }

    let keyed = [
        ("sources.text_file", &config.sources.text_file),
        ("sources.pdf_file", &config.sources.pdf_file),
        ("sources.database", &config.sources.database),
    ];
    for (key, value) in keyed {
        if let Some(p) = value {
            if p.as_os_str().to_string_lossy().trim().is_empty() {
                bail!("{} must not be empty", key);
            }
        }
    }

    if config.server.bind.trim().is_empty() {
        bail!("server.bind must not be empty");
    }

    Ok(config)
}
