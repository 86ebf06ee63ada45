//! TOML configuration.
//!
//! Every section is optional; an absent file means built-in defaults.
//!
//! ```toml
//! [merge]
//! max_sources = 50
//! remove_duplicates = true
//! prioritize_documents = true
//!
//! [validation]
//! default_duration_minutes = 45
//!
//! [server]
//! bind = "127.0.0.1:7341"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::merge::MergeOptions;
use crate::thresholds::DEFAULT_MAX_SOURCES;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub merge: MergeConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MergeConfig {
    #[serde(default = "default_max_sources")]
    pub max_sources: usize,
    #[serde(default = "default_true")]
    pub remove_duplicates: bool,
    #[serde(default = "default_true")]
    pub prioritize_documents: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            max_sources: default_max_sources(),
            remove_duplicates: true,
            prioritize_documents: true,
        }
    }
}

fn default_max_sources() -> usize {
    DEFAULT_MAX_SOURCES
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct ValidationConfig {
    #[serde(default = "default_duration")]
    pub default_duration_minutes: u32,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            default_duration_minutes: default_duration(),
        }
    }
}

fn default_duration() -> u32 {
    45
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

impl MergeConfig {
    pub fn to_options(&self) -> MergeOptions {
        MergeOptions {
            remove_duplicates: self.remove_duplicates,
            prioritize_documents: self.prioritize_documents,
            max_sources: Some(self.max_sources),
        }
    }
}

/// Parse and validate configuration from a TOML string.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    if config.merge.max_sources == 0 {
        anyhow::bail!("merge.max_sources must be >= 1");
    }

    if config.validation.default_duration_minutes == 0 {
        anyhow::bail!("validation.default_duration_minutes must be >= 1");
    }

    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    Ok(config)
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content)
}

/// Load `path` if given, otherwise fall back to defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => load_config(p),
        None => Ok(Config::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg.merge.max_sources, 50);
        assert!(cfg.merge.remove_duplicates);
        assert!(cfg.merge.prioritize_documents);
        assert_eq!(cfg.validation.default_duration_minutes, 45);
        assert_eq!(cfg.server.bind, "127.0.0.1:7341");
    }

    #[test]
    fn test_partial_section() {
        let cfg = parse_config("[merge]\nmax_sources = 10\n").unwrap();
        assert_eq!(cfg.merge.max_sources, 10);
        assert!(cfg.merge.remove_duplicates);
        assert_eq!(cfg.merge.to_options().max_sources, Some(10));
    }

    #[test]
    fn test_rejects_zero_max_sources() {
        let err = parse_config("[merge]\nmax_sources = 0\n").unwrap_err();
        assert!(err.to_string().contains("max_sources"));
    }

    #[test]
    fn test_rejects_zero_duration() {
        assert!(parse_config("[validation]\ndefault_duration_minutes = 0\n").is_err());
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(parse_config("[merge\nmax_sources = ").is_err());
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(load_config(Path::new("/nonexistent/research.toml")).is_err());
    }

    #[test]
    fn test_no_path_is_default() {
        let cfg = load_or_default(None).unwrap();
        assert_eq!(cfg.merge.max_sources, 50);
    }
}
