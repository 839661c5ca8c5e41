//! Logger configuration loaded from YAML.
//!
//! Every field is optional; only fields that are present turn into modifiers,
//! so anything left out keeps the factory default.
//!
//! ```yaml
//! level: debug
//! addSource: false
//! format: text
//! setDefault: true
//! file:
//!   filename: logs/app.log
//!   maxSize: 10
//!   maxBackups: 3
//!   maxAge: 7
//! ```

use crate::options::{
    LogFile, LoggerOption, with_add_source, with_is_json, with_level, with_set_default,
    with_set_file,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// Environment variable overriding the configured level.
pub const LEVEL_ENV_VAR: &str = "LOGKIT_LEVEL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_source: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>, // "text" | "json"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_default: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileConfig {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(flatten)]
    pub log_file: LogFile,
}

fn enabled_by_default() -> bool {
    true
}

impl LoggingConfig {
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        serde_yaml::from_str(raw).context("Failed to parse logging config YAML")
    }

    /// Modifiers for the fields present in this config.
    pub fn options(&self) -> Vec<LoggerOption> {
        let mut options = Vec::new();
        if let Some(level) = &self.level {
            options.push(with_level(level));
        }
        if let Some(add_source) = self.add_source {
            options.push(with_add_source(add_source));
        }
        if let Some(format) = &self.format {
            options.push(with_is_json(!format.trim().eq_ignore_ascii_case("text")));
        }
        if let Some(set_default) = self.set_default {
            options.push(with_set_default(set_default));
        }
        if let Some(file) = &self.file {
            options.push(with_set_file(file.enabled, file.log_file.clone()));
        }
        options
    }
}

/// Load a logging config file. A missing file yields the empty config.
pub async fn load_config(path: &Path) -> Result<LoggingConfig> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        debug!(path = %path.display(), "Logging config not found; using defaults");
        return Ok(LoggingConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read logging config: {}", path.display()))?;

    let config: LoggingConfig = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse logging config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded logging config");
    Ok(config)
}

/// A level modifier from [`LEVEL_ENV_VAR`], meant to be applied last.
pub fn options_from_env() -> Vec<LoggerOption> {
    level_override(std::env::var(LEVEL_ENV_VAR).ok())
}

fn level_override(value: Option<String>) -> Vec<LoggerOption> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| with_level(&v))
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use crate::options::LoggerOptions;
    use crate::testing::scratch_dir;
    use std::path::PathBuf;

    fn resolve(config: &LoggingConfig) -> LoggerOptions {
        LoggerOptions::default().apply(config.options())
    }

    #[test]
    fn empty_config_keeps_defaults() {
        let config = LoggingConfig::from_yaml_str("{}").unwrap();
        assert!(config.options().is_empty());
        assert_eq!(resolve(&config), LoggerOptions::default());
    }

    #[test]
    fn full_config_maps_every_field() {
        let config = LoggingConfig::from_yaml_str(
            r#"
level: Debug
addSource: false
format: text
setDefault: false
file:
  filename: logs/app.log
  maxSize: 10
  maxBackups: 3
  maxAge: 7
"#,
        )
        .unwrap();

        let resolved = resolve(&config);
        assert_eq!(resolved.level, Level::Debug);
        assert!(!resolved.add_source);
        assert!(!resolved.is_json);
        assert!(!resolved.set_default);
        assert!(resolved.set_file);
        assert_eq!(resolved.log_file.filename, PathBuf::from("logs/app.log"));
        assert_eq!(resolved.log_file.max_size, 10);
        assert_eq!(resolved.log_file.max_backups, 3);
        assert_eq!(resolved.log_file.max_age, 7);
    }

    #[test]
    fn disabled_file_block_keeps_file_off() {
        let config = LoggingConfig::from_yaml_str(
            "file:\n  enabled: false\n  filename: logs/app.log\n",
        )
        .unwrap();
        let resolved = resolve(&config);
        assert!(!resolved.set_file);
        assert_eq!(resolved.log_file.filename, PathBuf::from("logs/app.log"));
    }

    #[test]
    fn unknown_values_degrade_to_defaults() {
        let config = LoggingConfig::from_yaml_str("level: loud\nformat: xml\n").unwrap();
        let resolved = resolve(&config);
        assert_eq!(resolved.level, Level::Info);
        assert!(resolved.is_json);
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(LoggingConfig::from_yaml_str("level: [unclosed").is_err());
        assert!(LoggingConfig::from_yaml_str("file:\n  maxSize: -1\n").is_err());
    }

    #[test]
    fn env_level_override_applies_last() {
        let mut options = LoggingConfig::from_yaml_str("level: error").unwrap().options();
        options.extend(level_override(Some("debug".to_string())));
        assert_eq!(LoggerOptions::default().apply(options).level, Level::Debug);

        assert!(level_override(None).is_empty());
        assert!(level_override(Some("  ".to_string())).is_empty());
    }

    #[tokio::test]
    async fn load_config_reads_yaml_file() {
        let dir = scratch_dir();
        fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("logging.yaml");
        fs::write(&path, "level: warn\nformat: json\n").await.unwrap();

        let config = load_config(&path).await.unwrap();
        assert_eq!(config.level.as_deref(), Some("warn"));
        assert_eq!(resolve(&config).level, Level::Warn);
        let _ = fs::remove_dir_all(dir).await;
    }

    #[tokio::test]
    async fn missing_config_file_yields_defaults() {
        let path = scratch_dir().join("absent.yaml");
        let config = load_config(&path).await.unwrap();
        assert!(config.options().is_empty());
    }
}
