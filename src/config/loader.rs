//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources:
//! 1. Built-in defaults (Serialized)
//! 2. Config file (wikijs-exporter.toml, overridable via --config)
//! 3. Environment variables (WIKIJS_EXPORTER_* prefix)
//!
//! The unprefixed credential variables (WIKIJS_HOST, WIKIJS_API_KEY,
//! GEMINI_API_KEY) are honored as a final fallback for the credential
//! fields.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::types::Config;
use crate::types::{ExporterError, Result};

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "wikijs-exporter.toml";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain:
    /// defaults → config file → env vars → legacy env fallbacks
    pub fn load(config_file: Option<&Path>) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        let path = config_file
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        if path.exists() {
            debug!("Loading config from: {}", path.display());
            figment = figment.merge(Toml::file(&path));
        } else if config_file.is_some() {
            return Err(ExporterError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        // Double underscore separates the table from the key, so field
        // names may themselves contain underscores:
        // WIKIJS_EXPORTER_EXPORT__DELAY_SECS -> export.delay_secs
        figment = figment.merge(Env::prefixed("WIKIJS_EXPORTER_").split("__").lowercase(true));

        let mut config: Config = figment
            .extract()
            .map_err(|e| ExporterError::Config(format!("Configuration error: {}", e)))?;

        Self::apply_env_fallbacks(&mut config);
        config.validate()?;

        Ok(config)
    }

    /// Fill unset credential fields from the unprefixed env variables
    fn apply_env_fallbacks(config: &mut Config) {
        if config.wikijs.host.is_none() {
            config.wikijs.host = env::var("WIKIJS_HOST").ok().filter(|v| !v.is_empty());
        }
        if config.wikijs.api_key.is_none() {
            config.wikijs.api_key = env::var("WIKIJS_API_KEY").ok().filter(|v| !v.is_empty());
        }
        if config.gemini.api_key.is_none() {
            config.gemini.api_key = env::var("GEMINI_API_KEY").ok().filter(|v| !v.is_empty());
        }
    }

    /// Show current effective configuration, credentials redacted
    pub fn show_config(config_file: Option<&Path>, as_json: bool) -> Result<()> {
        let mut config = Self::load(config_file)?;

        if config.wikijs.api_key.is_some() {
            config.wikijs.api_key = Some("[REDACTED]".to_string());
        }
        if config.gemini.api_key.is_some() {
            config.gemini.api_key = Some("[REDACTED]".to_string());
        }

        if as_json {
            println!("{}", serde_json::to_string_pretty(&config)?);
        } else {
            println!(
                "{}",
                toml::to_string_pretty(&config)
                    .map_err(|e| ExporterError::Config(e.to_string()))?
            );
        }

        Ok(())
    }

    /// Show config file path and whether it exists
    pub fn show_path(config_file: Option<&Path>) {
        let path = config_file
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        let exists = if path.exists() { "✓" } else { "✗" };
        println!("Config file: {} {}", exists, path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportFormat;
    use std::io::Write;

    #[test]
    fn test_load_defaults_without_file() {
        let config = ConfigLoader::load(None).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.export.delay_secs, 0.1);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let result = ConfigLoader::load(Some(Path::new("/nonexistent/exporter.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[wikijs]
host = "https://wiki.example.com"

[export]
default_format = "html"
delay_secs = 0.5
"#
        )
        .unwrap();

        let config = ConfigLoader::load(Some(&path)).unwrap();
        assert_eq!(
            config.wikijs.host.as_deref(),
            Some("https://wiki.example.com")
        );
        assert_eq!(config.export.default_format, ExportFormat::Html);
        assert_eq!(config.export.delay_secs, 0.5);
        // Untouched sections keep their defaults
        assert_eq!(config.gemini.model, "gemini-2.0-flash");
    }
}
