//! CLI Common Utilities
//!
//! Credential and path resolution shared by command handlers. All lookups
//! follow the same precedence: command-line flag, then config file, then
//! environment variable.

use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::types::{ExporterError, Result};

/// Resolve the Wiki.js host URL
pub fn resolve_host(flag: Option<String>, config: &Config) -> Result<String> {
    flag.or_else(|| config.wikijs.host.clone())
        .or_else(|| std::env::var("WIKIJS_HOST").ok())
        .ok_or_else(|| {
            ExporterError::Config(
                "Wiki.js URL is required. Provide it with --url, the config file, \
                 or the WIKIJS_HOST environment variable."
                    .to_string(),
            )
        })
}

/// Resolve the Wiki.js API token
pub fn resolve_token(flag: Option<String>, config: &Config) -> Result<String> {
    flag.or_else(|| config.wikijs.api_key.clone())
        .or_else(|| std::env::var("WIKIJS_API_KEY").ok())
        .ok_or_else(|| {
            ExporterError::Config(
                "API token is required. Provide it with --token, the config file, \
                 or the WIKIJS_API_KEY environment variable."
                    .to_string(),
            )
        })
}

/// Resolve the Gemini API key
pub fn resolve_gemini_key(flag: Option<String>, config: &Config) -> Result<String> {
    flag.or_else(|| config.gemini.api_key.clone())
        .or_else(|| std::env::var("GEMINI_API_KEY").ok())
        .ok_or_else(|| {
            ExporterError::Config(
                "Gemini API key is required. Provide it with --api-key, the config file, \
                 or the GEMINI_API_KEY environment variable."
                    .to_string(),
            )
        })
}

/// Read a file if it exists, `None` if it does not
pub fn read_optional_file(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_flag_beats_config() {
        let mut config = Config::default();
        config.wikijs.host = Some("https://config.example.com".to_string());

        let host = resolve_host(Some("https://flag.example.com".to_string()), &config).unwrap();
        assert_eq!(host, "https://flag.example.com");
    }

    #[test]
    fn test_config_used_when_no_flag() {
        let mut config = Config::default();
        config.wikijs.host = Some("https://config.example.com".to_string());

        let host = resolve_host(None, &config).unwrap();
        assert_eq!(host, "https://config.example.com");
    }

    #[test]
    fn test_missing_token_is_config_error() {
        let config = Config::default();
        let err = resolve_token(None, &config).unwrap_err();
        assert!(matches!(err, ExporterError::Config(_)));
    }

    #[test]
    fn test_read_optional_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("guide.md");

        assert_eq!(read_optional_file(&path).unwrap(), None);
        fs::write(&path, "rules").unwrap();
        assert_eq!(read_optional_file(&path).unwrap().as_deref(), Some("rules"));
    }
}
