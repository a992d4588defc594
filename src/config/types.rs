//! Configuration Types
//!
//! All configuration structures with sensible defaults, mirroring the
//! `[wikijs]`, `[export]`, and `[gemini]` tables of the config file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Wiki.js connection settings
    pub wikijs: WikiJsConfig,

    /// Export behavior settings
    pub export: ExportConfig,

    /// Gemini content-analysis settings
    pub gemini: GeminiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            wikijs: WikiJsConfig::default(),
            export: ExportConfig::default(),
            gemini: GeminiConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `ExporterError::Config` on validation failure.
    pub fn validate(&self) -> crate::types::Result<()> {
        if self.export.delay_secs < 0.0 {
            return Err(crate::types::ExporterError::Config(format!(
                "export.delay_secs must not be negative, got {}",
                self.export.delay_secs
            )));
        }

        if self.gemini.delay_secs < 0.0 {
            return Err(crate::types::ExporterError::Config(format!(
                "gemini.delay_secs must not be negative, got {}",
                self.gemini.delay_secs
            )));
        }

        if self.wikijs.timeout_secs == 0 {
            return Err(crate::types::ExporterError::Config(
                "wikijs.timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Wiki.js Connection
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiJsConfig {
    /// Base URL of the Wiki.js instance (e.g. https://wiki.example.com)
    pub host: Option<String>,

    /// API token with read permissions
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for WikiJsConfig {
    fn default() -> Self {
        Self {
            host: None,
            api_key: None,
            timeout_secs: 60,
        }
    }
}

// =============================================================================
// Export Behavior
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Default export format
    pub default_format: ExportFormat,

    /// Default output file (json) or directory stem (markdown/html)
    pub default_output: String,

    /// Delay between page fetches in seconds
    pub delay_secs: f64,

    /// File holding per-page sync state across runs
    pub metadata_file: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_format: ExportFormat::Markdown,
            default_output: "wiki_export".to_string(),
            delay_secs: 0.1,
            metadata_file: PathBuf::from(".wikijs_export_metadata.json"),
        }
    }
}

/// Output format for exported pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    #[default]
    Markdown,
    Html,
}

impl ExportFormat {
    /// File extension for per-page output files
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "md",
            ExportFormat::Html => "html",
        }
    }

    /// Whether this format writes one file per page (enables local-change
    /// detection; the single-file json format is not per-page addressable)
    pub fn is_per_page(&self) -> bool {
        !matches!(self, ExportFormat::Json)
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Markdown => write!(f, "markdown"),
            ExportFormat::Html => write!(f, "html"),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "html" => Ok(ExportFormat::Html),
            _ => Err(format!(
                "Unknown format: {}. Valid values: json, markdown, html",
                s
            )),
        }
    }
}

// =============================================================================
// Gemini Analysis
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// Google Gemini API key
    pub api_key: Option<String>,

    /// Model name
    pub model: String,

    /// Delay between analysis calls in seconds (jitter is applied on top)
    pub delay_secs: f64,

    /// Path to the style guide file
    pub style_guide_file: PathBuf,

    /// Path to the AI-specific instructions file
    pub ai_guide_file: PathBuf,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.0-flash".to_string(),
            delay_secs: 1.0,
            style_guide_file: PathBuf::from("wiki_style_guide.md"),
            ai_guide_file: PathBuf::from("ai_instructions.md"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.export.default_format, ExportFormat::Markdown);
        assert_eq!(
            config.export.metadata_file,
            PathBuf::from(".wikijs_export_metadata.json")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_export_format_parsing() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!("HTML".parse::<ExportFormat>().unwrap(), ExportFormat::Html);
        assert!("xml".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_format_extensions() {
        assert_eq!(ExportFormat::Markdown.extension(), "md");
        assert_eq!(ExportFormat::Html.extension(), "html");
        assert!(ExportFormat::Markdown.is_per_page());
        assert!(!ExportFormat::Json.is_per_page());
    }

    #[test]
    fn test_validate_rejects_negative_delay() {
        let mut config = Config::default();
        config.export.delay_secs = -1.0;
        assert!(config.validate().is_err());
    }
}
