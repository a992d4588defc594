//! Init Command
//!
//! Create a sample configuration file plus supporting style-guide and
//! AI-instruction files in the working directory.

use std::fs;
use std::path::Path;

use crate::cli::Output;
use crate::types::{ExporterError, Result};

const SAMPLE_CONFIG: &str = r#"# Configuration for the Wiki.js exporter

[wikijs]
# Wiki.js host URL (e.g. https://wiki.example.com)
host = "https://your-wiki.example.com"
# API token with read permissions (Wiki.js Admin > API Access)
api_key = "your_api_token_here"
# Request timeout in seconds
timeout_secs = 60

[export]
# Default export format: json, markdown, or html
default_format = "markdown"
# Default output file (json) or directory (markdown/html)
default_output = "wiki_export"
# Delay between API requests in seconds
delay_secs = 0.1
# File that stores per-page sync state between runs
metadata_file = ".wikijs_export_metadata.json"

[gemini]
# Google Gemini API key
api_key = "your_gemini_api_key_here"
# Model used for content analysis
model = "gemini-2.0-flash"
# Delay between analysis calls in seconds
delay_secs = 1.0
# Style guide checked during analysis
style_guide_file = "wiki_style_guide.md"
# Extra instructions for the analysis model
ai_guide_file = "ai_instructions.md"
"#;

/// Built-in style guide used when no custom one exists
pub fn sample_style_guide() -> &'static str {
    r#"# Wiki Style Guide

## Titles and Headings

- Use sentence case for titles and headings ("Getting started", not "Getting Started")
- Acronyms such as BLE, PCB, API, and HTTP keep their standard capitalization everywhere
- Every page starts with a single top-level heading matching the page title

## Structure

- Begin each page with a one or two sentence summary before the first subheading
- Use numbered lists for sequential steps and bullet lists for unordered items
- Keep paragraphs short; split anything longer than five sentences

## Formatting

- Use fenced code blocks with a language tag for code and terminal output
- Use bold for UI element names and italics for emphasis, never underline
- Link to other wiki pages with relative paths
- HTML content is allowed where Markdown is insufficient

## Language

- Write in the present tense and active voice
- Address the reader as "you"
- Spell out numbers under ten unless they are measurements or versions
"#
}

/// Built-in AI analysis instructions used when no custom file exists
pub fn sample_ai_guide() -> &'static str {
    r#"# AI Analysis Instructions

These instructions apply only to automated style analysis and extend the
style guide.

- Do not flag embedded HTML; the wiki platform supports it
- Do not flag front matter blocks at the top of files
- Ignore the capitalization of acronyms (BLE, PCB, API, HTTP) in titles
- Only report issues that are explicitly covered by the style guide
- Prefer a small number of high-confidence findings over an exhaustive list
"#
}

pub fn run(config_path: &Path, force: bool) -> Result<()> {
    let out = Output::new();

    if config_path.exists() && !force {
        return Err(ExporterError::Config(format!(
            "Configuration file {} already exists. Use --force to overwrite.",
            config_path.display()
        )));
    }

    fs::write(config_path, SAMPLE_CONFIG)?;
    out.success(&format!(
        "Configuration file created at {}",
        config_path.display()
    ));

    for (path, content, label) in [
        ("wiki_style_guide.md", sample_style_guide(), "style guide"),
        ("ai_instructions.md", sample_ai_guide(), "AI instructions"),
    ] {
        let path = Path::new(path);
        if path.exists() && !force {
            out.warning(&format!(
                "{} already exists at {}. Use --force to overwrite.",
                label,
                path.display()
            ));
            continue;
        }
        fs::write(path, content)?;
        out.success(&format!("Sample {} created at {}", label, path.display()));
    }

    println!();
    println!("Edit these files to configure the exporter:");
    println!("  1. {} - main configuration", config_path.display());
    println!("  2. wiki_style_guide.md - style guidelines for content");
    println!("  3. ai_instructions.md - AI-specific analysis instructions");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use figment::Figment;
    use figment::providers::{Format, Toml};

    #[test]
    fn test_sample_config_parses() {
        let config: Config = Figment::new()
            .merge(Toml::string(SAMPLE_CONFIG))
            .extract()
            .unwrap();
        assert_eq!(
            config.wikijs.host.as_deref(),
            Some("https://your-wiki.example.com")
        );
        assert_eq!(config.gemini.model, "gemini-2.0-flash");
    }

    #[test]
    fn test_existing_config_requires_force() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "x").unwrap();

        let err = run(&path, false).unwrap_err();
        assert!(err.to_string().contains("--force"));
    }
}
