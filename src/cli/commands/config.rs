//! Config Command
//!
//! Inspect the merged configuration and the file paths it comes from.

use std::path::Path;

use crate::config::ConfigLoader;
use crate::types::Result;

pub fn show(config_file: Option<&Path>, format: &str) -> Result<()> {
    ConfigLoader::show_config(config_file, format == "json")
}

pub fn path(config_file: Option<&Path>) -> Result<()> {
    ConfigLoader::show_path(config_file);
    Ok(())
}
