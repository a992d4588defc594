//! Layered configuration: defaults, TOML file, environment variables.

pub mod loader;
pub mod types;

pub use loader::{ConfigLoader, DEFAULT_CONFIG_FILE};
pub use types::{Config, ExportConfig, ExportFormat, GeminiConfig, WikiJsConfig};
