//! Wiki.js Exporter - Content Export and Style Analysis
//!
//! Exports pages from a Wiki.js instance over its GraphQL API into local
//! files (JSON, Markdown, or HTML) with incremental sync, and optionally
//! analyzes the exported content against a style guide with Gemini.
//!
//! ## Quick Start
//!
//! ```ignore
//! use wikijs_exporter::api::WikiJsClient;
//! use wikijs_exporter::export::{self, ExportOptions};
//!
//! let client = WikiJsClient::new("https://wiki.example.com", token, 60)?;
//! let outcome = export::run(&client, &options).await?;
//! ```
//!
//! ## Modules
//!
//! - [`api`]: Wiki.js GraphQL client
//! - [`export`]: incremental export engine, sync state, file writers
//! - [`analyze`]: style-guide analysis via Gemini with retry
//! - [`config`]: layered configuration (defaults, TOML file, environment)
//! - [`cli`]: command handlers

pub mod analyze;
pub mod api;
pub mod cli;
pub mod config;
pub mod export;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

pub use config::{Config, ConfigLoader, ExportFormat};
pub use types::{ExporterError, Result};
