//! List Command
//!
//! Fetch page metadata (without content) and save it as JSON.

use std::fs;
use std::path::Path;

use crate::api::WikiJsClient;
use crate::cli::{Output, resolve_host, resolve_token};
use crate::config::Config;
use crate::types::Result;

pub async fn run(
    config: &Config,
    url: Option<String>,
    token: Option<String>,
    output: &Path,
) -> Result<()> {
    let out = Output::new();

    let host = resolve_host(url, config)?;
    let token = resolve_token(token, config)?;
    let client = WikiJsClient::new(&host, &token, config.wikijs.timeout_secs)?;

    out.info(&format!("Fetching page list from {}", host));
    let pages = client.fetch_pages().await?;

    if pages.is_empty() {
        out.warning("No pages found.");
        return Ok(());
    }

    let json = serde_json::to_string_pretty(&pages)?;
    fs::write(output, json)?;

    out.success(&format!(
        "Saved {} pages to {}",
        pages.len(),
        output.display()
    ));
    Ok(())
}
