//! Export Writers
//!
//! Serializes fetched pages to disk: one JSON file for the whole set, or
//! one Markdown/HTML file per page addressed by the page's hierarchical
//! path. Per-page writers return the exact bytes written so the state
//! tracker can hash what actually landed on disk.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::ExportFormat;
use crate::types::{Page, Result};

/// YAML front matter prepended to every exported Markdown page.
/// Field order is the on-disk order.
#[derive(Debug, Serialize)]
struct FrontMatter<'a> {
    path: &'a str,
    updated: String,
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    created: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tags: Vec<&'a str>,
}

/// Replace filesystem-hostile characters when a page has no path and its
/// title has to serve as the file name
fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Map a page to its output file within `dir` for a per-page format
pub fn page_file_path(dir: &Path, page_path: &str, title: &str, format: ExportFormat) -> PathBuf {
    let trimmed = page_path.trim_matches('/');
    let stem = if trimmed.is_empty() {
        sanitize_title(title)
    } else {
        trimmed.to_string()
    };
    dir.join(format!("{}.{}", stem, format.extension()))
}

/// Interpret the `--output` value as a directory for per-page formats.
/// A value carrying a file extension is reduced to its stem, so a
/// `wiki_export.json`-style name still yields a usable directory.
pub fn output_dir_for(output: &str) -> PathBuf {
    let path = Path::new(output);
    if path.is_dir() {
        return path.to_path_buf();
    }
    match path.extension() {
        Some(_) => path.with_extension(""),
        None => path.to_path_buf(),
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// Render a page to its Markdown file content (front matter + source).
/// Returns `None` for pages without content.
pub fn render_markdown(page: &Page) -> Result<Option<String>> {
    let Some(content) = page.content.as_deref().filter(|c| !c.is_empty()) else {
        return Ok(None);
    };

    let front = FrontMatter {
        path: &page.path,
        updated: page.updated_at.to_rfc3339(),
        title: &page.title,
        description: page.description.as_deref().filter(|d| !d.is_empty()),
        created: page.created_at.to_rfc3339(),
        author: page.author_name.as_deref(),
        tags: page.tag_names(),
    };
    let yaml = serde_yaml::to_string(&front)?;

    Ok(Some(format!("---\n{}---\n\n{}", yaml, content)))
}

/// Render a page to a standalone HTML document wrapping the
/// server-rendered body. Returns `None` for pages without rendered HTML.
pub fn render_html(page: &Page) -> Option<String> {
    let body = page.render.as_deref().filter(|r| !r.is_empty())?;

    Some(format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
        body {{ font-family: Arial, sans-serif; line-height: 1.6; max-width: 800px; margin: 0 auto; padding: 20px; }}
        h1, h2, h3, h4, h5, h6 {{ margin-top: 1.5em; margin-bottom: 0.5em; }}
        a {{ color: #0366d6; text-decoration: none; }}
        a:hover {{ text-decoration: underline; }}
        code {{ background-color: #f6f8fa; padding: 0.2em 0.4em; border-radius: 3px; font-family: monospace; }}
        pre {{ background-color: #f6f8fa; padding: 16px; border-radius: 3px; overflow: auto; font-family: monospace; }}
        blockquote {{ border-left: 4px solid #dfe2e5; padding-left: 16px; margin-left: 0; color: #6a737d; }}
        img {{ max-width: 100%; }}
        table {{ border-collapse: collapse; width: 100%; }}
        th, td {{ border: 1px solid #dfe2e5; padding: 6px 13px; }}
        tr:nth-child(even) {{ background-color: #f6f8fa; }}
    </style>
</head>
<body>
    <h1>{title}</h1>
    {body}
    <hr>
    <footer>
        <p><small>Exported from Wiki.js</small></p>
    </footer>
</body>
</html>"#,
        title = page.title,
        body = body,
    ))
}

// =============================================================================
// Writing
// =============================================================================

/// Write a single page in a per-page format. Returns the output path and
/// the written bytes, or `None` when the page had nothing to write.
pub fn write_page(dir: &Path, page: &Page, format: ExportFormat) -> Result<Option<(PathBuf, Vec<u8>)>> {
    let rendered = match format {
        ExportFormat::Markdown => render_markdown(page)?,
        ExportFormat::Html => render_html(page),
        ExportFormat::Json => None,
    };
    let Some(rendered) = rendered else {
        debug!("Skipping page '{}': no content for {}", page.path, format);
        return Ok(None);
    };

    let file = page_file_path(dir, &page.path, &page.title, format);
    if let Some(parent) = file.parent() {
        fs::create_dir_all(parent)?;
    }

    let bytes = rendered.into_bytes();
    fs::write(&file, &bytes)?;
    Ok(Some((file, bytes)))
}

/// Write the full page set as one pretty-printed JSON file
pub fn write_json(path: &Path, pages: &[Page]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(pages)?;
    fs::write(path, json)?;
    Ok(())
}

/// Load a previous JSON export for incremental merging.
/// Returns `None` when the file does not exist.
pub fn load_json(path: &Path) -> Result<Option<Vec<Page>>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// Tests
// =============================================================================
