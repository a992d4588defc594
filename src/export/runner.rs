//! Export Run Orchestration
//!
//! Drives a full or incremental export: consults the state tracker for
//! each page the server knows about, fetches only what changed, writes
//! the selected format, and commits updated sync records at the end.
//!
//! Pages are processed strictly sequentially with a fixed delay between
//! network fetches. A failing page is logged and skipped so one transient
//! error does not lose progress on the rest of the run.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::state::{ExportTracker, RefetchReason, SyncDecision, content_hash};
use super::writer;
use crate::api::WikiJsClient;
use crate::config::ExportFormat;
use crate::types::{Page, Result};

/// Options for a single export run
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Output file (json) or directory (markdown/html)
    pub output: String,
    /// Fixed delay between page fetches
    pub delay: Duration,
    /// Incremental mode; `false` forces a full export
    pub incremental: bool,
    /// Clear stored hashes before deciding anything
    pub reset_hashes: bool,
    pub metadata_file: PathBuf,
}

/// Counters summarizing what a run did
#[derive(Debug, Default, Clone, Copy)]
pub struct ExportOutcome {
    pub total: usize,
    pub fetched: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub async fn run(client: &WikiJsClient, opts: &ExportOptions) -> Result<ExportOutcome> {
    let mut tracker = ExportTracker::load(&opts.metadata_file);

    if opts.reset_hashes {
        info!("Resetting content hashes for {} pages", tracker.len());
        tracker.reset_hashes();
    }

    if let Some(last) = tracker.last_export()
        && opts.incremental
    {
        info!("Last export: {}", last.to_rfc3339());
    }

    let listing = client.fetch_pages().await?;
    let mut outcome = ExportOutcome {
        total: listing.len(),
        ..Default::default()
    };

    // Absent prior state always means a full export
    let mut full = !opts.incremental || tracker.is_empty();

    let output_dir = opts.format.is_per_page().then(|| writer::output_dir_for(&opts.output));
    let json_path = (!opts.format.is_per_page()).then(|| json_output_path(&opts.output));

    // The single-file JSON format can only serve skipped pages from the
    // previous export file; without it, fall back to a full export.
    let previous_json = match &json_path {
        Some(path) => {
            let previous = writer::load_json(path)?;
            if previous.is_none() && !full {
                info!("No previous JSON export at {}; performing full export", path.display());
                full = true;
            }
            previous
        }
        None => None,
    };

    if full {
        info!("Performing full export of {} pages", listing.len());
    }

    // Decide and fetch, one page at a time
    let mut fetched: Vec<Page> = Vec::new();
    for item in &listing {
        let decision = decide_page(&mut tracker, item, full, output_dir.as_deref(), opts.format);

        match decision {
            SyncDecision::Skip => {
                debug!("Skipping unchanged page '{}'", item.path);
                outcome.skipped += 1;
            }
            SyncDecision::Refetch(reason) => {
                debug!("Fetching page '{}' ({})", item.path, reason);
                match client.fetch_page(item.id).await {
                    Ok(page) => {
                        fetched.push(page);
                        outcome.fetched += 1;
                    }
                    Err(e) => {
                        warn!("Failed to fetch page '{}': {}; continuing", item.path, e);
                        outcome.failed += 1;
                    }
                }
                if !opts.delay.is_zero() {
                    tokio::time::sleep(opts.delay).await;
                }
            }
        }
    }

    // Write outputs and record fresh sync state for every fetched page
    if let Some(dir) = &output_dir {
        for page in &fetched {
            match writer::write_page(dir, page, opts.format)? {
                Some((_, bytes)) => tracker.record_fetched(page, Some(content_hash(&bytes))),
                None => tracker.record_no_output(page),
            }
        }
    } else if let Some(path) = &json_path {
        let merged = merge_pages(previous_json.unwrap_or_default(), &fetched, &listing);
        writer::write_json(path, &merged)?;
        for page in &fetched {
            tracker.record_fetched(page, None);
        }
    }

    tracker.save()?;

    info!(
        "Export complete: {} fetched, {} skipped, {} failed (of {} pages)",
        outcome.fetched, outcome.skipped, outcome.failed, outcome.total
    );
    Ok(outcome)
}

/// Per-page decision: the full-export override bypasses the tracker
/// entirely; otherwise the tracker decides, with the expected output file
/// supplied for per-page formats
fn decide_page(
    tracker: &mut ExportTracker,
    item: &crate::types::PageListing,
    full: bool,
    output_dir: Option<&std::path::Path>,
    format: ExportFormat,
) -> SyncDecision {
    if full {
        return SyncDecision::Refetch(RefetchReason::FullExport);
    }
    let local_file =
        output_dir.map(|dir| writer::page_file_path(dir, &item.path, &item.title, format));
    tracker.decide(item.id, item.updated_at, local_file.as_deref())
}

/// JSON output path; a bare stem gets the `.json` extension
fn json_output_path(output: &str) -> PathBuf {
    let path = PathBuf::from(output);
    match path.extension() {
        Some(_) => path,
        None => path.with_extension("json"),
    }
}

/// Merge freshly fetched pages over the previous export, keeping exactly
/// the pages the server currently lists
fn merge_pages(
    previous: Vec<Page>,
    fetched: &[Page],
    listing: &[crate::types::PageListing],
) -> Vec<Page> {
    let mut by_id: BTreeMap<i64, Page> =
        previous.into_iter().map(|p| (p.id, p)).collect();
    for page in fetched {
        by_id.insert(page.id, page.clone());
    }
    listing
        .iter()
        .filter_map(|item| by_id.remove(&item.id))
        .collect()
}
