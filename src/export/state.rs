//! Export State Tracker
//!
//! Persisted per-page sync state that drives incremental exports. For each
//! page known to the server, the tracker decides whether a fresh fetch is
//! required based on the server-reported update timestamp and a SHA-256
//! digest of the previously exported file's bytes.
//!
//! ## Decision rules (per page, each independently sufficient)
//!
//! 1. No prior record → refetch (new page)
//! 2. Server timestamp strictly newer than stored → refetch (remote change)
//! 3. Local file hash differs from stored hash → refetch (local edit)
//! 4. Otherwise → skip
//!
//! The metadata file is the sole source of truth for "what was last
//! synced". A missing or corrupt file loads as empty state (forcing a full
//! export) rather than failing the run. Saves go through a temp file and
//! rename so a crash never corrupts the previous valid file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::types::{ExporterError, Page, Result};

/// Format version marker for the metadata file
pub const METADATA_VERSION: u32 = 1;

/// SHA-256 hex digest over exported file bytes.
/// A change-detection signal, not a security boundary.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

// =============================================================================
// Persisted Records
// =============================================================================

/// Sync state for a single wiki page, created on first successful export
/// and updated after every run in which the page was re-fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub page_id: i64,
    pub path: String,
    pub title: String,
    /// Server-reported update time at the last successful fetch
    pub remote_updated_at: DateTime<Utc>,
    /// Digest of the exported file as written by this tool.
    /// `None` after `reset-hashes` or for formats without per-page files.
    pub content_hash: Option<String>,
    /// The page had nothing to write at the last fetch, so no output file
    /// is expected on disk and a missing file is not a change signal.
    #[serde(default)]
    pub no_output: bool,
}

/// The full persisted mapping, one record per page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub version: u32,
    pub exported_at: Option<DateTime<Utc>>,
    pub pages: BTreeMap<i64, PageRecord>,
}

impl Default for ExportMetadata {
    fn default() -> Self {
        Self {
            version: METADATA_VERSION,
            exported_at: None,
            pages: BTreeMap::new(),
        }
    }
}

// =============================================================================
// Decisions
// =============================================================================

/// Per-page outcome of the incremental decision algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDecision {
    Refetch(RefetchReason),
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefetchReason {
    /// No prior record for this page id
    NewPage,
    /// Server reports a strictly newer update timestamp
    RemoteUpdated,
    /// On-disk content no longer matches the recorded hash
    LocalModified,
    /// Expected output file is gone or unreadable
    LocalMissing,
    /// Full-export override, decision rules bypassed
    FullExport,
}

impl std::fmt::Display for RefetchReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NewPage => write!(f, "new page"),
            Self::RemoteUpdated => write!(f, "updated on server"),
            Self::LocalModified => write!(f, "local file modified"),
            Self::LocalMissing => write!(f, "local file missing"),
            Self::FullExport => write!(f, "full export"),
        }
    }
}

// =============================================================================
// Tracker
// =============================================================================

/// Loads, consults, and persists the per-page sync state
#[derive(Debug)]
pub struct ExportTracker {
    path: PathBuf,
    metadata: ExportMetadata,
}

impl ExportTracker {
    /// Load tracker state from the metadata file.
    ///
    /// A missing file is normal (first run). A corrupt or unreadable file
    /// is reported with a warning and treated as empty state, which makes
    /// the next run a full export.
    pub fn load(path: &Path) -> Self {
        let metadata = match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<ExportMetadata>(&content) {
                Ok(metadata) => {
                    debug!(
                        "Loaded export metadata: {} pages, last export {:?}",
                        metadata.pages.len(),
                        metadata.exported_at
                    );
                    metadata
                }
                Err(e) => {
                    warn!(
                        "Metadata file {} is corrupt ({}); treating as no prior state",
                        path.display(),
                        e
                    );
                    ExportMetadata::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => ExportMetadata::default(),
            Err(e) => {
                warn!(
                    "Cannot read metadata file {} ({}); treating as no prior state",
                    path.display(),
                    e
                );
                ExportMetadata::default()
            }
        };

        Self {
            path: path.to_path_buf(),
            metadata,
        }
    }

    /// True when no page has ever been exported (or state was reset)
    pub fn is_empty(&self) -> bool {
        self.metadata.pages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.metadata.pages.len()
    }

    pub fn last_export(&self) -> Option<DateTime<Utc>> {
        self.metadata.exported_at
    }

    pub fn record(&self, page_id: i64) -> Option<&PageRecord> {
        self.metadata.pages.get(&page_id)
    }

    /// Clear all stored content hashes without contacting the server.
    /// The next incremental run re-derives hashes from on-disk files.
    pub fn reset_hashes(&mut self) {
        for record in self.metadata.pages.values_mut() {
            record.content_hash = None;
        }
        debug!("Reset content hashes for {} pages", self.metadata.pages.len());
    }

    /// Decide whether a page needs a fresh fetch.
    ///
    /// `local_file` is the page's expected output path for per-page formats,
    /// or `None` when local-change detection does not apply. An unreadable
    /// local file conservatively triggers a refetch. When the stored hash
    /// was reset and the file is intact, the hash is re-derived in place and
    /// the page is skipped.
    pub fn decide(
        &mut self,
        page_id: i64,
        remote_updated_at: DateTime<Utc>,
        local_file: Option<&Path>,
    ) -> SyncDecision {
        let Some(record) = self.metadata.pages.get(&page_id) else {
            return SyncDecision::Refetch(RefetchReason::NewPage);
        };

        if remote_updated_at > record.remote_updated_at {
            return SyncDecision::Refetch(RefetchReason::RemoteUpdated);
        }

        let Some(local_file) = local_file else {
            return SyncDecision::Skip;
        };

        match fs::read(local_file) {
            Ok(bytes) => {
                let current = content_hash(&bytes);
                match &record.content_hash {
                    Some(stored) if *stored == current => SyncDecision::Skip,
                    Some(_) => SyncDecision::Refetch(RefetchReason::LocalModified),
                    None => {
                        // Hashes were reset: adopt the on-disk digest instead
                        // of re-fetching unchanged content.
                        if let Some(record) = self.metadata.pages.get_mut(&page_id) {
                            record.content_hash = Some(current);
                        }
                        SyncDecision::Skip
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if record.no_output {
                    // Nothing was ever written for this page; absence is
                    // the expected state, not a local change.
                    SyncDecision::Skip
                } else {
                    SyncDecision::Refetch(RefetchReason::LocalMissing)
                }
            }
            Err(e) => {
                warn!(
                    "Cannot read {} for change detection ({}); re-fetching",
                    local_file.display(),
                    e
                );
                SyncDecision::Refetch(RefetchReason::LocalModified)
            }
        }
    }

    /// Record a freshly fetched page. `hash` is the digest of the bytes
    /// actually written to disk, or `None` for formats without per-page
    /// files. Skipped pages keep their prior record unchanged.
    pub fn record_fetched(&mut self, page: &Page, hash: Option<String>) {
        self.metadata.pages.insert(
            page.id,
            PageRecord {
                page_id: page.id,
                path: page.path.clone(),
                title: page.title.clone(),
                remote_updated_at: page.updated_at,
                content_hash: hash,
                no_output: false,
            },
        );
    }

    /// Record a fetched page that produced no output file (empty content).
    /// The missing file is expected, so later runs skip the page until the
    /// server reports a newer timestamp.
    pub fn record_no_output(&mut self, page: &Page) {
        self.metadata.pages.insert(
            page.id,
            PageRecord {
                page_id: page.id,
                path: page.path.clone(),
                title: page.title.clone(),
                remote_updated_at: page.updated_at,
                content_hash: None,
                no_output: true,
            },
        );
    }

    /// Persist the metadata atomically: write a temp file next to the
    /// target, then rename over it. A failure leaves the previous valid
    /// file on disk untouched.
    pub fn save(&mut self) -> Result<()> {
        self.metadata.exported_at = Some(Utc::now());

        let json = serde_json::to_string_pretty(&self.metadata)?;
        let tmp = self.path.with_extension("json.tmp");

        fs::write(&tmp, &json).map_err(|e| {
            ExporterError::Metadata(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            // Best effort cleanup of the orphaned temp file
            let _ = fs::remove_file(&tmp);
            ExporterError::Metadata(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e
            ))
        })?;

        debug!(
            "Saved export metadata: {} pages -> {}",
            self.metadata.pages.len(),
            self.path.display()
        );
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn ts(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    fn page(id: i64, updated: DateTime<Utc>) -> Page {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "path": format!("docs/page-{}", id),
            "title": format!("Page {}", id),
            "content": "hello",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": updated.to_rfc3339(),
        }))
        .unwrap()
    }

    fn tracker_in(dir: &TempDir) -> ExportTracker {
        ExportTracker::load(&dir.path().join("meta.json"))
    }

    #[test]
    fn test_unknown_page_is_refetched() {
        let dir = TempDir::new().unwrap();
        let mut tracker = tracker_in(&dir);
        assert_eq!(
            tracker.decide(1, ts(1), None),
            SyncDecision::Refetch(RefetchReason::NewPage)
        );
    }

    #[test]
    fn test_unchanged_page_is_skipped() {
        let dir = TempDir::new().unwrap();
        let mut tracker = tracker_in(&dir);
        tracker.record_fetched(&page(1, ts(1)), None);
        assert_eq!(tracker.decide(1, ts(1), None), SyncDecision::Skip);
    }

    #[test]
    fn test_newer_remote_timestamp_triggers_refetch() {
        let dir = TempDir::new().unwrap();
        let mut tracker = tracker_in(&dir);
        tracker.record_fetched(&page(1, ts(1)), Some("abc".to_string()));
        assert_eq!(
            tracker.decide(1, ts(2), None),
            SyncDecision::Refetch(RefetchReason::RemoteUpdated)
        );
    }

    #[test]
    fn test_refetch_updates_stored_timestamp() {
        let dir = TempDir::new().unwrap();
        let mut tracker = tracker_in(&dir);
        tracker.record_fetched(&page(1, ts(1)), Some("abc".to_string()));
        assert_eq!(
            tracker.decide(1, ts(2), None),
            SyncDecision::Refetch(RefetchReason::RemoteUpdated)
        );

        // After the run re-fetches, the stored timestamp advances
        tracker.record_fetched(&page(1, ts(2)), Some("def".to_string()));
        assert_eq!(tracker.record(1).unwrap().remote_updated_at, ts(2));
        assert_eq!(tracker.decide(1, ts(2), None), SyncDecision::Skip);
    }

    #[test]
    fn test_local_edit_triggers_refetch() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("page.md");
        fs::write(&file, b"exported content").unwrap();

        let mut tracker = tracker_in(&dir);
        tracker.record_fetched(&page(1, ts(1)), Some(content_hash(b"exported content")));
        assert_eq!(tracker.decide(1, ts(1), Some(&file)), SyncDecision::Skip);

        // Simulate a local edit; server timestamp unchanged
        fs::write(&file, b"locally edited").unwrap();
        assert_eq!(
            tracker.decide(1, ts(1), Some(&file)),
            SyncDecision::Refetch(RefetchReason::LocalModified)
        );
    }

    #[test]
    fn test_empty_content_page_is_skipped_while_unchanged() {
        let dir = TempDir::new().unwrap();
        let mut tracker = tracker_in(&dir);
        let never_written = dir.path().join("empty-page.md");

        // The page fetched with no content produced no file on disk
        tracker.record_no_output(&page(1, ts(1)));

        // Unchanged timestamp + expectedly absent file: stable skip
        assert_eq!(
            tracker.decide(1, ts(1), Some(&never_written)),
            SyncDecision::Skip
        );
        assert_eq!(
            tracker.decide(1, ts(1), Some(&never_written)),
            SyncDecision::Skip
        );

        // A server-side update still wins
        assert_eq!(
            tracker.decide(1, ts(2), Some(&never_written)),
            SyncDecision::Refetch(RefetchReason::RemoteUpdated)
        );
    }

    #[test]
    fn test_missing_local_file_triggers_refetch() {
        let dir = TempDir::new().unwrap();
        let mut tracker = tracker_in(&dir);
        tracker.record_fetched(&page(1, ts(1)), Some("abc".to_string()));
        assert_eq!(
            tracker.decide(1, ts(1), Some(&dir.path().join("gone.md"))),
            SyncDecision::Refetch(RefetchReason::LocalMissing)
        );
    }

    #[test]
    fn test_reset_hashes_rederives_from_disk() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("page.md");
        fs::write(&file, b"stable content").unwrap();
        let expected = content_hash(b"stable content");

        let mut tracker = tracker_in(&dir);
        tracker.record_fetched(&page(1, ts(1)), Some(expected.clone()));

        tracker.reset_hashes();
        assert!(tracker.record(1).unwrap().content_hash.is_none());

        // Unchanged server timestamp + intact file: hash is recomputed,
        // matches, and the page is skipped.
        assert_eq!(tracker.decide(1, ts(1), Some(&file)), SyncDecision::Skip);
        assert_eq!(
            tracker.record(1).unwrap().content_hash.as_deref(),
            Some(expected.as_str())
        );
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("meta.json");

        let mut tracker = ExportTracker::load(&path);
        tracker.record_fetched(&page(1, ts(1)), Some("abc".to_string()));
        tracker.record_fetched(&page(2, ts(2)), None);
        tracker.save().unwrap();

        // No temp file left behind
        assert!(!path.with_extension("json.tmp").exists());

        let reloaded = ExportTracker::load(&path);
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.last_export().is_some());
        assert_eq!(
            reloaded.record(1).unwrap().content_hash.as_deref(),
            Some("abc")
        );
        assert_eq!(reloaded.record(2).unwrap().remote_updated_at, ts(2));
    }

    #[test]
    fn test_corrupt_metadata_loads_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("meta.json");
        fs::write(&path, b"{not valid json").unwrap();

        let tracker = ExportTracker::load(&path);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_content_hash_is_stable_hex() {
        let a = content_hash(b"hello");
        let b = content_hash(b"hello");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, content_hash(b"hello "));
    }

    proptest! {
        /// A page is skipped only when a record exists, the server
        /// timestamp has not advanced, and the hash situation is clean.
        #[test]
        fn prop_skip_requires_clean_state(
            stored_day in 1u32..28,
            remote_day in 1u32..28,
            has_record in any::<bool>(),
        ) {
            let dir = TempDir::new().unwrap();
            let mut tracker = tracker_in(&dir);
            if has_record {
                tracker.record_fetched(&page(1, ts(stored_day)), None);
            }

            let decision = tracker.decide(1, ts(remote_day), None);
            if !has_record {
                prop_assert_eq!(decision, SyncDecision::Refetch(RefetchReason::NewPage));
            } else if remote_day > stored_day {
                prop_assert_eq!(decision, SyncDecision::Refetch(RefetchReason::RemoteUpdated));
            } else {
                prop_assert_eq!(decision, SyncDecision::Skip);
            }
        }
    }
}
