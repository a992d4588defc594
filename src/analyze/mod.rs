//! Style-Guide Content Analysis
//!
//! Runs exported wiki files through an external content-analysis model
//! and collects per-file discrepancy reports. Files are processed one at
//! a time with a jittered delay between calls; results are re-saved after
//! every file so an interrupted run keeps what it already analyzed.

pub mod gemini;
pub mod prompt;
pub mod report;
pub mod types;

use async_trait::async_trait;
use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::types::{ExporterError, Result};

pub use gemini::{DEFAULT_MODEL, GeminiAnalyzer, list_models};
pub use types::{ContentAnalysis, Discrepancy, FileAnalysis, Severity};

/// Seam for content-analysis backends
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Analyze one piece of content against a style guide and optional
    /// AI-specific guidance
    async fn analyze(
        &self,
        content: &str,
        style_guide: &str,
        ai_guide: Option<&str>,
    ) -> Result<ContentAnalysis>;

    fn name(&self) -> &str;
}

/// Find exported content files (`.md` and `.html`) under a directory,
/// sorted for deterministic processing order
pub fn find_content_files(content_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for ext in ["md", "html"] {
        let pattern = format!("{}/**/*.{}", content_dir.display(), ext);
        let matches = glob::glob(&pattern)
            .map_err(|e| ExporterError::Config(format!("Bad glob pattern '{}': {}", pattern, e)))?;
        for entry in matches {
            match entry {
                Ok(path) => files.push(path),
                Err(e) => warn!("Skipping unreadable path during scan: {}", e),
            }
        }
    }
    files.sort();
    Ok(files)
}

/// Analyze every content file in a directory.
///
/// Per-file failures are recorded in the result set rather than aborting
/// the run. Intermediate results are written to `output_file` after each
/// file.
pub async fn analyze_directory(
    provider: &dyn AnalysisProvider,
    content_dir: &Path,
    style_guide: &str,
    ai_guide: Option<&str>,
    output_file: &Path,
    delay: Duration,
) -> Result<Vec<FileAnalysis>> {
    let files = find_content_files(content_dir)?;
    if files.is_empty() {
        warn!("No content files found in {}", content_dir.display());
        return Ok(Vec::new());
    }

    info!(
        "Analyzing {} files from {} with {}",
        files.len(),
        content_dir.display(),
        provider.name()
    );

    let mut results = Vec::with_capacity(files.len());
    let total = files.len();

    for (i, file) in files.iter().enumerate() {
        let rel_path = file
            .strip_prefix(content_dir)
            .unwrap_or(file)
            .display()
            .to_string();
        info!("[{}/{}] Analyzing {}", i + 1, total, rel_path);

        let result = match fs::read_to_string(file) {
            Ok(content) => match provider.analyze(&content, style_guide, ai_guide).await {
                Ok(analysis) => FileAnalysis {
                    file_path: rel_path,
                    file_size: content.len(),
                    analysis: Some(analysis),
                    error: None,
                },
                Err(e) => {
                    warn!("Analysis failed for {}: {}", file.display(), e);
                    FileAnalysis {
                        file_path: rel_path,
                        file_size: content.len(),
                        analysis: None,
                        error: Some(e.to_string()),
                    }
                }
            },
            Err(e) => {
                warn!("Cannot read {}: {}", file.display(), e);
                FileAnalysis {
                    file_path: rel_path,
                    file_size: 0,
                    analysis: None,
                    error: Some(e.to_string()),
                }
            }
        };
        results.push(result);

        // Keep partial progress on disk in case the run is interrupted
        save_results(&results, output_file)?;

        if i + 1 < total && !delay.is_zero() {
            let sleep = jittered(delay);
            debug!("Waiting {:?} before next file", sleep);
            tokio::time::sleep(sleep).await;
        }
    }

    Ok(results)
}

/// Save analysis results as pretty-printed JSON
pub fn save_results(results: &[FileAnalysis], output_file: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(results)?;
    fs::write(output_file, json)?;
    Ok(())
}

/// Load previously saved analysis results
pub fn load_results(path: &Path) -> Result<Vec<FileAnalysis>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Apply a 0.5x-1.5x random factor to the base delay to spread calls out
/// and help avoid rate limiting
fn jittered(base: Duration) -> Duration {
    let factor: f64 = rand::rng().random_range(0.5..1.5);
    base.mul_f64(factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_content_files_filters_extensions() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("a.md"), "x").unwrap();
        fs::write(dir.path().join("sub/b.html"), "x").unwrap();
        fs::write(dir.path().join("c.txt"), "x").unwrap();

        let files = find_content_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| {
            let ext = f.extension().unwrap();
            ext == "md" || ext == "html"
        }));
    }

    #[test]
    fn test_results_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.json");
        let results = vec![FileAnalysis {
            file_path: "a.md".to_string(),
            file_size: 10,
            analysis: None,
            error: Some("boom".to_string()),
        }];

        save_results(&results, &path).unwrap();
        let loaded = load_results(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_jitter_stays_in_range() {
        let base = Duration::from_secs(2);
        for _ in 0..100 {
            let d = jittered(base);
            assert!(d >= Duration::from_secs(1));
            assert!(d < Duration::from_secs(3));
        }
    }
}
