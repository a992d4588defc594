//! Analyze Command
//!
//! Run exported content through Gemini and check it against a style guide.

use std::path::PathBuf;
use std::time::Duration;

use crate::analyze::{self, GeminiAnalyzer, report};
use crate::cli::{Output, read_optional_file, resolve_gemini_key};
use crate::config::Config;
use crate::export::output_dir_for;
use crate::types::Result;

use super::init::sample_style_guide;

#[derive(Debug)]
pub struct AnalyzeArgs {
    pub api_key: Option<String>,
    /// Directory of exported files; defaults to the configured export output
    pub input: Option<PathBuf>,
    pub style_guide: Option<PathBuf>,
    pub ai_guide: Option<PathBuf>,
    pub output: PathBuf,
    pub report: PathBuf,
}

/// Print the Gemini models available to the configured API key
pub async fn list_models(config: &Config, api_key: Option<String>) -> Result<()> {
    let out = Output::new();
    let api_key = resolve_gemini_key(api_key, config)?;

    let models = analyze::list_models(&api_key).await?;
    if models.is_empty() {
        out.warning("No Gemini models available to this API key.");
        return Ok(());
    }

    out.section("Available Gemini models");
    for model in models {
        println!("  {}", model);
    }
    Ok(())
}

pub async fn run(config: &Config, args: AnalyzeArgs) -> Result<()> {
    let out = Output::new();

    let api_key = resolve_gemini_key(args.api_key, config)?;
    let content_dir = args
        .input
        .unwrap_or_else(|| output_dir_for(&config.export.default_output));

    let style_guide_file = args
        .style_guide
        .unwrap_or_else(|| config.gemini.style_guide_file.clone());
    let style_guide = match read_optional_file(&style_guide_file)? {
        Some(content) => {
            out.info(&format!(
                "Using style guide from {}",
                style_guide_file.display()
            ));
            content
        }
        None => {
            out.warning(&format!(
                "Style guide not found at {}; using the built-in sample guide",
                style_guide_file.display()
            ));
            sample_style_guide().to_string()
        }
    };

    let ai_guide_file = args
        .ai_guide
        .unwrap_or_else(|| config.gemini.ai_guide_file.clone());
    let ai_guide = read_optional_file(&ai_guide_file)?;
    match &ai_guide {
        Some(_) => out.info(&format!(
            "Using AI instructions from {}",
            ai_guide_file.display()
        )),
        None => out.info(&format!(
            "No AI instructions at {}; using only the style guide",
            ai_guide_file.display()
        )),
    }

    let analyzer = GeminiAnalyzer::new(&api_key, &config.gemini.model)?;
    let results = analyze::analyze_directory(
        &analyzer,
        &content_dir,
        &style_guide,
        ai_guide.as_deref(),
        &args.output,
        Duration::from_secs_f64(config.gemini.delay_secs.max(0.0)),
    )
    .await?;

    if results.is_empty() {
        out.warning("Nothing to analyze.");
        return Ok(());
    }

    let summary = report::ReportSummary::from_results(&results);
    out.section("Analysis complete");
    out.success(&format!("Results saved to {}", args.output.display()));
    out.info(&format!(
        "{} files analyzed, {} with issues, {} issues total",
        summary.total_files, summary.files_with_issues, summary.total_issues
    ));
    if let Some(avg) = summary.avg_compliance {
        out.info(&format!("Average compliance score: {:.1}/100", avg));
    }

    report::write_report(&args.report, &results)?;
    out.success(&format!("HTML report saved to {}", args.report.display()));
    Ok(())
}
