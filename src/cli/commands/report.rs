//! Report Command
//!
//! Render an HTML report from previously saved analysis results.

use std::path::Path;

use crate::analyze;
use crate::analyze::report::{ReportSummary, write_report};
use crate::cli::Output;
use crate::types::{ExporterError, Result};

pub fn run(input: &Path, output: &Path) -> Result<()> {
    let out = Output::new();

    if !input.exists() {
        return Err(ExporterError::Config(format!(
            "Analysis results not found at {}. Run 'analyze' first.",
            input.display()
        )));
    }

    let results = analyze::load_results(input)?;
    if results.is_empty() {
        out.warning("No analysis results to report on.");
        return Ok(());
    }

    write_report(output, &results)?;

    let summary = ReportSummary::from_results(&results);
    out.success(&format!("HTML report saved to {}", output.display()));
    out.info(&format!(
        "{} files, {} with issues, {} issues total",
        summary.total_files, summary.files_with_issues, summary.total_issues
    ));
    Ok(())
}
