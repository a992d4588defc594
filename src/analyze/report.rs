//! HTML Report Rendering
//!
//! Turns a set of per-file analysis results into a standalone HTML report:
//! a summary block with aggregate statistics, then one section per file
//! with issues, sorted most-issues-first.

use std::fs;
use std::path::Path;

use super::types::{FileAnalysis, Severity};
use crate::types::Result;

/// Aggregate statistics across all analyzed files
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReportSummary {
    pub total_files: usize,
    pub files_with_issues: usize,
    pub total_issues: usize,
    pub high_issues: usize,
    pub medium_issues: usize,
    pub low_issues: usize,
    pub failed_files: usize,
    /// Mean compliance score over files that reported one
    pub avg_compliance: Option<f64>,
}

impl ReportSummary {
    pub fn from_results(results: &[FileAnalysis]) -> Self {
        let mut summary = Self {
            total_files: results.len(),
            ..Default::default()
        };

        let mut scores = Vec::new();
        for result in results {
            let Some(analysis) = &result.analysis else {
                summary.failed_files += 1;
                continue;
            };

            if !analysis.discrepancies.is_empty() {
                summary.files_with_issues += 1;
            }
            summary.total_issues += analysis.discrepancies.len();
            for issue in &analysis.discrepancies {
                match issue.severity {
                    Severity::High => summary.high_issues += 1,
                    Severity::Medium => summary.medium_issues += 1,
                    Severity::Low => summary.low_issues += 1,
                }
            }
            if let Some(score) = analysis.compliance_score {
                scores.push(score);
            }
        }

        if !scores.is_empty() {
            summary.avg_compliance = Some(scores.iter().sum::<f64>() / scores.len() as f64);
        }
        summary
    }
}

/// Render the full HTML report
pub fn render_report(results: &[FileAnalysis]) -> String {
    let summary = ReportSummary::from_results(results);
    let avg = summary.avg_compliance.unwrap_or(0.0);
    let issue_pct = if summary.total_files > 0 {
        summary.files_with_issues as f64 / summary.total_files as f64 * 100.0
    } else {
        0.0
    };

    let mut html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Wiki Content Analysis Report</title>
    <style>
        body {{ font-family: Arial, sans-serif; line-height: 1.6; max-width: 1200px; margin: 0 auto; padding: 20px; }}
        h1, h2, h3 {{ margin-top: 1.5em; }}
        .summary {{ background-color: #f8f9fa; padding: 15px; border-radius: 5px; margin-bottom: 20px; }}
        .file {{ border: 1px solid #ddd; padding: 15px; margin-bottom: 20px; border-radius: 5px; }}
        .file-header {{ display: flex; justify-content: space-between; align-items: center; }}
        .issue {{ background-color: #fff8e1; padding: 10px; margin: 10px 0; border-left: 4px solid #ffc107; }}
        .issue.high {{ border-left: 4px solid #f44336; background-color: #ffebee; }}
        .issue.medium {{ border-left: 4px solid #ff9800; background-color: #fff3e0; }}
        .issue.low {{ border-left: 4px solid #4caf50; background-color: #e8f5e9; }}
        .issue-header {{ display: flex; justify-content: space-between; }}
        .severity {{ font-size: 0.8em; padding: 2px 6px; border-radius: 3px; color: white; }}
        .severity.high {{ background-color: #f44336; }}
        .severity.medium {{ background-color: #ff9800; }}
        .severity.low {{ background-color: #4caf50; }}
        .suggestion {{ background-color: #e3f2fd; padding: 10px; margin-top: 5px; }}
        .progress-bar {{ height: 15px; background-color: #e0e0e0; border-radius: 10px; margin: 10px 0; }}
        .progress {{ height: 100%; border-radius: 10px; background-color: #4caf50; }}
    </style>
</head>
<body>
    <h1>Wiki Content Analysis Report</h1>

    <div class="summary">
        <h2>Summary</h2>
        <p><strong>Files Analyzed:</strong> {total}</p>
        <p><strong>Files with Issues:</strong> {with_issues} ({issue_pct:.1}% of total)</p>
        <p><strong>Total Issues Found:</strong> {issues} (high: {high}, medium: {medium}, low: {low})</p>
        <p><strong>Failed Analyses:</strong> {failed}</p>
        <p><strong>Average Compliance Score:</strong> {avg:.1}/100</p>
        <div class="progress-bar">
            <div class="progress" style="width: {avg:.1}%;"></div>
        </div>
    </div>

    <h2>Files with Issues</h2>
"#,
        total = summary.total_files,
        with_issues = summary.files_with_issues,
        issue_pct = issue_pct,
        issues = summary.total_issues,
        high = summary.high_issues,
        medium = summary.medium_issues,
        low = summary.low_issues,
        failed = summary.failed_files,
        avg = avg,
    );

    // Most problematic files first
    let mut sorted: Vec<&FileAnalysis> = results.iter().collect();
    sorted.sort_by(|a, b| b.issue_count().cmp(&a.issue_count()));

    for result in sorted {
        let Some(analysis) = &result.analysis else {
            html.push_str(&format!(
                r#"
    <div class="file">
        <div class="file-header">
            <h3>{}</h3>
            <span>Error analyzing file</span>
        </div>
        <p>{}</p>
    </div>
"#,
                escape(&result.file_path),
                escape(result.error.as_deref().unwrap_or("Unknown error")),
            ));
            continue;
        };

        if analysis.discrepancies.is_empty() {
            continue;
        }

        let score = analysis.compliance_score;
        let score_label = score
            .map(|s| format!("{:.0}/100", s))
            .unwrap_or_else(|| "N/A".to_string());

        html.push_str(&format!(
            r#"
    <div class="file">
        <div class="file-header">
            <h3>{path}</h3>
            <span>Compliance Score: {label}</span>
        </div>
        <div class="progress-bar">
            <div class="progress" style="width: {width:.0}%;"></div>
        </div>
        <p><strong>Summary:</strong> {summary}</p>

        <h4>Discrepancies ({count})</h4>
"#,
            path = escape(&result.file_path),
            label = score_label,
            width = score.unwrap_or(0.0),
            summary = escape(&analysis.summary),
            count = analysis.discrepancies.len(),
        ));

        for issue in &analysis.discrepancies {
            html.push_str(&format!(
                r#"
        <div class="issue {sev}">
            <div class="issue-header">
                <strong>{issue}</strong>
                <span class="severity {sev}">{sev_upper}</span>
            </div>
            <p><strong>Location:</strong> {location}</p>
            <div class="suggestion">
                <strong>Suggestion:</strong> {suggestion}
            </div>
        </div>
"#,
                sev = issue.severity,
                sev_upper = issue.severity.to_string().to_uppercase(),
                issue = escape(&issue.issue),
                location = escape(&issue.location),
                suggestion = escape(&issue.suggestion),
            ));
        }

        html.push_str("\n    </div>\n");
    }

    html.push_str("\n</body>\n</html>\n");
    html
}

/// Render and write the report to disk
pub fn write_report(path: &Path, results: &[FileAnalysis]) -> Result<()> {
    fs::write(path, render_report(results))?;
    Ok(())
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::types::{ContentAnalysis, Discrepancy};

    fn result_with(issues: usize, score: Option<f64>) -> FileAnalysis {
        FileAnalysis {
            file_path: "docs/page.md".to_string(),
            file_size: 100,
            analysis: Some(ContentAnalysis {
                summary: "summary".to_string(),
                discrepancies: (0..issues)
                    .map(|i| Discrepancy {
                        issue: format!("issue {}", i),
                        location: "top".to_string(),
                        severity: if i == 0 { Severity::High } else { Severity::Low },
                        suggestion: "fix it".to_string(),
                    })
                    .collect(),
                compliance_score: score,
                raw_text: None,
            }),
            error: None,
        }
    }

    #[test]
    fn test_summary_aggregation() {
        let results = vec![
            result_with(2, Some(80.0)),
            result_with(0, Some(100.0)),
            FileAnalysis {
                file_path: "broken.md".to_string(),
                file_size: 0,
                analysis: None,
                error: Some("timeout".to_string()),
            },
        ];

        let summary = ReportSummary::from_results(&results);
        assert_eq!(summary.total_files, 3);
        assert_eq!(summary.files_with_issues, 1);
        assert_eq!(summary.total_issues, 2);
        assert_eq!(summary.high_issues, 1);
        assert_eq!(summary.low_issues, 1);
        assert_eq!(summary.failed_files, 1);
        assert_eq!(summary.avg_compliance, Some(90.0));
    }

    #[test]
    fn test_render_includes_issues_and_errors() {
        let results = vec![
            result_with(1, Some(70.0)),
            FileAnalysis {
                file_path: "broken.md".to_string(),
                file_size: 0,
                analysis: None,
                error: Some("timeout".to_string()),
            },
        ];

        let html = render_report(&results);
        assert!(html.contains("issue 0"));
        assert!(html.contains("Error analyzing file"));
        assert!(html.contains("timeout"));
        assert!(html.contains("Average Compliance Score"));
    }

    #[test]
    fn test_render_escapes_html() {
        let mut result = result_with(1, None);
        result.analysis.as_mut().unwrap().discrepancies[0].issue =
            "<script>alert(1)</script>".to_string();

        let html = render_report(&[result]);
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
