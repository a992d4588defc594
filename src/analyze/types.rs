//! Analysis Result Types
//!
//! Shapes for the style-guide analysis produced by the model. The model's
//! JSON is tolerated loosely: compliance scores arrive as numbers or
//! strings, and unknown severities degrade to `Medium` instead of failing
//! the whole file.

use serde::{Deserialize, Deserializer, Serialize};

/// Analysis outcome for one exported file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileAnalysis {
    pub file_path: String,
    pub file_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<ContentAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileAnalysis {
    pub fn issue_count(&self) -> usize {
        self.analysis
            .as_ref()
            .map(|a| a.discrepancies.len())
            .unwrap_or(0)
    }
}

/// Parsed model response for a single piece of content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentAnalysis {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub discrepancies: Vec<Discrepancy>,
    #[serde(default, deserialize_with = "de_score")]
    pub compliance_score: Option<f64>,
    /// Raw model output kept when the response was not parseable JSON
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
}

impl ContentAnalysis {
    /// Fallback when the model response could not be parsed as JSON
    pub fn unparsed(raw_text: String) -> Self {
        Self {
            summary: "Analysis results could not be parsed as JSON".to_string(),
            discrepancies: Vec::new(),
            compliance_score: None,
            raw_text: Some(raw_text),
        }
    }
}

/// A single style-guide discrepancy reported by the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discrepancy {
    #[serde(default)]
    pub issue: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, deserialize_with = "de_severity")]
    pub severity: Severity,
    #[serde(default)]
    pub suggestion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

/// Accept compliance scores as numbers or numeric strings
fn de_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Accept severities case-insensitively, defaulting unknowns to medium
fn de_severity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Severity, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(match value.as_deref().map(str::to_lowercase).as_deref() {
        Some("low") => Severity::Low,
        Some("high") => Severity::High,
        _ => Severity::Medium,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_accepts_number_and_string() {
        let a: ContentAnalysis =
            serde_json::from_str(r#"{"summary": "ok", "compliance_score": 85}"#).unwrap();
        assert_eq!(a.compliance_score, Some(85.0));

        let b: ContentAnalysis =
            serde_json::from_str(r#"{"summary": "ok", "compliance_score": "92.5"}"#).unwrap();
        assert_eq!(b.compliance_score, Some(92.5));

        let c: ContentAnalysis =
            serde_json::from_str(r#"{"summary": "ok", "compliance_score": "N/A"}"#).unwrap();
        assert_eq!(c.compliance_score, None);
    }

    #[test]
    fn test_severity_is_tolerant() {
        let d: Discrepancy =
            serde_json::from_str(r#"{"issue": "x", "severity": "HIGH"}"#).unwrap();
        assert_eq!(d.severity, Severity::High);

        let d: Discrepancy =
            serde_json::from_str(r#"{"issue": "x", "severity": "critical"}"#).unwrap();
        assert_eq!(d.severity, Severity::Medium);

        let d: Discrepancy = serde_json::from_str(r#"{"issue": "x"}"#).unwrap();
        assert_eq!(d.severity, Severity::Medium);
    }

    #[test]
    fn test_unparsed_fallback() {
        let a = ContentAnalysis::unparsed("model rambled".to_string());
        assert!(a.discrepancies.is_empty());
        assert_eq!(a.raw_text.as_deref(), Some("model rambled"));
    }
}
