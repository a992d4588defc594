//! Gemini Analysis Provider
//!
//! Content analysis via Google's `generateContent` API with secure key
//! handling. Rate limits (429) and transient server errors are retried
//! with exponential backoff before a file is given up on.

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::AnalysisProvider;
use super::prompt::build_analysis_prompt;
use super::types::ContentAnalysis;
use crate::types::{ExporterError, Result};

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

const RETRY_BASE_DELAY: Duration = Duration::from_secs(2);
const RETRY_MAX_DELAY: Duration = Duration::from_secs(60);
const RETRY_MAX_TIMES: usize = 5;

/// Gemini API provider with secure API key handling
pub struct GeminiAnalyzer {
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    api_base: String,
    model: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiAnalyzer")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl GeminiAnalyzer {
    pub fn new(api_key: &str, model: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| ExporterError::analysis(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: SecretString::from(api_key.to_string()),
            api_base: DEFAULT_API_BASE.to_string(),
            model: model.to_string(),
            client,
        })
    }

    /// One `generateContent` call, classified for the retry loop:
    /// 429 and 5xx are retryable, everything else fails immediately.
    async fn call_api(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.api_base, self.model);

        let payload = json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "temperature": 0.2,
                "topK": 40,
                "topP": 0.95,
                "maxOutputTokens": 8192,
            }
        });

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.expose_secret())])
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| ExporterError::analysis_retryable(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(ExporterError::analysis_retryable(
                "Rate limit exceeded (429)".to_string(),
            ));
        }
        if status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExporterError::analysis_retryable(format!(
                "Server error ({}): {}",
                status, body
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExporterError::analysis(format!(
                "Gemini API error ({}): {}",
                status, body
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ExporterError::analysis(format!("Failed to parse response: {}", e)))?;

        body.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ExporterError::analysis("Empty response from Gemini API".to_string()))
    }
}

#[async_trait]
impl AnalysisProvider for GeminiAnalyzer {
    async fn analyze(
        &self,
        content: &str,
        style_guide: &str,
        ai_guide: Option<&str>,
    ) -> Result<ContentAnalysis> {
        debug!("Sending {} chars of content for analysis", content.len());
        let prompt = build_analysis_prompt(content, style_guide, ai_guide);

        let text = (|| self.call_api(&prompt))
            .retry(
                ExponentialBuilder::default()
                    .with_min_delay(RETRY_BASE_DELAY)
                    .with_max_delay(RETRY_MAX_DELAY)
                    .with_max_times(RETRY_MAX_TIMES),
            )
            .when(ExporterError::is_retryable)
            .notify(|err, dur| {
                warn!("Analysis call failed ({}); retrying in {:?}", err, dur);
            })
            .await?;

        // The model sometimes wraps its JSON in markdown fences or prose
        let json_text = extract_json_block(&text);
        match serde_json::from_str::<ContentAnalysis>(json_text) {
            Ok(analysis) => Ok(analysis),
            Err(e) => {
                debug!("Could not parse analysis JSON ({}); keeping raw text", e);
                Ok(ContentAnalysis::unparsed(text))
            }
        }
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// Pull the JSON payload out of a model response: prefer a ```json fence,
/// fall back to any fence, then to the raw text
fn extract_json_block(text: &str) -> &str {
    if let Some(start) = text.find("```json")
        && let Some(rest) = text.get(start + 7..)
        && let Some(end) = rest.find("```")
    {
        return rest[..end].trim();
    }
    if let Some(start) = text.find("```")
        && let Some(rest) = text.get(start + 3..)
        && let Some(end) = rest.find("```")
    {
        return rest[..end].trim();
    }
    text.trim()
}

/// List available Gemini models (filtered to the gemini family)
pub async fn list_models(api_key: &str) -> Result<Vec<String>> {
    let client = reqwest::Client::new();
    let url = format!("{}/models", DEFAULT_API_BASE);

    let response = client
        .get(&url)
        .query(&[("key", api_key)])
        .send()
        .await
        .map_err(|e| ExporterError::analysis(format!("Request failed: {}", e)))?;

    if !response.status().is_success() {
        return Err(ExporterError::analysis(format!(
            "Models API error: {}",
            response.status()
        )));
    }

    let body: ModelsResponse = response
        .json()
        .await
        .map_err(|e| ExporterError::analysis(format!("Failed to parse response: {}", e)))?;

    let models: Vec<String> = body
        .models
        .into_iter()
        .map(|m| m.name)
        .filter(|n| n.to_lowercase().contains("gemini"))
        .collect();
    info!("Found {} Gemini models", models.len());
    Ok(models)
}

// Response types

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
struct ModelInfo {
    name: String,
}
