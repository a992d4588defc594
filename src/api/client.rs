//! Wiki.js GraphQL Client
//!
//! Thin client over the Wiki.js GraphQL endpoint with secure token
//! handling. Page fetches are strictly sequential; the caller controls
//! pacing between requests.

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use super::queries::{
    GraphqlResponse, ListPayload, PAGE_LIST_QUERY, PAGE_SINGLE_QUERY, PagesData, SinglePayload,
};
use crate::types::{ExporterError, Page, PageListing, Result};

/// Client for the Wiki.js GraphQL API with secure API token handling
pub struct WikiJsClient {
    /// API token stored securely - never exposed in logs or debug output
    token: SecretString,
    endpoint: Url,
    client: reqwest::Client,
}

impl std::fmt::Debug for WikiJsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WikiJsClient")
            .field("token", &"[REDACTED]")
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

impl WikiJsClient {
    pub fn new(host: &str, token: &str, timeout_secs: u64) -> Result<Self> {
        let mut base = Url::parse(host)
            .map_err(|e| ExporterError::Config(format!("Invalid Wiki.js URL '{}': {}", host, e)))?;
        // A sub-path host needs a trailing slash, or join() would replace
        // the last path segment instead of appending to it
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        let endpoint = base
            .join("graphql")
            .map_err(|e| ExporterError::Config(format!("Invalid Wiki.js URL '{}': {}", host, e)))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ExporterError::Api(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            token: SecretString::from(token.to_string()),
            endpoint,
            client,
        })
    }

    /// Execute a GraphQL query and unwrap the `data` envelope.
    /// GraphQL-level errors in a 200 response are surfaced as `Api` errors.
    async fn graphql<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T> {
        let body = json!({ "query": query, "variables": variables });

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(
                "Authorization",
                format!("Bearer {}", self.token.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ExporterError::Api(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ExporterError::Api(format!(
                "GraphQL endpoint returned {}: {}",
                status, text
            )));
        }

        let parsed: GraphqlResponse<T> = response
            .json()
            .await
            .map_err(|e| ExporterError::Api(format!("Failed to parse response: {}", e)))?;

        if !parsed.errors.is_empty() {
            let messages: Vec<&str> = parsed.errors.iter().map(|e| e.message.as_str()).collect();
            return Err(ExporterError::Api(format!(
                "GraphQL errors: {}",
                messages.join("; ")
            )));
        }

        parsed
            .data
            .ok_or_else(|| ExporterError::Api("Response contained no data".to_string()))
    }

    /// Test connection and authentication against the GraphQL API
    pub async fn test_connection(&self) -> Result<bool> {
        match self
            .graphql::<PagesData<ListPayload>>(PAGE_LIST_QUERY, Value::Null)
            .await
        {
            Ok(data) => {
                info!("Connected: server reports {} pages", data.pages.list.len());
                Ok(true)
            }
            Err(e) => {
                warn!("Connection test failed: {}", e);
                Ok(false)
            }
        }
    }

    /// Fetch the full page list (metadata only, no content)
    pub async fn fetch_pages(&self) -> Result<Vec<PageListing>> {
        debug!("Fetching page list from {}", self.endpoint);
        let data: PagesData<ListPayload> = self.graphql(PAGE_LIST_QUERY, Value::Null).await?;
        info!("Fetched {} page listings", data.pages.list.len());
        Ok(data.pages.list)
    }

    /// Fetch a single page with its content
    pub async fn fetch_page(&self, id: i64) -> Result<Page> {
        debug!("Fetching page {}", id);
        let data: PagesData<SinglePayload> = self
            .graphql(PAGE_SINGLE_QUERY, json!({ "id": id }))
            .await?;
        data.pages
            .single
            .ok_or_else(|| ExporterError::Api(format!("Page {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_derivation() {
        let client = WikiJsClient::new("https://wiki.example.com", "token", 60).unwrap();
        assert_eq!(
            client.endpoint.as_str(),
            "https://wiki.example.com/graphql"
        );
    }

    #[test]
    fn test_endpoint_keeps_sub_path_host() {
        let client = WikiJsClient::new("https://example.com/wiki", "token", 60).unwrap();
        assert_eq!(
            client.endpoint.as_str(),
            "https://example.com/wiki/graphql"
        );

        let client = WikiJsClient::new("https://example.com/wiki/", "token", 60).unwrap();
        assert_eq!(
            client.endpoint.as_str(),
            "https://example.com/wiki/graphql"
        );
    }

    #[test]
    fn test_invalid_host_rejected() {
        assert!(WikiJsClient::new("not a url", "token", 60).is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = WikiJsClient::new("https://wiki.example.com", "sekrit", 60).unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("sekrit"));
        assert!(debug.contains("[REDACTED]"));
    }
}
