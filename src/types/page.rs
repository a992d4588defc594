//! Wiki.js Page Data Model
//!
//! Wire types matching the shapes returned by the Wiki.js GraphQL API.
//! `PageListing` comes from the `pages.list` query (metadata only),
//! `Page` from `pages.single` (full content). Field names follow the
//! API's camelCase convention via serde renames.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Metadata-only page entry from the `pages.list` query
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageListing {
    pub id: i64,
    pub path: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub is_private: bool,
    #[serde(deserialize_with = "de_lenient_time")]
    pub created_at: DateTime<Utc>,
    /// Drives the incremental refetch decision; an unparseable value is
    /// treated as "changed" rather than failing the whole listing
    #[serde(deserialize_with = "de_lenient_time")]
    pub updated_at: DateTime<Utc>,
    /// Tags are plain strings on list items (objects on full pages)
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Parse an RFC 3339 timestamp, falling back to the maximum representable
/// time. The fallback compares strictly newer than any stored record, so
/// a page with a broken timestamp is refetched instead of aborting the
/// listing parse.
fn de_lenient_time<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    match DateTime::parse_from_rfc3339(&raw) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(e) => {
            warn!("Unparseable timestamp '{}' ({}); treating as changed", raw, e);
            Ok(DateTime::<Utc>::MAX_UTC)
        }
    }
}

/// Full page from the `pages.single` query, including content
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: i64,
    pub path: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Source content (markdown or HTML depending on the page editor)
    #[serde(default)]
    pub content: Option<String>,
    /// Server-rendered HTML
    #[serde(default)]
    pub render: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub author_email: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub tags: Vec<PageTag>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageTag {
    pub tag: String,
}

impl Page {
    /// Tags flattened to plain strings
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.tag.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_deserializes_camel_case() {
        let json = r#"{
            "id": 1,
            "path": "docs/setup",
            "title": "Setup",
            "contentType": "markdown",
            "isPublished": true,
            "isPrivate": false,
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-02T00:00:00.000Z",
            "tags": ["guide"]
        }"#;
        let listing: PageListing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.id, 1);
        assert_eq!(listing.path, "docs/setup");
        assert!(listing.is_published);
        assert_eq!(listing.tags, vec!["guide"]);
        assert!(listing.updated_at > listing.created_at);
    }

    #[test]
    fn test_listing_tolerates_broken_timestamp() {
        let json = r#"{
            "id": 4,
            "path": "docs/odd",
            "title": "Odd",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "not-a-date",
            "tags": []
        }"#;
        let listing: PageListing = serde_json::from_str(json).unwrap();

        // The fallback is newer than any real stored timestamp, so the
        // page is refetched rather than the listing parse failing.
        assert_eq!(listing.updated_at, DateTime::<Utc>::MAX_UTC);
        assert!(listing.updated_at > Utc::now());
    }

    #[test]
    fn test_page_optional_fields_default() {
        let json = r#"{
            "id": 2,
            "path": "home",
            "title": "Home",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }"#;
        let page: Page = serde_json::from_str(json).unwrap();
        assert!(page.content.is_none());
        assert!(page.render.is_none());
        assert!(page.tags.is_empty());
    }

    #[test]
    fn test_tag_names() {
        let page: Page = serde_json::from_str(
            r#"{
                "id": 3,
                "path": "p",
                "title": "P",
                "createdAt": "2024-01-01T00:00:00Z",
                "updatedAt": "2024-01-01T00:00:00Z",
                "tags": [{"tag": "ble"}, {"tag": "pcb"}]
            }"#,
        )
        .unwrap();
        assert_eq!(page.tag_names(), vec!["ble", "pcb"]);
    }
}
