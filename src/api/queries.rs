//! GraphQL Queries and Response Envelopes
//!
//! Query strings for the Wiki.js GraphQL API plus the serde types that
//! unwrap its nested `data.pages.*` response envelopes.

use serde::Deserialize;

use crate::types::{Page, PageListing};

/// List all pages (metadata only)
pub const PAGE_LIST_QUERY: &str = r#"
query {
  pages {
    list(orderBy: TITLE) {
      id
      path
      title
      description
      contentType
      isPublished
      isPrivate
      createdAt
      updatedAt
      tags
    }
  }
}
"#;

/// Fetch a single page with content by id
pub const PAGE_SINGLE_QUERY: &str = r#"
query ($id: Int!) {
  pages {
    single(id: $id) {
      id
      path
      title
      description
      content
      render
      createdAt
      updatedAt
      authorName
      authorEmail
      isPublished
      tags {
        tag
      }
    }
  }
}
"#;

/// Top-level GraphQL response: either data or errors (or both)
#[derive(Debug, Deserialize)]
pub struct GraphqlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphqlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct PagesData<T> {
    pub pages: T,
}

#[derive(Debug, Deserialize)]
pub struct ListPayload {
    pub list: Vec<PageListing>,
}

#[derive(Debug, Deserialize)]
pub struct SinglePayload {
    pub single: Option<Page>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_response_unwraps() {
        let body = r#"{
            "data": {
                "pages": {
                    "list": [
                        {
                            "id": 1,
                            "path": "home",
                            "title": "Home",
                            "createdAt": "2024-01-01T00:00:00Z",
                            "updatedAt": "2024-01-01T00:00:00Z"
                        }
                    ]
                }
            }
        }"#;
        let resp: GraphqlResponse<PagesData<ListPayload>> = serde_json::from_str(body).unwrap();
        assert!(resp.errors.is_empty());
        assert_eq!(resp.data.unwrap().pages.list.len(), 1);
    }

    #[test]
    fn test_error_response_unwraps() {
        let body = r#"{"data": null, "errors": [{"message": "Forbidden"}]}"#;
        let resp: GraphqlResponse<PagesData<ListPayload>> = serde_json::from_str(body).unwrap();
        assert!(resp.data.is_none());
        assert_eq!(resp.errors[0].message, "Forbidden");
    }
}
