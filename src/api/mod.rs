//! Wiki.js GraphQL API client and query definitions.

pub mod client;
pub mod queries;

pub use client::WikiJsClient;
