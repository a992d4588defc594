//! Shared types: page data model and the unified error type.

pub mod error;
pub mod page;

pub use error::{ExporterError, Result};
pub use page::{Page, PageListing, PageTag};
