//! Export pipeline: incremental state tracking, format writers, and the
//! run orchestration that connects them to the API client.

pub mod runner;
pub mod state;
pub mod writer;

pub use runner::{ExportOptions, ExportOutcome, run};
pub use state::{
    ExportMetadata, ExportTracker, METADATA_VERSION, PageRecord, RefetchReason, SyncDecision,
    content_hash,
};
pub use writer::output_dir_for;
