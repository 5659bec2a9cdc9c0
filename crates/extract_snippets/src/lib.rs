// crates/extract_snippets/src/lib.rs

//! Drives a whole extraction run: every configured source is resolved, parsed
//! and written on its own, and the outcome of each is collected into an
//! [`ExtractionReport`].

pub mod config;
pub mod index;
pub mod orchestrator;
pub mod summary;

pub use config::AppConfig;
pub use index::{build_index, write_index, IndexError};
pub use orchestrator::{
    extract_all, process_entry, ExtractionReport, SourceError, SourceFailure, SourceSuccess,
};
pub use summary::render_summary;
