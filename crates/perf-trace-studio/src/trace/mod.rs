//! Chrome trace document generation.
//!
//! This module turns a laid-out timeline into trace-viewer events
//! and renders human-readable summaries of a conversion run.

pub mod builder;
pub mod schema;
pub mod summary;

// Re-export main types
pub use builder::{build_document, render_timeline, TraceDocument};
pub use schema::{TraceEvent, TraceEventArgs, TraceFile, TraceMetadata, TraceObject};
pub use summary::{render_terminal_summary, TraceSummary};
