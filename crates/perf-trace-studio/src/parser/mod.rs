//! Event log parsing.
//!
//! This module handles:
//! - Reading raw JSON event logs from disk
//! - Detecting the event layout (tagged events or perf-data proto JSON)
//! - Decoding COMM / FORK / EXIT records into typed events

pub mod events;
pub mod perf_events;

// Re-export main types
pub use events::{CommEvent, EventKind, EventStats, ExitEvent, ForkEvent, ProfilerEvent};
pub use perf_events::{parse_events, parse_json_u64, parse_u64_value, read_events};
