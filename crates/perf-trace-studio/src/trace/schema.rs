//! Output JSON schema for the Chrome trace viewer.
//!
//! Events use the "complete" phase (`"ph": "X"`): a start timestamp plus a
//! duration, both in microseconds. The document is written either as a bare
//! array of events or wrapped in the JSON object format with run metadata.

use serde::{Deserialize, Serialize};

/// Phase marker for complete-interval events
pub const COMPLETE_PHASE: &str = "X";

/// Unit the trace viewer uses to display timestamps
pub const DISPLAY_TIME_UNIT: &str = "ms";

/// A single complete-interval trace event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Always `"X"`
    pub ph: String,

    /// Command name
    pub name: String,

    /// Row or command-group id, depending on render mode
    pub pid: u64,

    /// Track within the row
    pub tid: u64,

    /// Start time in microseconds
    pub ts: u64,

    /// Duration in microseconds
    pub dur: u64,

    /// Identity of the process before row remapping
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<TraceEventArgs>,
}

/// Original process identity attached to each event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEventArgs {
    pub pid: u32,
    pub tid: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ppid: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ptid: Option<u32>,
}

/// Run metadata stored under `otherData`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceMetadata {
    pub generator: String,
    pub version: String,
    pub render_mode: String,
    pub generated_at: String,
}

/// JSON object format: events plus metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceObject {
    #[serde(rename = "traceEvents")]
    pub trace_events: Vec<TraceEvent>,

    #[serde(rename = "displayTimeUnit")]
    pub display_time_unit: String,

    #[serde(rename = "otherData")]
    pub other_data: TraceMetadata,
}

/// Top-level document as written to disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TraceFile {
    /// JSON array format
    Events(Vec<TraceEvent>),
    /// JSON object format
    Object(TraceObject),
}

impl TraceFile {
    pub fn events(&self) -> &[TraceEvent] {
        match self {
            Self::Events(events) => events,
            Self::Object(object) => &object.trace_events,
        }
    }

    pub fn metadata(&self) -> Option<&TraceMetadata> {
        match self {
            Self::Events(_) => None,
            Self::Object(object) => Some(&object.other_data),
        }
    }
}
