//! Build trace documents from a laid-out timeline.
//!
//! Time conversion: `ts = start_ns / 1000` and
//! `dur = end_ns / 1000 - start_ns / 1000`. Both values derive from the
//! truncated microsecond bounds, so `ts + dur` is always the truncated end.

use super::schema::{
    TraceEvent, TraceEventArgs, TraceFile, TraceMetadata, TraceObject, COMPLETE_PHASE,
    DISPLAY_TIME_UNIT,
};
use crate::timeline::{ProcessRecord, ProcessRegistry, RenderMode, Timeline};
use crate::utils::config::{GENERATOR_NAME, NS_PER_US};
use chrono::Utc;
use log::{debug, warn};

/// Trace events for one render mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceDocument {
    pub render_mode: RenderMode,

    /// Events in process key order
    pub events: Vec<TraceEvent>,

    /// Records left out because their interval was incomplete
    pub dropped: usize,
}

impl TraceDocument {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Wrap events for writing, optionally in the object format with metadata
    pub fn into_trace_file(self, with_metadata: bool) -> TraceFile {
        if !with_metadata {
            return TraceFile::Events(self.events);
        }

        TraceFile::Object(TraceObject {
            trace_events: self.events,
            display_time_unit: DISPLAY_TIME_UNIT.to_string(),
            other_data: TraceMetadata {
                generator: GENERATOR_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                render_mode: self.render_mode.to_string(),
                generated_at: Utc::now().to_rfc3339(),
            },
        })
    }
}

/// Assign rows for `mode` and build the document
///
/// **Public** - main entry point used by the convert command
pub fn render_timeline(timeline: &mut Timeline, mode: RenderMode) -> TraceDocument {
    let rows = timeline.assign_rows(mode);
    debug!("Layout uses {} rows", rows);
    build_document(&timeline.processes, mode)
}

/// Emit one complete event per renderable record
///
/// Rows must already be assigned (see `assign_rows`). Records with a missing
/// or inverted interval are skipped with a warning.
pub fn build_document(processes: &ProcessRegistry, mode: RenderMode) -> TraceDocument {
    let mut events = Vec::with_capacity(processes.len());
    let mut dropped = 0;

    for record in processes.iter() {
        match to_trace_event(record) {
            Some(event) => events.push(event),
            None => dropped += 1,
        }
    }

    debug!(
        "Built {} trace events, dropped {} incomplete records",
        events.len(),
        dropped
    );

    TraceDocument {
        render_mode: mode,
        events,
        dropped,
    }
}

/// Convert one record, or explain why it cannot be rendered
///
/// **Private** - internal helper for build_document
fn to_trace_event(record: &ProcessRecord) -> Option<TraceEvent> {
    let label = if record.name.is_empty() {
        record.key.to_string()
    } else {
        format!("{} ({})", record.name, record.key)
    };

    let Some(start_ns) = record.start_ns else {
        warn!("Missing start timestamp for {}", label);
        return None;
    };
    let Some(end_ns) = record.end_ns else {
        warn!("Missing end timestamp for {}", label);
        return None;
    };
    if end_ns < start_ns {
        warn!(
            "End timestamp {} precedes start {} for {}",
            end_ns, start_ns, label
        );
        return None;
    }
    let Some(row) = record.render_row else {
        warn!("No render row assigned for {}", label);
        return None;
    };

    let start_us = start_ns / NS_PER_US;
    let end_us = end_ns / NS_PER_US;
    let parent = record.parent;

    Some(TraceEvent {
        ph: COMPLETE_PHASE.to_string(),
        name: record.name.clone(),
        pid: row,
        tid: row,
        ts: start_us,
        dur: end_us - start_us,
        args: Some(TraceEventArgs {
            pid: record.key.pid,
            tid: record.key.tid,
            ppid: parent.map(|p| p.pid),
            ptid: parent.map(|p| p.tid),
        }),
    })
}
