//! Process timeline reconstruction.
//!
//! This module transforms decoded lifecycle events into:
//! - One record per (pid, tid) with a resolved `[start, end)` interval
//! - A per-run command name table
//! - A row layout for each render mode

pub mod ingest;
pub mod layout;
pub mod registry;

// Re-export main types and functions
pub use ingest::ingest_events;
pub use layout::{assign_rows, RenderMode};
pub use registry::{CommandRegistry, ProcessKey, ProcessRecord, ProcessRegistry};

use crate::parser::ProfilerEvent;

/// State of one conversion run
///
/// Owns both registries so nothing outlives the run or leaks between runs.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    pub processes: ProcessRegistry,
    pub commands: CommandRegistry,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a timeline from a complete event sequence
    pub fn from_events(events: &[ProfilerEvent]) -> Self {
        let mut timeline = Self::new();
        timeline.ingest(events);
        timeline
    }

    pub fn ingest(&mut self, events: &[ProfilerEvent]) {
        ingest_events(events, &mut self.processes, &mut self.commands);
    }

    /// Assign render rows; returns the number of distinct rows used
    pub fn assign_rows(&mut self, mode: RenderMode) -> u64 {
        assign_rows(&mut self.processes, &mut self.commands, mode)
    }
}
