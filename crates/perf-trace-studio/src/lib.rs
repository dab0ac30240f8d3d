//! Perf Trace Studio library
//!
//! Reconstructs process/thread lifetimes from profiler lifecycle events
//! (COMM, FORK, EXIT) and renders them as Chrome trace-viewer JSON.
//!
//! ```ignore
//! use perf_trace_studio::parser::read_events;
//! use perf_trace_studio::timeline::{RenderMode, Timeline};
//! use perf_trace_studio::trace::render_timeline;
//!
//! let events = read_events("events.json", true)?;
//! let mut timeline = Timeline::from_events(&events);
//! let document = render_timeline(&mut timeline, RenderMode::Flame);
//! ```

pub mod commands;
pub mod output;
pub mod parser;
pub mod timeline;
pub mod trace;
pub mod utils;
