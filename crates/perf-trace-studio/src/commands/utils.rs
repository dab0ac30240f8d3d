//! Smaller commands: validate, schema, version.

use crate::parser::{read_events, EventKind, EventStats};
use crate::timeline::{RenderMode, Timeline};
use crate::utils::config::GENERATOR_NAME;
use anyhow::{Context, Result};
use std::path::Path;

/// Validate an event log file
///
/// Parses the log without sorting and reports what it contains.
pub fn validate_event_file(file_path: impl AsRef<Path>) -> Result<()> {
    let file_path = file_path.as_ref();
    println!("Validating event log: {}", file_path.display());

    let events = read_events(file_path, false)
        .with_context(|| format!("Invalid event log {}", file_path.display()))?;
    let stats = EventStats::from_events(&events);
    let timeline = Timeline::from_events(&events);

    println!("✓ Valid event log");
    println!("  Events:    {}", stats.total());
    println!("    comm:    {}", stats.count_for_kind(EventKind::Comm));
    println!("    fork:    {}", stats.count_for_kind(EventKind::Fork));
    println!("    exit:    {}", stats.count_for_kind(EventKind::Exit));
    println!("    skipped: {}", stats.skipped());
    println!("  Processes: {}", timeline.processes.len());
    println!("  Complete:  {}", timeline.processes.complete_count());
    println!("  Commands:  {}", timeline.commands.len());

    Ok(())
}

/// Display the trace output schema
pub fn display_schema(show_details: bool) {
    println!("Perf Trace Output Schema (Chrome trace event format)");
    println!();

    if show_details {
        println!("Event fields:");
        println!("  ph: string    - Always \"X\" (complete interval)");
        println!("  name: string  - Command name");
        println!("  pid: number   - Row or command-group id");
        println!("  tid: number   - Track within the row");
        println!("  ts: number    - Start time in microseconds");
        println!("  dur: number   - Duration in microseconds");
        println!("  args: object  - Original pid/tid and parent ppid/ptid");
        println!();
        println!("Render modes:");
        for mode in RenderMode::ALL {
            println!("  {}", mode);
        }
        println!();
        println!("With --metadata the array is wrapped as");
        println!("  {{ traceEvents, displayTimeUnit, otherData }}");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("{} v{}", GENERATOR_NAME, env!("CARGO_PKG_VERSION"));
    println!();
    println!("Process lifetime timelines from profiler events, as Chrome trace JSON.");
}
