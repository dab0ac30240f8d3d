//! Convert command implementation.
//!
//! The convert command:
//! 1. Merges config file and flags into settings
//! 2. Reads and parses the event log
//! 3. Reconstructs process lifetimes
//! 4. Assigns rows for the render mode
//! 5. Builds and writes the trace document

use crate::commands::models::{ConvertArgs, ConvertSettings};
use crate::output::{trace_to_string, write_trace};
use crate::parser::{read_events, EventStats, ProfilerEvent};
use crate::timeline::{RenderMode, Timeline};
use crate::trace::{render_terminal_summary, render_timeline, TraceDocument, TraceSummary};
use crate::utils::config::{load_config, ConvertConfig};
use anyhow::{Context, Result};
use log::{debug, info};
use std::io::Write;
use std::time::Instant;

/// Execute the convert command
///
/// **Public** - main entry point called from main.rs
///
/// Nothing is written unless the whole event log parses.
///
/// # Errors
/// * Config file read/parse failures
/// * Event log read/parse failures
/// * Output write failures
pub fn execute_convert(args: ConvertArgs) -> Result<()> {
    let start_time = Instant::now();

    let settings = resolve_settings(&args)?;
    info!(
        "Converting {} ({} mode)",
        args.input.display(),
        settings.render_mode
    );

    info!("Reading event log...");
    let events = read_events(&args.input, settings.sort_events).with_context(|| {
        format!("Failed to read event log {}", args.input.display())
    })?;

    let stats = EventStats::from_events(&events);
    debug!(
        "Event log: {} total, {} skipped",
        stats.total(),
        stats.skipped()
    );

    info!("Reconstructing process timelines...");
    let (timeline, document) = convert_events(&events, settings.render_mode);

    if args.print_summary {
        let summary = TraceSummary::new(&document, &timeline, &stats);
        eprintln!("{}", render_terminal_summary(&summary));
    }

    let trace = document.into_trace_file(settings.metadata);
    match &args.output {
        Some(path) => {
            write_trace(&trace, path, settings.pretty).context("Failed to write trace JSON")?;
            info!("✓ Trace written to: {}", path.display());
        }
        None => {
            let json =
                trace_to_string(&trace, settings.pretty).context("Failed to serialize trace")?;
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json).context("Failed to write trace to stdout")?;
        }
    }

    info!(
        "Conversion completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Run the timeline pipeline over an in-memory event sequence
///
/// **Public** - used by execute_convert and tests
pub fn convert_events(events: &[ProfilerEvent], mode: RenderMode) -> (Timeline, TraceDocument) {
    let mut timeline = Timeline::from_events(events);
    let document = render_timeline(&mut timeline, mode);

    info!(
        "{} of {} processes rendered ({} mode)",
        document.len(),
        timeline.processes.len(),
        mode
    );

    (timeline, document)
}

/// Merge the optional config file with command-line flags
///
/// **Public** - flags win over config values
pub fn resolve_settings(args: &ConvertArgs) -> Result<ConvertSettings> {
    let config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ConvertConfig::default(),
    };

    let render_mode = args
        .render_mode
        .as_deref()
        .or(config.render_mode.as_deref())
        .map(|token| token.parse::<RenderMode>().unwrap_or_default())
        .unwrap_or_default();

    Ok(ConvertSettings {
        render_mode,
        pretty: config.pretty && !args.compact,
        metadata: config.metadata || args.metadata,
        sort_events: config.sort_events && !args.no_sort,
    })
}

/// Validate convert arguments
///
/// **Public** - can be called before execute_convert for early validation
pub fn validate_args(args: &ConvertArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input file must be specified");
    }

    if !args.input.exists() {
        anyhow::bail!("Input file does not exist: {}", args.input.display());
    }

    if args.input.is_dir() {
        anyhow::bail!("Input path is a directory: {}", args.input.display());
    }

    if let Some(output) = &args.output {
        if output == &args.input {
            anyhow::bail!("Output path must differ from the input file");
        }
    }

    if let Some(config) = &args.config {
        if !config.exists() {
            anyhow::bail!("Config file does not exist: {}", config.display());
        }
    }

    Ok(())
}
