//! Terminal summary of a conversion run.

use super::builder::TraceDocument;
use crate::parser::{EventKind, EventStats};
use crate::timeline::{RenderMode, Timeline};
use crate::utils::config::SUMMARY_TOP_PROCESSES;
use colored::*;
use std::collections::BTreeSet;

/// Counts and highlights gathered after a document is built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceSummary {
    pub render_mode: RenderMode,
    pub event_stats: EventStats,
    pub processes: usize,
    pub rendered: usize,
    pub dropped: usize,
    pub rows: usize,
    pub commands: usize,

    /// Earliest start and latest end in microseconds
    pub span_us: Option<(u64, u64)>,

    /// Longest-running processes as (name, duration in microseconds)
    pub longest: Vec<(String, u64)>,
}

impl TraceSummary {
    pub fn new(document: &TraceDocument, timeline: &Timeline, event_stats: &EventStats) -> Self {
        let rows: BTreeSet<u64> = document.events.iter().map(|e| e.pid).collect();

        let span_us = document
            .events
            .iter()
            .map(|e| (e.ts, e.ts + e.dur))
            .reduce(|(lo, hi), (start, end)| (lo.min(start), hi.max(end)));

        let mut longest: Vec<(String, u64)> = document
            .events
            .iter()
            .map(|e| (e.name.clone(), e.dur))
            .collect();
        longest.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        longest.truncate(SUMMARY_TOP_PROCESSES);

        Self {
            render_mode: document.render_mode,
            event_stats: event_stats.clone(),
            processes: timeline.processes.len(),
            rendered: document.len(),
            dropped: document.dropped,
            rows: rows.len(),
            commands: timeline.commands.len(),
            span_us,
            longest,
        }
    }
}

/// Render a human-readable summary for the terminal
pub fn render_terminal_summary(summary: &TraceSummary) -> String {
    let mut out = String::new();

    out.push_str(&render_header(summary));
    out.push_str(&render_events(summary));
    out.push_str(&render_layout(summary));
    out.push_str(&render_longest(summary));

    out
}

fn render_header(summary: &TraceSummary) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&"Process Timeline Summary".bold().to_string());
    out.push_str("\n---------------------------------------------------\n");
    out.push_str(&format!("Render mode: {}\n", summary.render_mode.to_string().cyan()));
    out.push_str("---------------------------------------------------\n");
    out
}

fn render_events(summary: &TraceSummary) -> String {
    let stats = &summary.event_stats;
    let mut out = format!("Events:      {}\n", stats.total());
    for kind in [EventKind::Comm, EventKind::Fork, EventKind::Exit] {
        out.push_str(&format!(
            "  {:<9} {}\n",
            kind.to_string(),
            stats.count_for_kind(kind)
        ));
    }
    if stats.skipped() > 0 {
        out.push_str(&format!(
            "  {:<9} {}\n",
            "skipped",
            stats.skipped().to_string().yellow()
        ));
    }
    out
}

fn render_layout(summary: &TraceSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("Processes:   {}\n", summary.processes));
    out.push_str(&format!(
        "  rendered  {}\n",
        summary.rendered.to_string().green()
    ));
    if summary.dropped > 0 {
        out.push_str(&format!(
            "  dropped   {} (incomplete interval)\n",
            summary.dropped.to_string().red()
        ));
    }
    out.push_str(&format!("Commands:    {}\n", summary.commands));
    out.push_str(&format!("Rows:        {}\n", summary.rows));
    if let Some((start, end)) = summary.span_us {
        out.push_str(&format!(
            "Span:        {} us .. {} us ({} us)\n",
            start,
            end,
            end - start
        ));
    }
    out
}

fn render_longest(summary: &TraceSummary) -> String {
    let mut out = String::new();
    if summary.longest.is_empty() {
        return out;
    }

    out.push_str("\nLongest processes:\n");
    for (name, dur) in &summary.longest {
        let name = if name.is_empty() { "<unnamed>" } else { name };
        out.push_str(&format!("  {:>12} us  {}\n", dur, name));
    }
    out
}
