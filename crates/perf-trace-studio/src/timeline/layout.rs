//! Row assignment for rendering.
//!
//! Each render mode decides which visual row a process occupies:
//!
//! | mode      | row                                              |
//! |-----------|--------------------------------------------------|
//! | `flat`    | 0 for everything; overlaps stack as a flamegraph |
//! | `command` | command id; one row per distinct name            |
//! | `cascade` | one row per process, ordered by start time       |
//! | `flame`   | fewest rows with no overlap inside a row         |
//!
//! Records without a complete `[start, end)` interval never get a row.

use super::registry::{CommandRegistry, ProcessKey, ProcessRegistry};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// How processes are packed onto rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// All processes on one row
    #[default]
    Flat,
    /// Parallel processes spread over the fewest rows
    Flame,
    /// Each process on its own row
    Cascade,
    /// Processes sharing a command name share a row
    Command,
}

impl RenderMode {
    pub const ALL: [RenderMode; 4] = [Self::Flat, Self::Flame, Self::Cascade, Self::Command];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Flame => "flame",
            Self::Cascade => "cascade",
            Self::Command => "command",
        }
    }
}

/// Unrecognized tokens fall back to the default mode with a warning
impl std::str::FromStr for RenderMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "flat" => Self::Flat,
            "flame" => Self::Flame,
            "cascade" => Self::Cascade,
            "command" => Self::Command,
            other => {
                let fallback = Self::default();
                warn!(
                    "Unknown render mode '{}', falling back to '{}'",
                    other, fallback
                );
                fallback
            }
        })
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record eligible for layout
#[derive(Debug, Clone, Copy)]
struct Placement {
    key: ProcessKey,
    start: u64,
    end: u64,
}

impl Placement {
    fn duration(&self) -> u64 {
        self.end - self.start
    }
}

/// Assign `render_row` to every complete record
///
/// **Public** - main entry point for layout
///
/// All rows are cleared first, so running this twice with the same mode
/// yields the same assignment. In `Command` mode names not yet in the
/// command registry (e.g. records never renamed) are registered in key order.
///
/// # Returns
/// Number of distinct rows in use
pub fn assign_rows(
    processes: &mut ProcessRegistry,
    commands: &mut CommandRegistry,
    mode: RenderMode,
) -> u64 {
    let mut placements = Vec::with_capacity(processes.len());

    for record in processes.iter_mut() {
        record.render_row = None;
        match record.interval() {
            Some((start, end)) => placements.push(Placement {
                key: record.key,
                start,
                end,
            }),
            None => debug!("Excluding {} from row assignment", record.key),
        }
    }

    let rows: Vec<(ProcessKey, u64)> = match mode {
        RenderMode::Flat => placements.iter().map(|p| (p.key, 0)).collect(),
        RenderMode::Command => command_rows(&placements, processes, commands),
        RenderMode::Cascade => cascade_rows(placements),
        RenderMode::Flame => flame_rows(placements),
    };

    let mut used = BTreeSet::new();
    for (key, row) in rows {
        if let Some(record) = processes.get_mut(&key) {
            record.render_row = Some(row);
            used.insert(row);
        }
    }

    debug!(
        "Assigned {} processes to {} rows ({} mode)",
        processes.iter().filter(|r| r.render_row.is_some()).count(),
        used.len(),
        mode
    );

    used.len() as u64
}

fn command_rows(
    placements: &[Placement],
    processes: &ProcessRegistry,
    commands: &mut CommandRegistry,
) -> Vec<(ProcessKey, u64)> {
    placements
        .iter()
        .filter_map(|p| processes.get(&p.key))
        .map(|record| (record.key, u64::from(commands.register(&record.name))))
        .collect()
}

/// One row per process, in (start, key) order
fn cascade_rows(mut placements: Vec<Placement>) -> Vec<(ProcessKey, u64)> {
    placements.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.key.cmp(&b.key)));

    placements
        .iter()
        .enumerate()
        .map(|(row, p)| (p.key, row as u64))
        .collect()
}

/// Greedy interval packing
///
/// Sorted by (start, duration, key); each process takes the lowest row whose
/// last interval ended at or before its start, otherwise a new row is opened.
fn flame_rows(mut placements: Vec<Placement>) -> Vec<(ProcessKey, u64)> {
    placements.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| a.duration().cmp(&b.duration()))
            .then_with(|| a.key.cmp(&b.key))
    });

    // End time of the most recent interval on each row
    let mut row_ends: Vec<u64> = Vec::new();
    let mut rows = Vec::with_capacity(placements.len());

    for p in &placements {
        let row = match row_ends.iter().position(|&end| end <= p.start) {
            Some(row) => {
                row_ends[row] = p.end;
                row
            }
            None => {
                row_ends.push(p.end);
                row_ends.len() - 1
            }
        };
        rows.push((p.key, row as u64));
    }

    rows
}
