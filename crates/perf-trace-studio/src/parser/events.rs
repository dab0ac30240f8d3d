//! Typed profiler lifecycle events.
//!
//! Only the three record kinds that describe process lifetimes are decoded.
//! Everything else in the capture is carried as `ProfilerEvent::Other` so it
//! can be counted and skipped.

use crate::timeline::ProcessKey;
use std::collections::BTreeMap;
use std::fmt;

/// Process/thread was (re)named, e.g. on exec or prctl(PR_SET_NAME)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommEvent {
    pub pid: u32,
    pub tid: u32,
    pub comm: String,
    /// Sample timestamp; 0 when the record carried no sample id
    pub sample_time_ns: u64,
}

/// Process/thread was created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForkEvent {
    pub pid: u32,
    pub tid: u32,
    pub ppid: Option<u32>,
    pub ptid: Option<u32>,
    pub time_ns: u64,
}

/// Process/thread terminated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitEvent {
    pub pid: u32,
    pub tid: u32,
    pub time_ns: u64,
}

/// A single decoded event from the capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfilerEvent {
    Comm(CommEvent),
    Fork(ForkEvent),
    Exit(ExitEvent),
    /// Unrecognized record; holds the raw type tag
    Other(String),
}

impl ProfilerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Comm(_) => EventKind::Comm,
            Self::Fork(_) => EventKind::Fork,
            Self::Exit(_) => EventKind::Exit,
            Self::Other(_) => EventKind::Other,
        }
    }

    /// Timestamp used to order events before ingestion
    ///
    /// `None` for unknown events and for COMM records without a sample time.
    pub fn timestamp_ns(&self) -> Option<u64> {
        match self {
            Self::Comm(comm) if comm.sample_time_ns == 0 => None,
            Self::Comm(comm) => Some(comm.sample_time_ns),
            Self::Fork(fork) => Some(fork.time_ns),
            Self::Exit(exit) => Some(exit.time_ns),
            Self::Other(_) => None,
        }
    }

    /// Key of the process/thread this event refers to
    pub fn key(&self) -> Option<ProcessKey> {
        match self {
            Self::Comm(comm) => Some(ProcessKey::new(comm.pid, comm.tid)),
            Self::Fork(fork) => Some(ProcessKey::new(fork.pid, fork.tid)),
            Self::Exit(exit) => Some(ProcessKey::new(exit.pid, exit.tid)),
            Self::Other(_) => None,
        }
    }
}

/// Discriminant of a `ProfilerEvent`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    Comm,
    Fork,
    Exit,
    Other,
}

impl std::str::FromStr for EventKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "comm" | "rename" | "perf_record_comm" => Self::Comm,
            "fork" | "perf_record_fork" => Self::Fork,
            "exit" | "perf_record_exit" => Self::Exit,
            _ => Self::Other,
        })
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Comm => "comm",
            Self::Fork => "fork",
            Self::Exit => "exit",
            Self::Other => "other",
        };
        f.write_str(label)
    }
}

/// Per-kind event counts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventStats {
    counts: BTreeMap<EventKind, u64>,
}

impl EventStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(events: &[ProfilerEvent]) -> Self {
        let mut stats = Self::new();
        for event in events {
            stats.add(event.kind());
        }
        stats
    }

    pub fn add(&mut self, kind: EventKind) {
        *self.counts.entry(kind).or_insert(0) += 1;
    }

    pub fn count_for_kind(&self, kind: EventKind) -> u64 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Events that will be skipped during ingestion
    pub fn skipped(&self) -> u64 {
        self.count_for_kind(EventKind::Other)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EventKind, u64)> + '_ {
        self.counts.iter().map(|(kind, count)| (*kind, *count))
    }
}
