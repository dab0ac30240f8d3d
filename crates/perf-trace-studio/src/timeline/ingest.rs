//! Fold lifecycle events into the process registry.
//!
//! Events are applied in the order given. With time-sorted input:
//! - FORK is authoritative for the start time
//! - COMM supplies a start time only when no FORK has been seen (the first
//!   process of a capture usually has no FORK record)
//! - EXIT sets the end time; a repeated EXIT for the same key overwrites it

use super::registry::{CommandRegistry, ProcessKey, ProcessRegistry};
use crate::parser::{CommEvent, ExitEvent, ForkEvent, ProfilerEvent};
use log::{debug, trace};

/// Apply `events` to the registries
///
/// **Public** - main entry point for ingestion
///
/// Never fails: unrecognized events are logged and skipped.
pub fn ingest_events(
    events: &[ProfilerEvent],
    processes: &mut ProcessRegistry,
    commands: &mut CommandRegistry,
) {
    debug!("Ingesting {} events", events.len());

    for event in events {
        match event {
            ProfilerEvent::Comm(comm) => process_comm_event(comm, processes, commands),
            ProfilerEvent::Fork(fork) => process_fork_event(fork, processes),
            ProfilerEvent::Exit(exit) => process_exit_event(exit, processes),
            ProfilerEvent::Other(kind) => debug!("Skipping event type {}", kind),
        }
    }

    debug!(
        "Registry holds {} processes, {} commands",
        processes.len(),
        commands.len()
    );
}

fn process_comm_event(
    comm: &CommEvent,
    processes: &mut ProcessRegistry,
    commands: &mut CommandRegistry,
) {
    let key = ProcessKey::new(comm.pid, comm.tid);
    trace!("COMM {} -> {}", key, comm.comm);

    commands.register(&comm.comm);

    let record = processes.get_or_create(key);
    record.name = comm.comm.clone();

    // A zero sample time means the record carried no sample id
    if record.start_ns.is_none() && comm.sample_time_ns != 0 {
        record.start_ns = Some(comm.sample_time_ns);
    }
}

fn process_fork_event(fork: &ForkEvent, processes: &mut ProcessRegistry) {
    let key = ProcessKey::new(fork.pid, fork.tid);
    trace!("FORK {} at {}", key, fork.time_ns);

    processes.get_or_create(key).start_ns = Some(fork.time_ns);

    if let (Some(ppid), Some(ptid)) = (fork.ppid, fork.ptid) {
        processes.link_parent(key, ProcessKey::new(ppid, ptid));
    }
}

fn process_exit_event(exit: &ExitEvent, processes: &mut ProcessRegistry) {
    let key = ProcessKey::new(exit.pid, exit.tid);
    trace!("EXIT {} at {}", key, exit.time_ns);

    processes.get_or_create(key).end_ns = Some(exit.time_ns);
}
