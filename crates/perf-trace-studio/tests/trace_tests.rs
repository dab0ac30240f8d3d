use perf_trace_studio::commands::convert_events;
use perf_trace_studio::parser::{parse_events, CommEvent, ExitEvent, ForkEvent, ProfilerEvent};
use perf_trace_studio::timeline::{RenderMode, Timeline};
use perf_trace_studio::trace::{build_document, render_timeline, TraceEvent, TraceEventArgs};
use pretty_assertions::assert_eq;
use serde_json::json;

fn comm(pid: u32, name: &str, time_ns: u64) -> ProfilerEvent {
    ProfilerEvent::Comm(CommEvent {
        pid,
        tid: pid,
        comm: name.to_string(),
        sample_time_ns: time_ns,
    })
}

fn fork(pid: u32, time_ns: u64) -> ProfilerEvent {
    ProfilerEvent::Fork(ForkEvent {
        pid,
        tid: pid,
        ppid: None,
        ptid: None,
        time_ns,
    })
}

fn exit(pid: u32, time_ns: u64) -> ProfilerEvent {
    ProfilerEvent::Exit(ExitEvent {
        pid,
        tid: pid,
        time_ns,
    })
}

#[test]
fn test_rename_then_exit_scenario() {
    let events = vec![comm(1, "init", 100_000), exit(1, 500_000)];
    let (_, document) = convert_events(&events, RenderMode::Flat);

    assert_eq!(
        document.events,
        vec![TraceEvent {
            ph: "X".to_string(),
            name: "init".to_string(),
            pid: 0,
            tid: 0,
            ts: 100,
            dur: 400,
            args: Some(TraceEventArgs {
                pid: 1,
                tid: 1,
                ppid: None,
                ptid: None,
            }),
        }]
    );
}

#[test]
fn test_duration_rule_on_odd_boundaries() {
    // Raw nanosecond difference would truncate to 0us; bounds truncate to 1us and 2us
    let events = vec![fork(1, 1_500), exit(1, 2_400)];
    let (_, document) = convert_events(&events, RenderMode::Cascade);

    assert_eq!(document.events[0].ts, 1);
    assert_eq!(document.events[0].dur, 1);

    // Raw difference would give 1us; bounds truncate to 0us and 2us
    let events = vec![fork(2, 999), exit(2, 2_000)];
    let (_, document) = convert_events(&events, RenderMode::Cascade);

    assert_eq!(document.events[0].ts, 0);
    assert_eq!(document.events[0].dur, 2);
}

#[test]
fn test_incomplete_records_never_emitted() {
    let events = vec![
        fork(1, 1_000),
        exit(1, 2_000),
        fork(2, 1_000),
        exit(3, 2_000),
        comm(4, "orphan", 0),
        exit(4, 3_000),
    ];

    for mode in RenderMode::ALL {
        let (timeline, document) = convert_events(&events, mode);

        assert_eq!(document.len(), 1, "{} mode", mode);
        assert_eq!(document.dropped, 3);
        assert_eq!(timeline.processes.len(), 4);
        assert_eq!(document.events[0].args.as_ref().unwrap().pid, 1);
    }
}

#[test]
fn test_command_mode_uses_command_ids() {
    let events = vec![
        comm(1, "init", 1_000),
        fork(2, 2_000),
        comm(2, "sh", 2_000),
        fork(3, 3_000),
        comm(3, "sh", 3_000),
        exit(3, 4_000),
        exit(2, 5_000),
        exit(1, 9_000),
    ];

    let (timeline, document) = convert_events(&events, RenderMode::Command);
    let pids: Vec<u64> = document.events.iter().map(|e| e.pid).collect();

    assert_eq!(pids, vec![0, 1, 1]);
    assert_eq!(timeline.commands.name(1), Some("sh"));
}

#[test]
fn test_events_in_key_order() {
    let events = vec![
        fork(9, 100_000),
        exit(9, 200_000),
        fork(3, 300_000),
        exit(3, 400_000),
    ];

    let (_, document) = convert_events(&events, RenderMode::Cascade);
    let original: Vec<u32> = document
        .events
        .iter()
        .map(|e| e.args.as_ref().unwrap().pid)
        .collect();
    let rows: Vec<u64> = document.events.iter().map(|e| e.pid).collect();

    assert_eq!(original, vec![3, 9]);
    assert_eq!(rows, vec![1, 0]);
}

#[test]
fn test_build_after_manual_assignment() {
    let events = vec![fork(1, 0), exit(1, 5_000)];
    let mut timeline = Timeline::from_events(&events);

    timeline.assign_rows(RenderMode::Flame);
    let manual = build_document(&timeline.processes, RenderMode::Flame);
    let rendered = render_timeline(&mut timeline, RenderMode::Flame);

    assert_eq!(manual, rendered);
}

#[test]
fn test_parent_identity_in_args() {
    let raw = json!([
        { "type": "comm", "pid": 100, "tid": 100, "comm": "bash", "time_ns": 1_000 },
        { "type": "fork", "pid": 200, "tid": 200, "ppid": 100, "ptid": 100, "time_ns": 2_000 },
        { "type": "comm", "pid": 200, "tid": 200, "comm": "ls", "time_ns": 2_500 },
        { "type": "exit", "pid": 200, "tid": 200, "time_ns": 3_000 },
        { "type": "exit", "pid": 100, "tid": 100, "time_ns": 9_000 }
    ]);

    let events = parse_events(&raw, true).unwrap();
    let (_, document) = convert_events(&events, RenderMode::Flame);

    let child = document.events.iter().find(|e| e.name == "ls").unwrap();
    assert_eq!(
        child.args,
        Some(TraceEventArgs {
            pid: 200,
            tid: 200,
            ppid: Some(100),
            ptid: Some(100),
        })
    );
    assert_eq!(child.pid, 1);
}

#[test]
fn test_serialized_document_shape() {
    let events = vec![comm(1, "init", 100_000), exit(1, 500_000)];
    let (_, document) = convert_events(&events, RenderMode::Flat);

    let value = serde_json::to_value(document.into_trace_file(false)).unwrap();

    assert_eq!(
        value,
        json!([{
            "ph": "X",
            "name": "init",
            "pid": 0,
            "tid": 0,
            "ts": 100,
            "dur": 400,
            "args": { "pid": 1, "tid": 1 }
        }])
    );
}

#[test]
fn test_parent_named_only_by_fork_is_not_dropped() {
    let events = vec![
        ProfilerEvent::Fork(ForkEvent {
            pid: 5,
            tid: 5,
            ppid: Some(1),
            ptid: Some(1),
            time_ns: 1_000_000,
        }),
        comm(5, "make", 1_100_000),
        exit(5, 3_000_000),
    ];

    let (timeline, document) = convert_events(&events, RenderMode::Flame);

    assert_eq!(timeline.processes.len(), 1);
    assert_eq!(document.len(), 1);
    assert_eq!(document.dropped, 0);
    assert_eq!(
        document.events[0].args,
        Some(TraceEventArgs {
            pid: 5,
            tid: 5,
            ppid: Some(1),
            ptid: Some(1),
        })
    );
}
