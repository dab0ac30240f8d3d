//! Event log parser.
//!
//! Decodes a JSON event log into typed `ProfilerEvent`s. Two layouts are
//! accepted and may be mixed within one log:
//!
//! - Tagged events: `{"type": "fork", "pid": 2, "tid": 2, "time_ns": 1000}`
//! - perf-data proto JSON: `{"header": {"type": 7}, "fork_event": {...}}`
//!
//! The event list is either the top-level array or an `events` array inside
//! a top-level object.

use super::events::{CommEvent, EventKind, ExitEvent, ForkEvent, ProfilerEvent};
use crate::utils::config::{
    EVENT_LIST_FIELD_NAMES, PERF_RECORD_COMM, PERF_RECORD_EXIT, PERF_RECORD_FORK,
};
use crate::utils::error::ParseError;
use log::{debug, info};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

type JsonObject = Map<String, Value>;

/// Read and parse an event log file
///
/// **Public** - main entry point for file input
///
/// # Errors
/// * `ParseError::ReadFailed` - File cannot be opened
/// * `ParseError::JsonError` - File is not valid JSON
/// * `ParseError::InvalidFormat` / `ParseError::MalformedEvent` - see `parse_events`
pub fn read_events(path: impl AsRef<Path>, sort: bool) -> Result<Vec<ProfilerEvent>, ParseError> {
    let path = path.as_ref();

    debug!("Reading event log from: {}", path.display());

    let file = File::open(path)?;
    let raw: Value = serde_json::from_reader(BufReader::new(file))?;

    let events = parse_events(&raw, sort)?;
    info!("Loaded {} events from {}", events.len(), path.display());

    Ok(events)
}

/// Parse a raw JSON event log
///
/// **Public** - used by `read_events` and tests
///
/// # Arguments
/// * `raw` - Parsed JSON document
/// * `sort` - Stable-sort events by timestamp before returning
///
/// # Errors
/// * `ParseError::InvalidFormat` - No event list found at the top level
/// * `ParseError::MalformedEvent` - A recognized event is missing required fields
pub fn parse_events(raw: &Value, sort: bool) -> Result<Vec<ProfilerEvent>, ParseError> {
    let list = extract_event_list(raw)?;

    let mut events = list
        .iter()
        .enumerate()
        .map(|(index, value)| parse_event(index, value))
        .collect::<Result<Vec<_>, _>>()?;

    if sort {
        events = sort_by_timestamp(events);
    }

    debug!("Parsed {} events", events.len());

    Ok(events)
}

/// Stable-sort events by timestamp
///
/// Untimed events take the timestamp of the closest timed event before them
/// in file order, so they stay next to their neighbours instead of jumping to
/// the front.
///
/// **Private** - internal helper for parse_events
fn sort_by_timestamp(events: Vec<ProfilerEvent>) -> Vec<ProfilerEvent> {
    let mut last_seen = 0;
    let mut keyed: Vec<(u64, ProfilerEvent)> = events
        .into_iter()
        .map(|event| {
            if let Some(time) = event.timestamp_ns() {
                last_seen = time;
            }
            (last_seen, event)
        })
        .collect();

    keyed.sort_by_key(|(time, _)| *time);
    keyed.into_iter().map(|(_, event)| event).collect()
}

/// Locate the array of events in the document
///
/// **Private** - internal helper for parse_events
fn extract_event_list(raw: &Value) -> Result<&Vec<Value>, ParseError> {
    match raw {
        Value::Array(list) => Ok(list),
        Value::Object(obj) => EVENT_LIST_FIELD_NAMES
            .iter()
            .find_map(|field| obj.get(*field).and_then(Value::as_array))
            .ok_or_else(|| {
                ParseError::InvalidFormat(format!(
                    "Expected an event array in one of: {}",
                    EVENT_LIST_FIELD_NAMES.join(", ")
                ))
            }),
        _ => Err(ParseError::InvalidFormat(
            "Event log must be a JSON array or object".to_string(),
        )),
    }
}

/// Decode one event, detecting its layout
///
/// **Private** - internal helper for parse_events
fn parse_event(index: usize, value: &Value) -> Result<ProfilerEvent, ParseError> {
    let obj = value.as_object().ok_or_else(|| ParseError::MalformedEvent {
        index,
        reason: "event is not a JSON object".to_string(),
    })?;

    if let Some(header) = obj.get("header") {
        parse_proto_event(index, obj, header)
    } else if let Some(tag) = obj.get("type") {
        parse_tagged_event(index, obj, tag)
    } else {
        Err(ParseError::MalformedEvent {
            index,
            reason: "event has neither a 'header' nor a 'type' field".to_string(),
        })
    }
}

/// Decode an event from perf-data proto JSON
///
/// proto3 JSON omits zero-valued fields, so absent ids decode as 0.
///
/// **Private** - internal helper for parse_event
fn parse_proto_event(
    index: usize,
    obj: &JsonObject,
    header: &Value,
) -> Result<ProfilerEvent, ParseError> {
    let record_type = header
        .get("type")
        .map(parse_json_u64)
        .transpose()
        .map_err(|e| malformed(index, format!("header.type: {}", e)))?
        .unwrap_or(0);

    match record_type {
        PERF_RECORD_COMM => {
            let payload = event_payload(index, obj, &["comm_event", "commEvent"])?;
            let sample_time_ns = payload
                .get("sample_info")
                .or_else(|| payload.get("sampleInfo"))
                .and_then(Value::as_object)
                .map(|info| optional_u64(index, info, &["sample_time_ns", "sampleTimeNs"]))
                .transpose()?
                .flatten()
                .unwrap_or(0);

            Ok(ProfilerEvent::Comm(CommEvent {
                pid: proto_u32(index, payload, &["pid"])?,
                tid: proto_u32(index, payload, &["tid"])?,
                comm: optional_str(payload, &["comm"]).unwrap_or_default(),
                sample_time_ns,
            }))
        }
        PERF_RECORD_FORK => {
            let payload = event_payload(index, obj, &["fork_event", "forkEvent"])?;
            Ok(ProfilerEvent::Fork(ForkEvent {
                pid: proto_u32(index, payload, &["pid"])?,
                tid: proto_u32(index, payload, &["tid"])?,
                ppid: Some(proto_u32(index, payload, &["ppid"])?),
                ptid: Some(proto_u32(index, payload, &["ptid"])?),
                time_ns: proto_event_time(index, payload)?,
            }))
        }
        PERF_RECORD_EXIT => {
            let payload = event_payload(index, obj, &["exit_event", "exitEvent"])?;
            Ok(ProfilerEvent::Exit(ExitEvent {
                pid: proto_u32(index, payload, &["pid"])?,
                tid: proto_u32(index, payload, &["tid"])?,
                time_ns: proto_event_time(index, payload)?,
            }))
        }
        other => Ok(ProfilerEvent::Other(other.to_string())),
    }
}

/// Fork and exit records share one payload type; the time lives in
/// `fork_time_ns` with the sample time as a fallback.
///
/// **Private** - internal helper for parse_proto_event
fn proto_event_time(index: usize, payload: &JsonObject) -> Result<u64, ParseError> {
    if let Some(time) = optional_u64(index, payload, &["fork_time_ns", "forkTimeNs"])? {
        return Ok(time);
    }

    payload
        .get("sample_info")
        .or_else(|| payload.get("sampleInfo"))
        .and_then(Value::as_object)
        .map(|info| optional_u64(index, info, &["sample_time_ns", "sampleTimeNs"]))
        .transpose()?
        .flatten()
        .ok_or_else(|| malformed(index, "missing fork_time_ns".to_string()))
}

/// Decode an event from the tagged layout
///
/// **Private** - internal helper for parse_event
fn parse_tagged_event(
    index: usize,
    obj: &JsonObject,
    tag: &Value,
) -> Result<ProfilerEvent, ParseError> {
    let tag = tag
        .as_str()
        .ok_or_else(|| malformed(index, "'type' must be a string".to_string()))?;

    match tag.parse::<EventKind>().unwrap_or(EventKind::Other) {
        EventKind::Comm => Ok(ProfilerEvent::Comm(CommEvent {
            pid: required_u32(index, obj, &["pid"])?,
            tid: required_u32(index, obj, &["tid"])?,
            comm: optional_str(obj, &["comm", "name"])
                .ok_or_else(|| malformed(index, "missing field 'comm'".to_string()))?,
            sample_time_ns: required_u64(
                index,
                obj,
                &["time_ns", "sample_time_ns", "timestamp"],
            )?,
        })),
        EventKind::Fork => Ok(ProfilerEvent::Fork(ForkEvent {
            pid: required_u32(index, obj, &["pid"])?,
            tid: required_u32(index, obj, &["tid"])?,
            ppid: optional_u32(index, obj, &["ppid"])?,
            ptid: optional_u32(index, obj, &["ptid"])?,
            time_ns: required_u64(index, obj, &["time_ns", "fork_time_ns", "timestamp"])?,
        })),
        EventKind::Exit => Ok(ProfilerEvent::Exit(ExitEvent {
            pid: required_u32(index, obj, &["pid"])?,
            tid: required_u32(index, obj, &["tid"])?,
            time_ns: required_u64(index, obj, &["time_ns", "exit_time_ns", "timestamp"])?,
        })),
        EventKind::Other => Ok(ProfilerEvent::Other(tag.to_string())),
    }
}

fn event_payload<'a>(
    index: usize,
    obj: &'a JsonObject,
    names: &[&str],
) -> Result<&'a JsonObject, ParseError> {
    names
        .iter()
        .find_map(|name| obj.get(*name).and_then(Value::as_object))
        .ok_or_else(|| malformed(index, format!("missing payload '{}'", names[0])))
}

fn malformed(index: usize, reason: String) -> ParseError {
    ParseError::MalformedEvent { index, reason }
}

fn optional_str(obj: &JsonObject, names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| obj.get(*name).and_then(Value::as_str))
        .map(str::to_string)
}

fn optional_u64(index: usize, obj: &JsonObject, names: &[&str]) -> Result<Option<u64>, ParseError> {
    match names.iter().find_map(|name| obj.get(*name).map(|v| (*name, v))) {
        Some((name, value)) => parse_json_u64(value)
            .map(Some)
            .map_err(|e| malformed(index, format!("field '{}': {}", name, e))),
        None => Ok(None),
    }
}

fn required_u64(index: usize, obj: &JsonObject, names: &[&str]) -> Result<u64, ParseError> {
    optional_u64(index, obj, names)?
        .ok_or_else(|| malformed(index, format!("missing field '{}'", names[0])))
}

fn optional_u32(index: usize, obj: &JsonObject, names: &[&str]) -> Result<Option<u32>, ParseError> {
    optional_u64(index, obj, names)?
        .map(|value| {
            u32::try_from(value).map_err(|_| {
                malformed(index, format!("field '{}' out of range: {}", names[0], value))
            })
        })
        .transpose()
}

fn required_u32(index: usize, obj: &JsonObject, names: &[&str]) -> Result<u32, ParseError> {
    optional_u32(index, obj, names)?
        .ok_or_else(|| malformed(index, format!("missing field '{}'", names[0])))
}

fn proto_u32(index: usize, obj: &JsonObject, names: &[&str]) -> Result<u32, ParseError> {
    Ok(optional_u32(index, obj, names)?.unwrap_or(0))
}

/// Parse a u64 from a JSON number or string
///
/// **Public** - proto JSON renders 64-bit integers as strings
pub fn parse_json_u64(value: &Value) -> Result<u64, ParseError> {
    if let Some(n) = value.as_u64() {
        Ok(n)
    } else if let Some(s) = value.as_str() {
        parse_u64_value(s)
    } else {
        Err(ParseError::InvalidFormat(format!(
            "Expected unsigned integer or string, found {}",
            value
        )))
    }
}

/// Parse a u64 from a hex (`0x`) or decimal string
pub fn parse_u64_value(value: &str) -> Result<u64, ParseError> {
    let value = value.trim();
    if let Some(hex_str) = value.strip_prefix("0x") {
        u64::from_str_radix(hex_str, 16)
            .map_err(|e| ParseError::InvalidFormat(format!("Invalid hex value: {}", e)))
    } else {
        value
            .parse::<u64>()
            .map_err(|e| ParseError::InvalidFormat(format!("Invalid decimal value: {}", e)))
    }
}
