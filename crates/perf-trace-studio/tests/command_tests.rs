use perf_trace_studio::commands::{
    execute_convert, resolve_settings, validate_args, validate_event_file, ConvertArgs,
    ConvertSettings,
};
use perf_trace_studio::output::read_trace;
use perf_trace_studio::timeline::RenderMode;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

const EVENT_LOG: &str = r#"[
    {"type": "fork", "pid": 2, "tid": 2, "time_ns": 1000000},
    {"type": "comm", "pid": 2, "tid": 2, "comm": "shell", "time_ns": 1000000},
    {"type": "fork", "pid": 3, "tid": 3, "time_ns": 1200000},
    {"type": "exit", "pid": 3, "tid": 3, "time_ns": 1800000},
    {"type": "exit", "pid": 2, "tid": 2, "time_ns": 2000000},
    {"type": "fork", "pid": 4, "tid": 4, "time_ns": 2500000},
    {"type": "mmap", "pid": 2}
]"#;

fn event_log() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(EVENT_LOG.as_bytes()).unwrap();
    file
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_validate_args_valid() {
    let input = event_log();
    let args = ConvertArgs {
        input: input.path().to_path_buf(),
        ..Default::default()
    };

    assert!(validate_args(&args).is_ok());
}

#[test]
fn test_validate_args_empty_input() {
    let args = ConvertArgs::default();
    assert!(validate_args(&args).is_err());
}

#[test]
fn test_validate_args_missing_input() {
    let args = ConvertArgs {
        input: PathBuf::from("/nonexistent/events.json"),
        ..Default::default()
    };
    assert!(validate_args(&args).is_err());
}

#[test]
fn test_validate_args_output_overwrites_input() {
    let input = event_log();
    let args = ConvertArgs {
        input: input.path().to_path_buf(),
        output: Some(input.path().to_path_buf()),
        ..Default::default()
    };
    assert!(validate_args(&args).is_err());
}

#[test]
fn test_validate_args_missing_config() {
    let input = event_log();
    let args = ConvertArgs {
        input: input.path().to_path_buf(),
        config: Some(PathBuf::from("/nonexistent/perf-trace.toml")),
        ..Default::default()
    };
    assert!(validate_args(&args).is_err());
}

#[test]
fn test_resolve_settings_defaults() {
    let settings = resolve_settings(&ConvertArgs::default()).unwrap();
    assert_eq!(settings, ConvertSettings::default());
    assert_eq!(settings.render_mode, RenderMode::Flat);
}

#[test]
fn test_resolve_settings_flags_override_config() {
    let config = config_file("render_mode = \"cascade\"\nmetadata = true\n");

    let from_config = resolve_settings(&ConvertArgs {
        config: Some(config.path().to_path_buf()),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(from_config.render_mode, RenderMode::Cascade);
    assert!(from_config.metadata);
    assert!(from_config.pretty);

    let overridden = resolve_settings(&ConvertArgs {
        config: Some(config.path().to_path_buf()),
        render_mode: Some("flame".to_string()),
        compact: true,
        no_sort: true,
        ..Default::default()
    })
    .unwrap();
    assert_eq!(overridden.render_mode, RenderMode::Flame);
    assert!(!overridden.pretty);
    assert!(!overridden.sort_events);
}

#[test]
fn test_resolve_settings_unknown_mode_falls_back() {
    let settings = resolve_settings(&ConvertArgs {
        render_mode: Some("spiral".to_string()),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(settings.render_mode, RenderMode::Flat);
}

#[test]
fn test_resolve_settings_bad_config() {
    let config = config_file("render_mode = [1, 2]\n");
    let result = resolve_settings(&ConvertArgs {
        config: Some(config.path().to_path_buf()),
        ..Default::default()
    });
    assert!(result.is_err());
}

#[test]
fn test_execute_convert_writes_trace() {
    let input = event_log();
    let temp_dir = tempfile::tempdir().unwrap();
    let output = temp_dir.path().join("trace.json");

    execute_convert(ConvertArgs {
        input: input.path().to_path_buf(),
        output: Some(output.clone()),
        render_mode: Some("flame".to_string()),
        metadata: true,
        print_summary: true,
        ..Default::default()
    })
    .unwrap();

    let trace = read_trace(&output).unwrap();
    assert_eq!(trace.metadata().unwrap().render_mode, "flame");

    // pid 4 never exits and is left out
    let events = trace.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].name, "shell");
    assert_eq!(events[0].ts, 1000);
    assert_eq!(events[0].dur, 1000);
    assert_ne!(events[0].pid, events[1].pid);
}

#[test]
fn test_execute_convert_unknown_mode_still_succeeds() {
    let input = event_log();
    let temp_dir = tempfile::tempdir().unwrap();
    let output = temp_dir.path().join("trace.json");

    execute_convert(ConvertArgs {
        input: input.path().to_path_buf(),
        output: Some(output.clone()),
        render_mode: Some("diagonal".to_string()),
        ..Default::default()
    })
    .unwrap();

    let trace = read_trace(&output).unwrap();
    assert!(trace.metadata().is_none());
    assert!(trace.events().iter().all(|e| e.pid == 0 && e.tid == 0));
}

#[test]
fn test_execute_convert_invalid_input_writes_nothing() {
    let mut input = NamedTempFile::new().unwrap();
    input.write_all(b"{\"events\": [{\"type\": \"exit\"}]}").unwrap();
    let temp_dir = tempfile::tempdir().unwrap();
    let output = temp_dir.path().join("trace.json");

    let result = execute_convert(ConvertArgs {
        input: input.path().to_path_buf(),
        output: Some(output.clone()),
        ..Default::default()
    });

    assert!(result.is_err());
    assert!(!output.exists());
}

#[test]
fn test_validate_event_file() {
    let input = event_log();
    assert!(validate_event_file(input.path()).is_ok());

    let mut broken = NamedTempFile::new().unwrap();
    broken.write_all(b"42").unwrap();
    assert!(validate_event_file(broken.path()).is_err());
}
