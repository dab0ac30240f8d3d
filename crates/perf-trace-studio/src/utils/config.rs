//! Configuration and constants for trace conversion.
//!
//! Settings can be supplied in a TOML file; command-line flags take
//! precedence over anything loaded here.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name written into trace metadata
pub const GENERATOR_NAME: &str = "perf-trace";

/// Trace viewer timestamps are in microseconds
pub const NS_PER_US: u64 = 1_000;

/// Longest processes listed in the terminal summary
pub const SUMMARY_TOP_PROCESSES: usize = 5;

// perf_event record types (linux/perf_event.h)
pub const PERF_RECORD_COMM: u64 = 3;
pub const PERF_RECORD_EXIT: u64 = 4;
pub const PERF_RECORD_FORK: u64 = 7;

// Top-level fields that may hold the event list
pub const EVENT_LIST_FIELD_NAMES: &[&str] = &["events", "records"];

/// Conversion settings loaded from a TOML file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Render mode token (flat, flame, cascade, command)
    pub render_mode: Option<String>,

    /// Pretty-print the output JSON
    pub pretty: bool,

    /// Wrap events in the JSON object format with run metadata
    pub metadata: bool,

    /// Stable-sort events by timestamp before ingestion
    pub sort_events: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            render_mode: None,
            pretty: true,
            metadata: false,
            sort_events: true,
        }
    }
}

/// Load conversion settings from a TOML file
///
/// # Errors
/// * `ConfigError::IoError` - If file cannot be read
/// * `ConfigError::ParseFailed` - If TOML is invalid
///
/// # Example
/// ```ignore
/// let config = load_config("perf-trace.toml")?;
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ConvertConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: ConvertConfig = toml::from_str(&contents)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_when_fields_missing() {
        let config: ConvertConfig = toml::from_str("render_mode = \"flame\"").unwrap();
        assert_eq!(config.render_mode.as_deref(), Some("flame"));
        assert!(config.pretty);
        assert!(!config.metadata);
        assert!(config.sort_events);
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "pretty = false\nmetadata = true\nsort_events = false").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.render_mode, None);
        assert!(!config.pretty);
        assert!(config.metadata);
        assert!(!config.sort_events);
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "pretty = \"maybe\"").unwrap();

        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::ParseFailed(_))
        ));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("/nonexistent/perf-trace.toml");
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}
