use crate::timeline::RenderMode;
use std::path::PathBuf;

/// Arguments for the convert command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone, Default)]
pub struct ConvertArgs {
    /// Event log to read
    pub input: PathBuf,

    /// Output path for the trace JSON (stdout when absent)
    pub output: Option<PathBuf>,

    /// Render mode token; overrides the config file
    pub render_mode: Option<String>,

    /// Optional TOML config file
    pub config: Option<PathBuf>,

    /// Write compact JSON
    pub compact: bool,

    /// Wrap events in the JSON object format with run metadata
    pub metadata: bool,

    /// Print a summary to stderr
    pub print_summary: bool,

    /// Keep events in file order instead of sorting by timestamp
    pub no_sort: bool,
}

/// Settings after merging config file and command-line flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertSettings {
    pub render_mode: RenderMode,
    pub pretty: bool,
    pub metadata: bool,
    pub sort_events: bool,
}

impl Default for ConvertSettings {
    fn default() -> Self {
        Self {
            render_mode: RenderMode::default(),
            pretty: true,
            metadata: false,
            sort_events: true,
        }
    }
}
