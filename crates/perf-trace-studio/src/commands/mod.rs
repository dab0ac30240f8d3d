//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the library components to perform user tasks.

pub mod convert;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use convert::{convert_events, execute_convert, resolve_settings, validate_args};
pub use models::{ConvertArgs, ConvertSettings};
pub use utils::{display_schema, display_version, validate_event_file};
