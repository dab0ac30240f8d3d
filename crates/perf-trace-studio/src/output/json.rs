//! JSON trace output writer.
//!
//! Writes `TraceFile` documents in a form the Chrome trace viewer
//! (chrome://tracing, Perfetto) can load directly.

use crate::trace::TraceFile;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a trace document to a JSON file
///
/// **Public** - main entry point for file output
///
/// # Arguments
/// * `trace` - Document to write
/// * `output_path` - Path to output JSON file
/// * `pretty` - Indent the JSON
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
///
/// # Example
/// ```ignore
/// let document = render_timeline(&mut timeline, RenderMode::Flame);
/// write_trace(&document.into_trace_file(false), "trace.json", true)?;
/// ```
pub fn write_trace(
    trace: &TraceFile,
    output_path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing trace to: {}", output_path.display());

    super::validate_path(output_path)?;

    // Create parent directories if needed
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    if pretty {
        serde_json::to_writer_pretty(&mut writer, trace)?;
    } else {
        serde_json::to_writer(&mut writer, trace)?;
    }
    writeln!(writer)?;
    writer.flush()?;

    info!(
        "Trace written successfully ({} events, {} bytes)",
        trace.events().len(),
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Serialize a trace document to a string
///
/// **Public** - used for stdout output and tests
pub fn trace_to_string(trace: &TraceFile, pretty: bool) -> Result<String, OutputError> {
    let json = if pretty {
        serde_json::to_string_pretty(trace)?
    } else {
        serde_json::to_string(trace)?
    };
    Ok(json)
}

/// Calculate file size in bytes
///
/// **Private** - internal utility
fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Read a trace document from a JSON file
///
/// **Public** - useful for validation and testing
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_trace(input_path: impl AsRef<Path>) -> Result<TraceFile, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading trace from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let trace: TraceFile = serde_json::from_reader(std::io::BufReader::new(file))
        .map_err(OutputError::SerializationFailed)?;

    debug!("Trace loaded: {} events", trace.events().len());

    Ok(trace)
}
