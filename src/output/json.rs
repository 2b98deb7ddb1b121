//! JSON heap dump writer.
//!
//! Writes HeapDump structs to JSON files with proper formatting.

use super::schema::HeapDump;
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Write a heap dump to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Arguments
/// * `dump` - Heap dump to write
/// * `output_path` - Path to output JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
///
/// # Example
/// ```ignore
/// let dump = to_heap_dump(&table, "renderer", DEFAULT_TOP_PATHS);
/// write_heap_dump(&dump, "heap.json")?;
/// ```
pub fn write_heap_dump(dump: &HeapDump, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing heap dump to: {}", output_path.display());

    validate_output_path(output_path)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!("Cannot create directory {}: {}", parent.display(), e))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, dump).map_err(OutputError::SerializationFailed)?;

    info!("Heap dump written successfully ({} bytes)", calculate_file_size(output_path));

    Ok(())
}

/// Serialize a heap dump to a pretty JSON string
pub fn heap_dump_to_string(dump: &HeapDump) -> Result<String, OutputError> {
    serde_json::to_string_pretty(dump).map_err(OutputError::SerializationFailed)
}

/// Validate that output path is writable
///
/// **Private** - internal validation
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Read a heap dump from a JSON file
///
/// **Public** - used by the CLI and tests
///
/// # Errors
/// * `OutputError::ReadFailed` - File read error
/// * `OutputError::SerializationFailed` - JSON parse error
/// * `OutputError::UnsupportedVersion` - Dump written by an incompatible schema
pub fn read_heap_dump(input_path: impl AsRef<Path>) -> Result<HeapDump, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading heap dump from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::ReadFailed)?;
    let dump: HeapDump =
        serde_json::from_reader(BufReader::new(file)).map_err(OutputError::SerializationFailed)?;

    if major_version(&dump.version) != major_version(SCHEMA_VERSION) {
        return Err(OutputError::UnsupportedVersion(dump.version));
    }

    debug!("Heap dump loaded: version {}, process {}", dump.version, dump.process_name);

    Ok(dump)
}

fn major_version(version: &str) -> &str {
    version.split('.').next().unwrap_or(version)
}
