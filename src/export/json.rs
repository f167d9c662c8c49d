//! JSON files in and out of the command line tools
//!
//! Output uses the same shapes as the HTTP service: a plain array of track
//! records or track descriptors.

use crate::error::{DjorderError, Result};
use crate::types::TrackDescriptor;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::{debug, info};

/// Write any serializable value as pretty JSON
///
/// Uses atomic write pattern: writes to a temp file first, then renames.
/// This prevents data corruption if the write is interrupted.
pub fn write_json<T: Serialize + ?Sized>(value: &T, output_path: &Path) -> Result<()> {
    // Write to temp file in same directory (ensures same filesystem for atomic rename)
    let temp_path = output_path.with_extension("json.tmp");

    let file = File::create(&temp_path).map_err(|e| DjorderError::output_error(output_path, e))?;

    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, value).map_err(|e| {
        // Clean up temp file on error
        let _ = std::fs::remove_file(&temp_path);
        DjorderError::OutputError {
            path: output_path.to_path_buf(),
            reason: e.to_string(),
        }
    })?;

    // Atomic rename: either succeeds completely or fails without modifying target
    std::fs::rename(&temp_path, output_path).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        DjorderError::OutputError {
            path: output_path.to_path_buf(),
            reason: format!("Failed to finalize file: {}", e),
        }
    })?;

    info!("Wrote {}", output_path.display());

    Ok(())
}

/// Read a JSON array of track descriptors
pub fn read_tracks(json_path: &Path) -> Result<Vec<TrackDescriptor>> {
    if !json_path.exists() {
        return Err(DjorderError::FileNotFound(json_path.to_path_buf()));
    }

    let reader = BufReader::new(File::open(json_path)?);
    let tracks: Vec<TrackDescriptor> = serde_json::from_reader(reader)?;

    debug!("Loaded {} tracks from {}", tracks.len(), json_path.display());

    Ok(tracks)
}
