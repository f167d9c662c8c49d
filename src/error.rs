//! Unified error types for djorder
//!
//! Error strategy:
//! - Per-file errors (decode, analysis, artwork): Recoverable, null that file's fields and continue
//! - Input errors (malformed track list, invalid tempo): Fail fast, no partial ordering
//! - System errors (output, bind, configuration): Fatal
//!
//! All errors include actionable suggestions where possible.

use std::path::PathBuf;
use thiserror::Error;

/// Supported audio formats for helpful error messages
pub const SUPPORTED_FORMATS: &str = "MP3, WAV, FLAC, AIFF, OGG, M4A";

/// Top-level error type for djorder operations
#[derive(Debug, Error)]
pub enum DjorderError {
    // =========================================================================
    // Recoverable errors - null the file's fields, continue batch
    // =========================================================================
    #[error("Failed to decode audio '{file}': {reason}\n  Supported formats: {SUPPORTED_FORMATS}\n  Tip: If the file plays in other apps, it may be corrupted or use an unsupported codec")]
    DecodeError { file: String, reason: String },

    #[error("Unsupported audio format for '{path}': {format}\n  Supported formats: {SUPPORTED_FORMATS}")]
    UnsupportedFormat { path: PathBuf, format: String },

    #[error("Analysis failed for '{file}': {reason}")]
    AnalysisError { file: String, reason: String },

    #[error("Artwork extraction failed for '{file}': {reason}")]
    ArtworkError { file: String, reason: String },

    #[error("File not found: '{0}'\n  Tip: Check the path exists and is accessible")]
    FileNotFound(PathBuf),

    // =========================================================================
    // Input errors - reject the whole track list
    // =========================================================================
    #[error("Malformed track list: {0}\n  Tip: Expected a JSON array of objects with \"title\", \"bpm\" and \"key\" fields")]
    MalformedInput(String),

    #[error("Invalid track at position {index}: {reason}")]
    InvalidTrack { index: usize, reason: String },

    #[error("Too many tracks to sequence: {count} (limit is {limit})")]
    TooManyTracks { count: usize, limit: usize },

    // =========================================================================
    // Fatal errors
    // =========================================================================
    #[error("Cannot write output to '{path}': {reason}\n  Tip: Check write permissions for the output directory")]
    OutputError { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for djorder operations
pub type Result<T> = std::result::Result<T, DjorderError>;

impl DjorderError {
    /// Returns true if this error is recoverable (null the file's fields, continue batch)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DjorderError::DecodeError { .. }
                | DjorderError::UnsupportedFormat { .. }
                | DjorderError::AnalysisError { .. }
                | DjorderError::ArtworkError { .. }
                | DjorderError::FileNotFound(_)
        )
    }

    /// Returns true if this error was caused by the caller's track list
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            DjorderError::MalformedInput(_)
                | DjorderError::InvalidTrack { .. }
                | DjorderError::TooManyTracks { .. }
        )
    }

    /// Create a decode error with context about the issue
    pub fn decode_error(file: impl Into<String>, reason: impl Into<String>) -> Self {
        DjorderError::DecodeError {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Create an output error, checking for common issues
    pub fn output_error(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        let reason = match err.kind() {
            std::io::ErrorKind::PermissionDenied => {
                format!("Permission denied. Check that you have write access to {}", path.display())
            }
            std::io::ErrorKind::NotFound => {
                format!("Directory does not exist: {}", path.parent().map(|p| p.display().to_string()).unwrap_or_default())
            }
            _ => err.to_string(),
        };
        DjorderError::OutputError { path, reason }
    }
}

impl From<serde_json::Error> for DjorderError {
    fn from(err: serde_json::Error) -> Self {
        DjorderError::MalformedInput(err.to_string())
    }
}

/// Extension trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error about which file was being analyzed
    fn with_file_context(self, file: &str) -> Result<T>;
}

impl<T, E: std::fmt::Display> ErrorContext<T> for std::result::Result<T, E> {
    fn with_file_context(self, file: &str) -> Result<T> {
        self.map_err(|e| DjorderError::AnalysisError {
            file: file.to_string(),
            reason: e.to_string(),
        })
    }
}
