//! Runtime configuration settings

use super::cli::{AnalysisArgs, AnalyzeArgs, OrderArgs, ServeArgs};
use crate::analysis::stratum::DEFAULT_WINDOW_SECS;
use std::path::PathBuf;

/// Worker threads when none are requested: leave one core for I/O
fn default_threads() -> usize {
    num_cpus::get().saturating_sub(1).max(1)
}

/// Audio analyzer tuning
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    /// Number of analysis worker threads
    pub threads: usize,
    /// Seconds of audio analyzed per file
    pub window_secs: f64,
}

impl AnalysisSettings {
    pub fn from_cli(args: &AnalysisArgs) -> Self {
        Self {
            threads: args.threads.unwrap_or_else(default_threads).max(1),
            window_secs: args.window,
        }
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            window_secs: DEFAULT_WINDOW_SECS,
        }
    }
}

/// Runtime settings for the HTTP service
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Request body limit for uploads, in bytes
    pub max_upload_bytes: usize,
    /// Largest track list /order will sequence
    pub max_tracks: usize,
    pub analysis: AnalysisSettings,
}

impl ServerSettings {
    pub fn from_cli(args: &ServeArgs) -> Self {
        Self {
            host: args.host.clone(),
            port: args.port,
            max_upload_bytes: args.max_upload_mb.saturating_mul(1024 * 1024),
            max_tracks: args.max_tracks,
            analysis: AnalysisSettings::from_cli(&args.analysis),
        }
    }

    /// "host:port" for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            max_upload_bytes: 512 * 1024 * 1024,
            max_tracks: 5000,
            analysis: AnalysisSettings::default(),
        }
    }
}

/// Runtime settings for ordering a track list file
#[derive(Debug, Clone, Default)]
pub struct OrderSettings {
    pub input: PathBuf,
    /// `None` writes to stdout
    pub output: Option<PathBuf>,
}

impl OrderSettings {
    pub fn from_cli(args: &OrderArgs) -> Self {
        Self {
            input: args.input.clone(),
            output: args.output.clone(),
        }
    }
}

/// Runtime settings for analyzing files on disk
#[derive(Debug, Clone)]
pub struct AnalyzeSettings {
    /// Input path (file or directory)
    pub input: PathBuf,
    /// Output JSON file
    pub output: PathBuf,
    /// Scan recursively
    pub recursive: bool,
    /// Sequence the records before writing
    pub order: bool,
    /// Show progress bars
    pub show_progress: bool,
    pub analysis: AnalysisSettings,
}

impl AnalyzeSettings {
    pub fn from_cli(args: &AnalyzeArgs, quiet: bool) -> Self {
        Self {
            input: args.input.clone(),
            output: args.output.clone(),
            recursive: args.recursive,
            order: args.order,
            show_progress: !quiet,
            analysis: AnalysisSettings::from_cli(&args.analysis),
        }
    }
}

impl Default for AnalyzeSettings {
    fn default() -> Self {
        Self {
            input: PathBuf::from("."),
            output: PathBuf::from("./djorder.json"),
            recursive: false,
            order: false,
            show_progress: true,
            analysis: AnalysisSettings::default(),
        }
    }
}
