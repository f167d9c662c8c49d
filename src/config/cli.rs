//! CLI argument parsing and configuration

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// djorder - Harmonic track sequencing for DJs
///
/// Orders a set of tracks so that consecutive tracks mix cleanly: keys
/// adjacent on the Camelot wheel, tempos close together. Can also analyze
/// audio files for tempo, key and cover art, either over HTTP or from disk.
#[derive(Parser, Debug)]
#[command(name = "djorder")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only, no progress bars)
    #[arg(short, long, default_value = "false", global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP service (/order, /upload, /health)
    Serve(ServeArgs),
    /// Order a JSON track list
    Order(OrderArgs),
    /// Analyze audio files on disk
    Analyze(AnalyzeArgs),
}

/// Options shared by everything that runs the audio analyzer
#[derive(Args, Debug, Clone)]
pub struct AnalysisArgs {
    /// Number of analysis worker threads (defaults to CPU count - 1)
    #[arg(short = 'j', long, value_name = "N", env = "DJORDER_THREADS")]
    pub threads: Option<usize>,

    /// Seconds of audio analyzed from the start of each file
    #[arg(long, value_name = "SECS", default_value_t = 20.0)]
    pub window: f64,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1", env = "DJORDER_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 5000, env = "DJORDER_PORT")]
    pub port: u16,

    /// Largest accepted upload request, in megabytes
    #[arg(long, value_name = "MB", default_value_t = 512)]
    pub max_upload_mb: usize,

    /// Largest track list accepted by /order
    #[arg(long, value_name = "N", default_value_t = 5000)]
    pub max_tracks: usize,

    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

#[derive(Args, Debug)]
pub struct OrderArgs {
    /// JSON array of tracks ({"title", "bpm", "key", ...})
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Where to write the ordered list (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Input path (file or directory)
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Output JSON file
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Scan subdirectories recursively
    #[arg(short, long, default_value = "false")]
    pub recursive: bool,

    /// Write the records in mixing order instead of file order
    #[arg(long, default_value = "false")]
    pub order: bool,

    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

impl Cli {
    /// Get the log level based on verbosity flags (`--quiet` wins)
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            return tracing::Level::ERROR;
        }
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
