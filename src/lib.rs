//! djorder - Harmonic track sequencing for DJs
//!
//! Orders a set of tracks so that each transition is harmonically compatible
//! (Camelot wheel neighbors) and close in tempo, using a greedy
//! nearest-neighbor walk. Audio files can be analyzed for tempo, key and
//! cover art first, over HTTP or from disk.
//!
//! # Architecture
//!
//! The library is organized into several key modules:
//!
//! - `mixing`: Camelot key adjacency, transition scoring and the sequencer
//! - `config`: CLI argument parsing and runtime settings
//! - `discovery`: Audio file scanning
//! - `audio`: Audio decoding using symphonia
//! - `analysis`: Tempo/key and artwork extraction (with swappable backends)
//! - `pipeline`: Parallel batch analysis and the command line flows
//! - `export`: JSON input and output
//! - `server`: The HTTP service
//!
//! # Example
//!
//! ```
//! use djorder::{order_tracks, TrackDescriptor};
//!
//! let tracks = vec![
//!     TrackDescriptor::new("a.mp3", Some(120.0), Some("C")),
//!     TrackDescriptor::new("b.mp3", Some(122.0), Some("G")),
//!     TrackDescriptor::new("c.mp3", Some(90.0), Some("F#")),
//! ];
//! let ordered = order_tracks(tracks).expect("valid tempos");
//! let titles: Vec<&str> = ordered.iter().map(|t| t.title.as_str()).collect();
//! assert_eq!(titles, ["c.mp3", "a.mp3", "b.mp3"]);
//! ```

pub mod analysis;
pub mod audio;
pub mod config;
pub mod discovery;
pub mod error;
pub mod export;
pub mod mixing;
pub mod pipeline;
pub mod server;
pub mod types;

// Re-export key types at crate root
pub use error::{DjorderError, Result};
pub use mixing::{order_tracks, score, to_camelot_code};
pub use types::{AudioBuffer, BpmResult, FileAnalysis, KeyResult, TrackDescriptor, TrackRecord};
