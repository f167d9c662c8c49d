//! Audio file discovery on disk

pub mod scanner;

pub use scanner::{scan, DiscoveredFile};
