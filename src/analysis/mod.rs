//! Audio analysis modules
//!
//! This module provides traits for analysis backends and concrete implementations.
//! The trait abstraction allows swapping backends without changing pipeline code.

pub mod artwork;
pub mod stratum;
pub mod traits;

pub use traits::{ArtworkExtractor, FeatureExtractor};

// Real implementations
pub use artwork::LoftyArtworkExtractor;
pub use stratum::StratumExtractor;
