//! Analysis trait abstractions
//!
//! These traits define the interface for swappable analysis backends.
//! Current implementations use stratum-dsp for tempo/key detection and
//! lofty for embedded artwork. Tests swap in fakes.

use crate::error::Result;
use crate::types::AudioFeatures;

/// Tempo and key detection backend
pub trait FeatureExtractor: Send + Sync {
    /// Detect tempo and key from a complete audio file held in memory
    ///
    /// `name` is the file name as uploaded; it provides the format hint.
    fn extract(&self, name: &str, bytes: &[u8]) -> Result<AudioFeatures>;

    /// Get the name of this extractor (for logging)
    fn name(&self) -> &'static str;
}

/// Embedded cover art backend
pub trait ArtworkExtractor: Send + Sync {
    /// Base64-encoded JPEG of the file's cover art
    ///
    /// `Ok(None)` means the file carries no picture.
    fn extract(&self, name: &str, bytes: &[u8]) -> Result<Option<String>>;

    /// Get the name of this extractor (for logging)
    fn name(&self) -> &'static str;
}
