//! Cover art extraction from audio file tags
//!
//! Uses lofty to read pictures from ID3v2 (MP3/WAV/AIFF), Vorbis comments
//! (FLAC/OGG) and MP4 atoms. The chosen picture is re-encoded as JPEG and
//! returned base64-encoded so it can travel inside a JSON record.

use crate::analysis::traits::ArtworkExtractor;
use crate::error::{DjorderError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::ImageFormat;
use lofty::file::TaggedFileExt;
use lofty::picture::{Picture, PictureType};
use lofty::probe::Probe;
use std::io::Cursor;
use tracing::debug;

/// Artwork extractor backed by lofty and the image crate
#[derive(Debug, Default)]
pub struct LoftyArtworkExtractor;

impl LoftyArtworkExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl ArtworkExtractor for LoftyArtworkExtractor {
    fn extract(&self, name: &str, bytes: &[u8]) -> Result<Option<String>> {
        let artwork_error = |reason: String| DjorderError::ArtworkError {
            file: name.to_string(),
            reason,
        };

        let tagged_file = Probe::new(Cursor::new(bytes))
            .guess_file_type()
            .map_err(|e| artwork_error(format!("Failed to probe tags: {}", e)))?
            .read()
            .map_err(|e| artwork_error(format!("Failed to read tags: {}", e)))?;

        let pictures: Vec<&Picture> = tagged_file
            .tags()
            .iter()
            .flat_map(|tag| tag.pictures())
            .collect();

        let Some(picture) = pick_cover(&pictures) else {
            debug!("No embedded artwork in {}", name);
            return Ok(None);
        };

        encode_jpeg_base64(picture.data())
            .map(Some)
            .map_err(artwork_error)
    }

    fn name(&self) -> &'static str {
        "lofty"
    }
}

/// Front cover if tagged as such, otherwise the first picture
fn pick_cover<'a>(pictures: &[&'a Picture]) -> Option<&'a Picture> {
    pictures
        .iter()
        .find(|p| p.pic_type() == PictureType::CoverFront)
        .or_else(|| pictures.first())
        .copied()
}

/// Decode any supported image and re-encode it as base64 JPEG
pub fn encode_jpeg_base64(data: &[u8]) -> std::result::Result<String, String> {
    let decoded =
        image::load_from_memory(data).map_err(|e| format!("Unreadable picture data: {}", e))?;

    // JPEG has no alpha channel
    let rgb = image::DynamicImage::ImageRgb8(decoded.to_rgb8());

    let mut jpeg = Cursor::new(Vec::new());
    rgb.write_to(&mut jpeg, ImageFormat::Jpeg)
        .map_err(|e| format!("JPEG encoding failed: {}", e))?;

    Ok(STANDARD.encode(jpeg.into_inner()))
}
