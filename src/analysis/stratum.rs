//! Stratum-DSP based audio analysis
//!
//! This module provides BPM and key detection using the stratum-dsp library,
//! a pure-Rust implementation designed specifically for DJ applications.
//! Only the opening window of each file is decoded; a single analysis pass
//! yields both tempo and key.

use crate::analysis::traits::FeatureExtractor;
use crate::audio::decode_bytes;
use crate::error::{DjorderError, ErrorContext, Result};
use crate::types::{AudioBuffer, AudioFeatures, BpmResult, KeyResult, Mode, PitchClass};
use stratum_dsp::{analyze_audio, AnalysisConfig, Key};
use tracing::debug;

/// Seconds of audio analyzed per file
pub const DEFAULT_WINDOW_SECS: f64 = 20.0;

/// Below this the tempo estimate is meaningless
pub const MIN_AUDIO_DURATION_SECS: f64 = 3.0;

/// Tempo/key extractor using stratum-dsp
///
/// Uses autocorrelation and comb filterbank analysis for tempo, and
/// chroma-based template matching for key.
pub struct StratumExtractor {
    window_secs: f64,
}

impl StratumExtractor {
    pub fn new(window_secs: f64) -> Self {
        Self { window_secs }
    }

    pub fn window_secs(&self) -> f64 {
        self.window_secs
    }

    /// Run stratum-dsp over an already decoded buffer
    pub fn analyze_buffer(&self, name: &str, buffer: &AudioBuffer) -> Result<AudioFeatures> {
        if buffer.duration < MIN_AUDIO_DURATION_SECS {
            return Err(DjorderError::AnalysisError {
                file: name.to_string(),
                reason: format!(
                    "Audio too short ({:.1}s, need at least {:.0}s)",
                    buffer.duration, MIN_AUDIO_DURATION_SECS
                ),
            });
        }

        debug!(
            "Analyzing with stratum-dsp ({} samples, {}Hz)",
            buffer.len(),
            buffer.sample_rate
        );

        let result = analyze_audio(&buffer.samples, buffer.sample_rate, AnalysisConfig::default())
            .with_file_context(name)?;

        let bpm = BpmResult {
            value: result.bpm as f64,
            confidence: result.bpm_confidence as f64,
        };

        if !bpm.value.is_finite() || bpm.value <= 0.0 {
            return Err(DjorderError::AnalysisError {
                file: name.to_string(),
                reason: format!("No usable tempo detected ({})", bpm.value),
            });
        }

        let (pitch_idx, mode) = match result.key {
            Key::Major(idx) => (idx, Mode::Major),
            Key::Minor(idx) => (idx, Mode::Minor),
        };
        let pitch_class =
            PitchClass::from_index(pitch_idx as u8).ok_or_else(|| DjorderError::AnalysisError {
                file: name.to_string(),
                reason: format!("Key index out of range: {}", pitch_idx),
            })?;

        let key = KeyResult {
            pitch_class,
            mode,
            confidence: result.key_confidence as f64,
        };

        debug!(
            "{}: {:.2} BPM (confidence {:.2}), {:?} {:?} -> {} (confidence {:.2})",
            name,
            bpm.value,
            bpm.confidence,
            key.pitch_class,
            key.mode,
            key.major_label(),
            key.confidence
        );

        Ok(AudioFeatures { bpm, key })
    }
}

impl Default for StratumExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SECS)
    }
}

impl FeatureExtractor for StratumExtractor {
    fn extract(&self, name: &str, bytes: &[u8]) -> Result<AudioFeatures> {
        let buffer = decode_bytes(name, bytes.to_vec(), self.window_secs)?;
        self.analyze_buffer(name, &buffer)
    }

    fn name(&self) -> &'static str {
        "stratum-dsp"
    }
}
