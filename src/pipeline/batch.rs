//! Batch analysis of audio files
//!
//! Every file goes through the feature extractor and the artwork extractor
//! independently. A failure in one extractor, or in one file, never affects
//! anything else in the batch; it is recorded as `Extracted::Failed` and
//! logged.

use crate::analysis::{
    ArtworkExtractor, FeatureExtractor, LoftyArtworkExtractor, StratumExtractor,
};
use crate::config::AnalysisSettings;
use crate::types::{Extracted, FileAnalysis, TrackRecord};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One file as received from a client
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Runs both extractors over a batch of files in parallel
#[derive(Clone)]
pub struct BatchAnalyzer {
    features: Arc<dyn FeatureExtractor>,
    artwork: Arc<dyn ArtworkExtractor>,
}

impl BatchAnalyzer {
    pub fn new(features: Arc<dyn FeatureExtractor>, artwork: Arc<dyn ArtworkExtractor>) -> Self {
        Self { features, artwork }
    }

    /// stratum-dsp features and lofty artwork
    pub fn from_settings(settings: &AnalysisSettings) -> Self {
        Self::new(
            Arc::new(StratumExtractor::new(settings.window_secs)),
            Arc::new(LoftyArtworkExtractor::new()),
        )
    }

    /// Analyze one file; never fails as a whole
    pub fn analyze_one(&self, name: &str, bytes: &[u8]) -> FileAnalysis {
        debug!("Analyzing: {}", name);

        let features = match self.features.extract(name, bytes) {
            Ok(features) => Extracted::Value(features),
            Err(e) => {
                warn!("{} could not analyze {}: {}", self.features.name(), name, e);
                Extracted::Failed(e.to_string())
            }
        };

        let artwork = match self.artwork.extract(name, bytes) {
            Ok(Some(artwork)) => Extracted::Value(artwork),
            Ok(None) => Extracted::Absent,
            Err(e) => {
                warn!("{} could not read artwork from {}: {}", self.artwork.name(), name, e);
                Extracted::Failed(e.to_string())
            }
        };

        FileAnalysis {
            title: name.to_string(),
            features,
            artwork,
        }
    }

    /// Analyze a batch, returning results in input order
    pub fn analyze(&self, files: &[UploadedFile]) -> Vec<FileAnalysis> {
        let results: Vec<FileAnalysis> = files
            .par_iter()
            .map(|file| self.analyze_one(&file.name, &file.bytes))
            .collect();

        let summary = BatchSummary::from_results(&results);
        info!(
            "Analyzed {} files: {} with tempo/key, {} failed, {} with artwork",
            summary.total, summary.analyzed, summary.failed, summary.with_artwork
        );

        results
    }
}

/// Flatten analyses into wire records, preserving order
pub fn records(results: &[FileAnalysis]) -> Vec<TrackRecord> {
    results.iter().map(FileAnalysis::record).collect()
}

/// Batch result summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub total: usize,
    /// Files with tempo and key
    pub analyzed: usize,
    /// Files whose tempo/key extraction failed
    pub failed: usize,
    pub with_artwork: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[FileAnalysis]) -> Self {
        Self {
            total: results.len(),
            analyzed: results.iter().filter(|r| r.features.value().is_some()).count(),
            failed: results.iter().filter(|r| r.features.is_failed()).count(),
            with_artwork: results.iter().filter(|r| r.artwork.value().is_some()).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DjorderError, Result};
    use crate::types::{AudioFeatures, BpmResult, KeyResult, Mode, PitchClass};

    /// Reads "bpm:key" from the file contents; anything else fails
    struct TextFeatures;

    impl FeatureExtractor for TextFeatures {
        fn extract(&self, name: &str, bytes: &[u8]) -> Result<AudioFeatures> {
            let text = std::str::from_utf8(bytes).unwrap_or_default();
            let parsed = text.split_once(':').and_then(|(bpm, key)| {
                Some((bpm.parse::<f64>().ok()?, PitchClass::from_label(key)?))
            });
            let (bpm, pitch_class) =
                parsed.ok_or_else(|| DjorderError::decode_error(name, "not a fixture"))?;
            Ok(AudioFeatures {
                bpm: BpmResult {
                    value: bpm,
                    confidence: 1.0,
                },
                key: KeyResult {
                    pitch_class,
                    mode: Mode::Major,
                    confidence: 1.0,
                },
            })
        }

        fn name(&self) -> &'static str {
            "text"
        }
    }

    struct NoArtwork;

    impl ArtworkExtractor for NoArtwork {
        fn extract(&self, name: &str, _bytes: &[u8]) -> Result<Option<String>> {
            if name.ends_with(".broken") {
                return Err(DjorderError::ArtworkError {
                    file: name.to_string(),
                    reason: "bad tag".to_string(),
                });
            }
            Ok(None)
        }

        fn name(&self) -> &'static str {
            "none"
        }
    }

    fn analyzer() -> BatchAnalyzer {
        BatchAnalyzer::new(Arc::new(TextFeatures), Arc::new(NoArtwork))
    }

    fn upload(name: &str, contents: &str) -> UploadedFile {
        UploadedFile {
            name: name.to_string(),
            bytes: contents.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_batch_preserves_order_and_isolates_failures() {
        let files: Vec<UploadedFile> = (0..40)
            .map(|i| {
                if i % 7 == 3 {
                    upload(&format!("{:02}.mp3", i), "garbage")
                } else {
                    upload(&format!("{:02}.mp3", i), &format!("{}.4:G", 100 + i))
                }
            })
            .collect();

        let results = analyzer().analyze(&files);
        assert_eq!(results.len(), 40);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.title, format!("{:02}.mp3", i));
            assert_eq!(result.features.is_failed(), i % 7 == 3);
        }

        let records = records(&results);
        assert_eq!(records[0].bpm, Some(100));
        assert_eq!(records[0].key.as_deref(), Some("G"));
        assert_eq!(records[3].bpm, None);
        assert_eq!(records[3].key, None);
    }

    #[test]
    fn test_artwork_failure_does_not_touch_features() {
        let result = analyzer().analyze_one("a.broken", b"128:C");
        assert!(result.artwork.is_failed());
        assert_eq!(result.record().bpm, Some(128));
    }

    #[test]
    fn test_summary_counts() {
        let files = vec![
            upload("a.mp3", "120:C"),
            upload("b.broken", "x"),
            upload("c.mp3", "90:A"),
        ];
        let summary = BatchSummary::from_results(&analyzer().analyze(&files));
        assert_eq!(
            summary,
            BatchSummary {
                total: 3,
                analyzed: 2,
                failed: 1,
                with_artwork: 0,
            }
        );
    }

    #[test]
    fn test_empty_batch() {
        assert!(analyzer().analyze(&[]).is_empty());
    }
}
