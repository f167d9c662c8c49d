//! Core data types for djorder
//!
//! These types represent the domain model and flow through the pipeline.

use serde::{Deserialize, Serialize};

// =============================================================================
// Musical primitives
// =============================================================================

/// The 12 pitch classes in Western music
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PitchClass {
    C,
    Cs, // C#/Db
    D,
    Ds, // D#/Eb
    E,
    F,
    Fs, // F#/Gb
    G,
    Gs, // G#/Ab
    A,
    As, // A#/Bb
    B,
}

impl PitchClass {
    /// All pitch classes in chromatic order starting at C
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::Cs,
        PitchClass::D,
        PitchClass::Ds,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Fs,
        PitchClass::G,
        PitchClass::Gs,
        PitchClass::A,
        PitchClass::As,
        PitchClass::B,
    ];

    /// Convert from numeric index (0 = C, 1 = C#, ..., 11 = B)
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Convert to numeric index (0 = C, 1 = C#, ..., 11 = B)
    pub fn to_index(self) -> u8 {
        self as u8
    }

    /// Parse the sharp-only label used on the wire ("C", "C#", ... "B")
    ///
    /// Flats, lowercase and minor suffixes are not recognized.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.label() == label)
    }

    /// Standard notation (e.g., "C", "F#")
    pub fn label(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Cs => "C#",
            PitchClass::D => "D",
            PitchClass::Ds => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Fs => "F#",
            PitchClass::G => "G",
            PitchClass::Gs => "G#",
            PitchClass::A => "A",
            PitchClass::As => "A#",
            PitchClass::B => "B",
        }
    }

    /// Transpose up by a number of semitones
    pub fn transpose(self, semitones: u8) -> Self {
        Self::ALL[((self.to_index() + semitones) % 12) as usize]
    }
}

/// Major or Minor scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    Major,
    Minor,
}

// =============================================================================
// Analysis results
// =============================================================================

/// BPM analysis result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BpmResult {
    /// Primary detected BPM
    pub value: f64,
    /// Confidence score (0.0 - 1.0)
    pub confidence: f64,
}

impl BpmResult {
    /// Whole-number tempo as reported to clients (halves round to even)
    pub fn rounded(&self) -> u32 {
        self.value.round_ties_even().max(0.0) as u32
    }
}

/// Musical key analysis result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyResult {
    /// Detected tonic
    pub pitch_class: PitchClass,
    /// Major or Minor
    pub mode: Mode,
    /// Confidence score (0.0 - 1.0)
    pub confidence: f64,
}

impl KeyResult {
    /// Label of the major key sharing this key's wheel position
    ///
    /// Minor keys are reported as their relative major (three semitones up),
    /// so "A minor" becomes "C".
    pub fn major_label(&self) -> &'static str {
        match self.mode {
            Mode::Major => self.pitch_class.label(),
            Mode::Minor => self.pitch_class.transpose(3).label(),
        }
    }
}

/// Tempo and key detected for one audio file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub bpm: BpmResult,
    pub key: KeyResult,
}

/// Outcome of extracting one field for one file
///
/// Keeps "could not be analyzed" distinct from "nothing there to extract".
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted<T> {
    /// Extraction succeeded
    Value(T),
    /// The file has nothing to extract (e.g. no embedded picture)
    Absent,
    /// Extraction failed
    Failed(String),
}

impl<T> Extracted<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Extracted::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Extracted::Failed(_))
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            Extracted::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Complete analysis of one uploaded or scanned file
#[derive(Debug, Clone, PartialEq)]
pub struct FileAnalysis {
    /// Filename as uploaded (or file name on disk)
    pub title: String,
    pub features: Extracted<AudioFeatures>,
    /// Base64-encoded JPEG
    pub artwork: Extracted<String>,
}

impl FileAnalysis {
    /// Flatten to the wire record, nulling anything not extracted
    pub fn record(&self) -> TrackRecord {
        let features = self.features.value();
        TrackRecord {
            title: self.title.clone(),
            bpm: features.map(|f| f.bpm.rounded()),
            key: features.map(|f| f.key.major_label().to_string()),
            artwork: self.artwork.value().cloned(),
        }
    }
}

/// Wire record returned by the analysis endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub title: String,
    pub bpm: Option<u32>,
    pub key: Option<String>,
    pub artwork: Option<String>,
}

// =============================================================================
// Track representation
// =============================================================================

/// A track as submitted for sequencing
///
/// `bpm` keeps the JSON number exactly as received, and unknown fields are
/// carried in `extra`, so a track serializes back the way it came in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackDescriptor {
    pub title: String,
    #[serde(default)]
    pub bpm: Option<serde_json::Number>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TrackDescriptor {
    pub fn new(title: impl Into<String>, bpm: Option<f64>, key: Option<&str>) -> Self {
        Self {
            title: title.into(),
            bpm: bpm.and_then(serde_json::Number::from_f64),
            key: key.map(str::to_string),
            extra: serde_json::Map::new(),
        }
    }
}

impl From<TrackRecord> for TrackDescriptor {
    fn from(record: TrackRecord) -> Self {
        let mut extra = serde_json::Map::new();
        extra.insert(
            "artwork".to_string(),
            record
                .artwork
                .map(serde_json::Value::String)
                .unwrap_or(serde_json::Value::Null),
        );
        Self {
            title: record.title,
            bpm: record.bpm.map(serde_json::Number::from),
            key: record.key,
            extra,
        }
    }
}

// =============================================================================
// Audio buffer types
// =============================================================================

/// Decoded audio samples ready for analysis
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    /// Mono samples normalized to [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Duration in seconds
    pub duration: f64,
}

impl AudioBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        // Guard against division by zero - use 0 duration for invalid sample rate
        let duration = if sample_rate > 0 {
            samples.len() as f64 / sample_rate as f64
        } else {
            0.0
        };
        Self {
            samples,
            sample_rate,
            duration,
        }
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

// =============================================================================
// Supported formats
// =============================================================================

/// Audio formats supported by djorder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Wav,
    Flac,
    Aiff,
    Ogg,
    M4a,
}

impl AudioFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "mp3" => Some(AudioFormat::Mp3),
            "wav" => Some(AudioFormat::Wav),
            "flac" => Some(AudioFormat::Flac),
            "aiff" | "aif" => Some(AudioFormat::Aiff),
            "ogg" => Some(AudioFormat::Ogg),
            "m4a" | "mp4" => Some(AudioFormat::M4a),
            _ => None,
        }
    }
}
