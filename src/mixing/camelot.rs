//! Camelot Wheel key adjacency
//!
//! The Camelot Wheel is a visual representation of musical keys that
//! makes harmonic mixing intuitive for DJs.
//!
//! - Numbers 1-12 represent positions on the wheel
//! - 'A' suffix = minor key, 'B' suffix = major key
//! - Adjacent numbers are harmonically compatible (perfect fifth)
//! - Same number, different letter = relative major/minor

use crate::types::{Mode, PitchClass};
use std::fmt;
use std::str::FromStr;

/// Wheel position of each major key, indexed by pitch class (C = 0 ... B = 11)
///
/// Layout:
/// ```text
///      5A      5B
///    /    \  /    \
///  4A      4B      6B
///  |       |       |
///  3A      3B      7B
///    \    /  \    /
///      2A      8B
///       ...
/// ```
const MAJOR_POSITIONS: [u8; 12] = [
    8,  // C
    3,  // C#
    10, // D
    5,  // D#
    12, // E
    7,  // F
    2,  // F#
    9,  // G
    4,  // G#
    11, // A
    6,  // A#
    1,  // B
];

/// A key's place on the Camelot wheel (e.g. "8B")
///
/// `position` is always within 1..=12; the only constructors validate or wrap it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CamelotCode {
    position: u8,
    mode: Mode,
}

impl CamelotCode {
    /// Create a code, rejecting positions outside 1..=12
    pub fn new(position: u8, mode: Mode) -> Option<Self> {
        (1..=12)
            .contains(&position)
            .then_some(Self { position, mode })
    }

    /// Camelot code for any of the 24 keys
    pub fn from_key(pitch: PitchClass, mode: Mode) -> Self {
        let major = match mode {
            Mode::Major => pitch,
            // A minor key sits at the same position as its relative major
            Mode::Minor => pitch.transpose(3),
        };
        Self {
            position: MAJOR_POSITIONS[major.to_index() as usize],
            mode,
        }
    }

    pub fn position(self) -> u8 {
        self.position
    }

    pub fn mode(self) -> Mode {
        self.mode
    }

    /// Wheel letter: 'A' for minor, 'B' for major
    pub fn letter(self) -> char {
        match self.mode {
            Mode::Minor => 'A',
            Mode::Major => 'B',
        }
    }

    /// One step clockwise, 12 wraps to 1
    pub fn clockwise(self) -> Self {
        Self {
            position: (self.position % 12) + 1,
            mode: self.mode,
        }
    }

    /// One step counterclockwise, 1 wraps to 12
    pub fn counterclockwise(self) -> Self {
        let wrapped = (i16::from(self.position) - 2).rem_euclid(12) as u8;
        Self {
            position: wrapped + 1,
            mode: self.mode,
        }
    }

    /// Same position, other mode (relative major/minor)
    pub fn relative(self) -> Self {
        let mode = match self.mode {
            Mode::Major => Mode::Minor,
            Mode::Minor => Mode::Major,
        };
        Self {
            position: self.position,
            mode,
        }
    }

    /// Keys that mix cleanly out of this one
    ///
    /// - Same key
    /// - +1/-1 on the wheel (perfect fifth relationship)
    /// - Same number, opposite letter (relative major/minor)
    pub fn neighbors(self) -> [CamelotCode; 4] {
        [
            self,
            self.clockwise(),
            self.counterclockwise(),
            self.relative(),
        ]
    }

    /// Whether `next` is one of this key's neighbors
    pub fn accepts(self, next: CamelotCode) -> bool {
        self.neighbors().contains(&next)
    }
}

/// Camelot code for a major-key label ("C", "F#", ...)
///
/// Returns `None` for anything outside the twelve sharp-spelled labels.
pub fn to_camelot_code(label: &str) -> Option<CamelotCode> {
    PitchClass::from_label(label).map(|pitch| CamelotCode::from_key(pitch, Mode::Major))
}

impl fmt::Display for CamelotCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.position, self.letter())
    }
}

/// Error returned when parsing a malformed Camelot code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCamelotError(String);

impl fmt::Display for ParseCamelotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid Camelot code '{}' (expected 1A-12B)", self.0)
    }
}

impl std::error::Error for ParseCamelotError {}

impl FromStr for CamelotCode {
    type Err = ParseCamelotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCamelotError(s.to_string());
        let trimmed = s.trim();
        let letter = trimmed.chars().last().ok_or_else(err)?;
        let mode = match letter.to_ascii_uppercase() {
            'A' => Mode::Minor,
            'B' => Mode::Major,
            _ => return Err(err()),
        };
        let number: u8 = trimmed[..trimmed.len() - 1].parse().map_err(|_| err())?;
        CamelotCode::new(number, mode).ok_or_else(err)
    }
}
