//! Transition cost between two tracks
//!
//! Cost = key penalty + tempo penalty. The key penalty dominates: a
//! harmonically ideal transition costs nothing for the key, a clashing key
//! costs 50 and an unknown key costs 100. The tempo penalty is half the BPM
//! gap, so even a gap of dozens of BPM does not outweigh a clean key change.
//!
//! # Symmetry
//!
//! `score(a, b) == score(b, a)` for every pair of tracks. The neighbor
//! relation is symmetric, the unknown-key and missing-tempo branches trigger
//! when either side is missing data, and the BPM gap is an absolute value.

use super::camelot::{to_camelot_code, CamelotCode};

/// Key penalty when either key is missing or unrecognized
pub const UNKNOWN_KEY_PENALTY: f64 = 100.0;

/// Key penalty for a recognized key that is not a wheel neighbor
pub const CLASHING_KEY_PENALTY: f64 = 50.0;

/// Key penalty for a wheel neighbor
pub const COMPATIBLE_KEY_PENALTY: f64 = 0.0;

/// Cost per BPM of tempo gap
pub const TEMPO_WEIGHT: f64 = 0.5;

/// Tempo penalty when either tempo is missing (same as a 100 BPM gap)
pub const MISSING_TEMPO_PENALTY: f64 = 50.0;

/// What the scorer needs to know about a track
pub trait Transitionable {
    /// Tempo in beats per minute, if analyzed
    fn tempo(&self) -> Option<f64>;

    /// Major-key label ("C" ... "B"), if analyzed
    fn key_label(&self) -> Option<&str>;
}

impl<T: Transitionable + ?Sized> Transitionable for &T {
    fn tempo(&self) -> Option<f64> {
        (**self).tempo()
    }

    fn key_label(&self) -> Option<&str> {
        (**self).key_label()
    }
}

impl Transitionable for crate::types::TrackDescriptor {
    fn tempo(&self) -> Option<f64> {
        self.bpm.as_ref().and_then(serde_json::Number::as_f64)
    }

    fn key_label(&self) -> Option<&str> {
        self.key.as_deref()
    }
}

/// How two keys relate on the wheel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRelation {
    /// Same key, adjacent position, or relative mode
    Compatible,
    /// Both keys known but not neighbors
    Clashing,
    /// At least one key missing or unrecognized
    Unknown,
}

impl KeyRelation {
    pub fn between(current: Option<&str>, next: Option<&str>) -> Self {
        let codes: Option<(CamelotCode, CamelotCode)> =
            current.and_then(to_camelot_code).zip(next.and_then(to_camelot_code));
        match codes {
            None => KeyRelation::Unknown,
            Some((from, to)) if from.accepts(to) => KeyRelation::Compatible,
            Some(_) => KeyRelation::Clashing,
        }
    }

    pub fn penalty(self) -> f64 {
        match self {
            KeyRelation::Compatible => COMPATIBLE_KEY_PENALTY,
            KeyRelation::Clashing => CLASHING_KEY_PENALTY,
            KeyRelation::Unknown => UNKNOWN_KEY_PENALTY,
        }
    }
}

/// Breakdown of one transition's cost
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionCost {
    pub key: KeyRelation,
    pub key_penalty: f64,
    /// `None` when either tempo is missing
    pub tempo_delta: Option<f64>,
    pub tempo_penalty: f64,
}

impl TransitionCost {
    pub fn total(&self) -> f64 {
        self.key_penalty + self.tempo_penalty
    }
}

/// Full cost breakdown for playing `next` straight after `current`
pub fn transition_cost<T: Transitionable + ?Sized>(current: &T, next: &T) -> TransitionCost {
    let key = KeyRelation::between(current.key_label(), next.key_label());
    let tempo_delta = current
        .tempo()
        .zip(next.tempo())
        .map(|(a, b)| (a - b).abs());
    let tempo_penalty = match tempo_delta {
        Some(delta) => TEMPO_WEIGHT * delta,
        None => MISSING_TEMPO_PENALTY,
    };

    TransitionCost {
        key,
        key_penalty: key.penalty(),
        tempo_delta,
        tempo_penalty,
    }
}

/// Scalar cost for playing `next` straight after `current` (always >= 0)
pub fn score<T: Transitionable + ?Sized>(current: &T, next: &T) -> f64 {
    transition_cost(current, next).total()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PitchClass, TrackDescriptor};

    fn track(key: Option<&str>, bpm: Option<f64>) -> TrackDescriptor {
        TrackDescriptor::new("t", bpm, key)
    }

    #[test]
    fn test_compatible_tier() {
        // G (9B) is clockwise of C (8B)
        let c = track(Some("C"), Some(120.0));
        let g = track(Some("G"), Some(122.0));
        assert_eq!(score(&c, &g), 0.0 + 0.5 * 2.0);

        // F (7B) is counterclockwise of C
        let f = track(Some("F"), Some(110.0));
        assert_eq!(score(&c, &f), 5.0);
        assert_eq!(transition_cost(&c, &f).key, KeyRelation::Compatible);
    }

    #[test]
    fn test_clashing_tier() {
        let fs = track(Some("F#"), Some(90.0));
        let c = track(Some("C"), Some(120.0));
        assert_eq!(score(&fs, &c), 50.0 + 15.0);
        assert_eq!(transition_cost(&fs, &c).key, KeyRelation::Clashing);
    }

    #[test]
    fn test_unknown_tier() {
        let known = track(Some("C"), Some(120.0));
        let missing = track(None, Some(100.0));
        let garbage = track(Some("Cmaj"), Some(100.0));
        assert_eq!(score(&known, &missing), 100.0 + 10.0);
        assert_eq!(score(&known, &garbage), 110.0);
        // Same tempo, so only the key penalty remains
        assert_eq!(score(&missing, &garbage), 100.0);
    }

    #[test]
    fn test_null_key_is_always_unknown_penalty() {
        let null_key = track(None, Some(128.0));
        for pitch in PitchClass::ALL {
            let other = track(Some(pitch.label()), Some(120.0));
            assert_eq!(score(&null_key, &other), 100.0 + 4.0);
            assert_eq!(score(&other, &null_key), 100.0 + 4.0);
        }
    }

    #[test]
    fn test_identical_tracks_cost_nothing() {
        let a = track(Some("A#"), Some(126.0));
        let b = track(Some("A#"), Some(126.0));
        assert_eq!(score(&a, &b), 0.0);
    }

    #[test]
    fn test_missing_tempo_uses_fixed_penalty() {
        let a = track(Some("C"), None);
        let b = track(Some("G"), Some(128.0));
        let cost = transition_cost(&a, &b);
        assert_eq!(cost.tempo_delta, None);
        assert_eq!(cost.tempo_penalty, MISSING_TEMPO_PENALTY);
        assert_eq!(score(&a, &b), 0.0 + MISSING_TEMPO_PENALTY);

        let both_missing = track(None, None);
        assert_eq!(score(&both_missing, &a), UNKNOWN_KEY_PENALTY + MISSING_TEMPO_PENALTY);
    }

    #[test]
    fn test_score_is_symmetric() {
        let mut keys: Vec<Option<&str>> = PitchClass::ALL.iter().map(|p| Some(p.label())).collect();
        keys.push(None);
        keys.push(Some("Ebm"));
        let tempos = [Some(90.0), Some(127.5), None];

        for ka in &keys {
            for kb in &keys {
                for ta in tempos {
                    for tb in tempos {
                        let a = track(*ka, ta);
                        let b = track(*kb, tb);
                        assert_eq!(
                            score(&a, &b),
                            score(&b, &a),
                            "{:?}/{:?} vs {:?}/{:?}",
                            ka,
                            ta,
                            kb,
                            tb
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_score_never_negative() {
        let a = track(Some("B"), Some(0.0));
        let b = track(Some("E"), Some(0.0));
        assert!(score(&a, &b) >= 0.0);
    }
}
