//! Harmonic mixing core
//!
//! Key adjacency on the Camelot wheel, the pairwise transition cost, and the
//! greedy sequencer built on top of it. Everything here is pure and
//! synchronous; the only shared data is the constant key table.

pub mod camelot;
pub mod scorer;
pub mod sequencer;

pub use camelot::{to_camelot_code, CamelotCode};
pub use scorer::{score, transition_cost, KeyRelation, TransitionCost, Transitionable};
pub use sequencer::{order_tracks, sequence, Sequence};
