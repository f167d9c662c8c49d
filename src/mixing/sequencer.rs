//! Greedy set ordering
//!
//! Nearest-neighbor walk over the transition cost: seed with the slowest
//! track, then repeatedly append the remaining track that is cheapest to
//! mix into from the current tail. No backtracking, O(n²) scores.

use super::scorer::{transition_cost, Transitionable, TransitionCost};
use crate::error::{DjorderError, Result};
use std::cmp::Ordering;
use tracing::{debug, trace};

/// Ordered tracks plus the cost of each transition between them
#[derive(Debug, Clone)]
pub struct Sequence<T> {
    pub tracks: Vec<T>,
    /// `transitions[i]` is the cost of going from `tracks[i]` to `tracks[i + 1]`
    pub transitions: Vec<TransitionCost>,
}

impl<T> Sequence<T> {
    /// Sum of all transition costs
    pub fn total_cost(&self) -> f64 {
        self.transitions.iter().map(TransitionCost::total).sum()
    }
}

/// Tracks not yet placed, as arena indices in tempo-ascending order
///
/// Removal keeps the order of the rest, so "first in current order" is well
/// defined for tie-breaking.
#[derive(Debug)]
struct RemainingSet {
    order: Vec<usize>,
}

impl RemainingSet {
    fn new(order: Vec<usize>) -> Self {
        Self { order }
    }

    fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Remove and return the candidate at `position`
    fn take(&mut self, position: usize) -> usize {
        self.order.remove(position)
    }

    /// Position of the cheapest candidate; ties go to the earliest
    fn cheapest<F>(&self, mut cost_of: F) -> Option<(usize, TransitionCost)>
    where
        F: FnMut(usize) -> TransitionCost,
    {
        let mut best: Option<(usize, TransitionCost)> = None;
        for (position, &index) in self.order.iter().enumerate() {
            let cost = cost_of(index);
            let better = match &best {
                None => true,
                Some((_, current)) => cost.total() < current.total(),
            };
            if better {
                best = Some((position, cost));
            }
        }
        best
    }
}

/// Order tracks for smooth key and tempo transitions
pub fn order_tracks<T: Transitionable>(tracks: Vec<T>) -> Result<Vec<T>> {
    sequence(tracks).map(|s| s.tracks)
}

/// Order tracks and report every transition cost
///
/// Fails without ordering anything if any tempo is negative or not finite.
pub fn sequence<T: Transitionable>(tracks: Vec<T>) -> Result<Sequence<T>> {
    validate(&tracks)?;

    let n = tracks.len();

    // Stable sort keeps input order among equal tempos
    let mut by_tempo: Vec<usize> = (0..n).collect();
    by_tempo.sort_by(|&a, &b| compare_tempo(&tracks[a], &tracks[b]));

    let mut remaining = RemainingSet::new(by_tempo);
    let mut placed: Vec<usize> = Vec::with_capacity(n);
    let mut transitions = Vec::with_capacity(n.saturating_sub(1));

    if !remaining.is_empty() {
        placed.push(remaining.take(0));
    }

    while let Some(&tail) = placed.last() {
        let Some((position, cost)) =
            remaining.cheapest(|candidate| transition_cost(&tracks[tail], &tracks[candidate]))
        else {
            break;
        };

        let next = remaining.take(position);
        trace!("Placed track {} after {} (cost {:.1})", next, tail, cost.total());
        placed.push(next);
        transitions.push(cost);
    }

    // Move each track out of the arena exactly once, in placement order
    let mut arena: Vec<Option<T>> = tracks.into_iter().map(Some).collect();
    let ordered: Vec<T> = placed
        .into_iter()
        .filter_map(|index| arena[index].take())
        .collect();

    debug!(
        "Sequenced {} tracks (total transition cost {:.1})",
        ordered.len(),
        transitions.iter().map(TransitionCost::total).sum::<f64>()
    );

    Ok(Sequence {
        tracks: ordered,
        transitions,
    })
}

/// Reject tempos the scorer cannot use
fn validate<T: Transitionable>(tracks: &[T]) -> Result<()> {
    for (index, track) in tracks.iter().enumerate() {
        if let Some(tempo) = track.tempo() {
            if !tempo.is_finite() {
                return Err(DjorderError::InvalidTrack {
                    index,
                    reason: format!("tempo must be a finite number, got {}", tempo),
                });
            }
            if tempo < 0.0 {
                return Err(DjorderError::InvalidTrack {
                    index,
                    reason: format!("tempo must not be negative, got {}", tempo),
                });
            }
        }
    }
    Ok(())
}

/// Ascending by tempo, missing tempos last
fn compare_tempo<T: Transitionable>(a: &T, b: &T) -> Ordering {
    match (a.tempo(), b.tempo()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
