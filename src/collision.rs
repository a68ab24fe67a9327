//! Per-tick collision and pass-through scoring over the obstacle stream.

use crate::geom::{Rect, Size, overlaps};
use crate::obstacle::{ObstaclePair, lower_rect, upper_rect};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// The actor touched at least one barrier.
    pub collided: bool,
    /// Pairs newly passed this tick.
    pub passed: u32,
}

pub fn hits_pair(actor: &Rect, pair: &ObstaclePair, size: Size, offset: f64) -> bool {
    overlaps(actor, &upper_rect(pair, size, offset)) || overlaps(actor, &lower_rect(pair, size, offset))
}

/// Test every pair against the actor. A pair is passed once its right edge
/// is strictly left of the actor's left edge; each pair is counted at most once.
pub fn evaluate<'a>(
    actor: &Rect,
    pairs: impl IntoIterator<Item = &'a mut ObstaclePair>,
    size: Size,
    offset: f64,
) -> Evaluation {
    let mut eval = Evaluation::default();
    for pair in pairs {
        if hits_pair(actor, pair, size, offset) {
            eval.collided = true;
        }
        if !pair.scored && pair.x + size.w < actor.x {
            pair.scored = true;
            eval.passed += 1;
        }
    }
    eval
}
