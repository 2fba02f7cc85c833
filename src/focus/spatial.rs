//! Spatial candidate selection
//!
//! Given the origin's bounding box and the candidates in traversal order,
//! picks the best target in a direction:
//!
//! 1. Keep candidates whose center lies strictly on the requested side.
//! 2. Score `10 × primary + 3 × orthogonal` on doubled centers.
//! 3. Lowest score wins; ties go to the smaller orthogonal offset, then to
//!    the earlier candidate in traversal order.
//!
//! Integer arithmetic only, so the same layout always yields the same path.

use serde::{Deserialize, Serialize};

use super::node::Rect;

/// Directional input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Whether this direction walks forward in traversal order
    pub fn is_forward(self) -> bool {
        matches!(self, Direction::Down | Direction::Right)
    }
}

/// Best candidate index in `candidates` from `origin` towards `dir`
pub fn best_candidate(origin: &Rect, dir: Direction, candidates: &[(&str, Rect)]) -> Option<usize> {
    let oc = origin.center2();

    let mut best: Option<(usize, (i64, i64))> = None;
    for (idx, (_, rect)) in candidates.iter().enumerate() {
        let cc = rect.center2();
        let Some((primary, ortho)) = offsets(oc, cc, dir) else {
            continue;
        };
        let rank = (10 * primary + 3 * ortho, ortho);

        // Strict comparison keeps the earliest candidate on a full tie
        if best.map_or(true, |(_, best_rank)| rank < best_rank) {
            best = Some((idx, rank));
        }
    }

    best.map(|(idx, _)| idx)
}

/// Primary and orthogonal distance, or `None` when `candidate` is not in
/// the half-plane `dir` points at
fn offsets(origin: (i64, i64), candidate: (i64, i64), dir: Direction) -> Option<(i64, i64)> {
    let (ox, oy) = origin;
    let (cx, cy) = candidate;
    let (primary, ortho) = match dir {
        Direction::Up => (oy - cy, (ox - cx).abs()),
        Direction::Down => (cy - oy, (ox - cx).abs()),
        Direction::Left => (ox - cx, (oy - cy).abs()),
        Direction::Right => (cx - ox, (oy - cy).abs()),
    };
    (primary > 0).then_some((primary, ortho))
}
