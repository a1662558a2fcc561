//! Event fingerprinting and the queue key built from it.

use ordered_float::OrderedFloat;

use crate::ball::Ball;
use crate::body::BodyId;

/// Snapshot of the velocities a candidate event was computed against.
///
/// Recomputed at pop time and compared bitwise (via `OrderedFloat`'s
/// total order over the raw bits) against the value stored on the
/// event: any intervening collision changes a velocity component and
/// therefore the fingerprint, so equality is a sound staleness check
/// with no tolerance band to tune.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Fingerprint {
    BallBall([OrderedFloat<f64>; 4]),
    BallContainer([OrderedFloat<f64>; 2]),
}

impl Fingerprint {
    pub fn of_ball_ball(a: &Ball, b: &Ball) -> Self {
        Fingerprint::BallBall([
            OrderedFloat(a.velocity.x),
            OrderedFloat(a.velocity.y),
            OrderedFloat(b.velocity.x),
            OrderedFloat(b.velocity.y),
        ])
    }

    pub fn of_ball_container(a: &Ball) -> Self {
        Fingerprint::BallContainer([OrderedFloat(a.velocity.x), OrderedFloat(a.velocity.y)])
    }
}

/// Identity of one queued candidate collision.
///
/// `seq` is a monotonically increasing counter assigned at push time; it
/// exists solely so that two candidates for the same `(i, other)` pair
/// pushed at different times never collide as hash-map keys, since
/// [`priority_queue::PriorityQueue`] is keyed by item identity and would
/// otherwise silently replace an older, still-live entry instead of
/// growing the queue the way the lazy-invalidation discipline expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EventKey {
    pub seq: u64,
    pub i: usize,
    pub other: BodyId,
    pub fingerprint: Fingerprint,
}
