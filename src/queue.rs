//! The global event queue: a min-heap over predicted collision time,
//! ties broken by body indices, that never deletes stale entries.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use priority_queue::PriorityQueue;

use crate::body::BodyId;
use crate::event::{EventKey, Fingerprint};

type Priority = Reverse<(OrderedFloat<f64>, usize, BodyId)>;

#[derive(Default)]
pub struct EventQueue {
    heap: PriorityQueue<EventKey, Priority>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        EventQueue {
            heap: PriorityQueue::new(),
            next_seq: 0,
        }
    }

    /// Push a candidate collision between ball `i` and `other` at
    /// absolute time `t`, fingerprinted with `fingerprint`.
    pub fn push(&mut self, t: f64, i: usize, other: BodyId, fingerprint: Fingerprint) {
        let key = EventKey {
            seq: self.next_seq,
            i,
            other,
            fingerprint,
        };
        self.next_seq += 1;
        self.heap
            .push(key, Reverse((OrderedFloat(t), i, other)));
    }

    /// Pop the earliest-predicted event, without checking staleness.
    /// Returns the key and its absolute predicted time.
    pub fn pop(&mut self) -> Option<(EventKey, f64)> {
        self.heap
            .pop()
            .map(|(key, Reverse((t, _, _)))| (key, t.into_inner()))
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_time_order() {
        let mut q = EventQueue::new();
        q.push(3.0, 0, BodyId::Ball(1), Fingerprint::BallContainer([OrderedFloat(0.0); 2]));
        q.push(1.0, 2, BodyId::Ball(3), Fingerprint::BallContainer([OrderedFloat(0.0); 2]));
        q.push(2.0, 4, BodyId::Ball(5), Fingerprint::BallContainer([OrderedFloat(0.0); 2]));

        let (_, t0) = q.pop().unwrap();
        let (_, t1) = q.pop().unwrap();
        let (_, t2) = q.pop().unwrap();
        assert_eq!((t0, t1, t2), (1.0, 2.0, 3.0));
    }

    #[test]
    fn ties_break_on_indices() {
        let mut q = EventQueue::new();
        q.push(1.0, 5, BodyId::Ball(6), Fingerprint::BallContainer([OrderedFloat(0.0); 2]));
        q.push(1.0, 1, BodyId::Ball(2), Fingerprint::BallContainer([OrderedFloat(0.0); 2]));
        q.push(1.0, 1, BodyId::Ball(9), Fingerprint::BallContainer([OrderedFloat(0.0); 2]));

        let (k0, _) = q.pop().unwrap();
        let (k1, _) = q.pop().unwrap();
        let (k2, _) = q.pop().unwrap();
        assert_eq!((k0.i, k0.other), (1, BodyId::Ball(2)));
        assert_eq!((k1.i, k1.other), (1, BodyId::Ball(9)));
        assert_eq!((k2.i, k2.other), (5, BodyId::Ball(6)));
    }

    #[test]
    fn duplicate_pairs_do_not_overwrite_each_other() {
        let mut q = EventQueue::new();
        let fp = Fingerprint::BallContainer([OrderedFloat(0.0); 2]);
        q.push(5.0, 0, BodyId::Ball(1), fp);
        q.push(2.0, 0, BodyId::Ball(1), fp);
        assert_eq!(q.len(), 2);
    }
}
