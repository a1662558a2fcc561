//! Flat, indexable storage for the ball population plus the one
//! container, with no dynamic resizing once the simulation has started.

use crate::ball::Ball;
use crate::container::Container;
use crate::kinematics::advance_ball;

#[derive(Debug)]
pub struct BodyStore {
    balls: Vec<Ball>,
    container: Container,
}

impl BodyStore {
    pub fn new(container_radius: f64) -> Self {
        BodyStore {
            balls: Vec::new(),
            container: Container::new(container_radius),
        }
    }

    pub fn push(&mut self, ball: Ball) -> usize {
        self.balls.push(ball);
        self.balls.len() - 1
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn ball(&self, index: usize) -> &Ball {
        &self.balls[index]
    }

    pub fn ball_mut(&mut self, index: usize) -> &mut Ball {
        &mut self.balls[index]
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Advance every ball in free flight by `dt`.
    pub fn step_all(&mut self, dt: f64) {
        for ball in &mut self.balls {
            advance_ball(ball, dt);
        }
    }

    /// Borrow two distinct balls mutably at once.
    pub fn ball_pair_mut(&mut self, i: usize, j: usize) -> (&mut Ball, &mut Ball) {
        assert_ne!(i, j, "cannot borrow the same ball twice");
        if i < j {
            let (left, right) = self.balls.split_at_mut(j);
            (&mut left[i], &mut right[0])
        } else {
            let (left, right) = self.balls.split_at_mut(i);
            (&mut right[0], &mut left[j])
        }
    }
}
