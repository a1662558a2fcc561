//! Closed-form collision predicates and elastic impulse resolution.
//!
//! Every predicate here is a pure function of two bodies' current state;
//! none of them touch the event queue or global time. The scheduler adds
//! whatever absolute time offset is needed.

use crate::ball::Ball;
use crate::container::Container;

/// Smallest positive root of `|Δp + Δv·t|² = (r_i + r_j)²`, or `None` if
/// the balls are parallel, receding, tangent, or the quadratic has no
/// positive root.
pub fn time_to_ball_collision(a: &Ball, b: &Ball) -> Option<f64> {
    let dp = b.position - a.position;
    let dv = b.velocity - a.velocity;
    let r_sum = a.radius + b.radius;

    let qa = dv.dot(&dv);
    if qa == 0.0 {
        return None;
    }
    let qb = dv.dot(&dp);
    if qb >= 0.0 {
        // Receding or tangent: no future collision.
        return None;
    }
    let qc = dp.dot(&dp) - r_sum * r_sum;

    let disc = qb * qb - qa * qc;
    if disc < 0.0 {
        return None;
    }

    let t = (-qb - disc.sqrt()) / qa;
    if t <= 0.0 {
        return None;
    }
    Some(t)
}

/// Time until `ball` next meets the container's boundary from the
/// inside, taking the larger root of `|p + v·t|² = (R − r)²`.
pub fn time_to_container_collision(ball: &Ball, container: &Container) -> Option<f64> {
    let qa = ball.velocity.dot(&ball.velocity);
    if qa == 0.0 {
        return None;
    }
    let qb = ball.velocity.dot(&ball.position);
    let inner_radius = container.radius - ball.radius;
    let qc = ball.position.dot(&ball.position) - inner_radius * inner_radius;

    let disc = qb * qb - qa * qc;
    if disc < 0.0 {
        // Numerical drift past the inside-invariant; treat as no event.
        return None;
    }

    let t = (-qb + disc.sqrt()) / qa;
    if t <= 0.0 {
        return None;
    }
    Some(t)
}

/// Elastic impulse between two balls along their contact normal, in
/// place. Tangential velocity components are untouched.
pub fn resolve_ball_ball(a: &mut Ball, b: &mut Ball) {
    let delta = b.position - a.position;
    let distance = delta.norm();
    let normal = if distance > 0.0 {
        delta / distance
    } else {
        // Degenerate (exactly coincident centers); any unit normal keeps
        // the impulse well-defined without dividing by zero.
        delta
    };

    let relative_velocity = b.velocity - a.velocity;
    let along_normal = relative_velocity.dot(&normal);

    let total_mass = a.mass + b.mass;
    a.velocity += normal * (2.0 * b.mass / total_mass) * along_normal;
    b.velocity -= normal * (2.0 * a.mass / total_mass) * along_normal;
}

/// Reflect `ball`'s velocity about the container's outward normal at its
/// current position, in place.
pub fn resolve_ball_container(ball: &mut Ball) {
    let distance = ball.position.norm();
    let normal = if distance > 0.0 {
        ball.position / distance
    } else {
        ball.position
    };
    let along_normal = ball.velocity.dot(&normal);
    ball.velocity -= normal * (2.0 * along_normal);
}

/// Free flight: advance `ball`'s position by `dt` at constant velocity.
pub fn advance_ball(ball: &mut Ball, dt: f64) {
    ball.position += ball.velocity * dt;
}
