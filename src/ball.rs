use nalgebra::Vector2;

/// A rigid disk: position, velocity, radius and mass.
///
/// Mass defaults to `1.0` when the caller does not care about unequal
/// masses; [`crate::kinematics::resolve_ball_ball`] falls back to the
/// normal-swap form in that case, which is exact rather than merely
/// approximately elastic.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ball {
    pub position: Vector2<f64>,
    pub velocity: Vector2<f64>,
    pub radius: f64,
    pub mass: f64,
}

impl Ball {
    pub fn new(position: (f64, f64), velocity: (f64, f64), radius: f64, mass: f64) -> Self {
        Ball {
            position: Vector2::new(position.0, position.1),
            velocity: Vector2::new(velocity.0, velocity.1),
            radius,
            mass,
        }
    }

    /// Kinetic energy `1/2 m |v|^2`.
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.norm_squared()
    }
}
