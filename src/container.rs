/// The fixed circular boundary all balls are confined within.
///
/// Centered at the origin; has no velocity and does not participate in
/// the dynamics beyond reflecting balls that reach its edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Container {
    pub radius: f64,
}

impl Container {
    pub fn new(radius: f64) -> Self {
        Container { radius }
    }
}
