/// Identifies one side of a candidate or pending collision.
///
/// The source distinguished `Ball` and `Container` via subclassing; here
/// the container is a distinct value dispatched through this tag rather
/// than a ball subtype, matching the derived `Ord` the event queue's
/// tie-break relies on: `Ball(i) < Ball(j)` iff `i < j`, and every
/// `Ball(_)` sorts before `Container`, which reproduces the source's
/// `j == n` sentinel without a magic index leaking into the public API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BodyId {
    Ball(usize),
    Container,
}

impl BodyId {
    pub fn as_ball_index(self) -> Option<usize> {
        match self {
            BodyId::Ball(i) => Some(i),
            BodyId::Container => None,
        }
    }
}
