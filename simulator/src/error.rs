//! Everything that can go wrong building or stepping a SolarSystem.

use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum SimulationError {
    /// Two bodies sit on exactly the same point, so the direction of the force between them is undefined.
    DegenerateConfiguration { first: usize, second: usize },
    /// The force between two bodies is too large to represent.
    ForceOverflow { first: usize, second: usize },
    /// A body's position or velocity isn't a finite number, or stepping would make it so.
    NonFiniteState { index: usize },
    /// Every body needs a positive, finite mass.
    NonPositiveMass { index: usize, mass: f64 },
    /// Nobody was flagged as the anchor.
    NoAnchor,
    /// More than one body was flagged as the anchor.
    MultipleAnchors { first: usize, second: usize },
    /// There's nothing to simulate.
    Empty,
    /// A simulation parameter is out of range.
    InvalidParams(&'static str),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::DegenerateConfiguration { first, second } => write!(
                f,
                "bodies #{} and #{} occupy the same position",
                first, second
            ),
            SimulationError::ForceOverflow { first, second } => write!(
                f,
                "the force between bodies #{} and #{} overflows",
                first, second
            ),
            SimulationError::NonFiniteState { index } => {
                write!(f, "body #{} has a non-finite position or velocity", index)
            }
            SimulationError::NonPositiveMass { index, mass } => {
                write!(f, "body #{} has non-positive mass {}", index, mass)
            }
            SimulationError::NoAnchor => write!(f, "no body is flagged as the anchor"),
            SimulationError::MultipleAnchors { first, second } => write!(
                f,
                "bodies #{} and #{} are both flagged as the anchor",
                first, second
            ),
            SimulationError::Empty => write!(f, "the system has no bodies"),
            SimulationError::InvalidParams(why) => write!(f, "invalid parameters: {}", why),
        }
    }
}

impl std::error::Error for SimulationError {}
