use thiserror::Error;

/// Precondition failures of the orbit simulation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("body `{name}` has non-positive mass {mass} kg")]
    NonPositiveMass { name: String, mass: f64 },

    #[error("body `{name}` has a non-finite position or velocity")]
    NonFiniteState { name: String },

    #[error("bodies `{first}` and `{second}` occupy the same position")]
    DegenerateDistance { first: String, second: String },

    #[error("timestep must be finite and positive, got {0} s")]
    InvalidTimestep(f64),
}
