//! Newtonian orbit simulation for a star and its planets
//!
//! The physics lives here; the windowed front end is the `solar_system`
//! binary. Positions are in meters, velocities in m/s and masses in kg.

pub mod body;
pub mod constants;
pub mod error;
pub mod roster;
pub mod simulation;

pub use body::Body;
pub use error::SimulationError;
pub use roster::{BodyConfig, Roster, RosterConfig};
pub use simulation::{step, Simulation, UpdateOrder};
