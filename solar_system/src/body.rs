//! A gravitating body and the trail of positions it has visited

use glam::DVec2;

use crate::constants::G;
use crate::error::SimulationError;

/// A body in the simulation with mass, position, velocity and orbit history
#[derive(Debug, Clone)]
pub struct Body {
    pub name: String,
    pub position: DVec2,
    pub velocity: DVec2,
    mass: f64,
    /// Display radius in pixels, no physical meaning
    pub radius: f32,
    pub is_anchor: bool,
    /// Distance in meters to the anchor, as of the last step
    pub distance_to_anchor: f64,
    trail: Vec<DVec2>,
}

impl Body {
    /// Create a body at rest. Mass must be positive and finite.
    pub fn new(name: &str, position: DVec2, mass: f64) -> Result<Self, SimulationError> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(SimulationError::NonPositiveMass {
                name: name.to_string(),
                mass,
            });
        }

        Ok(Self {
            name: name.to_string(),
            position,
            velocity: DVec2::ZERO,
            mass,
            radius: 1.0,
            is_anchor: false,
            distance_to_anchor: 0.0,
            trail: Vec::new(),
        })
    }

    pub fn with_velocity(mut self, velocity: DVec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Mark this body as the gravitational center other bodies report distance to
    pub fn as_anchor(mut self) -> Self {
        self.is_anchor = true;
        self
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Past positions, oldest first. One entry per call to [`Body::advance`].
    pub fn trail(&self) -> &[DVec2] {
        &self.trail
    }

    pub fn distance_to(&self, other: &Body) -> f64 {
        (other.position - self.position).length()
    }

    /// Newtonian attraction this body feels toward `other`, in newtons.
    ///
    /// Undefined (non-finite) when both bodies share a position; callers
    /// must rule that out beforehand.
    pub fn compute_pairwise_force(&self, other: &Body) -> DVec2 {
        let delta = other.position - self.position;
        let distance = delta.length();

        let force = G * self.mass * other.mass / (distance * distance);
        let theta = delta.y.atan2(delta.x);
        DVec2::new(theta.cos() * force, theta.sin() * force)
    }

    /// Semi-implicit Euler update: velocity first, then position from the
    /// new velocity. The resulting position is appended to the trail.
    pub fn advance(&mut self, net_force: DVec2, mass: f64, dt: f64) {
        self.velocity += net_force / mass * dt;
        self.position += self.velocity * dt;
        self.trail.push(self.position);
    }

    pub(crate) fn has_finite_state(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }
}
