//! Stepping a set of bodies forward in time

use glam::DVec2;

use crate::body::Body;
use crate::constants::G;
use crate::error::SimulationError;

/// Steps between reports of how many trail points are being kept
const TRAIL_WARN_INTERVAL: u64 = 100_000;

/// How forces are sampled while the bodies of one step are advanced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdateOrder {
    /// Every force comes from the positions at the start of the step
    #[default]
    Snapshot,
    /// Bodies are advanced one after another and later bodies see the
    /// already-moved earlier ones. Results depend on collection order.
    Sequential,
}

/// Advance every body by `dt` seconds.
///
/// All net forces are computed from the pre-step positions before any body
/// moves, so the outcome does not depend on the order of `bodies`. If two
/// bodies coincide the step is refused and nothing is mutated.
pub fn step(bodies: &mut [Body], dt: f64) -> Result<(), SimulationError> {
    let forces = (0..bodies.len())
        .map(|i| net_force_on(bodies, i))
        .collect::<Result<Vec<_>, _>>()?;

    for (body, (force, anchor_distance)) in bodies.iter_mut().zip(forces) {
        if let Some(distance) = anchor_distance {
            body.distance_to_anchor = distance;
        }
        let mass = body.mass();
        body.advance(force, mass, dt);
    }

    Ok(())
}

/// In-place stepping: each body is advanced as soon as its
/// force is known. On error, bodies before the failing one have moved.
fn step_sequential(bodies: &mut [Body], dt: f64) -> Result<(), SimulationError> {
    for i in 0..bodies.len() {
        let (force, anchor_distance) = net_force_on(bodies, i)?;

        let body = &mut bodies[i];
        if let Some(distance) = anchor_distance {
            body.distance_to_anchor = distance;
        }
        let mass = body.mass();
        body.advance(force, mass, dt);
    }

    Ok(())
}

/// Sum of the attraction from every other body, plus the distance to the
/// last anchor seen (if any other body is an anchor).
fn net_force_on(bodies: &[Body], index: usize) -> Result<(DVec2, Option<f64>), SimulationError> {
    let body = &bodies[index];
    let mut total = DVec2::ZERO;
    let mut anchor_distance = None;

    for (j, other) in bodies.iter().enumerate() {
        if j == index {
            continue;
        }

        let distance = body.distance_to(other);
        if distance == 0.0 {
            return Err(SimulationError::DegenerateDistance {
                first: body.name.clone(),
                second: other.name.clone(),
            });
        }
        if other.is_anchor {
            anchor_distance = Some(distance);
        }

        total += body.compute_pairwise_force(other);
    }

    Ok((total, anchor_distance))
}

/// The physics simulation state: an ordered, fixed set of bodies and a clock
#[derive(Debug, Clone)]
pub struct Simulation {
    bodies: Vec<Body>,
    timestep: f64,
    order: UpdateOrder,
    elapsed_time: f64,
    steps: u64,
}

impl Simulation {
    /// Validate the initial state and take ownership of the bodies.
    ///
    /// Rejects a non-positive timestep, non-finite positions or velocities,
    /// and any two bodies starting at the same position.
    pub fn new(bodies: Vec<Body>, timestep: f64) -> Result<Self, SimulationError> {
        if !(timestep.is_finite() && timestep > 0.0) {
            return Err(SimulationError::InvalidTimestep(timestep));
        }

        for (i, body) in bodies.iter().enumerate() {
            if !body.has_finite_state() {
                return Err(SimulationError::NonFiniteState {
                    name: body.name.clone(),
                });
            }
            for other in &bodies[i + 1..] {
                if body.position == other.position {
                    return Err(SimulationError::DegenerateDistance {
                        first: body.name.clone(),
                        second: other.name.clone(),
                    });
                }
            }
        }

        log::debug!(
            "simulation created with {} bodies, timestep {} s",
            bodies.len(),
            timestep
        );

        Ok(Self {
            bodies,
            timestep,
            order: UpdateOrder::default(),
            elapsed_time: 0.0,
            steps: 0,
        })
    }

    pub fn with_update_order(mut self, order: UpdateOrder) -> Self {
        self.order = order;
        self
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn timestep(&self) -> f64 {
        self.timestep
    }

    pub fn update_order(&self) -> UpdateOrder {
        self.order
    }

    /// Simulated seconds since the start
    pub fn elapsed_time(&self) -> f64 {
        self.elapsed_time
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Advance all bodies by one timestep
    pub fn step(&mut self) -> Result<(), SimulationError> {
        match self.order {
            UpdateOrder::Snapshot => step(&mut self.bodies, self.timestep)?,
            UpdateOrder::Sequential => step_sequential(&mut self.bodies, self.timestep)?,
        }

        self.elapsed_time += self.timestep;
        self.steps += 1;
        log::trace!("step {} done, t = {} s", self.steps, self.elapsed_time);

        if self.steps % TRAIL_WARN_INTERVAL == 0 {
            log::warn!(
                "{} trail points retained after {} steps; trails are never trimmed",
                self.trail_points(),
                self.steps
            );
        }

        Ok(())
    }

    /// The last body flagged as anchor
    pub fn anchor(&self) -> Option<&Body> {
        self.bodies.iter().rev().find(|b| b.is_anchor)
    }

    /// Total number of positions stored across all trails
    pub fn trail_points(&self) -> usize {
        self.bodies.iter().map(|b| b.trail().len()).sum()
    }

    pub fn center_of_mass(&self) -> DVec2 {
        let mut total_mass = 0.0;
        let mut com = DVec2::ZERO;

        for body in &self.bodies {
            com += body.position * body.mass();
            total_mass += body.mass();
        }

        if total_mass > 0.0 {
            com / total_mass
        } else {
            DVec2::ZERO
        }
    }

    /// Kinetic plus gravitational potential energy, in joules
    pub fn total_energy(&self) -> f64 {
        let mut kinetic = 0.0;
        let mut potential = 0.0;

        for (i, body_i) in self.bodies.iter().enumerate() {
            kinetic += 0.5 * body_i.mass() * body_i.velocity.length_squared();

            for body_j in self.bodies.iter().skip(i + 1) {
                let r = body_i.distance_to(body_j);
                potential -= G * body_i.mass() * body_j.mass() / r;
            }
        }

        kinetic + potential
    }
}
