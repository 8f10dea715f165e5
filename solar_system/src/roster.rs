//! Initial body rosters, built in or loaded from YAML
//!
//! A roster file lists the bodies in the order they are simulated:
//!
//! ```yaml
//! bodies:
//!   - name: Sun
//!     position_au: [0.0, 0.0]
//!     mass: 1.98892e30
//!     radius: 30.0
//!     color: [255, 255, 0]
//!     anchor: true
//!   - name: Earth
//!     position_au: [-1.0, 0.0]
//!     velocity: [0.0, 29783.0]   # m/s, defaults to zero
//!     mass: 5.9742e24
//!     radius: 16.0
//!     color: [35, 63, 247]
//! ```

use glam::DVec2;
use serde::Deserialize;

use crate::body::Body;
use crate::constants::AU;
use crate::error::SimulationError;

/// Initial state of one body
#[derive(Debug, Clone, Deserialize)]
pub struct BodyConfig {
    pub name: String,
    pub position_au: [f64; 2], // In AU, converted to meters on build
    #[serde(default)]
    pub velocity: [f64; 2], // m/s
    pub mass: f64,          // kg
    pub radius: f32,        // Display radius in pixels
    pub color: [u8; 3],     // sRGB
    #[serde(default)]
    pub anchor: bool,
}

/// Top-level roster configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RosterConfig {
    pub bodies: Vec<BodyConfig>,
}

/// Bodies ready to simulate, with their display colors in the same order
#[derive(Debug, Clone)]
pub struct Roster {
    pub bodies: Vec<Body>,
    pub colors: Vec<[u8; 3]>,
}

impl BodyConfig {
    fn planet(name: &str, x_au: f64, vy: f64, mass: f64, radius: f32, color: [u8; 3]) -> Self {
        Self {
            name: name.to_string(),
            position_au: [x_au, 0.0],
            velocity: [0.0, vy],
            mass,
            radius,
            color,
            anchor: false,
        }
    }

    pub fn build(&self) -> Result<Body, SimulationError> {
        let position = DVec2::new(self.position_au[0] * AU, self.position_au[1] * AU);
        let body = Body::new(&self.name, position, self.mass)?
            .with_velocity(DVec2::from_array(self.velocity))
            .with_radius(self.radius);

        Ok(if self.anchor { body.as_anchor() } else { body })
    }
}

impl RosterConfig {
    /// The Sun and five planets laid out along the x axis
    pub fn solar_system() -> Self {
        let sun = BodyConfig {
            anchor: true,
            ..BodyConfig::planet("Sun", 0.0, 0.0, 1.98892e30, 30.0, [255, 255, 0])
        };

        Self {
            bodies: vec![
                sun,
                BodyConfig::planet("Earth", -1.0, 29_783.0, 5.9742e24, 16.0, [35, 63, 247]),
                BodyConfig::planet("Mars", -1.524, 24_077.0, 6.39e23, 12.0, [188, 39, 50]),
                BodyConfig::planet("Mercury", 0.387, -47_400.0, 3.30e22, 8.0, [80, 78, 81]),
                BodyConfig::planet("Venus", 0.723, -35_020.0, 4.8685e24, 14.0, [255, 255, 255]),
                BodyConfig::planet("Jupiter", -5.204, 13_060.0, 1.8986e24, 23.0, [168, 88, 50]),
            ],
        }
    }

    pub fn from_yaml_str(source: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(source)
    }

    pub fn build(&self) -> Result<Roster, SimulationError> {
        let bodies = self
            .bodies
            .iter()
            .map(BodyConfig::build)
            .collect::<Result<Vec<_>, _>>()?;
        let colors = self.bodies.iter().map(|b| b.color).collect();

        Ok(Roster { bodies, colors })
    }
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self::solar_system()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solar_system_has_single_anchor_first() {
        let roster = RosterConfig::solar_system().build().unwrap();

        assert_eq!(roster.bodies.len(), 6);
        assert_eq!(roster.colors.len(), 6);
        assert!(roster.bodies[0].is_anchor);
        assert_eq!(roster.bodies.iter().filter(|b| b.is_anchor).count(), 1);

        let earth = &roster.bodies[1];
        assert_eq!(earth.name, "Earth");
        assert_eq!(earth.position, DVec2::new(-AU, 0.0));
        assert_eq!(earth.velocity, DVec2::new(0.0, 29_783.0));
        assert_eq!(roster.colors[1], [35, 63, 247]);
    }

    #[test]
    fn parses_yaml_with_defaults() {
        let source = r#"
bodies:
  - name: Star
    position_au: [0.0, 0.0]
    mass: 2.0e30
    radius: 20.0
    color: [255, 200, 0]
    anchor: true
  - name: Rock
    position_au: [2.0, 0.5]
    velocity: [0.0, -1000.0]
    mass: 1.0e20
    radius: 4.0
    color: [90, 90, 90]
"#;
        let config = RosterConfig::from_yaml_str(source).unwrap();
        let roster = config.build().unwrap();

        assert!(roster.bodies[0].is_anchor);
        assert_eq!(roster.bodies[0].velocity, DVec2::ZERO);
        assert!(!roster.bodies[1].is_anchor);
        assert_eq!(roster.bodies[1].position, DVec2::new(2.0 * AU, 0.5 * AU));
        assert_eq!(roster.bodies[1].velocity, DVec2::new(0.0, -1000.0));
        assert_eq!(roster.bodies[1].radius, 4.0);
    }

    #[test]
    fn rejects_massless_body() {
        let mut config = RosterConfig::solar_system();
        config.bodies[3].mass = 0.0;

        let err = config.build().unwrap_err();
        assert_eq!(
            err,
            SimulationError::NonPositiveMass {
                name: "Mercury".to_string(),
                mass: 0.0,
            }
        );
    }

    #[test]
    fn rejects_malformed_yaml() {
        assert!(RosterConfig::from_yaml_str("bodies: [{ name: Sun }]").is_err());
    }
}
