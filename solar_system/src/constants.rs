//! Physical and display constants

/// Gravitational constant in m³/(kg·s²)
pub const G: f64 = 6.67428e-11;

/// Astronomical unit in meters
pub const AU: f64 = 149.6e6 * 1000.0;

/// One simulated day, the default timestep
pub const SECONDS_PER_DAY: f64 = 3600.0 * 24.0;

/// Default on-screen size of one AU
pub const PIXELS_PER_AU: f64 = 90.0;
