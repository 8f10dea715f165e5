//! Orbit-level behavior of the integrator

use glam::DVec2;
use solar_system::constants::{AU, G, SECONDS_PER_DAY};
use solar_system::{step, Body, RosterConfig, Simulation};

const SUN_MASS: f64 = 1.98892e30;
const EARTH_MASS: f64 = 5.9742e24;

fn sun() -> Body {
    Body::new("Sun", DVec2::ZERO, SUN_MASS).unwrap().as_anchor()
}

fn earth() -> Body {
    Body::new("Earth", DVec2::new(-AU, 0.0), EARTH_MASS)
        .unwrap()
        .with_velocity(DVec2::new(0.0, 29_783.0))
}

#[test]
fn first_day_of_earth_matches_closed_form() {
    let mut bodies = vec![sun(), earth()];
    step(&mut bodies, SECONDS_PER_DAY).unwrap();

    // Earth starts on the -x axis, so the pull is purely along +x
    let accel = G * SUN_MASS / (AU * AU);
    let expected_vx = accel * SECONDS_PER_DAY;
    let expected = DVec2::new(
        -AU + expected_vx * SECONDS_PER_DAY,
        29_783.0 * SECONDS_PER_DAY,
    );

    let earth = &bodies[1];
    assert!((earth.velocity.x - expected_vx).abs() < 1e-9);
    assert_eq!(earth.velocity.y, 29_783.0);
    assert!((earth.position - expected).length() < 1e-3);

    // Regression values for the fixture
    assert!((earth.velocity.x - 512.4745).abs() < 1e-3);
    assert!((earth.position.x - -149_555_722_199.9).abs() < 1.0);
    assert_eq!(earth.position.y, 2_573_251_200.0);

    let sun = &bodies[0];
    let sun_accel = G * EARTH_MASS / (AU * AU);
    assert!((sun.position.x - -sun_accel * SECONDS_PER_DAY * SECONDS_PER_DAY).abs() < 1e-9);
}

#[test]
fn earth_orbit_closes_after_a_year() {
    let start = earth().position;
    let mut sim = Simulation::new(vec![sun(), earth()], SECONDS_PER_DAY).unwrap();

    let mut closest = f64::MAX;
    for day in 1..=375 {
        sim.step().unwrap();

        let earth = &sim.bodies()[1];
        let radius = earth.distance_to(&sim.bodies()[0]);
        assert!(
            (0.98 * AU..1.02 * AU).contains(&radius),
            "day {day}: radius {} AU",
            radius / AU
        );

        if day >= 355 {
            closest = closest.min((earth.position - start).length());
        }
    }

    assert!(closest < 0.01 * AU, "orbit misses start by {} AU", closest / AU);
    assert!(sim.bodies()[0].position.length() < 1e-4 * AU);
}

#[test]
fn energy_stays_bounded_over_a_decade() {
    let mut sim = Simulation::new(vec![sun(), earth()], SECONDS_PER_DAY).unwrap();
    let initial = sim.total_energy();

    for _ in 0..3650 {
        sim.step().unwrap();
        let drift = ((sim.total_energy() - initial) / initial).abs();
        assert!(drift < 1e-2, "relative energy drift {drift}");
    }
}

#[test]
fn permuting_bodies_does_not_change_the_physics() {
    let roster = RosterConfig::solar_system().build().unwrap();
    let mut forward = roster.bodies.clone();
    let mut reversed: Vec<Body> = roster.bodies.into_iter().rev().collect();

    for _ in 0..365 {
        step(&mut forward, SECONDS_PER_DAY).unwrap();
        step(&mut reversed, SECONDS_PER_DAY).unwrap();
    }

    for body in &forward {
        let twin = reversed.iter().find(|b| b.name == body.name).unwrap();
        assert!(
            (body.position - twin.position).length() < 1e3,
            "{} diverged by {} m",
            body.name,
            (body.position - twin.position).length()
        );
        assert!((body.velocity - twin.velocity).length() < 1e-3);
        assert_eq!(body.trail().len(), twin.trail().len());
    }
}

#[test]
fn planets_report_distance_to_the_sun() {
    let roster = RosterConfig::solar_system().build().unwrap();
    let mut sim = Simulation::new(roster.bodies, SECONDS_PER_DAY).unwrap();

    for _ in 0..30 {
        sim.step().unwrap();
    }

    let sun = sim.anchor().unwrap().clone();
    for planet in sim.bodies().iter().filter(|b| !b.is_anchor) {
        // Recorded against the positions at the start of the last step
        let previous = planet.trail()[planet.trail().len() - 2];
        let previous_sun = sun.trail()[sun.trail().len() - 2];
        let expected = (previous - previous_sun).length();
        assert!((planet.distance_to_anchor - expected).abs() <= expected * 1e-12);
    }
}

#[test]
fn default_roster_survives_a_year() {
    let roster = RosterConfig::solar_system().build().unwrap();
    let mut sim = Simulation::new(roster.bodies, SECONDS_PER_DAY).unwrap();

    for _ in 0..365 {
        sim.step().unwrap();
    }

    for body in sim.bodies() {
        assert!(body.position.is_finite(), "{} escaped to infinity", body.name);
        assert_eq!(body.trail().len(), 365);
    }
    assert!(sim.anchor().unwrap().position.length() < 0.01 * AU);
}
