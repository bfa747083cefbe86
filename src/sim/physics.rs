//! Ship and asteroid kinematics
//!
//! Explicit Euler, one step per tick. Velocities are in units per tick and
//! are integrated directly (`pos += vel`); `dt` is only used for fuel burn.

use super::connectivity::connected_mask;
use super::state::{Asteroid, PartKind, Ship, Station};
use super::tick::TickInput;
use crate::heading;
use crate::tuning::GameConfig;

/// What the engines did this tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThrustReport {
    /// Connected engines that produced force
    pub engines_fired: usize,
    pub fuel_burnt: f32,
    pub turbo: bool,
}

/// Number of engine parts with a path to a core
pub fn connected_engines(ship: &Ship, proximity: f32) -> usize {
    let mask = connected_mask(&ship.parts, proximity);
    ship.parts
        .iter()
        .zip(&mask)
        .filter(|(p, live)| p.kind == PartKind::Engine && **live)
        .count()
}

/// Apply thrust, braking and turning from held input.
///
/// Thrust comes only from connected engines and only while fuel remains.
/// Turning is always available while the ship exists; it does not depend on
/// which parts survive.
pub fn apply_input(ship: &mut Ship, input: &TickInput, cfg: &GameConfig, dt: f32) -> ThrustReport {
    let turbo = input.turbo && ship.fuel > 0.0;
    let multiplier = if turbo { cfg.turbo_multiplier } else { 1.0 };
    let base = cfg.thrust_base * multiplier;
    let mass = ship.total_mass();
    let mut report = ThrustReport {
        turbo,
        ..Default::default()
    };

    if input.thrust && ship.fuel > 0.0 {
        let engines = connected_engines(ship, cfg.part_proximity);
        if engines > 0 {
            ship.vel += heading(ship.angle) * (base * engines as f32 / mass);

            let burn_factor = if turbo { cfg.turbo_fuel_multiplier } else { 1.0 };
            let burn = (cfg.fuel_consumption * burn_factor * engines as f32 * dt).min(ship.fuel);
            ship.fuel = (ship.fuel - burn).max(0.0);

            report.engines_fired = engines;
            report.fuel_burnt = burn;
        }
    }

    if input.brake {
        ship.vel *= cfg.brake_damping;
    }

    let turn_accel = base * cfg.turn_factor * cfg.turn_rate / mass;
    if input.turn_left {
        ship.angular_vel -= turn_accel;
    }
    if input.turn_right {
        ship.angular_vel += turn_accel;
    }

    report
}

/// Gravitational acceleration magnitude at distance `d` from the station.
///
/// Inverse-square inside `[gravity_min_dist, gravity_max_dist]`, zero outside.
pub fn gravity_accel(d: f32, cfg: &GameConfig) -> f32 {
    if d < cfg.gravity_min_dist || d > cfg.gravity_max_dist {
        return 0.0;
    }
    let d = d.max(cfg.gravity_min_dist).max(1.0);
    cfg.station_gravity / (d * d)
}

/// Pull the ship toward the station. Returns whether any pull was applied.
pub fn apply_gravity(ship: &mut Ship, station: &Station, cfg: &GameConfig) -> bool {
    let to_station = station.pos - ship.pos;
    let d = to_station.length();
    let accel = gravity_accel(d, cfg);
    if accel <= 0.0 {
        return false;
    }
    ship.vel += to_station.normalize_or_zero() * accel;
    true
}

/// Passive friction followed by position/heading integration
pub fn integrate_ship(ship: &mut Ship, cfg: &GameConfig) {
    ship.vel *= cfg.friction;
    ship.angular_vel *= cfg.angular_friction;
    ship.pos += ship.vel;
    ship.angle += ship.angular_vel;
}

/// Straight-line drift with constant spin, no forces
pub fn integrate_asteroids(asteroids: &mut [Asteroid]) {
    for a in asteroids {
        a.pos += a.vel;
        a.angle += a.spin;
    }
}
