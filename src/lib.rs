//! Asteroid Hunter - station defense simulation core
//!
//! Core modules:
//! - `sim`: Simulation (ship, station, asteroids, bullets, narrative, session)
//! - `definitions`: Static lookup tables for parts, layouts, asteroids and text
//! - `tuning`: Data-driven game balance

pub mod definitions;
pub mod sim;
pub mod tuning;

pub use definitions::{DefinitionError, Definitions};
pub use tuning::{GameConfig, ScoringConfig, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal simulation rate. Kinematics are expressed per tick at this rate.
    pub const TICK_RATE: f32 = 60.0;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Ship layout used when a game begins
    pub const PLAYER_LAYOUT: &str = "player_default";
    /// Where the ship appears relative to the station
    pub const SHIP_SPAWN_OFFSET: (f32, f32) = (0.0, -150.0);
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Unit vector the ship's nose points along.
///
/// Angle 0 faces screen-up (negative y); positive angles turn clockwise.
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.sin(), -angle.cos())
}

/// Rotate a ship-local offset by `angle`
#[inline]
pub fn rotate_local(offset: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(offset)
}
