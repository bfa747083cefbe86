//! Game balance and tunables
//!
//! Every constant the simulation reads lives here. Values can be overridden
//! from JSON; missing fields fall back to the defaults below.

use serde::{Deserialize, Serialize};

/// Core gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Ship structure ===
    /// Max distance between two parts for them to count as joined
    pub part_proximity: f32,
    /// Collision radius of a single ship part
    pub part_radius: f32,

    // === Weapons ===
    /// Bullet speed (units per tick)
    pub bullet_speed: f32,
    /// Bullet lifetime (ticks)
    pub bullet_life: u32,
    /// Minimum time between volleys (seconds)
    pub shoot_cooldown: f32,

    // === Flight ===
    /// Force produced by one engine
    pub thrust_base: f32,
    /// Force multiplier while turbo is held (needs fuel)
    pub turbo_multiplier: f32,
    /// Fraction of engine force available as turning torque
    pub turn_factor: f32,
    /// Converts turning torque into angular acceleration
    pub turn_rate: f32,
    /// Velocity multiplier applied each tick while braking
    pub brake_damping: f32,
    /// Passive velocity multiplier applied every tick
    pub friction: f32,
    /// Passive angular velocity multiplier applied every tick
    pub angular_friction: f32,

    // === Fuel ===
    pub max_fuel: f32,
    /// Fuel burnt per engine per second of thrust
    pub fuel_consumption: f32,
    /// Extra burn factor while turbo is active
    pub turbo_fuel_multiplier: f32,
    /// Fuel regained per second while docked
    pub fuel_refuel_rate: f32,

    // === Waves ===
    /// Quiet time after the field is cleared before the next wave (seconds)
    pub wave_delay: f32,
    /// Global multiplier on asteroid type speeds
    pub asteroid_base_speed: f32,

    // === Arena ===
    pub arena_radius: f32,
    /// Fraction of the arena radius where the boundary warning band starts
    pub arena_warning: f32,
    /// Asteroids further than `arena_radius + margin` leave the simulation
    pub asteroid_cull_margin: f32,

    // === Station ===
    pub station_hp: u32,
    pub station_radius: f32,
    /// Docking distance for repairs and refuelling
    pub station_repair_range: f32,
    /// Ship part hp restored per second while docked
    pub repair_rate: f32,
    /// Station hp restored per second while the ship is docked
    pub station_repair_rate: f32,
    /// Gravity strength (inverse-square)
    pub station_gravity: f32,
    pub gravity_min_dist: f32,
    pub gravity_max_dist: f32,
    /// Visual spin of the station (radians per second)
    pub station_rotation_speed: f32,

    // === Narrative ===
    /// How long a narrative message stays visible (seconds)
    pub message_life: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            part_proximity: 45.0,
            part_radius: 12.0,

            bullet_speed: 12.0,
            bullet_life: 60,
            shoot_cooldown: 0.2,

            thrust_base: 0.5,
            turbo_multiplier: 1.8,
            turn_factor: 0.8,
            turn_rate: 0.25,
            brake_damping: 0.95,
            friction: 0.99,
            angular_friction: 0.92,

            max_fuel: 100.0,
            fuel_consumption: 5.0,
            turbo_fuel_multiplier: 2.5,
            fuel_refuel_rate: 10.0,

            wave_delay: 2.5,
            asteroid_base_speed: 2.0,

            arena_radius: 1800.0,
            arena_warning: 0.8,
            asteroid_cull_margin: 200.0,

            station_hp: 20,
            station_radius: 60.0,
            station_repair_range: 140.0,
            repair_rate: 0.35,
            station_repair_rate: 0.15,
            station_gravity: 200.0,
            gravity_min_dist: 40.0,
            gravity_max_dist: 800.0,
            station_rotation_speed: 0.3,

            message_life: 4.0,
        }
    }
}

impl GameConfig {
    /// Distance from the arena center where the boundary warning band begins
    pub fn warning_distance(&self) -> f32 {
        self.arena_radius * self.arena_warning
    }
}

/// Score awards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Flat bonus for reaching a new wave (after the first)
    pub wave_bonus: u64,
    /// Extra bonus when the station is above half health at wave start
    pub station_defense_bonus: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            wave_bonus: 200,
            station_defense_bonus: 50,
        }
    }
}

/// All tunables, grouped the way they are stored in definition files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub game: GameConfig,
    pub scoring: ScoringConfig,
}
