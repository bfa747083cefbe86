//! Session state and core simulation types
//!
//! `Session` is the single mutable root. Every simulation step receives it by
//! mutable reference; nothing is reached through globals.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::SimEvent;
use super::narrative::Narrative;
use crate::rotate_local;
use crate::tuning::GameConfig;

/// Top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    /// Waiting for a launch action, nothing simulates
    Start,
    /// Full tick pipeline runs
    Playing,
    /// Run ended, simulation frozen until restart
    Death,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathReason {
    /// Last core part destroyed
    Player,
    /// Station hp reached zero
    Station,
    /// Ship left the arena
    Boundary,
}

impl DeathReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeathReason::Player => "player",
            DeathReason::Station => "station",
            DeathReason::Boundary => "boundary",
        }
    }
}

/// Ship part kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartKind {
    /// Structural anchor; losing every core ends the run
    Core,
    Engine,
    Gun,
}

impl PartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartKind::Core => "core",
            PartKind::Engine => "engine",
            PartKind::Gun => "gun",
        }
    }
}

/// A single ship part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// Offset from the ship origin in ship-local space
    pub offset: Vec2,
    pub kind: PartKind,
    pub hp: u32,
    pub max_hp: u32,
    pub mass: f32,
    /// Session time of the last hit (seconds)
    pub last_hit: Option<f32>,
}

impl Part {
    pub fn is_core(&self) -> bool {
        self.kind == PartKind::Core
    }
}

/// The player's modular ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading in radians, 0 = screen-up
    pub angle: f32,
    pub angular_vel: f32,
    pub parts: Vec<Part>,
    pub fuel: f32,
    /// Session time of the last volley (seconds)
    pub last_shot: Option<f32>,
}

impl Ship {
    pub fn new(pos: Vec2, parts: Vec<Part>, fuel: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            angle: 0.0,
            angular_vel: 0.0,
            parts,
            fuel,
            last_shot: None,
        }
    }

    pub fn has_core(&self) -> bool {
        self.parts.iter().any(Part::is_core)
    }

    /// Sum of part masses (never zero, so it can divide forces)
    pub fn total_mass(&self) -> f32 {
        self.parts.iter().map(|p| p.mass).sum::<f32>().max(1.0)
    }

    /// World position of a part
    pub fn world_position(&self, part: &Part) -> Vec2 {
        self.pos + rotate_local(part.offset, self.angle)
    }
}

/// The orbital station at the arena center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub pos: Vec2,
    pub hp: u32,
    pub max_hp: u32,
    pub radius: f32,
    pub last_hit: Option<f32>,
    /// Visual rotation (radians)
    pub rotation: f32,
    /// Latched once hp ratio drops to 50%
    pub warned_50: bool,
    /// Latched once hp ratio drops to 30%
    pub warned_30: bool,
}

impl Station {
    pub fn new(cfg: &GameConfig) -> Self {
        Self {
            pos: Vec2::ZERO,
            hp: cfg.station_hp,
            max_hp: cfg.station_hp,
            radius: cfg.station_radius,
            last_hit: None,
            rotation: 0.0,
            warned_50: false,
            warned_30: false,
        }
    }

    pub fn hp_ratio(&self) -> f32 {
        if self.max_hp == 0 {
            return 0.0;
        }
        self.hp as f32 / self.max_hp as f32
    }

    pub fn is_destroyed(&self) -> bool {
        self.hp == 0
    }
}

/// Asteroid size classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AsteroidKind {
    Large,
    Medium,
    /// Never splits
    Small,
}

impl AsteroidKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AsteroidKind::Large => "large",
            AsteroidKind::Medium => "medium",
            AsteroidKind::Small => "small",
        }
    }
}

/// An asteroid entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asteroid {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: AsteroidKind,
    pub hp: u32,
    pub radius: f32,
    /// Angular velocity (radians per tick)
    pub spin: f32,
    pub angle: f32,
    /// Jagged outline relative to the center, for rendering
    pub outline: Vec<Vec2>,
}

/// A bullet entity (single hit, no penetration)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks left before expiry
    pub life: u32,
}

/// One-shot latches for narrative beats that must fire at most once
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BeatLatches {
    pub boundary_warned: bool,
    pub fuel_low: bool,
    pub fuel_critical: bool,
    pub fuel_empty: bool,
    pub ship_damaged: bool,
    pub last_part: bool,
    pub in_gravity_well: bool,
    pub gravity_warned: bool,
    /// Survival milestones already announced (seconds)
    pub survival_marks: Vec<u32>,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct Session {
    pub seed: u64,
    pub rng: Pcg32,
    pub screen: Screen,
    pub ship: Option<Ship>,
    pub station: Option<Station>,
    pub asteroids: Vec<Asteroid>,
    pub bullets: Vec<Bullet>,
    pub score: u64,
    /// Current wave number (1-indexed once a game begins)
    pub wave: u32,
    pub asteroids_destroyed: u32,
    /// Seconds survived in this run; also the session clock
    pub survival_time: f32,
    /// Seconds the field has been empty
    pub wave_timer: f32,
    /// 0 = safe, 1 = at the arena edge
    pub boundary_warning: f32,
    pub repairing: bool,
    pub repair_accum: f32,
    pub station_repair_accum: f32,
    pub death_reason: Option<DeathReason>,
    pub latches: BeatLatches,
    pub narrative: Narrative,
    /// Output port, drained by the driver after each tick
    pub events: Vec<SimEvent>,
}

impl Session {
    /// Create a session on the start screen
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            screen: Screen::Start,
            ship: None,
            station: None,
            asteroids: Vec::new(),
            bullets: Vec::new(),
            score: 0,
            wave: 0,
            asteroids_destroyed: 0,
            survival_time: 0.0,
            wave_timer: 0.0,
            boundary_warning: 0.0,
            repairing: false,
            repair_accum: 0.0,
            station_repair_accum: 0.0,
            death_reason: None,
            latches: BeatLatches::default(),
            narrative: Narrative::default(),
            events: Vec::new(),
        }
    }

    /// Record an outgoing event
    #[inline]
    pub fn emit(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    /// Take every event produced since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_over(&self) -> bool {
        self.screen == Screen::Death
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn part(x: f32, y: f32, kind: PartKind) -> Part {
        Part {
            offset: Vec2::new(x, y),
            kind,
            hp: 1,
            max_hp: 1,
            mass: 5.0,
            last_hit: None,
        }
    }

    #[test]
    fn test_world_position_rotates_then_translates() {
        let gun = part(0.0, -30.0, PartKind::Gun);
        let mut ship = Ship::new(Vec2::new(100.0, 50.0), vec![gun], 100.0);
        let p = ship.world_position(&ship.parts[0]);
        assert!((p - Vec2::new(100.0, 20.0)).length() < 1e-4);

        ship.angle = FRAC_PI_2;
        let p = ship.world_position(&ship.parts[0]);
        assert!((p - Vec2::new(130.0, 50.0)).length() < 1e-3);
    }

    #[test]
    fn test_ship_core_and_mass() {
        let ship = Ship::new(
            Vec2::ZERO,
            vec![part(0.0, 0.0, PartKind::Core), part(30.0, 0.0, PartKind::Engine)],
            100.0,
        );
        assert!(ship.has_core());
        assert_eq!(ship.total_mass(), 10.0);

        let empty = Ship::new(Vec2::ZERO, Vec::new(), 0.0);
        assert!(!empty.has_core());
        assert_eq!(empty.total_mass(), 1.0);
    }

    #[test]
    fn test_station_ratio() {
        let mut station = Station::new(&GameConfig::default());
        assert_eq!(station.hp_ratio(), 1.0);
        station.hp = 10;
        assert_eq!(station.hp_ratio(), 0.5);
        station.hp = 0;
        assert!(station.is_destroyed());
    }

    #[test]
    fn test_drain_events_empties_buffer() {
        let mut session = Session::new(1);
        session.emit(SimEvent::Beat { node: "launch".into() });
        assert_eq!(session.drain_events().len(), 1);
        assert!(session.events.is_empty());
    }
}
