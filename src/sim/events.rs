//! Outgoing simulation events
//!
//! Fire-and-forget notifications for presentation, audio and score
//! submission. The simulation writes them into `Session::events` and never
//! reads them back.

use glam::Vec2;

/// Named sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Guns fired a volley
    Shoot,
    /// A ship part was destroyed
    Explosion,
    /// An asteroid was destroyed
    AsteroidBreak,
    /// A new wave spawned
    WaveStart,
    /// An asteroid struck the station
    StationHit,
    /// A ship part regained hp
    Repair,
    /// Ship entered the boundary warning band
    Warning,
    /// Fuel crossed a warning threshold
    FuelWarn,
}

impl SoundCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::Shoot => "shoot",
            SoundCue::Explosion => "explosion",
            SoundCue::AsteroidBreak => "asteroidBreak",
            SoundCue::WaveStart => "waveStart",
            SoundCue::StationHit => "stationHit",
            SoundCue::Repair => "repair",
            SoundCue::Warning => "warning",
            SoundCue::FuelWarn => "fuelWarn",
        }
    }
}

/// Something the outside world may want to react to
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    Sound(SoundCue),
    /// Floating damage/score number at a world position
    FloatText {
        pos: Vec2,
        text: String,
        color: &'static str,
        duration: f32,
    },
    /// A narrative transition was requested
    Beat { node: String },
    /// Run ended; hand the score to the leaderboard
    ScoreSubmitted { final_score: u64 },
}

impl SimEvent {
    pub fn float(pos: Vec2, text: impl Into<String>, color: &'static str, duration: f32) -> Self {
        SimEvent::FloatText {
            pos,
            text: text.into(),
            color,
            duration,
        }
    }
}

/// Float colors
pub mod colors {
    pub const DAMAGE: &str = "#f44";
    pub const STATION_DAMAGE: &str = "#f80";
    pub const SCORE: &str = "#ff0";
    pub const REPAIR: &str = "#4f8";
}
