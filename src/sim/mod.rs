//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (owned by the session)
//! - Stable iteration order (reverse index order when removing)
//! - No rendering, audio or platform dependencies; feedback leaves through
//!   `Session::events`

pub mod collision;
pub mod connectivity;
pub mod damage;
pub mod events;
pub mod narrative;
pub mod physics;
pub mod repair;
pub mod session;
pub mod state;
pub mod tick;
pub mod waves;
pub mod weapons;

pub use connectivity::{connected_mask, is_connected, prune_disconnected, world_position};
pub use damage::{damage_part, damage_station, destroy_asteroid};
pub use events::{SimEvent, SoundCue};
pub use narrative::{ActiveMessage, Narrative, NarrativeConfig, NarrativeGraph};
pub use session::{begin_game, create_ship, game_over, start_screen};
pub use state::{
    Asteroid, AsteroidKind, BeatLatches, Bullet, DeathReason, Part, PartKind, Screen, Session,
    Ship, Station,
};
pub use tick::{TickInput, tick};
pub use waves::{create_asteroid, spawn_asteroid, spawn_wave};
