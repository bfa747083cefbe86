//! Screen state machine: start -> playing -> death -> start
//!
//! Also home to the helpers every other step uses to surface narrative beats.

use glam::Vec2;

use super::events::SimEvent;
use super::state::{DeathReason, Part, Screen, Session, Ship, Station};
use super::waves::spawn_wave;
use crate::consts::{PLAYER_LAYOUT, SHIP_SPAWN_OFFSET};
use crate::definitions::Definitions;

/// Fallbacks for layout slots whose part type is missing from the tables
const FALLBACK_PART_HP: u32 = 2;
const FALLBACK_PART_MASS: f32 = 5.0;

/// Request a narrative transition and record it on the output port
pub fn show_beat(session: &mut Session, defs: &Definitions, node: &str) {
    let from = session.narrative.current_node.as_str();
    if !defs.narrative.graph.successors(from).any(|next| next == node) {
        log::debug!("Beat {} -> {} is off the narrative graph", from, node);
    }
    let life = defs.game().message_life;
    session
        .narrative
        .transition(node, defs.narrative_text(node), life);
    session.emit(SimEvent::Beat {
        node: node.to_string(),
    });
}

/// Overwrite a narrative variable
pub fn set_var(session: &mut Session, name: &str, value: f64, reason: &str) {
    session.narrative.set_var(name, value, reason);
}

/// Build a ship from a layout. `None` if the layout is unknown.
pub fn create_ship(defs: &Definitions, layout_id: &str, pos: Vec2) -> Option<Ship> {
    let layout = defs.ship_layout(layout_id)?;
    let parts = layout
        .parts
        .iter()
        .map(|slot| {
            let def = defs.part_type(slot.kind);
            let max_hp = def.map_or(FALLBACK_PART_HP, |d| d.max_hp);
            Part {
                offset: Vec2::new(slot.x, slot.y),
                kind: slot.kind,
                hp: max_hp,
                max_hp,
                mass: def.map_or(FALLBACK_PART_MASS, |d| d.mass),
                last_hit: None,
            }
        })
        .collect();
    Some(Ship::new(pos, parts, defs.game().max_fuel))
}

/// Reset everything and show the start screen.
///
/// The RNG keeps advancing across runs so consecutive games differ.
pub fn start_screen(session: &mut Session, defs: &Definitions) {
    let seed = session.seed;
    let rng = session.rng.clone();
    *session = Session::new(seed);
    session.rng = rng;
    session.narrative.init(&defs.narrative);
    log::info!("Start screen");
}

/// Launch a run: station, ship, first wave, launch beat
pub fn begin_game(session: &mut Session, defs: &Definitions) {
    if session.screen != Screen::Start {
        return;
    }
    session.screen = Screen::Playing;

    let station = Station::new(defs.game());
    let spawn = station.pos + Vec2::new(SHIP_SPAWN_OFFSET.0, SHIP_SPAWN_OFFSET.1);
    session.station = Some(station);

    session.ship = create_ship(defs, PLAYER_LAYOUT, spawn);
    if session.ship.is_none() {
        log::warn!("Unknown ship layout '{}', starting without a ship", PLAYER_LAYOUT);
    }
    session.latches.in_gravity_well = true;

    spawn_wave(session, defs);
    show_beat(session, defs, "launch");
    log::info!("Game started (seed {})", session.seed);
}

/// Enter the death screen. Calling this again while dead does nothing.
pub fn game_over(session: &mut Session, defs: &Definitions, reason: DeathReason) {
    if session.screen == Screen::Death {
        return;
    }
    session.screen = Screen::Death;
    session.death_reason = Some(reason);
    session.score += session.survival_time.max(0.0).floor() as u64;

    session.emit(SimEvent::ScoreSubmitted {
        final_score: session.score,
    });
    log::info!(
        "Game over ({}): score {}, wave {}, {} asteroids",
        reason.as_str(),
        session.score,
        session.wave,
        session.asteroids_destroyed
    );

    let beat = match reason {
        DeathReason::Station => "station_destroyed",
        DeathReason::Player | DeathReason::Boundary => "player_destroyed",
    };
    show_beat(session, defs, beat);
}
