//! Fixed timestep simulation tick
//!
//! Runs the per-tick pipeline in a fixed order: input, physics, boundary,
//! asteroids, bullets, collisions, station, repair, timers, waves, pruning.
//! Entering the death screen short-circuits whatever is left of the tick.

use super::connectivity::prune_disconnected;
use super::damage::{
    check_boundary, cull_escaped, note_part_loss, resolve_bullet_hits, resolve_ship_hits,
    resolve_station_hits,
};
use super::physics::{apply_gravity, apply_input, integrate_asteroids, integrate_ship};
use super::repair::{update_fuel_warnings, update_repairs};
use super::session::{begin_game, game_over, show_beat, start_screen};
use super::state::{DeathReason, Screen, Session};
use super::waves::update_wave_timer;
use super::weapons::{advance_bullets, fire_guns};
use crate::definitions::Definitions;

/// Survival milestones (seconds) and their beats
const SURVIVAL_BEATS: [(u32, &str); 3] = [
    (60, "survivor_60"),
    (180, "survivor_180"),
    (300, "survivor_300"),
];

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub thrust: bool,
    pub brake: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    /// Held fire; also launches from the start screen
    pub shoot: bool,
    /// Thrust multiplier, burns fuel faster
    pub turbo: bool,
    /// Launch from the start screen (one-shot)
    pub start: bool,
    /// Return to the start screen after death (one-shot)
    pub restart: bool,
}

/// Advance the session by one fixed timestep
pub fn tick(session: &mut Session, defs: &Definitions, input: &TickInput, dt: f32) {
    match session.screen {
        Screen::Start => {
            if input.start || input.shoot {
                begin_game(session, defs);
            }
            return;
        }
        Screen::Death => {
            if input.restart {
                start_screen(session, defs);
            }
            return;
        }
        Screen::Playing => {}
    }
    let cfg = defs.game();

    // Input
    if let Some(ship) = session.ship.as_mut() {
        let thrust = apply_input(ship, input, cfg, dt);
        if thrust.engines_fired > 0 {
            log::trace!(
                "{} engines burnt {:.3} fuel{}",
                thrust.engines_fired,
                thrust.fuel_burnt,
                if thrust.turbo { " (turbo)" } else { "" }
            );
        }
    }
    if input.shoot {
        fire_guns(session, cfg);
    }

    // Physics
    let mut pulled = false;
    if let Some(ship) = session.ship.as_mut() {
        if let Some(station) = session.station.as_ref() {
            pulled = apply_gravity(ship, station, cfg);
        }
        integrate_ship(ship, cfg);
    }
    update_gravity_well(session, defs, pulled);
    update_fuel_warnings(session, defs);

    // Boundary
    if check_boundary(session, defs) {
        return;
    }
    cull_escaped(session, defs);

    integrate_asteroids(&mut session.asteroids);
    advance_bullets(&mut session.bullets);

    // Collisions
    resolve_bullet_hits(session, defs);
    if resolve_ship_hits(session, defs) {
        return;
    }
    if resolve_station_hits(session, defs) {
        return;
    }

    update_repairs(session, defs, dt);
    advance_timers(session, defs, dt);
    update_wave_timer(session, defs, dt);

    // Connectivity sweep
    let pruned = session
        .ship
        .as_mut()
        .map_or(0, |ship| prune_disconnected(ship, cfg.part_proximity));
    if pruned > 0 {
        log::debug!("Pruned {} disconnected parts", pruned);
        note_part_loss(session, defs);
    }
    if session.ship.as_ref().is_some_and(|ship| !ship.has_core()) {
        game_over(session, defs, DeathReason::Player);
    }
}

/// Announce the station's pull the first time the ship falls back into it
fn update_gravity_well(session: &mut Session, defs: &Definitions, pulled: bool) {
    let entered = pulled && !session.latches.in_gravity_well;
    session.latches.in_gravity_well = pulled;
    if entered && !session.latches.gravity_warned {
        session.latches.gravity_warned = true;
        show_beat(session, defs, "gravity_warning");
    }
}

/// Message decay, the survival clock, station spin and milestone beats
fn advance_timers(session: &mut Session, defs: &Definitions, dt: f32) {
    session.narrative.update(dt);
    session.survival_time += dt;
    if let Some(station) = session.station.as_mut() {
        station.rotation += defs.game().station_rotation_speed * dt;
    }

    for (mark, beat) in SURVIVAL_BEATS {
        if session.survival_time >= mark as f32 && !session.latches.survival_marks.contains(&mark) {
            session.latches.survival_marks.push(mark);
            show_beat(session, defs, beat);
        }
    }
}
