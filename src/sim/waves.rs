//! Wave and spawn control
//!
//! Wave `n` brings `2 + n` large asteroids in from the arena perimeter. The
//! next wave waits until the field has been empty for `wave_delay` seconds.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::events::{SimEvent, SoundCue, colors};
use super::session::{set_var, show_beat};
use super::state::{Asteroid, AsteroidKind, Session};
use crate::definitions::Definitions;
use crate::polar_to_cartesian;

/// Total aim spread around the center direction (radians, ±half)
pub const AIM_SPREAD: f32 = 0.8;
/// Speed is scaled by a uniform factor in this range
pub const SPEED_JITTER_MIN: f32 = 0.7;
pub const SPEED_JITTER_MAX: f32 = 1.3;
/// Max spin either way (radians per tick)
const MAX_SPIN: f32 = 0.02;

/// Beats announced when a wave number is first reached
const WAVE_BEATS: [(u32, &str); 5] = [
    (3, "getting_intense"),
    (5, "wave_5"),
    (7, "wave_7"),
    (10, "wave_10"),
    (15, "wave_15"),
];

/// Number of asteroids wave `wave` spawns
#[inline]
pub fn wave_size(wave: u32) -> u32 {
    2 + wave
}

/// Beat for the wave that crosses a threshold, if any
pub fn wave_beat(wave: u32) -> Option<&'static str> {
    WAVE_BEATS
        .iter()
        .find(|(threshold, _)| *threshold == wave)
        .map(|(_, beat)| *beat)
}

/// Random speed for an asteroid type, in units per tick
fn roll_speed(type_speed: f32, base_speed: f32, rng: &mut Pcg32) -> f32 {
    type_speed * base_speed * rng.random_range(SPEED_JITTER_MIN..SPEED_JITTER_MAX)
}

/// Build an asteroid of `kind` at `pos` drifting in a random direction.
///
/// `None` when the type is not defined.
pub fn create_asteroid(
    defs: &Definitions,
    kind: AsteroidKind,
    pos: Vec2,
    rng: &mut Pcg32,
) -> Option<Asteroid> {
    let def = defs.asteroid_type(kind)?;
    let heading = rng.random::<f32>() * TAU;
    let speed = roll_speed(def.speed, defs.game().asteroid_base_speed, rng);

    let vertex_count = rng.random_range(7..12);
    let outline = (0..vertex_count)
        .map(|i| {
            let a = i as f32 / vertex_count as f32 * TAU;
            polar_to_cartesian(def.radius * rng.random_range(0.7..1.0), a)
        })
        .collect();

    Some(Asteroid {
        pos,
        vel: polar_to_cartesian(speed, heading),
        kind,
        hp: def.hp,
        radius: def.radius,
        spin: rng.random_range(-MAX_SPIN..MAX_SPIN),
        angle: rng.random::<f32>() * TAU,
        outline,
    })
}

/// Spawn one asteroid on the arena perimeter aimed roughly at the center.
///
/// Returns false (and spawns nothing) if the type is unknown.
pub fn spawn_asteroid(session: &mut Session, defs: &Definitions, kind: AsteroidKind) -> bool {
    let cfg = defs.game();
    let center = session.station.as_ref().map_or(Vec2::ZERO, |s| s.pos);
    let spawn_angle = session.rng.random::<f32>() * TAU;
    let pos = center + polar_to_cartesian(cfg.arena_radius, spawn_angle);

    let Some(mut asteroid) = create_asteroid(defs, kind, pos, &mut session.rng) else {
        log::warn!("Unknown asteroid type '{}', spawn skipped", kind.as_str());
        return false;
    };

    let to_center = center - pos;
    let aim = to_center.y.atan2(to_center.x) + (session.rng.random::<f32>() - 0.5) * AIM_SPREAD;
    // type is known to exist at this point
    let type_speed = defs.asteroid_type(kind).map_or(1.0, |d| d.speed);
    let speed = roll_speed(type_speed, cfg.asteroid_base_speed, &mut session.rng);
    asteroid.vel = polar_to_cartesian(speed, aim);

    session.asteroids.push(asteroid);
    true
}

/// Start the next wave: spawn, award the completion bonus, announce it
pub fn spawn_wave(session: &mut Session, defs: &Definitions) {
    session.wave += 1;
    session.wave_timer = 0.0;
    let wave = session.wave;

    let mut spawned = 0;
    for _ in 0..wave_size(wave) {
        if spawn_asteroid(session, defs, AsteroidKind::Large) {
            spawned += 1;
        }
    }
    session.emit(SimEvent::Sound(SoundCue::WaveStart));
    log::info!("Wave {}: {} asteroids", wave, spawned);

    if wave > 1 {
        let scoring = defs.scoring();
        let mut bonus = scoring.wave_bonus;
        if session.station.as_ref().is_some_and(|s| s.hp_ratio() > 0.5) {
            bonus += scoring.station_defense_bonus;
        }
        session.score += bonus;

        let anchor = session
            .ship
            .as_ref()
            .map(|s| s.pos)
            .or_else(|| session.station.as_ref().map(|s| s.pos))
            .unwrap_or(Vec2::ZERO);
        session.emit(SimEvent::float(
            anchor - Vec2::new(0.0, 50.0),
            format!("+{} wave bonus", bonus),
            colors::SCORE,
            1.5,
        ));
    }

    set_var(session, "waves_survived", wave as f64, "wave started");
    if let Some(beat) = wave_beat(wave) {
        show_beat(session, defs, beat);
    }
}

/// Count down the empty-field delay; start a wave when it elapses.
///
/// The timer is held at zero whenever any asteroid remains. Returns whether a
/// wave started.
pub fn update_wave_timer(session: &mut Session, defs: &Definitions, dt: f32) -> bool {
    if !session.asteroids.is_empty() {
        session.wave_timer = 0.0;
        return false;
    }
    session.wave_timer += dt;
    if session.wave_timer < defs.game().wave_delay {
        return false;
    }
    session.wave_timer = 0.0;
    show_beat(session, defs, "wave_clear");
    spawn_wave(session, defs);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::session::{begin_game, start_screen};
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn playing(seed: u64) -> (Session, Definitions) {
        let defs = Definitions::builtin();
        let mut session = Session::new(seed);
        start_screen(&mut session, &defs);
        begin_game(&mut session, &defs);
        (session, defs)
    }

    #[test]
    fn test_wave_sizes() {
        assert_eq!(wave_size(1), 3);
        assert_eq!(wave_size(5), 7);
    }

    #[test]
    fn test_wave_beats_fire_only_on_crossing() {
        assert_eq!(wave_beat(3), Some("getting_intense"));
        assert_eq!(wave_beat(4), None);
        assert_eq!(wave_beat(10), Some("wave_10"));
        assert_eq!(wave_beat(11), None);
    }

    #[test]
    fn test_create_asteroid_uses_type_stats() {
        let defs = Definitions::builtin();
        let mut rng = Pcg32::seed_from_u64(5);
        let a = create_asteroid(&defs, AsteroidKind::Medium, Vec2::ZERO, &mut rng).unwrap();
        assert_eq!(a.hp, 2);
        assert_eq!(a.radius, 25.0);
        assert!((7..12).contains(&a.outline.len()));
        assert!(a.outline.iter().all(|v| v.length() <= 25.0 + 1e-3));
        assert!(a.spin.abs() <= MAX_SPIN);
    }

    #[test]
    fn test_unknown_type_skips_spawn() {
        let (mut session, mut defs) = playing(1);
        defs.asteroid_types.remove("large");
        let before = session.asteroids.len();
        assert!(!spawn_asteroid(&mut session, &defs, AsteroidKind::Large));
        assert_eq!(session.asteroids.len(), before);
    }

    #[test]
    fn test_timer_waits_for_empty_field() {
        let (mut session, defs) = playing(2);
        assert!(!update_wave_timer(&mut session, &defs, 10.0));
        assert_eq!(session.wave_timer, 0.0);

        session.asteroids.clear();
        assert!(!update_wave_timer(&mut session, &defs, 1.0));
        assert!(!update_wave_timer(&mut session, &defs, 1.0));
        assert!(update_wave_timer(&mut session, &defs, 1.0));
        assert_eq!(session.wave, 2);
        assert_eq!(session.asteroids.len(), 4);
        assert_eq!(session.wave_timer, 0.0);
    }

    #[test]
    fn test_wave_bonus_with_healthy_station() {
        let (mut session, defs) = playing(3);
        session.asteroids.clear();
        spawn_wave(&mut session, &defs);
        assert_eq!(session.score, 250);

        session.station.as_mut().unwrap().hp = 5;
        spawn_wave(&mut session, &defs);
        assert_eq!(session.score, 450);
        assert_eq!(session.narrative.current_node, "getting_intense");
        assert_eq!(session.narrative.var("waves_survived"), Some(3.0));
    }

    #[test]
    fn test_first_wave_has_no_bonus() {
        let (session, _) = playing(4);
        assert_eq!(session.wave, 1);
        assert_eq!(session.score, 0);
    }

    proptest! {
        #[test]
        fn prop_wave_spawns_inward_on_perimeter(seed in any::<u64>(), extra in 0u32..6) {
            let (mut session, defs) = playing(seed);
            for _ in 0..extra {
                session.asteroids.clear();
                spawn_wave(&mut session, &defs);
            }
            let cfg = defs.game();
            prop_assert_eq!(session.asteroids.len() as u32, wave_size(session.wave));
            for a in &session.asteroids {
                prop_assert_eq!(a.kind, AsteroidKind::Large);
                prop_assert!((a.pos.length() - cfg.arena_radius).abs() < 0.5);
                // aim spread is ±0.4 rad, so the inward component stays positive
                let inward = -a.pos.normalize();
                prop_assert!(a.vel.dot(inward) > 0.0);
                let speed = a.vel.length();
                prop_assert!(speed >= 1.0 * cfg.asteroid_base_speed * SPEED_JITTER_MIN - 1e-4);
                prop_assert!(speed <= 1.0 * cfg.asteroid_base_speed * SPEED_JITTER_MAX + 1e-4);
            }
        }
    }
}
