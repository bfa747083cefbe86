//! Collision and damage resolution
//!
//! Bullets chip asteroids one hp at a time; ship parts and the station destroy
//! whatever hits them outright. All removal loops walk backwards so an index
//! is never skipped after a splice.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::{boundary_danger, bullet_target, circles_overlap, outside_arena};
use super::events::{SimEvent, SoundCue, colors};
use super::session::{game_over, set_var, show_beat};
use super::state::{Asteroid, AsteroidKind, DeathReason, Session};
use super::waves::create_asteroid;
use crate::definitions::Definitions;

/// Child velocity keeps this share of the parent's
const CHILD_VEL_INHERIT: f32 = 0.5;
/// Extra random kick per axis, uniform in ±half this
const CHILD_SCATTER: f32 = 3.0;
/// Station float texts sit this far above its center
const STATION_TEXT_LIFT: f32 = 30.0;

/// Children released when `parent` breaks apart
pub fn fission_children(parent: &Asteroid, defs: &Definitions, rng: &mut Pcg32) -> Vec<Asteroid> {
    if parent.kind == AsteroidKind::Small {
        return Vec::new();
    }
    let Some(def) = defs.asteroid_type(parent.kind) else {
        return Vec::new();
    };
    let Some(child_kind) = def.splits else {
        return Vec::new();
    };

    let mut children = Vec::with_capacity(def.split_count as usize);
    for _ in 0..def.split_count {
        let Some(mut child) = create_asteroid(defs, child_kind, parent.pos, rng) else {
            log::warn!("Unknown asteroid type '{}', fragment skipped", child_kind.as_str());
            continue;
        };
        let kick = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * CHILD_SCATTER;
        child.vel = parent.vel * CHILD_VEL_INHERIT + kick;
        children.push(child);
    }
    children
}

/// Remove the asteroid at `index`, award its score and release its fragments.
///
/// A stale index is ignored. Returns whether anything was destroyed.
pub fn destroy_asteroid(session: &mut Session, defs: &Definitions, index: usize) -> bool {
    if index >= session.asteroids.len() {
        return false;
    }
    let rock = session.asteroids.remove(index);
    session.asteroids_destroyed += 1;

    let score = defs.asteroid_type(rock.kind).map_or(0, |d| d.score);
    session.score += score;
    session.emit(SimEvent::float(rock.pos, format!("+{}", score), colors::SCORE, 1.0));
    session.emit(SimEvent::Sound(SoundCue::AsteroidBreak));

    let count = session.asteroids_destroyed;
    set_var(session, "asteroids_destroyed", count as f64, "asteroid destroyed");
    if count == 1 {
        show_beat(session, defs, "first_kill");
    }

    let children = fission_children(&rock, defs, &mut session.rng);
    session.asteroids.extend(children);
    true
}

/// Fire the hull beats after the ship lost parts
pub fn note_part_loss(session: &mut Session, defs: &Definitions) {
    if !session.latches.ship_damaged {
        session.latches.ship_damaged = true;
        show_beat(session, defs, "ship_damaged");
    }
    let only_cores = session
        .ship
        .as_ref()
        .is_some_and(|s| s.has_core() && s.parts.iter().all(|p| p.is_core()));
    if only_cores && !session.latches.last_part {
        session.latches.last_part = true;
        show_beat(session, defs, "last_part");
    }
}

/// Knock one hp off a ship part, removing it at zero.
///
/// Returns whether the part was destroyed. A stale index is a no-op.
pub fn damage_part(session: &mut Session, defs: &Definitions, index: usize) -> bool {
    let now = session.survival_time;
    let Some(ship) = session.ship.as_mut() else {
        return false;
    };
    let Some(part) = ship.parts.get_mut(index) else {
        return false;
    };
    part.hp = part.hp.saturating_sub(1);
    part.last_hit = Some(now);
    let destroyed = part.hp == 0;
    let pos = ship.world_position(&ship.parts[index]);

    if destroyed {
        let lost = ship.parts.remove(index);
        log::debug!("Lost {} part", lost.kind.as_str());
    }
    session.emit(SimEvent::float(pos, "-1", colors::DAMAGE, 0.8));
    if destroyed {
        session.emit(SimEvent::Sound(SoundCue::Explosion));
        note_part_loss(session, defs);
    }
    destroyed
}

/// Knock one hp off the station, ending the run at zero.
///
/// Hits on a destroyed station are ignored, so death fires exactly once.
pub fn damage_station(session: &mut Session, defs: &Definitions) {
    let now = session.survival_time;
    let Some(station) = session.station.as_mut() else {
        return;
    };
    if station.is_destroyed() {
        return;
    }
    station.hp -= 1;
    station.last_hit = Some(now);
    let pos = station.pos - Vec2::new(0.0, STATION_TEXT_LIFT);
    let hp = station.hp;
    let ratio = station.hp_ratio();

    let beat = if hp == 0 {
        None
    } else if ratio <= 0.3 && !station.warned_30 {
        station.warned_30 = true;
        station.warned_50 = true;
        Some("station_critical")
    } else if ratio <= 0.5 && !station.warned_50 {
        station.warned_50 = true;
        Some("station_damaged")
    } else {
        None
    };

    session.emit(SimEvent::Sound(SoundCue::StationHit));
    session.emit(SimEvent::float(pos, "-1", colors::STATION_DAMAGE, 1.0));
    set_var(session, "station_hp", hp as f64, "station hit");

    if hp == 0 {
        game_over(session, defs, DeathReason::Station);
    } else if let Some(beat) = beat {
        show_beat(session, defs, beat);
    }
}

/// Bullets against asteroids: one hit per bullet, bullet consumed
pub fn resolve_bullet_hits(session: &mut Session, defs: &Definitions) {
    let mut b = session.bullets.len();
    while b > 0 {
        b -= 1;
        let Some(target) = bullet_target(session.bullets[b].pos, &session.asteroids) else {
            continue;
        };
        session.bullets.remove(b);

        let rock = &mut session.asteroids[target];
        rock.hp = rock.hp.saturating_sub(1);
        let pos = rock.pos;
        let broken = rock.hp == 0;
        session.emit(SimEvent::float(pos, "-1", colors::DAMAGE, 0.6));
        if broken {
            destroy_asteroid(session, defs, target);
        }
    }
}

/// Ship parts against asteroids. Returns true if the ship lost its last core.
pub fn resolve_ship_hits(session: &mut Session, defs: &Definitions) -> bool {
    let part_radius = defs.game().part_radius;
    let mut i = session.asteroids.len();
    while i > 0 {
        i -= 1;
        let Some(rock) = session.asteroids.get(i) else {
            continue;
        };
        let Some(ship) = session.ship.as_ref() else {
            return false;
        };
        let hit = ship.parts.iter().rposition(|p| {
            circles_overlap(ship.world_position(p), part_radius, rock.pos, rock.radius)
        });
        let Some(part) = hit else {
            continue;
        };

        damage_part(session, defs, part);
        destroy_asteroid(session, defs, i);

        if session.ship.as_ref().is_some_and(|s| !s.has_core()) {
            game_over(session, defs, DeathReason::Player);
            return true;
        }
    }
    false
}

/// Asteroids against the station. Returns true if the station fell.
pub fn resolve_station_hits(session: &mut Session, defs: &Definitions) -> bool {
    let Some((center, radius)) = session
        .station
        .as_ref()
        .filter(|s| !s.is_destroyed())
        .map(|s| (s.pos, s.radius))
    else {
        return false;
    };

    let mut i = session.asteroids.len();
    while i > 0 {
        i -= 1;
        let Some(rock) = session.asteroids.get(i) else {
            continue;
        };
        if !circles_overlap(rock.pos, rock.radius, center, radius) {
            continue;
        }
        destroy_asteroid(session, defs, i);
        damage_station(session, defs);
        if session.is_over() {
            return true;
        }
    }
    false
}

/// Update the danger value, warn once per excursion, kill past the edge.
///
/// Returns true if the ship left the arena.
pub fn check_boundary(session: &mut Session, defs: &Definitions) -> bool {
    let cfg = defs.game();
    let center = session.station.as_ref().map_or(Vec2::ZERO, |s| s.pos);
    let Some(ship) = session.ship.as_mut() else {
        return false;
    };
    let dist = ship.pos.distance(center);
    let warning = cfg.warning_distance();
    session.boundary_warning = boundary_danger(dist, warning, cfg.arena_radius);

    if outside_arena(ship.pos, center, cfg.arena_radius) {
        ship.parts.clear();
        game_over(session, defs, DeathReason::Boundary);
        return true;
    }

    if dist > warning {
        if !session.latches.boundary_warned {
            session.latches.boundary_warned = true;
            session.emit(SimEvent::Sound(SoundCue::Warning));
            show_beat(session, defs, "boundary_warning");
        }
    } else {
        session.latches.boundary_warned = false;
    }
    false
}

/// Silently drop asteroids that drifted out past the cull margin
pub fn cull_escaped(session: &mut Session, defs: &Definitions) -> usize {
    let cfg = defs.game();
    let limit = cfg.arena_radius + cfg.asteroid_cull_margin;
    let center = session.station.as_ref().map_or(Vec2::ZERO, |s| s.pos);
    let before = session.asteroids.len();
    session.asteroids.retain(|a| a.pos.distance(center) <= limit);
    before - session.asteroids.len()
}
