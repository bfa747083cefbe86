//! Gun volleys and bullet flight

use super::connectivity::connected_mask;
use super::events::{SimEvent, SoundCue};
use super::state::{Bullet, PartKind, Session};
use crate::heading;
use crate::tuning::GameConfig;

/// Fire one bullet from every connected gun if the cooldown allows.
///
/// Bullets inherit the ship's velocity. Returns how many were fired.
pub fn fire_guns(session: &mut Session, cfg: &GameConfig) -> usize {
    let now = session.survival_time;
    let Some(ship) = session.ship.as_mut() else {
        return 0;
    };
    if ship.last_shot.is_some_and(|last| now - last < cfg.shoot_cooldown) {
        return 0;
    }
    ship.last_shot = Some(now);

    let mask = connected_mask(&ship.parts, cfg.part_proximity);
    let muzzle_vel = ship.vel + heading(ship.angle) * cfg.bullet_speed;
    let volley: Vec<Bullet> = ship
        .parts
        .iter()
        .zip(&mask)
        .filter(|(p, live)| p.kind == PartKind::Gun && **live)
        .map(|(p, _)| Bullet {
            pos: ship.world_position(p),
            vel: muzzle_vel,
            life: cfg.bullet_life,
        })
        .collect();

    let fired = volley.len();
    session.bullets.extend(volley);
    if fired > 0 {
        session.emit(SimEvent::Sound(SoundCue::Shoot));
    }
    fired
}

/// Move bullets and drop the ones whose life ran out
pub fn advance_bullets(bullets: &mut Vec<Bullet>) {
    for b in bullets.iter_mut() {
        b.pos += b.vel;
        b.life = b.life.saturating_sub(1);
    }
    bullets.retain(|b| b.life > 0);
}
