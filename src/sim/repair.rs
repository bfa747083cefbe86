//! Station docking: hull repair, station self-repair, refuelling, fuel warnings

use glam::Vec2;

use super::events::{SimEvent, SoundCue, colors};
use super::session::{set_var, show_beat};
use super::state::Session;
use crate::definitions::Definitions;

const FUEL_LOW: f32 = 0.3;
const FUEL_CRITICAL: f32 = 0.1;

/// Run one tick of docking logic.
///
/// Nothing happens unless the ship is within repair range of a living station.
pub fn update_repairs(session: &mut Session, defs: &Definitions, dt: f32) {
    let cfg = defs.game();
    let docked = match (&session.ship, &session.station) {
        (Some(ship), Some(station)) if !station.is_destroyed() => {
            ship.pos.distance(station.pos) <= cfg.station_repair_range
        }
        _ => false,
    };
    if !docked {
        session.repairing = false;
        return;
    }

    if !session.repairing {
        session.repairing = true;
        let low_fuel = session
            .ship
            .as_ref()
            .is_some_and(|s| s.fuel <= cfg.max_fuel * FUEL_LOW);
        show_beat(session, defs, if low_fuel { "refueling" } else { "repair_docking" });
    }

    repair_parts(session, defs, dt);
    repair_station(session, defs, dt);

    if let Some(ship) = session.ship.as_mut() {
        ship.fuel = (ship.fuel + cfg.fuel_refuel_rate * dt).min(cfg.max_fuel);
    }
}

/// Restore one hp to the first damaged part each time the accumulator fills
fn repair_parts(session: &mut Session, defs: &Definitions, dt: f32) {
    session.repair_accum += defs.game().repair_rate * dt;
    if session.repair_accum < 1.0 {
        return;
    }
    session.repair_accum -= 1.0;

    let Some(ship) = session.ship.as_mut() else {
        return;
    };
    let Some(index) = ship.parts.iter().position(|p| p.hp < p.max_hp) else {
        session.repair_accum = 0.0;
        return;
    };
    ship.parts[index].hp += 1;
    let pos = ship.world_position(&ship.parts[index]);

    session.emit(SimEvent::float(pos, "+1", colors::REPAIR, 0.8));
    session.emit(SimEvent::Sound(SoundCue::Repair));
}

/// Restore station hp and re-arm its damage warnings as it recovers
fn repair_station(session: &mut Session, defs: &Definitions, dt: f32) {
    let Some(station) = session.station.as_mut() else {
        return;
    };
    if station.hp >= station.max_hp {
        session.station_repair_accum = 0.0;
        return;
    }
    session.station_repair_accum += defs.game().station_repair_rate * dt;
    if session.station_repair_accum < 1.0 {
        return;
    }
    session.station_repair_accum -= 1.0;

    station.hp += 1;
    let ratio = station.hp_ratio();
    if ratio > 0.5 {
        station.warned_50 = false;
    }
    if ratio > 0.3 {
        station.warned_30 = false;
    }
    let pos = station.pos - Vec2::new(0.0, 30.0);
    let hp = station.hp;

    session.emit(SimEvent::float(pos, "+1", colors::REPAIR, 1.0));
    set_var(session, "station_hp", hp as f64, "station repaired");
}

/// Announce fuel thresholds once each, re-arming as the tank refills
pub fn update_fuel_warnings(session: &mut Session, defs: &Definitions) {
    let max_fuel = defs.game().max_fuel;
    let Some(fuel) = session.ship.as_ref().map(|s| s.fuel) else {
        return;
    };
    let ratio = if max_fuel > 0.0 { fuel / max_fuel } else { 0.0 };

    let latches = &mut session.latches;
    if ratio > FUEL_LOW {
        latches.fuel_low = false;
    }
    if ratio > FUEL_CRITICAL {
        latches.fuel_critical = false;
    }
    if ratio > 0.0 {
        latches.fuel_empty = false;
    }

    let beat = if ratio <= 0.0 && !latches.fuel_empty {
        latches.fuel_empty = true;
        latches.fuel_critical = true;
        latches.fuel_low = true;
        Some("fuel_empty")
    } else if ratio <= FUEL_CRITICAL && !latches.fuel_critical {
        latches.fuel_critical = true;
        latches.fuel_low = true;
        Some("fuel_critical")
    } else if ratio <= FUEL_LOW && !latches.fuel_low {
        latches.fuel_low = true;
        Some("fuel_low")
    } else {
        None
    };

    // whole units only, so the variable log stays readable
    let rounded = fuel.floor() as f64;
    if session.narrative.var("fuel") != Some(rounded) {
        set_var(session, "fuel", rounded, "fuel changed");
    }

    if let Some(beat) = beat {
        session.emit(SimEvent::Sound(SoundCue::FuelWarn));
        show_beat(session, defs, beat);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::session::{begin_game, start_screen};

    fn docked(seed: u64) -> (Session, Definitions) {
        let defs = Definitions::builtin();
        let mut session = Session::new(seed);
        start_screen(&mut session, &defs);
        begin_game(&mut session, &defs);
        session.ship.as_mut().unwrap().pos = Vec2::new(0.0, -100.0);
        session.drain_events();
        (session, defs)
    }

    #[test]
    fn test_docking_beat_once_per_visit() {
        let (mut session, defs) = docked(1);
        update_repairs(&mut session, &defs, 0.1);
        assert!(session.repairing);
        assert_eq!(session.narrative.current_node, "repair_docking");

        session.narrative.current_node.clear();
        update_repairs(&mut session, &defs, 0.1);
        assert_eq!(session.narrative.current_node, "");

        session.ship.as_mut().unwrap().pos = Vec2::new(0.0, -500.0);
        update_repairs(&mut session, &defs, 0.1);
        assert!(!session.repairing);

        session.ship.as_mut().unwrap().pos = Vec2::new(0.0, -100.0);
        session.ship.as_mut().unwrap().fuel = 20.0;
        update_repairs(&mut session, &defs, 0.1);
        assert_eq!(session.narrative.current_node, "refueling");
    }

    #[test]
    fn test_part_repair_accumulates() {
        let (mut session, defs) = docked(2);
        session.ship.as_mut().unwrap().parts[1].hp = 1;
        // repair_rate 0.35/s: three seconds is enough for one hp
        for _ in 0..30 {
            update_repairs(&mut session, &defs, 0.1);
        }
        let ship = session.ship.as_ref().unwrap();
        assert_eq!(ship.parts[1].hp, 2);
        assert!(session.events.contains(&SimEvent::Sound(SoundCue::Repair)));
    }

    #[test]
    fn test_station_repair_rearms_warnings() {
        let (mut session, defs) = docked(3);
        {
            let station = session.station.as_mut().unwrap();
            station.hp = 10;
            station.warned_50 = true;
        }
        // station_repair_rate 0.15/s
        update_repairs(&mut session, &defs, 7.0);
        let station = session.station.as_ref().unwrap();
        assert_eq!(station.hp, 11);
        assert!(!station.warned_50);
        assert_eq!(session.narrative.var("station_hp"), Some(11.0));
    }

    #[test]
    fn test_refuel_caps_at_max() {
        let (mut session, defs) = docked(4);
        session.ship.as_mut().unwrap().fuel = 95.0;
        update_repairs(&mut session, &defs, 1.0);
        assert_eq!(session.ship.as_ref().unwrap().fuel, 100.0);
    }

    #[test]
    fn test_dead_station_does_not_repair() {
        let (mut session, defs) = docked(5);
        session.station.as_mut().unwrap().hp = 0;
        session.ship.as_mut().unwrap().fuel = 10.0;
        update_repairs(&mut session, &defs, 1.0);
        assert!(!session.repairing);
        assert_eq!(session.ship.as_ref().unwrap().fuel, 10.0);
    }

    #[test]
    fn test_fuel_warnings_fire_once_and_rearm() {
        let (mut session, defs) = docked(6);
        let set_fuel = |s: &mut Session, f: f32| s.ship.as_mut().unwrap().fuel = f;

        set_fuel(&mut session, 25.0);
        update_fuel_warnings(&mut session, &defs);
        assert_eq!(session.narrative.current_node, "fuel_low");
        update_fuel_warnings(&mut session, &defs);

        set_fuel(&mut session, 5.0);
        update_fuel_warnings(&mut session, &defs);
        assert_eq!(session.narrative.current_node, "fuel_critical");

        set_fuel(&mut session, 0.0);
        update_fuel_warnings(&mut session, &defs);
        assert_eq!(session.narrative.current_node, "fuel_empty");
        assert_eq!(session.narrative.var("fuel"), Some(0.0));

        let warns = session
            .drain_events()
            .into_iter()
            .filter(|e| *e == SimEvent::Sound(SoundCue::FuelWarn))
            .count();
        assert_eq!(warns, 3);

        set_fuel(&mut session, 50.0);
        update_fuel_warnings(&mut session, &defs);
        assert!(!session.latches.fuel_low && !session.latches.fuel_empty);
        set_fuel(&mut session, 29.0);
        update_fuel_warnings(&mut session, &defs);
        assert_eq!(session.narrative.current_node, "fuel_low");
    }
}
