//! Asteroid Hunter headless runner
//!
//! Loads definitions, then flies a seeded autopilot session at the fixed
//! timestep until the run ends or the tick cap is reached.
//!
//! Usage: `asteroid-hunter [definitions.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
mod runner {
    use std::{env, fs, process};

    use asteroid_hunter::Definitions;
    use asteroid_hunter::consts::*;
    use asteroid_hunter::normalize_angle;
    use asteroid_hunter::sim::{Screen, Session, SimEvent, TickInput, start_screen, tick};

    /// Ten minutes of simulated play
    const MAX_TICKS: u64 = 60 * 60 * 10;
    /// Frame length the runner pretends to render at
    const FRAME_DT: f32 = 1.0 / 30.0;
    const DEFAULT_SEED: u64 = 0x5eed;

    /// Autopilot keeps inside this radius and heads home beyond it
    const PATROL_RADIUS: f32 = 500.0;
    /// Aim tolerance before the guns open up (radians)
    const FIRE_CONE: f32 = 0.25;
    /// Heading error that still counts as on target (radians)
    const AIM_DEADBAND: f32 = 0.05;
    const MAX_CRUISE_SPEED: f32 = 3.0;

    /// Runner instance holding all state
    struct Game {
        session: Session,
        defs: Definitions,
        accumulator: f32,
        input: TickInput,
        ticks: u64,
    }

    impl Game {
        fn new(seed: u64, defs: Definitions) -> Self {
            let mut session = Session::new(seed);
            start_screen(&mut session, &defs);
            Self {
                session,
                defs,
                accumulator: 0.0,
                input: TickInput::default(),
                ticks: 0,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.session, &self.defs, &self.input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;
                self.ticks += 1;

                // Clear one-shot inputs after processing
                self.input.start = false;
                self.input.restart = false;

                self.report_events();
            }
        }

        fn report_events(&mut self) {
            for event in self.session.drain_events() {
                match event {
                    SimEvent::Beat { node } => match self.session.narrative.visible_message() {
                        Some(msg) if self.session.narrative.current_node == node => {
                            log::info!("[{}] {}", node, msg.text)
                        }
                        _ => log::info!("[{}]", node),
                    },
                    SimEvent::ScoreSubmitted { final_score } => {
                        log::info!("Final score submitted: {}", final_score)
                    }
                    SimEvent::Sound(cue) => log::trace!("sound: {}", cue.as_str()),
                    SimEvent::FloatText { pos, text, .. } => {
                        log::trace!("float '{}' at ({:.0}, {:.0})", text, pos.x, pos.y)
                    }
                }
            }
        }

        /// Pick held input for the next frame
        fn steer(&mut self) {
            let mut input = TickInput {
                start: self.session.screen == Screen::Start,
                ..Default::default()
            };
            let Some(ship) = self.session.ship.as_ref() else {
                self.input = input;
                return;
            };

            let home = self.session.station.as_ref().map_or(glam::Vec2::ZERO, |s| s.pos);
            let nearest = self
                .session
                .asteroids
                .iter()
                .min_by(|a, b| {
                    let da = a.pos.distance_squared(ship.pos);
                    da.total_cmp(&b.pos.distance_squared(ship.pos))
                })
                .map(|a| a.pos);

            let returning = ship.pos.distance(home) > PATROL_RADIUS;
            let target = if returning { Some(home) } else { nearest };

            if let Some(target) = target {
                let to = target - ship.pos;
                // heading(a) = (sin a, -cos a)
                let wanted = to.x.atan2(-to.y);
                let error = normalize_angle(wanted - ship.angle);
                input.turn_right = error > AIM_DEADBAND;
                input.turn_left = error < -AIM_DEADBAND;
                input.shoot = !returning && error.abs() < FIRE_CONE;
                input.thrust = returning && error.abs() < FIRE_CONE;
            }
            input.brake = ship.vel.length() > MAX_CRUISE_SPEED;
            self.input = input;
        }
    }

    fn load_definitions(path: Option<&str>) -> Result<Definitions, String> {
        let Some(path) = path else {
            return Ok(Definitions::builtin());
        };
        let json = fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
        Definitions::from_json(&json).map_err(|e| format!("Invalid definitions in {}: {}", path, e))
    }

    pub fn run() {
        env_logger::init();
        log::info!("Asteroid Hunter (headless) starting...");

        let args: Vec<String> = env::args().collect();
        let defs = match load_definitions(args.get(1).map(String::as_str)) {
            Ok(defs) => defs,
            Err(e) => {
                log::error!("{}", e);
                process::exit(1);
            }
        };
        let seed = args
            .get(2)
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SEED);
        log::info!("Game initialized with seed: {}", seed);

        let mut game = Game::new(seed, defs);
        while game.ticks < MAX_TICKS {
            game.steer();
            game.update(FRAME_DT);
            if game.session.is_over() {
                break;
            }
        }

        let s = &game.session;
        log::info!(
            "Run finished after {} ticks: score {}, wave {}, {} asteroids destroyed, {:.1}s survived",
            game.ticks,
            s.score,
            s.wave,
            s.asteroids_destroyed,
            s.survival_time
        );
        if !s.is_over() {
            log::info!("Tick cap reached before the run ended");
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    runner::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation core has no browser front end
}
