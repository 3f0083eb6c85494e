//! Tank Hops headless demo
//!
//! Runs the simulation on autopilot at a fixed frame rate and prints the
//! final snapshot as JSON. Usage: `tank-hops [config.json] [seconds]`

use tank_hops::GameConfig;
use tank_hops::consts::*;
use tank_hops::sim::{GameEvent, GamePhase, GameState, PointerEvent, Stepper, TickInput};

/// Presentation frame time the demo feeds the stepper
const FRAME_DT: f32 = 1.0 / 60.0;
const DEFAULT_SECONDS: f32 = 60.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    log::info!("Tank Hops (headless demo) starting...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let seconds = match args.next() {
        Some(s) => s.parse::<f32>()?,
        None => DEFAULT_SECONDS,
    };

    let mut state = GameState::new(config);
    let mut stepper = Stepper::new();
    let mut stats = DemoStats::default();

    let frames = (seconds / FRAME_DT).ceil() as u64;
    for _ in 0..frames {
        let mut input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        // Tap restart as soon as a run ends
        if state.phase == GamePhase::GameOver {
            let button = state.restart_button().center;
            input.pointer.push(PointerEvent::Down(button));
        }

        stepper.advance(&mut state, &input, FRAME_DT);
        for event in state.drain_events() {
            stats.record(&event, &state);
        }
    }

    log::info!(
        "demo finished after {} ticks: {} runs, best score {}, {} explosions, {} breaches",
        state.time_ticks,
        stats.runs,
        stats.best_score.max(state.session.score),
        stats.explosions,
        stats.breaches
    );
    println!("{}", serde_json::to_string_pretty(&state.snapshot())?);
    Ok(())
}

#[derive(Debug, Default)]
struct DemoStats {
    runs: u32,
    best_score: u64,
    explosions: u32,
    breaches: u32,
}

impl DemoStats {
    fn record(&mut self, event: &GameEvent, state: &GameState) {
        match event {
            GameEvent::Explosion { .. } => self.explosions += 1,
            GameEvent::Breach { .. } => self.breaches += 1,
            GameEvent::GameOver => {
                self.runs += 1;
                self.best_score = self.best_score.max(state.session.score);
                log::info!(
                    "run {} over at {:.1}s with score {}",
                    self.runs,
                    state.time_ticks as f32 * SIM_DT,
                    state.session.score
                );
            }
            _ => {}
        }
    }
}
