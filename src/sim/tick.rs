//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Order within a
//! Playing tick:
//! 1. pointer input (move / fire)
//! 2. spawn director, enemy turrets and weapons
//! 3. physics advance, knockback settle
//! 4. contact detection and resolution, one effect batch per contact
//! 5. lifetime countdowns (TTL expiry, breaches)
//! 6. registry compaction
//! 7. terminal check

use glam::Vec2;

use super::combat::{self, Effect, ExplosionSize};
use super::entity::{Category, EntityKind, Lifetime};
use super::physics;
use super::player::{PointerEvent, movement_envelope};
use super::session::SessionDelta;
use super::spawn;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer events queued since the previous tick, in arrival order
    pub pointer: Vec<PointerEvent>,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - AI plays the game
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Removals are reported for the tick that compacted them only
    state.removed_last_tick.clear();

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                // A held pointer is released by the pause
                state.controller.on_pointer_up();
                state.events.push(GameEvent::Paused);
                log::info!("paused at tick {}", state.time_ticks);
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                state.events.push(GameEvent::Resumed);
                log::info!("resumed at tick {}", state.time_ticks);
            }
            _ => {}
        }
    }

    match state.phase {
        GamePhase::Paused | GamePhase::GameOver => {
            track_pointer(state, &input.pointer);
            handle_restart_control(state, &input.pointer);
            return;
        }
        GamePhase::Restarting => {
            state.restart();
            return;
        }
        GamePhase::Playing => {}
    }

    debug_assert!(
        state.player_pos().is_some(),
        "tick on a session without a player tank"
    );
    let Some(player_pos) = state.player_pos() else {
        return;
    };

    state.time_ticks += 1;

    // 1. Input
    let pointer = if input.autopilot {
        let mut pointer = input.pointer.clone();
        pointer.extend(autopilot(state, player_pos));
        pointer
    } else {
        input.pointer.clone()
    };
    let tuning = state.tuning();
    state.controller.step(
        &pointer,
        state.player,
        &tuning,
        dt,
        &mut state.registry,
        &mut state.rng,
        &mut state.events,
    );

    // 2. Spawning and enemy fire
    state
        .director
        .tick(dt, state.session.level, &mut state.registry, &mut state.rng);
    let player_pos = state.player_pos().unwrap_or(player_pos);
    spawn::enemy_weapons(
        &mut state.registry,
        player_pos,
        state.config.enemy_fire_period,
        dt,
        &mut state.events,
    );

    // 3. Physics
    physics::advance(&mut state.registry, dt);
    settle_player(state, dt);

    // 4. Contacts
    for contact in physics::detect_contacts(&state.registry) {
        let batch = combat::resolve(&state.registry, &contact);
        if !batch.is_empty() {
            apply_batch(state, &batch);
        }
    }

    // 5. Lifetimes
    expire_lifetimes(state, dt);

    // 6. Compaction
    state.removed_last_tick = state.registry.compact();

    // 7. Terminal check
    check_terminal(state);
}

/// Apply one effect batch, then run the post-mutation hooks
fn apply_batch(state: &mut GameState, batch: &[Effect]) {
    // Tanks destroyed by a batch without its own explosion get a medium one
    let has_cue = batch
        .iter()
        .any(|e| matches!(e, Effect::SpawnEffect { .. }));
    let kills: Vec<Vec2> = if has_cue {
        Vec::new()
    } else {
        batch
            .iter()
            .filter_map(|e| match e {
                Effect::Destroy(id) => state.registry.live(*id),
                _ => None,
            })
            .filter(|e| e.category() == Category::Enemy)
            .map(|e| e.pos)
            .collect()
    };

    let delta = combat::apply(
        batch,
        &mut state.registry,
        &mut state.session,
        &mut state.events,
    );
    for pos in kills {
        state.events.push(GameEvent::Explosion {
            size: ExplosionSize::Medium,
            pos,
        });
    }
    after_batch(state, delta);
}

/// Post-mutation hooks: HUD events and level progression
fn after_batch(state: &mut GameState, delta: SessionDelta) {
    if delta.score {
        state.events.push(GameEvent::ScoreChanged(state.session.score));
        if let Some(level) = state.session.refresh_level() {
            log::info!(
                "level {} (spawn cadence {:.2}s)",
                level,
                state.director.cadence_for(level)
            );
            state.events.push(GameEvent::LevelUp(level));
        }
    }
    if delta.lives {
        state.events.push(GameEvent::LivesChanged(state.session.lives));
    }
    if delta.health {
        state.events.push(GameEvent::HealthChanged(state.session.health));
    }
}

/// Count down knockback and keep the tank on the field
fn settle_player(state: &mut GameState, dt: f32) {
    let field = state.field();
    let Some(tank) = state.registry.get_mut(state.player) else {
        return;
    };
    if let EntityKind::PlayerTank { knockback } = &mut tank.kind {
        if *knockback > 0.0 {
            *knockback -= dt;
            if *knockback <= 1e-4 {
                *knockback = 0.0;
                tank.vel = Vec2::ZERO;
            }
        }
    }

    let half = Vec2::new(PLAYER_FIELD_HALF.0, PLAYER_FIELD_HALF.1);
    tank.pos = tank.pos.clamp(half, (field - half).max(half));
}

/// Tick every lifetime; expired entities resolve into Destroy (and, for a
/// descent, a breach that costs a life).
fn expire_lifetimes(state: &mut GameState, dt: f32) {
    let mut expired = Vec::new();
    for entity in state.registry.iter_mut() {
        if entity.lifetime.tick(dt) {
            expired.push(entity.id);
        }
    }

    for id in expired {
        let Some(entity) = state.registry.live(id) else {
            continue;
        };
        if matches!(entity.lifetime, Lifetime::Descent(_)) {
            log::debug!("breach by {} at x={:.1}", id, entity.pos.x);
            state.events.push(GameEvent::Breach { id });
        }
        let batch = combat::resolve_expiry(entity);
        let delta = combat::apply(
            &batch,
            &mut state.registry,
            &mut state.session,
            &mut state.events,
        );
        after_batch(state, delta);
    }
}

/// Playing -> GameOver, exactly once
fn check_terminal(state: &mut GameState) {
    if state.phase == GamePhase::Playing && state.session.is_terminal() {
        state.phase = GamePhase::GameOver;
        state.controller.on_pointer_up();
        state.events.push(GameEvent::GameOver);
        log::info!(
            "game over at tick {}: score {}, lives {}, health {}",
            state.time_ticks,
            state.session.score,
            state.session.lives,
            state.session.health
        );
    }
}

/// Keep the controller in step with releases and drags while the world is
/// frozen; presses never drive or fire here.
fn track_pointer(state: &mut GameState, pointer: &[PointerEvent]) {
    for event in pointer {
        match *event {
            PointerEvent::Move(point) => state.controller.on_pointer_move(point),
            PointerEvent::Up => state.controller.on_pointer_up(),
            PointerEvent::Down(_) => {}
        }
    }
}

fn handle_restart_control(state: &mut GameState, pointer: &[PointerEvent]) {
    let button = state.restart_button();
    let pressed = pointer
        .iter()
        .any(|e| matches!(e, PointerEvent::Down(p) if button.contains_point(*p)));
    if pressed {
        log::info!("restart requested");
        state.phase = GamePhase::Restarting;
    }
}

/// Demo driver: chase the lowest enemy and tap the tank when lined up.
/// Detours for a medkit when health is low.
fn autopilot(state: &GameState, tank: Vec2) -> Vec<PointerEvent> {
    let (min, max) = movement_envelope(state.field());

    if state.session.health < 50 {
        let medkit = state
            .registry
            .iter()
            .filter(|e| e.category() == Category::Pickup)
            .map(|e| e.pos)
            .find(|p| p.y >= min.y && p.y <= max.y);
        if let Some(target) = medkit {
            return vec![PointerEvent::Down(target)];
        }
    }

    let lowest = state
        .registry
        .iter()
        .filter(|e| e.category() == Category::Enemy)
        .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .map(|e| e.pos);

    match lowest {
        Some(enemy) if (enemy.x - tank.x).abs() < TOUCH_AREA_SIZE * 0.25 => {
            vec![PointerEvent::Down(tank), PointerEvent::Up]
        }
        Some(enemy) => {
            let target = Vec2::new(enemy.x, tank.y).clamp(min, max);
            // Stay clear of the touch square so the press drives instead of firing
            let target = if (target - tank).abs().max_element() <= TOUCH_AREA_SIZE * 0.5 {
                target + Vec2::new((target.x - tank.x).signum() * TOUCH_AREA_SIZE, 0.0)
            } else {
                target
            };
            vec![PointerEvent::Down(target)]
        }
        None => vec![PointerEvent::Up],
    }
}

/// Fixed-step driver: accumulates frame time and runs whole ticks
#[derive(Debug, Clone, Default)]
pub struct Stepper {
    accumulator: f32,
    /// Input queued by frames that did not cover a whole tick yet
    pending: TickInput,
}

impl Stepper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `input`, then run as many SIM_DT ticks as the accumulated frame
    /// time covers (at most MAX_SUBSTEPS). Queued pointer events and the
    /// pause toggle are delivered to the next tick that actually runs.
    /// Returns the number of ticks run.
    pub fn advance(&mut self, state: &mut GameState, input: &TickInput, frame_dt: f32) -> u32 {
        self.pending.pointer.extend(input.pointer.iter().copied());
        self.pending.pause |= input.pause;
        self.pending.autopilot = input.autopilot;
        self.accumulator += frame_dt.min(0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(state, &self.pending, SIM_DT);
            // One-shot fields are consumed by the tick that ran
            self.pending.pointer.clear();
            self.pending.pause = false;
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }
}
