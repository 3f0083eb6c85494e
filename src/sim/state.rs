//! Game state and core simulation types
//!
//! Everything the simulation owns lives here. The presentation layer reads
//! [`Snapshot`]s and drains [`GameEvent`]s; it never mutates state directly.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::combat::ExplosionSize;
use super::entity::{Category, EntityId, EntityKind, Lifetime};
use super::geometry::Rect;
use super::player::{ControlTuning, PlayerController, start_position};
use super::registry::Registry;
use super::session::Session;
use super::spawn::SpawnDirector;
use crate::config::GameConfig;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused (state preserved, no ticks)
    Paused,
    /// Run ended; waiting for restart
    GameOver,
    /// Restart requested; the next tick resets and resumes
    Restarting,
}

/// One-shot notifications for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Explosion { size: ExplosionSize, pos: Vec2 },
    MuzzleFlash { pos: Vec2, heading: f32 },
    /// Small backwards kick of the firing tank
    Recoil { id: EntityId, offset: f32 },
    DamageFlash { id: EntityId },
    ScoreChanged(u64),
    LivesChanged(u8),
    HealthChanged(u8),
    LevelUp(u32),
    /// Enemy crossed the defensive line
    Breach { id: EntityId },
    Paused,
    Resumed,
    GameOver,
    Restarted,
}

/// Visual variant hint for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visual {
    PlayerTank,
    EnemyTank,
    PlayerShell,
    EnemyShell,
    Medkit,
    /// Medkit in its final fade-out window
    MedkitFading,
}

/// Pose of one entity for rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityView {
    pub id: EntityId,
    pub category: Category,
    pub visual: Visual,
    pub pos: Vec2,
    pub heading: f32,
    pub half_extents: Vec2,
}

/// Per-tick projection consumed by the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    pub health_pct: f32,
    pub level: u32,
    pub paused: bool,
    pub entities: Vec<EntityView>,
    /// Handles compacted during the last tick (drop their visuals)
    pub removed: Vec<EntityId>,
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub rng: Pcg32,
    pub session: Session,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub registry: Registry,
    pub director: SpawnDirector,
    pub controller: PlayerController,
    /// Handle of the player tank (stable across restarts)
    pub player: EntityId,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    /// Handles compacted by the most recent tick
    pub removed_last_tick: Vec<EntityId>,
}

impl GameState {
    /// Create a new game with the given configuration
    pub fn new(config: GameConfig) -> Self {
        let mut registry = Registry::new();
        let player = registry.spawn(
            EntityKind::PlayerTank { knockback: 0.0 },
            start_position(config.field()),
        );
        log::info!(
            "new game: {} variant, field {}x{}, seed {}",
            config.variant.as_str(),
            config.field_width,
            config.field_height,
            config.seed
        );

        Self {
            rng: Pcg32::seed_from_u64(config.seed),
            director: SpawnDirector::new(&config),
            config,
            session: Session::new(),
            time_ticks: 0,
            phase: GamePhase::Playing,
            registry,
            controller: PlayerController::new(),
            player,
            events: Vec::new(),
            removed_last_tick: Vec::new(),
        }
    }

    /// Shorthand for a default-config game with a specific seed
    pub fn with_seed(seed: u64) -> Self {
        Self::new(GameConfig {
            seed,
            ..GameConfig::default()
        })
    }

    pub fn field(&self) -> Vec2 {
        self.config.field()
    }

    pub fn tuning(&self) -> ControlTuning {
        ControlTuning {
            field: self.field(),
            adaptive_speed: self.config.adaptive_speed,
            hold_fire_chance: self.config.hold_fire_chance,
            projectile_cap: self.config.projectile_cap,
        }
    }

    /// Current player position, if the session is initialised
    pub fn player_pos(&self) -> Option<Vec2> {
        self.registry.live(self.player).map(|e| e.pos)
    }

    /// Restart control, hit-testable while paused or game over
    pub fn restart_button(&self) -> Rect {
        let field = self.field();
        Rect::from_size(
            Vec2::new(field.x * 0.5, field.y * 0.5 - RESTART_BUTTON_DROP),
            RESTART_BUTTON_SIZE,
        )
    }

    /// Reset the session: clear all non-player entities, restore scalars,
    /// return the tank to its start pose and resume play.
    pub fn restart(&mut self) {
        let player = self.player;
        let cleared = self.registry.mark_all_except(|e| e.id == player);
        self.removed_last_tick = self.registry.compact();

        // Player handle survives; recreate it if something removed it
        let start = start_position(self.field());
        match self.registry.get_mut(player) {
            Some(tank) => {
                tank.pos = start;
                tank.prev_pos = start;
                tank.vel = Vec2::ZERO;
                tank.kind = EntityKind::PlayerTank { knockback: 0.0 };
            }
            None => {
                self.player = self
                    .registry
                    .spawn(EntityKind::PlayerTank { knockback: 0.0 }, start);
            }
        }

        self.session = Session::new();
        self.director.reset();
        self.controller = PlayerController::new();
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::Restarted);
        log::info!("restarted, cleared {} entities", cleared);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Project the current state for rendering
    pub fn snapshot(&self) -> Snapshot {
        let entities = self
            .registry
            .iter()
            .map(|e| EntityView {
                id: e.id,
                category: e.category(),
                visual: visual_for(&e.kind, e.lifetime),
                pos: e.pos,
                heading: e.heading,
                half_extents: e.bounds().half,
            })
            .collect();

        Snapshot {
            tick: self.time_ticks,
            phase: self.phase,
            score: self.session.score,
            lives: self.session.lives,
            health_pct: self.session.health_pct(),
            level: self.session.level,
            paused: self.phase != GamePhase::Playing,
            entities,
            removed: self.removed_last_tick.clone(),
        }
    }
}

fn visual_for(kind: &EntityKind, lifetime: Lifetime) -> Visual {
    match kind {
        EntityKind::PlayerTank { .. } => Visual::PlayerTank,
        EntityKind::EnemyTank { .. } => Visual::EnemyTank,
        EntityKind::PlayerProjectile => Visual::PlayerShell,
        EntityKind::EnemyProjectile => Visual::EnemyShell,
        EntityKind::Pickup => match lifetime.remaining() {
            Some(t) if t <= PICKUP_FADE_TIME => Visual::MedkitFading,
            _ => Visual::Medkit,
        },
    }
}
