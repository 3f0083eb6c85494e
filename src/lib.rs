//! Tank Hops - A tank defence arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, physics, combat, session state)
//! - `config`: Data-driven game setup (field size, variant presets, seed)
//!
//! Rendering, HUD, audio and raw input capture live outside this crate. They
//! read [`sim::Snapshot`] and [`sim::GameEvent`] and feed [`sim::TickInput`].

pub mod config;
pub mod sim;

pub use config::{ConfigError, GameConfig, Variant};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz presentation clock)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Session defaults
    pub const START_LIVES: u8 = 3;
    pub const MAX_HEALTH: u8 = 100;

    /// Player tank
    pub const PLAYER_SIZE: (f32, f32) = (40.0, 30.0);
    /// Start height as a fraction of field height
    pub const PLAYER_START_Y_FRACTION: f32 = 0.2;
    /// Movement envelope: horizontal margin, floor, ceiling fraction
    pub const PLAYER_MARGIN_X: f32 = 35.0;
    pub const PLAYER_MIN_Y: f32 = 70.0;
    pub const PLAYER_MAX_Y_FRACTION: f32 = 0.4;
    /// Half extents used when clamping the tank to the field after knockback
    pub const PLAYER_FIELD_HALF: (f32, f32) = (20.0, 15.0);
    /// Side of the square around the pointer that must contain the tank to fire
    pub const TOUCH_AREA_SIZE: f32 = 44.0;
    /// Targets closer than this are treated as reached
    pub const MIN_MOVE_DISTANCE: f32 = 1.0;
    pub const MIN_MOVE_SPEED: f32 = 150.0;
    pub const MAX_MOVE_SPEED: f32 = 300.0;
    /// Distance over which adaptive speed ramps from min to max
    pub const MOVE_RAMP_DISTANCE: f32 = 100.0;
    pub const FIXED_MOVE_SPEED: f32 = 150.0;

    /// Player projectiles
    pub const PROJECTILE_SIZE: (f32, f32) = (4.0, 8.0);
    pub const PLAYER_MUZZLE_OFFSET: f32 = 25.0;
    pub const PLAYER_PROJECTILE_SPEED: f32 = 400.0;
    pub const PLAYER_PROJECTILE_TTL: f32 = 0.8;
    pub const RECOIL_OFFSET: f32 = 2.0;

    /// Enemy tanks
    pub const ENEMY_SIZE: (f32, f32) = (40.0, 30.0);
    pub const ENEMY_SPAWN_MARGIN: f32 = 40.0;
    /// Spawn height above the top edge
    pub const ENEMY_SPAWN_ABOVE: f32 = 10.0;
    /// Exit (defensive) line, below the bottom edge
    pub const ENEMY_EXIT_Y: f32 = -50.0;
    pub const ENEMY_DESCENT_DURATION: f32 = 7.0;
    pub const ENEMY_MUZZLE_OFFSET: f32 = 12.0;
    pub const ENEMY_PROJECTILE_SPEED: f32 = 300.0;
    pub const ENEMY_PROJECTILE_TTL: f32 = 2.0;

    /// Medkit pickups
    pub const PICKUP_SIZE: (f32, f32) = (20.0, 20.0);
    pub const PICKUP_MARGIN: f32 = 50.0;
    pub const PICKUP_VISIBLE_TIME: f32 = 5.0;
    pub const PICKUP_FADE_TIME: f32 = 0.5;

    /// Combat
    pub const COLLISION_DAMAGE: u8 = 30;
    pub const ENEMY_PROJECTILE_DAMAGE: u8 = 10;
    pub const KILL_SCORE: u64 = 1;
    pub const KNOCKBACK_DISTANCE: f32 = 100.0;
    pub const KNOCKBACK_DURATION: f32 = 0.1;

    /// Levels
    pub const SCORE_PER_LEVEL: u64 = 10;
    /// Cadence multiplier applied per level above the first
    pub const LEVEL_CADENCE_FACTOR: f32 = 0.9;
    pub const MIN_SPAWN_CADENCE: f32 = 0.6;

    /// Restart button (centered horizontally, below field center)
    pub const RESTART_BUTTON_SIZE: (f32, f32) = (200.0, 50.0);
    pub const RESTART_BUTTON_DROP: f32 = 50.0;
}

/// Unit vector for a heading in radians
#[inline]
pub fn heading_to_dir(heading: f32) -> Vec2 {
    Vec2::new(heading.cos(), heading.sin())
}

/// Heading (radians) of the vector from `from` to `to`
#[inline]
pub fn heading_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}
