//! Game configuration
//!
//! Field size, seed, spawn pacing and the control/weapon feel of a session.
//! Loaded from JSON with every field optional; omitted fields keep defaults.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Gameplay variant presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// Pickups, enemy fire, adaptive movement and hold-to-fire
    #[default]
    Assault,
    /// Fixed movement speed, one shot per tap, no pickups
    Classic,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Assault => "Assault",
            Variant::Classic => "Classic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "assault" => Some(Variant::Assault),
            "classic" | "retro" => Some(Variant::Classic),
            _ => None,
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Preset this configuration was derived from
    pub variant: Variant,

    // === Field ===
    pub field_width: f32,
    pub field_height: f32,
    /// RNG seed (same seed + same inputs = same game)
    pub seed: u64,

    // === Spawning ===
    /// Enemies emitted per session before the director stops
    pub max_enemies: u32,
    /// Base seconds between enemy spawns (shrinks with level)
    pub spawn_cadence: f32,
    /// Seconds between medkits; None disables pickups
    pub pickup_cadence: Option<f32>,
    /// Seconds between enemy shots; None makes enemies silent
    pub enemy_fire_period: Option<f32>,

    // === Controls ===
    /// Ramp speed with distance instead of a fixed speed
    pub adaptive_speed: bool,
    /// Per-tick chance of an extra shot while the tank is held
    pub hold_fire_chance: f32,
    /// Maximum live player projectiles
    pub projectile_cap: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            variant: Variant::Assault,

            field_width: 390.0,
            field_height: 844.0,
            seed: 0,

            max_enemies: 100,
            spawn_cadence: 2.0,
            pickup_cadence: Some(12.0),
            enemy_fire_period: Some(2.0),

            adaptive_speed: true,
            hold_fire_chance: 0.1,
            projectile_cap: 3,
        }
    }
}

impl GameConfig {
    /// Create a config from a variant preset (applies preset defaults)
    pub fn from_preset(variant: Variant) -> Self {
        let mut config = Self::default();
        config.apply_preset(variant);
        config
    }

    /// Apply a variant preset (updates variant-dependent settings)
    pub fn apply_preset(&mut self, variant: Variant) {
        self.variant = variant;
        match variant {
            Variant::Assault => {
                self.pickup_cadence = Some(12.0);
                self.adaptive_speed = true;
                self.hold_fire_chance = 0.1;
            }
            Variant::Classic => {
                self.pickup_cadence = None;
                self.adaptive_speed = false;
                self.hold_fire_chance = 0.0;
            }
        }
    }

    /// Playfield extents
    pub fn field(&self) -> Vec2 {
        Vec2::new(self.field_width, self.field_height)
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.field_width > 0.0 && self.field_height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "field must be positive, got {}x{}",
                self.field_width, self.field_height
            )));
        }
        if !(self.spawn_cadence > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "spawn_cadence must be positive, got {}",
                self.spawn_cadence
            )));
        }
        if let Some(cadence) = self.pickup_cadence {
            if !(cadence > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "pickup_cadence must be positive, got {cadence}"
                )));
            }
        }
        if let Some(period) = self.enemy_fire_period {
            if !(period > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "enemy_fire_period must be positive, got {period}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.hold_fire_chance) {
            return Err(ConfigError::Invalid(format!(
                "hold_fire_chance must be within 0..=1, got {}",
                self.hold_fire_chance
            )));
        }
        if self.projectile_cap == 0 {
            return Err(ConfigError::Invalid("projectile_cap must be at least 1".into()));
        }
        Ok(())
    }
}
