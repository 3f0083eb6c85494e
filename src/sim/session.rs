//! Session scalars: score, lives, health, level
//!
//! Mutators only clamp and report what changed. Reacting to a change (HUD
//! events, level up, game over) is done by the tick after each effect batch.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Which session fields a mutation touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionDelta {
    pub score: bool,
    pub lives: bool,
    pub health: bool,
}

impl SessionDelta {
    pub fn any(&self) -> bool {
        self.score || self.lives || self.health
    }

    pub fn merge(&mut self, other: SessionDelta) {
        self.score |= other.score;
        self.lives |= other.lives;
        self.health |= other.health;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub score: u64,
    pub lives: u8,
    /// 0..=MAX_HEALTH
    pub health: u8,
    /// 1-based
    pub level: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            score: 0,
            lives: START_LIVES,
            health: MAX_HEALTH,
            level: 1,
        }
    }

    pub fn add_score(&mut self, amount: u64) -> SessionDelta {
        let before = self.score;
        self.score = self.score.saturating_add(amount);
        SessionDelta {
            score: self.score != before,
            ..Default::default()
        }
    }

    /// Saturates at zero
    pub fn lose_lives(&mut self, amount: u8) -> SessionDelta {
        let before = self.lives;
        self.lives = self.lives.saturating_sub(amount);
        SessionDelta {
            lives: self.lives != before,
            ..Default::default()
        }
    }

    /// Saturates at zero
    pub fn damage(&mut self, amount: u8) -> SessionDelta {
        let before = self.health;
        self.health = self.health.saturating_sub(amount);
        SessionDelta {
            health: self.health != before,
            ..Default::default()
        }
    }

    /// Saturates at MAX_HEALTH
    pub fn heal(&mut self, amount: u8) -> SessionDelta {
        let before = self.health;
        self.health = self.health.saturating_add(amount).min(MAX_HEALTH);
        SessionDelta {
            health: self.health != before,
            ..Default::default()
        }
    }

    /// Lives and health are independent loss conditions
    pub fn is_terminal(&self) -> bool {
        self.lives == 0 || self.health == 0
    }

    pub fn health_pct(&self) -> f32 {
        self.health as f32 / MAX_HEALTH as f32
    }

    /// Level implied by the current score
    pub fn level_for_score(score: u64) -> u32 {
        1 + (score / SCORE_PER_LEVEL).min(u32::MAX as u64 - 1) as u32
    }

    /// Recompute the level; returns the new level if it changed
    pub fn refresh_level(&mut self) -> Option<u32> {
        let level = Self::level_for_score(self.score);
        if level != self.level {
            self.level = level;
            Some(level)
        } else {
            None
        }
    }
}
