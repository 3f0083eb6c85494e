//! Entity handles, categories and per-variant data

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::*;

/// Opaque entity handle.
///
/// Allocated from a monotonic counter that is never reset, so a handle value
/// is never handed out twice during a process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Collision classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Player,
    Enemy,
    PlayerProjectile,
    EnemyProjectile,
    Pickup,
}

impl Category {
    pub fn is_projectile(&self) -> bool {
        matches!(self, Category::PlayerProjectile | Category::EnemyProjectile)
    }
}

/// Variant-specific state
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    PlayerTank {
        /// Seconds of knockback motion left (velocity is zeroed when it ends)
        knockback: f32,
    },
    EnemyTank {
        /// Seconds until the next shot (`None` when this enemy never fires)
        fire_cooldown: Option<f32>,
    },
    PlayerProjectile,
    EnemyProjectile,
    Pickup,
}

impl EntityKind {
    pub fn category(&self) -> Category {
        match self {
            EntityKind::PlayerTank { .. } => Category::Player,
            EntityKind::EnemyTank { .. } => Category::Enemy,
            EntityKind::PlayerProjectile => Category::PlayerProjectile,
            EntityKind::EnemyProjectile => Category::EnemyProjectile,
            EntityKind::Pickup => Category::Pickup,
        }
    }

    /// Fixed full size of the bounding rectangle
    pub fn size(&self) -> (f32, f32) {
        match self {
            EntityKind::PlayerTank { .. } => PLAYER_SIZE,
            EntityKind::EnemyTank { .. } => ENEMY_SIZE,
            EntityKind::PlayerProjectile | EntityKind::EnemyProjectile => PROJECTILE_SIZE,
            EntityKind::Pickup => PICKUP_SIZE,
        }
    }
}

/// Countdown that ends an entity's life without any contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lifetime {
    /// Lives until destroyed by combat or cleared by restart
    Unbounded,
    /// Seconds until silent expiry (projectiles, pickups)
    Ttl(f32),
    /// Seconds until the descent reaches the exit line (a breach)
    Descent(f32),
}

impl Lifetime {
    /// Count down by `dt`; returns true on the tick the countdown runs out
    pub fn tick(&mut self, dt: f32) -> bool {
        match self {
            Lifetime::Unbounded => false,
            Lifetime::Ttl(t) | Lifetime::Descent(t) => {
                *t -= dt;
                *t <= 0.0
            }
        }
    }

    pub fn remaining(&self) -> Option<f32> {
        match *self {
            Lifetime::Unbounded => None,
            Lifetime::Ttl(t) | Lifetime::Descent(t) => Some(t.max(0.0)),
        }
    }
}

/// A live simulation entity
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec2,
    /// Position at the start of the current physics step (for swept tests)
    pub prev_pos: Vec2,
    pub vel: Vec2,
    /// Radians; turret aim for enemies, flight direction for projectiles
    pub heading: f32,
    pub lifetime: Lifetime,
    pub(super) removed: bool,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            prev_pos: pos,
            vel: Vec2::ZERO,
            heading: std::f32::consts::FRAC_PI_2,
            lifetime: Lifetime::Unbounded,
            removed: false,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_heading(mut self, heading: f32) -> Self {
        self.heading = heading;
        self
    }

    pub fn with_lifetime(mut self, lifetime: Lifetime) -> Self {
        self.lifetime = lifetime;
        self
    }

    #[inline]
    pub fn category(&self) -> Category {
        self.kind.category()
    }

    /// Bounding rectangle at the current position
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.pos, self.kind.size())
    }

    /// Flagged for removal at the end of this tick
    #[inline]
    pub fn is_removed(&self) -> bool {
        self.removed
    }
}
