//! Contact resolution
//!
//! Turns a contact pair into a batch of effects using a static, unordered
//! category-pair table, then applies a batch to the registry and session.
//! Resolution is read-only; only `apply` mutates.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Category, Entity, EntityId, EntityKind, Lifetime};
use super::physics::Contact;
use super::registry::Registry;
use super::session::{Session, SessionDelta};
use super::state::GameEvent;
use crate::consts::*;

/// Explosion cue sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionSize {
    /// Projectile impacts
    Small,
    /// Tanks destroyed by fire
    Medium,
    /// Body collisions
    Large,
}

/// A single state mutation produced by resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    ApplyDamage { target: EntityId, amount: u8 },
    Destroy(EntityId),
    IncrementScore(u64),
    DecrementLives(u8),
    SpawnEffect { size: ExplosionSize, pos: Vec2 },
    /// Restore health, capped at MAX_HEALTH
    Heal { target: EntityId, amount: u8 },
    /// Drive the target at `velocity` for `duration` seconds
    Knockback { target: EntityId, velocity: Vec2, duration: f32 },
}

/// Rows of the collision pair table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Player ↔ Enemy
    BodyCollision,
    /// PlayerProjectile ↔ Enemy
    EnemyShot,
    /// EnemyProjectile ↔ Player
    PlayerShot,
    /// Player ↔ Pickup
    Medkit,
}

impl Resolution {
    /// Category that plays the first role of this row
    fn first(&self) -> Category {
        match self {
            Resolution::BodyCollision | Resolution::Medkit => Category::Player,
            Resolution::EnemyShot => Category::PlayerProjectile,
            Resolution::PlayerShot => Category::EnemyProjectile,
        }
    }
}

/// Look up the table row for an unordered category pair
pub fn pair_rule(x: Category, y: Category) -> Option<Resolution> {
    use Category::*;
    match (x, y) {
        (Player, Enemy) | (Enemy, Player) => Some(Resolution::BodyCollision),
        (PlayerProjectile, Enemy) | (Enemy, PlayerProjectile) => Some(Resolution::EnemyShot),
        (EnemyProjectile, Player) | (Player, EnemyProjectile) => Some(Resolution::PlayerShot),
        (Player, Pickup) | (Pickup, Player) => Some(Resolution::Medkit),
        _ => None,
    }
}

/// Resolve one contact into an effect batch.
///
/// Returns an empty batch when the pair has no table row or when either
/// entity is already flagged for removal this tick.
pub fn resolve(registry: &Registry, contact: &Contact) -> Vec<Effect> {
    let (Some(a), Some(b)) = (registry.live(contact.a), registry.live(contact.b)) else {
        return Vec::new();
    };
    let Some(rule) = pair_rule(a.category(), b.category()) else {
        return Vec::new();
    };
    let (first, second) = if a.category() == rule.first() {
        (a, b)
    } else {
        (b, a)
    };
    log::trace!("contact {} / {} -> {:?}", first.id, second.id, rule);

    match rule {
        Resolution::BodyCollision => body_collision(first, second),
        Resolution::EnemyShot => vec![
            Effect::Destroy(first.id),
            Effect::Destroy(second.id),
            Effect::IncrementScore(KILL_SCORE),
        ],
        Resolution::PlayerShot => vec![
            Effect::Destroy(first.id),
            Effect::ApplyDamage {
                target: second.id,
                amount: ENEMY_PROJECTILE_DAMAGE,
            },
            Effect::SpawnEffect {
                size: ExplosionSize::Small,
                pos: first.pos,
            },
        ],
        Resolution::Medkit => vec![
            Effect::Destroy(second.id),
            Effect::Heal {
                target: first.id,
                amount: MAX_HEALTH,
            },
        ],
    }
}

fn body_collision(player: &Entity, enemy: &Entity) -> Vec<Effect> {
    let mut effects = vec![
        Effect::Destroy(enemy.id),
        Effect::ApplyDamage {
            target: player.id,
            amount: COLLISION_DAMAGE,
        },
        Effect::SpawnEffect {
            size: ExplosionSize::Large,
            pos: enemy.pos,
        },
    ];

    // Push the player away from the enemy; no direction when centers coincide
    let away = (player.pos - enemy.pos).normalize_or_zero();
    if away != Vec2::ZERO {
        effects.push(Effect::Knockback {
            target: player.id,
            velocity: away * (KNOCKBACK_DISTANCE / KNOCKBACK_DURATION),
            duration: KNOCKBACK_DURATION,
        });
    }
    effects
}

/// Effects for an entity whose lifetime countdown just ran out
pub fn resolve_expiry(entity: &Entity) -> Vec<Effect> {
    match entity.lifetime {
        Lifetime::Descent(_) => vec![Effect::Destroy(entity.id), Effect::DecrementLives(1)],
        Lifetime::Ttl(_) => vec![Effect::Destroy(entity.id)],
        Lifetime::Unbounded => Vec::new(),
    }
}

/// Apply a batch. Cues go to `events`; the returned delta tells the caller
/// which session fields changed so it can run its post-mutation hooks.
pub fn apply(
    effects: &[Effect],
    registry: &mut Registry,
    session: &mut Session,
    events: &mut Vec<GameEvent>,
) -> SessionDelta {
    let mut delta = SessionDelta::default();

    for effect in effects {
        match *effect {
            Effect::Destroy(id) => {
                registry.mark_removed(id);
            }
            Effect::ApplyDamage { target, amount } => {
                if is_player(registry, target) {
                    delta.merge(session.damage(amount));
                    events.push(GameEvent::DamageFlash { id: target });
                }
            }
            Effect::Heal { target, amount } => {
                if is_player(registry, target) {
                    delta.merge(session.heal(amount));
                }
            }
            Effect::IncrementScore(amount) => delta.merge(session.add_score(amount)),
            Effect::DecrementLives(amount) => delta.merge(session.lose_lives(amount)),
            Effect::SpawnEffect { size, pos } => events.push(GameEvent::Explosion { size, pos }),
            Effect::Knockback {
                target,
                velocity,
                duration,
            } => {
                if let Some(entity) = registry.get_mut(target).filter(|e| !e.is_removed()) {
                    if let EntityKind::PlayerTank { knockback } = &mut entity.kind {
                        *knockback = duration;
                        entity.vel = velocity;
                    }
                }
            }
        }
    }
    delta
}

fn is_player(registry: &Registry, id: EntityId) -> bool {
    registry
        .live(id)
        .is_some_and(|e| e.category() == Category::Player)
}
