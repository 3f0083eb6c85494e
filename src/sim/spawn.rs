//! Spawn director and enemy weapons
//!
//! Timers are accumulated-delta counters checked once per tick, never
//! independently scheduled callbacks.

use glam::Vec2;
use rand::Rng;

use super::entity::{Entity, EntityId, EntityKind, Lifetime};
use super::registry::Registry;
use super::state::GameEvent;
use crate::config::GameConfig;
use crate::consts::*;
use crate::{heading_between, heading_to_dir};

/// Time-driven enemy and pickup spawning with a population cap
#[derive(Debug, Clone)]
pub struct SpawnDirector {
    /// Seconds accumulated toward the next enemy
    enemy_timer: f32,
    /// Seconds accumulated toward the next pickup
    pickup_timer: f32,
    /// Enemies emitted this session (monotonic, capped at max_enemies)
    spawn_count: u32,
    max_enemies: u32,
    base_cadence: f32,
    pickup_cadence: Option<f32>,
    enemy_fire_period: Option<f32>,
    field: Vec2,
}

impl SpawnDirector {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            enemy_timer: 0.0,
            pickup_timer: 0.0,
            spawn_count: 0,
            max_enemies: config.max_enemies,
            base_cadence: config.spawn_cadence,
            pickup_cadence: config.pickup_cadence,
            enemy_fire_period: config.enemy_fire_period,
            field: config.field(),
        }
    }

    pub fn spawn_count(&self) -> u32 {
        self.spawn_count
    }

    pub fn max_enemies(&self) -> u32 {
        self.max_enemies
    }

    /// Enemy spawn cadence in seconds for a 1-based level
    pub fn cadence_for(&self, level: u32) -> f32 {
        let steps = level.saturating_sub(1).min(64) as i32;
        (self.base_cadence * LEVEL_CADENCE_FACTOR.powi(steps)).max(MIN_SPAWN_CADENCE.min(self.base_cadence))
    }

    /// Reset timers and the spawn count (restart)
    pub fn reset(&mut self) {
        self.enemy_timer = 0.0;
        self.pickup_timer = 0.0;
        self.spawn_count = 0;
    }

    /// Advance timers by `dt`, emitting at most one enemy and one pickup.
    /// Returns the handles spawned this tick.
    pub fn tick(
        &mut self,
        dt: f32,
        level: u32,
        registry: &mut Registry,
        rng: &mut impl Rng,
    ) -> Vec<EntityId> {
        let mut spawned = Vec::new();

        // Timer keeps running at the cap but never emits
        self.enemy_timer += dt;
        let cadence = self.cadence_for(level);
        if self.enemy_timer >= cadence {
            self.enemy_timer -= cadence;
            if self.spawn_count < self.max_enemies {
                spawned.push(self.spawn_enemy(registry, rng));
                self.spawn_count += 1;
            }
        }

        if let Some(pickup_cadence) = self.pickup_cadence {
            self.pickup_timer += dt;
            if self.pickup_timer >= pickup_cadence {
                self.pickup_timer -= pickup_cadence;
                spawned.push(self.spawn_pickup(registry, rng));
            }
        }

        spawned
    }

    fn spawn_enemy(&self, registry: &mut Registry, rng: &mut impl Rng) -> EntityId {
        let x = random_in(rng, ENEMY_SPAWN_MARGIN, self.field.x - ENEMY_SPAWN_MARGIN);
        let start = Vec2::new(x, self.field.y + ENEMY_SPAWN_ABOVE);
        // Linear descent to the exit line over a fixed duration
        let vel = Vec2::new(0.0, (ENEMY_EXIT_Y - start.y) / ENEMY_DESCENT_DURATION);
        let fire_cooldown = self.enemy_fire_period;

        let id = registry.add(|id| {
            Entity::new(id, EntityKind::EnemyTank { fire_cooldown }, start)
                .with_velocity(vel)
                .with_heading(-std::f32::consts::FRAC_PI_2)
                .with_lifetime(Lifetime::Descent(ENEMY_DESCENT_DURATION))
        });
        log::debug!("spawned enemy {} at x={:.1} ({}/{})", id, x, self.spawn_count + 1, self.max_enemies);
        id
    }

    fn spawn_pickup(&self, registry: &mut Registry, rng: &mut impl Rng) -> EntityId {
        let pos = Vec2::new(
            random_in(rng, PICKUP_MARGIN, self.field.x - PICKUP_MARGIN),
            random_in(rng, PICKUP_MARGIN, self.field.y - PICKUP_MARGIN),
        );
        let id = registry.add(|id| {
            Entity::new(id, EntityKind::Pickup, pos)
                .with_lifetime(Lifetime::Ttl(PICKUP_VISIBLE_TIME + PICKUP_FADE_TIME))
        });
        log::debug!("spawned medkit {} at ({:.1}, {:.1})", id, pos.x, pos.y);
        id
    }
}

/// Uniform sample in `[lo, hi]`; collapses to the midpoint on a degenerate range
fn random_in(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.random_range(lo..=hi)
    } else {
        (lo + hi) * 0.5
    }
}

/// Aim every enemy turret at the player and fire the ones whose cooldown ran
/// out. Returns the projectiles created.
pub fn enemy_weapons(
    registry: &mut Registry,
    player_pos: Vec2,
    fire_period: Option<f32>,
    dt: f32,
    events: &mut Vec<GameEvent>,
) -> Vec<EntityId> {
    let mut shots = Vec::new();

    for enemy in registry.iter_mut() {
        let EntityKind::EnemyTank { fire_cooldown } = &mut enemy.kind else {
            continue;
        };
        enemy.heading = heading_between(enemy.pos, player_pos);

        if let (Some(cooldown), Some(period)) = (fire_cooldown.as_mut(), fire_period) {
            *cooldown -= dt;
            if *cooldown <= 0.0 {
                *cooldown += period;
                shots.push(enemy.pos + Vec2::new(0.0, ENEMY_MUZZLE_OFFSET));
            }
        }
    }

    let mut spawned = Vec::with_capacity(shots.len());
    for muzzle in shots {
        let heading = heading_between(muzzle, player_pos);
        let id = registry.add(|id| {
            Entity::new(id, EntityKind::EnemyProjectile, muzzle)
                .with_velocity(heading_to_dir(heading) * ENEMY_PROJECTILE_SPEED)
                .with_heading(heading)
                .with_lifetime(Lifetime::Ttl(ENEMY_PROJECTILE_TTL))
        });
        events.push(GameEvent::MuzzleFlash { pos: muzzle, heading });
        spawned.push(id);
    }
    spawned
}
