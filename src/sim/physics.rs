//! Velocity integration and contact detection
//!
//! Purely geometric: no damage, scoring or removal happens here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use super::geometry::swept_overlap;
use super::registry::Registry;

/// Two overlapping entities, reported once per tick with `a < b`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contact {
    pub a: EntityId,
    pub b: EntityId,
}

impl Contact {
    /// Unordered pair constructor
    pub fn new(x: EntityId, y: EntityId) -> Self {
        if x <= y {
            Self { a: x, b: y }
        } else {
            Self { a: y, b: x }
        }
    }

    pub fn involves(&self, id: EntityId) -> bool {
        self.a == id || self.b == id
    }
}

/// Integrate every live entity's position by its velocity
pub fn advance(registry: &mut Registry, dt: f32) {
    for entity in registry.iter_mut() {
        entity.prev_pos = entity.pos;
        if entity.vel != Vec2::ZERO {
            entity.pos += entity.vel * dt;
        }
    }
}

/// Every overlapping pair of live entities.
///
/// Pairs where either side is a projectile use the swept test over the last
/// step; everything else uses a plain overlap at the current positions.
/// Iteration is over ascending handles and each unordered pair is visited
/// exactly once, so the output is deterministic and duplicate-free.
pub fn detect_contacts(registry: &Registry) -> Vec<Contact> {
    let bodies: Vec<_> = registry
        .iter()
        .map(|e| (e.id, e.bounds(), e.prev_pos, e.category().is_projectile()))
        .collect();

    let mut contacts = Vec::new();
    for (i, (id_a, rect_a, from_a, proj_a)) in bodies.iter().enumerate() {
        for (id_b, rect_b, from_b, proj_b) in &bodies[i + 1..] {
            let hit = if *proj_a || *proj_b {
                swept_overlap(rect_a, *from_a, rect_b, *from_b)
            } else {
                rect_a.overlaps(rect_b)
            };
            if hit {
                contacts.push(Contact::new(*id_a, *id_b));
            }
        }
    }
    contacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Entity, EntityKind};

    #[test]
    fn test_advance_integrates_velocity() {
        let mut reg = Registry::new();
        let id = reg.add(|id| {
            Entity::new(id, EntityKind::PlayerProjectile, Vec2::new(10.0, 10.0))
                .with_velocity(Vec2::new(0.0, 400.0))
        });
        advance(&mut reg, 0.5);
        let e = reg.get(id).unwrap();
        assert_eq!(e.pos, Vec2::new(10.0, 210.0));
        assert_eq!(e.prev_pos, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_advance_skips_flagged() {
        let mut reg = Registry::new();
        let id = reg.add(|id| {
            Entity::new(id, EntityKind::EnemyProjectile, Vec2::ZERO).with_velocity(Vec2::X)
        });
        reg.mark_removed(id);
        advance(&mut reg, 1.0);
        assert_eq!(reg.get(id).unwrap().pos, Vec2::ZERO);
    }

    #[test]
    fn test_contacts_reported_once_and_ordered() {
        let mut reg = Registry::new();
        let enemy = reg.spawn(EntityKind::EnemyTank { fire_cooldown: None }, Vec2::new(100.0, 100.0));
        let bullet = reg.spawn(EntityKind::PlayerProjectile, Vec2::new(100.0, 100.0));
        let far = reg.spawn(EntityKind::Pickup, Vec2::new(300.0, 300.0));

        let contacts = detect_contacts(&reg);
        assert_eq!(contacts, vec![Contact::new(bullet, enemy)]);
        assert_eq!(contacts[0].a, enemy);
        assert!(!contacts[0].involves(far));
    }

    #[test]
    fn test_fast_projectile_does_not_tunnel() {
        let mut reg = Registry::new();
        // Enemy 30 tall; bullet moves 75 units in one step, starting below
        // and ending above it.
        let enemy = reg.spawn(EntityKind::EnemyTank { fire_cooldown: None }, Vec2::new(100.0, 100.0));
        let bullet = reg.add(|id| {
            Entity::new(id, EntityKind::PlayerProjectile, Vec2::new(100.0, 50.0))
                .with_velocity(Vec2::new(0.0, 300.0))
        });
        advance(&mut reg, 0.25);
        assert_eq!(reg.get(bullet).unwrap().pos.y, 125.0);
        assert!(!reg.get(bullet).unwrap().bounds().overlaps(&reg.get(enemy).unwrap().bounds()));
        assert_eq!(detect_contacts(&reg), vec![Contact::new(enemy, bullet)]);
    }

    #[test]
    fn test_flagged_entities_have_no_contacts() {
        let mut reg = Registry::new();
        let a = reg.spawn(EntityKind::PlayerTank { knockback: 0.0 }, Vec2::ZERO);
        reg.spawn(EntityKind::EnemyTank { fire_cooldown: None }, Vec2::ZERO);
        reg.mark_removed(a);
        assert!(detect_contacts(&reg).is_empty());
    }
}
