//! Player controller
//!
//! Converts pointer gestures into bounded tank movement and fire requests.
//! Pointer events are queued by the input layer and consumed at the start of
//! the next tick.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Category, Entity, EntityId, EntityKind, Lifetime};
use super::geometry::Rect;
use super::registry::Registry;
use super::state::GameEvent;
use crate::consts::*;

/// Raw pointer input, already in simulation coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down(Vec2),
    Move(Vec2),
    Up,
}

/// What the held pointer is doing
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PointerMode {
    #[default]
    Idle,
    /// Pointer went down on the tank
    Firing,
    /// Pointer went down elsewhere; drive toward it
    Moving { target: Vec2 },
}

/// Movement and fire tuning taken from the config
#[derive(Debug, Clone, Copy)]
pub struct ControlTuning {
    pub field: Vec2,
    pub adaptive_speed: bool,
    pub hold_fire_chance: f32,
    pub projectile_cap: usize,
}

#[derive(Debug, Clone, Default)]
pub struct PlayerController {
    pub mode: PointerMode,
}

impl PlayerController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the press landed on the tank (fire immediately)
    pub fn on_pointer_down(&mut self, point: Vec2, tank_pos: Vec2) -> bool {
        let touch = Rect::from_size(point, (TOUCH_AREA_SIZE, TOUCH_AREA_SIZE));
        if touch.contains_point(tank_pos) {
            self.mode = PointerMode::Firing;
            true
        } else {
            self.mode = PointerMode::Moving { target: point };
            false
        }
    }

    pub fn on_pointer_move(&mut self, point: Vec2) {
        if let PointerMode::Moving { target } = &mut self.mode {
            *target = point;
        }
    }

    pub fn on_pointer_up(&mut self) {
        self.mode = PointerMode::Idle;
    }

    /// Consume this tick's pointer events, then move and/or fire.
    pub fn step(
        &mut self,
        pointer: &[PointerEvent],
        player: EntityId,
        tuning: &ControlTuning,
        dt: f32,
        registry: &mut Registry,
        rng: &mut impl Rng,
        events: &mut Vec<GameEvent>,
    ) {
        let Some(tank_pos) = registry.live(player).map(|e| e.pos) else {
            return;
        };

        let mut fired_on_press = false;
        for event in pointer {
            match *event {
                PointerEvent::Down(point) => {
                    if self.on_pointer_down(point, tank_pos) {
                        fire(registry, player, tuning.projectile_cap, events);
                        fired_on_press = true;
                    }
                }
                PointerEvent::Move(point) => self.on_pointer_move(point),
                PointerEvent::Up => self.on_pointer_up(),
            }
        }

        match self.mode {
            PointerMode::Moving { target } => {
                if let Some(tank) = registry.get_mut(player) {
                    tank.pos = move_towards(tank.pos, target, dt, tuning);
                }
            }
            PointerMode::Firing if !fired_on_press && tuning.hold_fire_chance > 0.0 => {
                if rng.random::<f32>() < tuning.hold_fire_chance {
                    fire(registry, player, tuning.projectile_cap, events);
                }
            }
            _ => {}
        }
    }
}

/// Lower/upper corners the tank may be driven to
pub fn movement_envelope(field: Vec2) -> (Vec2, Vec2) {
    let min = Vec2::new(PLAYER_MARGIN_X, PLAYER_MIN_Y);
    let max = Vec2::new(
        (field.x - PLAYER_MARGIN_X).max(min.x),
        (field.y * PLAYER_MAX_Y_FRACTION).max(min.y),
    );
    (min, max)
}

/// Start pose of the tank
pub fn start_position(field: Vec2) -> Vec2 {
    Vec2::new(field.x * 0.5, field.y * PLAYER_START_Y_FRACTION)
}

/// Move `pos` one step toward `target` (clamped to the movement envelope).
///
/// Speed is fixed, or ramps from MIN_MOVE_SPEED to MAX_MOVE_SPEED as the
/// remaining distance grows to MOVE_RAMP_DISTANCE. Never overshoots.
pub fn move_towards(pos: Vec2, target: Vec2, dt: f32, tuning: &ControlTuning) -> Vec2 {
    let (min, max) = movement_envelope(tuning.field);
    let target = target.clamp(min, max);

    let delta = target - pos;
    let distance = delta.length();
    if distance < MIN_MOVE_DISTANCE {
        return pos;
    }

    let speed = if tuning.adaptive_speed {
        let factor = (distance / MOVE_RAMP_DISTANCE).min(1.0);
        MIN_MOVE_SPEED + (MAX_MOVE_SPEED - MIN_MOVE_SPEED) * factor
    } else {
        FIXED_MOVE_SPEED
    };

    let step = (speed * dt).min(distance);
    pos + delta / distance * step
}

/// Fire one projectile straight up from the tank's muzzle.
///
/// No-op (returns None) while `cap` player projectiles are already live.
pub fn fire(
    registry: &mut Registry,
    player: EntityId,
    cap: usize,
    events: &mut Vec<GameEvent>,
) -> Option<EntityId> {
    let tank_pos = registry.live(player)?.pos;
    if registry.count(Category::PlayerProjectile) >= cap {
        log::debug!("fire rejected: {} projectiles live", cap);
        return None;
    }

    let muzzle = tank_pos + Vec2::new(0.0, PLAYER_MUZZLE_OFFSET);
    let id = registry.add(|id| {
        Entity::new(id, EntityKind::PlayerProjectile, muzzle)
            .with_velocity(Vec2::new(0.0, PLAYER_PROJECTILE_SPEED))
            .with_lifetime(Lifetime::Ttl(PLAYER_PROJECTILE_TTL))
    });
    events.push(GameEvent::MuzzleFlash {
        pos: muzzle,
        heading: std::f32::consts::FRAC_PI_2,
    });
    events.push(GameEvent::Recoil {
        id: player,
        offset: RECOIL_OFFSET,
    });
    Some(id)
}
