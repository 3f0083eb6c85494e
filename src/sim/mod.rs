//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod combat;
pub mod entity;
pub mod geometry;
pub mod physics;
pub mod player;
pub mod registry;
pub mod session;
pub mod spawn;
pub mod state;
pub mod tick;

pub use combat::{Effect, ExplosionSize, Resolution};
pub use entity::{Category, Entity, EntityId, EntityKind, Lifetime};
pub use geometry::Rect;
pub use physics::Contact;
pub use player::{PlayerController, PointerEvent, PointerMode};
pub use registry::Registry;
pub use session::{Session, SessionDelta};
pub use spawn::SpawnDirector;
pub use state::{EntityView, GameEvent, GamePhase, GameState, Snapshot, Visual};
pub use tick::{Stepper, TickInput, tick};
